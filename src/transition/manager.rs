//! Per-transition action collection and completion aggregation.

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
use tracing::debug;

// Layer 3: Internal module imports
use super::types::{Action, ActionResult};
use crate::util::{ActorKey, Status};

/// `actions[actor][src][dest]` is the ordered list of callables to run
/// when that actor transitions from `src` to `dest`.
type ActionsByActor = HashMap<ActorKey, HashMap<Status, HashMap<Status, Vec<Action>>>>;

/// Outcome buffer for the transition currently in flight for one actor.
struct Aggregator {
    expected: usize,
    results: Vec<ActionResult>,
}

/// Bookkeeping for transition actions and the in-flight outcome
/// aggregation of each actor's current transition.
///
/// A `(src, dest)` edge exists for an actor exactly when at least one
/// action has been registered for it; starting a transition allocates an
/// aggregator sized to the edge's action count, and completions fill it
/// until it closes. At most one aggregator is open per actor.
#[derive(Default)]
pub struct TransitionManager {
    actions: ActionsByActor,
    in_flight: HashMap<ActorKey, Aggregator>,
}

impl TransitionManager {
    /// Create an empty transition manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action to the `(src, dest)` edge for an actor.
    ///
    /// No uniqueness check; registering the same callable twice runs it
    /// twice per transition.
    pub fn add_transition_action(
        &mut self,
        key: ActorKey,
        src: Status,
        dest: Status,
        action: Action,
    ) {
        self.actions
            .entry(key)
            .or_default()
            .entry(src)
            .or_default()
            .entry(dest)
            .or_default()
            .push(action);
    }

    /// True iff at least one action is registered for the triple; an edge
    /// with no actions was never declared and cannot be transitioned.
    pub fn is_valid_transition(&self, key: &ActorKey, src: &Status, dest: &Status) -> bool {
        self.edge_actions(key, src, dest)
            .is_some_and(|actions| !actions.is_empty())
    }

    /// True iff a transition is currently aggregating results for `key`.
    pub fn has_open_transition(&self, key: &ActorKey) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Open an aggregator for the actor's `(src, dest)` transition and
    /// hand back the actions for the caller to dispatch.
    ///
    /// Callers must ensure no aggregator is already open for this actor.
    /// An edge with no registered actions opens nothing and returns an
    /// empty list.
    pub fn start_transition(&mut self, key: &ActorKey, src: &Status, dest: &Status) -> Vec<Action> {
        let Some(actions) = self.edge_actions(key, src, dest) else {
            return Vec::new();
        };
        if actions.is_empty() {
            return Vec::new();
        }
        let actions = actions.to_vec();

        debug!(actor = %key, %src, %dest, count = actions.len(), "starting transition");
        self.in_flight.insert(
            key.clone(),
            Aggregator {
                expected: actions.len(),
                results: Vec::with_capacity(actions.len()),
            },
        );

        actions
    }

    /// Record one action outcome for the actor's open transition.
    ///
    /// Returns the full outcome set exactly once, when the last pending
    /// action reports in; the aggregator is closed and removed at that
    /// point. Completions for an actor with no open aggregator are
    /// ignored.
    pub fn complete_transition_action(
        &mut self,
        key: &ActorKey,
        result: ActionResult,
    ) -> Option<Vec<ActionResult>> {
        let aggregator = self.in_flight.get_mut(key)?;
        aggregator.results.push(result);

        if aggregator.results.len() < aggregator.expected {
            return None;
        }
        self.in_flight.remove(key).map(|aggregator| aggregator.results)
    }

    fn edge_actions(&self, key: &ActorKey, src: &Status, dest: &Status) -> Option<&[Action]> {
        self.actions
            .get(key)?
            .get(src)?
            .get(dest)
            .map(Vec::as_slice)
    }
}
