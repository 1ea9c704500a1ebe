//! One-shot observer callbacks keyed by `(actor, status)`.

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::util::{ActorKey, Status};

/// Observer invoked once when an actor reaches a subscribed status.
pub type Subscription = Box<dyn FnOnce() + Send + Sync + 'static>;

/// Flat per-`(actor, status)` list of one-shot observers, drained and
/// cleared when the status is reached.
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscriptions: HashMap<ActorKey, HashMap<Status, Vec<Subscription>>>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for `(key, status)`.
    pub fn subscribe(&mut self, key: ActorKey, status: Status, observer: Subscription) {
        self.subscriptions
            .entry(key)
            .or_default()
            .entry(status)
            .or_default()
            .push(observer);
    }

    /// Remove and return every observer registered for `(key, status)`.
    ///
    /// Subsequent drains for the same pair return nothing; delivery is
    /// exactly once.
    pub fn drain(&mut self, key: &ActorKey, status: &Status) -> Vec<Subscription> {
        self.subscriptions
            .get_mut(key)
            .and_then(|by_status| by_status.remove(status))
            .unwrap_or_default()
    }
}
