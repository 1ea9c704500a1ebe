//! Per-actor status bookkeeping.

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::util::{ActorKey, Status};

/// The four statuses tracked per actor.
#[derive(Debug, Clone)]
struct ActorStatuses {
    /// Fixed at registration; never a legal transition destination.
    initial: Status,
    /// Fixed at registration; never a legal transition source.
    terminal: Status,
    /// The status the coordinator is steering toward.
    desired: Status,
    /// The last status the actor has actually reached.
    known: Status,
}

/// Pure bookkeeping of each actor's initial, terminal, desired, and known
/// statuses, plus the structural legality checks for subscription targets
/// and transition edges.
///
/// Lookups for keys that were never initialized return the empty status;
/// the coordinator checks registry membership before reaching any of these
/// accessors.
#[derive(Default)]
pub struct StatusManager {
    statuses: HashMap<ActorKey, ActorStatuses>,
}

impl StatusManager {
    /// Create an empty status manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the initial and terminal statuses for an actor and set both
    /// the desired and known statuses to the initial status.
    ///
    /// Re-initialization is not supported; callers must not register the
    /// same key twice.
    pub fn initialize_actor(&mut self, key: ActorKey, initial: Status, terminal: Status) {
        self.statuses.insert(
            key,
            ActorStatuses {
                desired: initial.clone(),
                known: initial.clone(),
                initial,
                terminal,
            },
        );
    }

    /// True iff `status` can still be observed for this actor.
    ///
    /// A subscription fires exactly once at transition time, so a status
    /// that has already been reached (including the initial status) is not
    /// a legal target.
    pub fn is_valid_subscription_status(&self, key: &ActorKey, status: &Status) -> bool {
        if self.known_status(key) == *status {
            return false;
        }
        self.initial_status(key) != *status
    }

    /// True iff `(src, dest)` is a structurally legal transition edge:
    /// the edge is not a self-loop, does not leave the terminal status,
    /// and does not re-enter the initial status.
    pub fn is_valid_transition_status(&self, key: &ActorKey, src: &Status, dest: &Status) -> bool {
        if src == dest {
            return false;
        }
        if *src == self.terminal_status(key) {
            return false;
        }
        *dest != self.initial_status(key)
    }

    /// The last status the actor has actually reached.
    pub fn known_status(&self, key: &ActorKey) -> Status {
        self.statuses
            .get(key)
            .map(|s| s.known.clone())
            .unwrap_or_default()
    }

    /// Publish a newly reached status.
    pub fn set_known_status(&mut self, key: &ActorKey, status: Status) {
        if let Some(statuses) = self.statuses.get_mut(key) {
            statuses.known = status;
        }
    }

    /// The status the coordinator is steering toward.
    pub fn desired_status(&self, key: &ActorKey) -> Status {
        self.statuses
            .get(key)
            .map(|s| s.desired.clone())
            .unwrap_or_default()
    }

    /// Set the steering target.
    pub fn set_desired_status(&mut self, key: &ActorKey, status: Status) {
        if let Some(statuses) = self.statuses.get_mut(key) {
            statuses.desired = status;
        }
    }

    /// The status the actor started in.
    pub fn initial_status(&self, key: &ActorKey) -> Status {
        self.statuses
            .get(key)
            .map(|s| s.initial.clone())
            .unwrap_or_default()
    }

    /// The sink status that stops the actor.
    pub fn terminal_status(&self, key: &ActorKey) -> Status {
        self.statuses
            .get(key)
            .map(|s| s.terminal.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> ActorKey {
        ActorKey::from_parts(&"test".into(), &name.into())
    }

    #[test]
    fn test_initialize_sets_all_four_statuses() {
        let mut manager = StatusManager::new();
        let key = key("a");

        manager.initialize_actor(key.clone(), "NONE".into(), "STOPPED".into());

        assert_eq!(manager.initial_status(&key), "NONE".into());
        assert_eq!(manager.terminal_status(&key), "STOPPED".into());
        assert_eq!(manager.desired_status(&key), "NONE".into());
        assert_eq!(manager.known_status(&key), "NONE".into());
    }

    #[test]
    fn test_unknown_actor_returns_empty_status() {
        let manager = StatusManager::new();
        assert_eq!(manager.known_status(&key("missing")), Status::default());
        assert_eq!(manager.desired_status(&key("missing")), Status::default());
    }

    #[test]
    fn test_set_known_and_desired() {
        let mut manager = StatusManager::new();
        let key = key("a");
        manager.initialize_actor(key.clone(), "NONE".into(), "STOPPED".into());

        manager.set_desired_status(&key, "READY".into());
        assert_eq!(manager.desired_status(&key), "READY".into());
        assert_eq!(manager.known_status(&key), "NONE".into());

        manager.set_known_status(&key, "READY".into());
        assert_eq!(manager.known_status(&key), "READY".into());
    }

    #[test]
    fn test_subscription_status_rules() {
        let mut manager = StatusManager::new();
        let key = key("a");
        manager.initialize_actor(key.clone(), "NONE".into(), "STOPPED".into());

        // Cannot subscribe to the initial status or the current known status.
        assert!(!manager.is_valid_subscription_status(&key, &"NONE".into()));
        assert!(manager.is_valid_subscription_status(&key, &"READY".into()));

        manager.set_known_status(&key, "READY".into());
        assert!(!manager.is_valid_subscription_status(&key, &"READY".into()));
        assert!(manager.is_valid_subscription_status(&key, &"STOPPED".into()));
    }

    #[test]
    fn test_transition_status_rules() {
        let mut manager = StatusManager::new();
        let key = key("a");
        manager.initialize_actor(key.clone(), "NONE".into(), "STOPPED".into());

        assert!(manager.is_valid_transition_status(&key, &"NONE".into(), &"READY".into()));
        // Self-loop.
        assert!(!manager.is_valid_transition_status(&key, &"READY".into(), &"READY".into()));
        // Terminal as source.
        assert!(!manager.is_valid_transition_status(&key, &"STOPPED".into(), &"READY".into()));
        // Initial as destination.
        assert!(!manager.is_valid_transition_status(&key, &"READY".into(), &"NONE".into()));
    }
}
