//! Cross-actor transition prerequisite graph.

// Layer 1: Standard library imports
use std::collections::{HashMap, HashSet, VecDeque};

// Layer 2: Third-party crate imports
use thiserror::Error;
use tracing::debug;

// Layer 3: Internal module imports
use crate::util::{ActorKey, Status};

/// `edges[actor][status]` maps each prerequisite actor to the status it
/// must reach. At most one pending prerequisite status per
/// `(actor, status, prerequisite)`; inserting a second overwrites.
type EdgesByActor = HashMap<ActorKey, HashMap<Status, HashMap<ActorKey, Status>>>;

/// Errors raised while mutating the dependency graph.
#[derive(Error, Debug)]
pub enum DependencyError {
    /// The inserted edge would close a cycle in the prerequisite graph.
    #[error("dependency for {key} transitioning to {status} would create a cycle")]
    CycleDetected {
        /// Dependent actor whose edge was rejected.
        key: ActorKey,
        /// Transition target the rejected edge guarded.
        status: Status,
    },
}

/// Directed graph of "actor A transitioning to status X waits for actor B
/// to reach status Y", with acyclicity enforced on every insertion and a
/// reverse index for O(dependents) wakeup when a status is reached.
///
/// Nodes are `(ActorKey, Status)` pairs; forward edges point from a
/// dependent to its prerequisites.
#[derive(Default)]
pub struct DependencyManager {
    /// Forward edges: who each `(actor, status)` is still waiting on.
    dependencies: EdgesByActor,
    /// Reverse edges: who to wake when `(actor, status)` is reached.
    reverse_dependencies: EdgesByActor,
}

impl DependencyManager {
    /// Create an empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `src` cannot begin transitioning to `src_status` until
    /// `dep` has reached `dep_status`.
    ///
    /// The edge is inserted first and the graph is then validated, so any
    /// closed walk including the new edge (a self-dependency in
    /// particular) is detected. On a cycle only the inserted edge is
    /// rolled back; a previously recorded prerequisite status for the same
    /// `(src, src_status, dep)` is restored.
    pub fn add_transition_dependency(
        &mut self,
        src: ActorKey,
        src_status: Status,
        dep: ActorKey,
        dep_status: Status,
    ) -> Result<(), DependencyError> {
        let bucket = self
            .dependencies
            .entry(src.clone())
            .or_default()
            .entry(src_status.clone())
            .or_default();
        let previous = bucket.insert(dep.clone(), dep_status.clone());

        if let Err(error) = self.validate_acyclic(&src, &src_status) {
            self.rollback_edge(&src, &src_status, &dep, previous);
            return Err(error);
        }

        self.reverse_dependencies
            .entry(dep)
            .or_default()
            .entry(dep_status)
            .or_default()
            .insert(src, src_status);

        Ok(())
    }

    /// True iff `(key, status)` still has unsatisfied prerequisites.
    ///
    /// Read-only: probing never materializes empty buckets.
    pub fn has_transition_dependencies(&self, key: &ActorKey, status: &Status) -> bool {
        self.dependencies
            .get(key)
            .and_then(|by_status| by_status.get(status))
            .is_some_and(|bucket| !bucket.is_empty())
    }

    /// Clear every edge waiting on `(key, status)` and return the
    /// dependents whose prerequisite set just became empty, in wakeup
    /// order.
    pub fn notify_dependencies_of_status(&mut self, key: &ActorKey, status: &Status) -> Vec<ActorKey> {
        let Some(watchers) = self
            .reverse_dependencies
            .get_mut(key)
            .and_then(|by_status| by_status.remove(status))
        else {
            return Vec::new();
        };

        let mut ready = Vec::new();
        for (src, src_status) in watchers {
            let Some(by_status) = self.dependencies.get_mut(&src) else {
                continue;
            };
            let Some(bucket) = by_status.get_mut(&src_status) else {
                continue;
            };
            bucket.remove(key);
            if bucket.is_empty() {
                by_status.remove(&src_status);
                if by_status.is_empty() {
                    self.dependencies.remove(&src);
                }
                debug!(dependent = %src, status = %src_status, "prerequisites satisfied");
                ready.push(src);
            }
        }

        if self
            .reverse_dependencies
            .get(key)
            .is_some_and(HashMap::is_empty)
        {
            self.reverse_dependencies.remove(key);
        }

        ready
    }

    /// Breadth-first walk of the forward graph from `(src, src_status)`.
    ///
    /// Nodes are marked visited as they are expanded; a cycle is signalled
    /// when a prerequisite of the current node is already in the visited
    /// set. The walk ends when the frontier empties.
    fn validate_acyclic(&self, src: &ActorKey, src_status: &Status) -> Result<(), DependencyError> {
        let mut visited: HashSet<(ActorKey, Status)> = HashSet::new();
        let mut frontier = VecDeque::new();
        frontier.push_back((src.clone(), src_status.clone()));

        while let Some((key, status)) = frontier.pop_front() {
            visited.insert((key.clone(), status.clone()));

            let Some(prerequisites) = self
                .dependencies
                .get(&key)
                .and_then(|by_status| by_status.get(&status))
            else {
                continue;
            };
            for (dep_key, dep_status) in prerequisites {
                let node = (dep_key.clone(), dep_status.clone());
                if visited.contains(&node) {
                    return Err(DependencyError::CycleDetected {
                        key: src.clone(),
                        status: src_status.clone(),
                    });
                }
                frontier.push_back(node);
            }
        }

        Ok(())
    }

    /// Undo a rejected insertion, restoring any overwritten prerequisite
    /// status and pruning buckets the insertion created.
    fn rollback_edge(
        &mut self,
        src: &ActorKey,
        src_status: &Status,
        dep: &ActorKey,
        previous: Option<Status>,
    ) {
        let Some(by_status) = self.dependencies.get_mut(src) else {
            return;
        };
        let Some(bucket) = by_status.get_mut(src_status) else {
            return;
        };
        match previous {
            Some(previous) => {
                bucket.insert(dep.clone(), previous);
            }
            None => {
                bucket.remove(dep);
                if bucket.is_empty() {
                    by_status.remove(src_status);
                    if by_status.is_empty() {
                        self.dependencies.remove(src);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests are allowed to use unwrap for simplicity
mod tests {
    use super::*;

    fn key(name: &str) -> ActorKey {
        ActorKey::from_parts(&"test".into(), &name.into())
    }

    fn ready() -> Status {
        Status::new("READY")
    }

    #[test]
    fn test_add_and_probe() {
        let mut manager = DependencyManager::new();

        assert!(!manager.has_transition_dependencies(&key("a"), &ready()));
        manager
            .add_transition_dependency(key("a"), ready(), key("b"), ready())
            .unwrap();
        assert!(manager.has_transition_dependencies(&key("a"), &ready()));
        assert!(!manager.has_transition_dependencies(&key("b"), &ready()));
    }

    #[test]
    fn test_probe_does_not_materialize_buckets() {
        let mut manager = DependencyManager::new();
        assert!(!manager.has_transition_dependencies(&key("a"), &ready()));
        // A second probe of the same missing key still reports nothing.
        assert!(!manager.has_transition_dependencies(&key("a"), &ready()));
        manager
            .add_transition_dependency(key("a"), ready(), key("b"), ready())
            .unwrap();
        assert!(manager.has_transition_dependencies(&key("a"), &ready()));
    }

    #[test]
    fn test_self_dependency_rejected() {
        let mut manager = DependencyManager::new();
        let result = manager.add_transition_dependency(key("a"), ready(), key("a"), ready());
        assert!(matches!(result, Err(DependencyError::CycleDetected { .. })));
        assert!(!manager.has_transition_dependencies(&key("a"), &ready()));
    }

    #[test]
    fn test_two_actor_cycle_rejected() {
        let mut manager = DependencyManager::new();
        manager
            .add_transition_dependency(key("a"), ready(), key("b"), ready())
            .unwrap();
        let result = manager.add_transition_dependency(key("b"), ready(), key("a"), ready());
        assert!(matches!(result, Err(DependencyError::CycleDetected { .. })));
        // The first edge survives; the offending edge was rolled back.
        assert!(manager.has_transition_dependencies(&key("a"), &ready()));
        assert!(!manager.has_transition_dependencies(&key("b"), &ready()));
    }

    #[test]
    fn test_cycle_rollback_keeps_sibling_edges() {
        let mut manager = DependencyManager::new();
        manager
            .add_transition_dependency(key("a"), ready(), key("b"), ready())
            .unwrap();
        manager
            .add_transition_dependency(key("b"), ready(), key("c"), ready())
            .unwrap();
        // b -> a closes a cycle through a -> b; b's edge on c must survive.
        let result = manager.add_transition_dependency(key("b"), ready(), key("a"), ready());
        assert!(result.is_err());
        assert!(manager.has_transition_dependencies(&key("b"), &ready()));

        let woken = manager.notify_dependencies_of_status(&key("c"), &ready());
        assert_eq!(woken, vec![key("b")]);
    }

    #[test]
    fn test_cycle_rollback_restores_overwritten_status() {
        let mut manager = DependencyManager::new();
        // a waiting on b@CREATED and b@RUNNING waiting on a@READY can
        // coexist: the nodes (b, CREATED) and (b, RUNNING) are distinct.
        manager
            .add_transition_dependency(key("a"), ready(), key("b"), Status::new("CREATED"))
            .unwrap();
        manager
            .add_transition_dependency(key("b"), Status::new("RUNNING"), key("a"), ready())
            .unwrap();
        // Re-pointing a's prerequisite on b at RUNNING closes the loop and
        // must restore the CREATED edge it overwrote.
        let result =
            manager.add_transition_dependency(key("a"), ready(), key("b"), Status::new("RUNNING"));
        assert!(matches!(result, Err(DependencyError::CycleDetected { .. })));

        // b@CREATED still wakes a.
        let woken = manager.notify_dependencies_of_status(&key("b"), &Status::new("CREATED"));
        assert_eq!(woken, vec![key("a")]);
    }

    #[test]
    fn test_overwrite_same_prerequisite_actor() {
        let mut manager = DependencyManager::new();
        manager
            .add_transition_dependency(key("a"), ready(), key("b"), Status::new("CREATED"))
            .unwrap();
        manager
            .add_transition_dependency(key("a"), ready(), key("b"), ready())
            .unwrap();

        // The CREATED edge was overwritten; only b@READY wakes a.
        let woken = manager.notify_dependencies_of_status(&key("b"), &Status::new("CREATED"));
        assert!(woken.is_empty());
        let woken = manager.notify_dependencies_of_status(&key("b"), &ready());
        assert_eq!(woken, vec![key("a")]);
    }

    #[test]
    fn test_notify_wakes_only_when_bucket_empties() {
        let mut manager = DependencyManager::new();
        manager
            .add_transition_dependency(key("a"), ready(), key("b"), ready())
            .unwrap();
        manager
            .add_transition_dependency(key("a"), ready(), key("c"), ready())
            .unwrap();

        let woken = manager.notify_dependencies_of_status(&key("b"), &ready());
        assert!(woken.is_empty());
        assert!(manager.has_transition_dependencies(&key("a"), &ready()));

        let woken = manager.notify_dependencies_of_status(&key("c"), &ready());
        assert_eq!(woken, vec![key("a")]);
        assert!(!manager.has_transition_dependencies(&key("a"), &ready()));
    }

    #[test]
    fn test_notify_without_watchers_is_noop() {
        let mut manager = DependencyManager::new();
        let woken = manager.notify_dependencies_of_status(&key("b"), &ready());
        assert!(woken.is_empty());
    }

    #[test]
    fn test_notify_clears_reverse_index() {
        let mut manager = DependencyManager::new();
        manager
            .add_transition_dependency(key("a"), ready(), key("b"), ready())
            .unwrap();

        let first = manager.notify_dependencies_of_status(&key("b"), &ready());
        assert_eq!(first, vec![key("a")]);
        // A second notification finds nothing to wake.
        let second = manager.notify_dependencies_of_status(&key("b"), &ready());
        assert!(second.is_empty());
    }

    #[test]
    fn test_transitive_chain_is_acyclic() {
        let mut manager = DependencyManager::new();
        manager
            .add_transition_dependency(key("a"), ready(), key("b"), ready())
            .unwrap();
        manager
            .add_transition_dependency(key("b"), ready(), key("c"), ready())
            .unwrap();
        manager
            .add_transition_dependency(key("c"), ready(), key("d"), ready())
            .unwrap();
        // Closing the loop back to the head is rejected.
        let result = manager.add_transition_dependency(key("d"), ready(), key("a"), ready());
        assert!(matches!(result, Err(DependencyError::CycleDetected { .. })));
    }
}
