//! Key-to-actor resolution.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::traits::Actor;
use crate::util::ActorKey;

/// Registry resolving an [`ActorKey`] back to its actor.
///
/// Owned exclusively by the coordinator task; registration is one-shot and
/// actors are never removed.
#[derive(Default)]
pub struct ActorRegistry {
    actors: HashMap<ActorKey, Arc<dyn Actor>>,
}

impl ActorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actor, returning its key.
    pub fn register(&mut self, actor: Arc<dyn Actor>) -> ActorKey {
        let key = actor.key();
        self.actors.insert(key.clone(), actor);
        key
    }

    /// Resolve a key to its actor.
    pub fn get(&self, key: &ActorKey) -> Option<&Arc<dyn Actor>> {
        self.actors.get(key)
    }

    /// True iff an actor with this key has been registered.
    pub fn is_registered(&self, key: &ActorKey) -> bool {
        self.actors.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::MailboxActor;

    #[tokio::test]
    async fn test_register_and_get() {
        let mut registry = ActorRegistry::new();
        let actor = MailboxActor::spawn("container", "worker-1");

        let key = registry.register(actor);
        assert_eq!(key.as_str(), "container:worker-1");
        assert!(registry.is_registered(&key));
        assert!(registry.get(&key).is_some());
    }

    #[tokio::test]
    async fn test_unknown_key() {
        let registry = ActorRegistry::new();
        let actor = MailboxActor::spawn("container", "worker-1");

        assert!(!registry.is_registered(&actor.key()));
        assert!(registry.get(&actor.key()).is_none());
    }

    #[tokio::test]
    async fn test_reregistration_replaces() {
        let mut registry = ActorRegistry::new();
        let first = MailboxActor::spawn("container", "worker-1");
        let second = MailboxActor::spawn("container", "worker-1");

        let key = registry.register(first);
        registry.register(second);
        assert!(registry.is_registered(&key));
    }
}
