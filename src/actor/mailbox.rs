//! Bounded-mailbox actor implementation.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

// Layer 3: Internal module imports
use super::traits::{Actor, Message};
use crate::util::{ActorId, ActorKey, ActorType};

/// Default capacity for an actor mailbox.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 100;

enum Envelope {
    Work(Message),
    Stop,
}

/// A basic actor: a bounded mailbox drained by its own tokio task.
///
/// The drain task is spawned by the constructor, so the actor is ready to
/// be registered with a coordinator as soon as [`MailboxActor::spawn`]
/// returns. [`stop`](Actor::stop) enqueues a control message, so the loop
/// exits only after all work enqueued before the stop has run;
/// [`MailboxActor::wait`] joins the drain task afterwards.
///
/// # Example
///
/// ```rust,ignore
/// use stagehand::MailboxActor;
///
/// let actor = MailboxActor::spawn("container", "worker-1");
/// actor.notify(Box::pin(async { println!("running on the actor task") })).await;
/// actor.stop().await;
/// actor.wait().await;
/// ```
pub struct MailboxActor {
    actor_type: ActorType,
    actor_id: ActorId,
    key: ActorKey,
    sender: mpsc::Sender<Envelope>,
    drain_task: Mutex<Option<JoinHandle<()>>>,
}

impl MailboxActor {
    /// Spawn an actor with the default mailbox capacity.
    pub fn spawn(actor_type: impl Into<ActorType>, actor_id: impl Into<ActorId>) -> Arc<Self> {
        Self::spawn_with_capacity(actor_type, actor_id, DEFAULT_MAILBOX_CAPACITY)
    }

    /// Spawn an actor with a custom mailbox capacity.
    ///
    /// Must be called from within a tokio runtime; the mailbox drain task
    /// starts immediately.
    pub fn spawn_with_capacity(
        actor_type: impl Into<ActorType>,
        actor_id: impl Into<ActorId>,
        capacity: usize,
    ) -> Arc<Self> {
        let actor_type = actor_type.into();
        let actor_id = actor_id.into();
        let key = ActorKey::from_parts(&actor_type, &actor_id);

        // tokio channels reject zero capacity.
        let (sender, mut receiver) = mpsc::channel(capacity.max(1));
        let drain_task = tokio::spawn(async move {
            while let Some(envelope) = receiver.recv().await {
                match envelope {
                    Envelope::Work(message) => message.await,
                    Envelope::Stop => break,
                }
            }
        });

        Arc::new(Self {
            actor_type,
            actor_id,
            key,
            sender,
            drain_task: Mutex::new(Some(drain_task)),
        })
    }

    /// Wait for the mailbox loop to finish after [`Actor::stop`].
    ///
    /// Only the first caller joins the drain task; later callers return
    /// immediately.
    pub async fn wait(&self) {
        let drain_task = self.drain_task.lock().take();
        if let Some(handle) = drain_task {
            let _ = handle.await;
        }
    }
}

#[async_trait]
impl Actor for MailboxActor {
    fn actor_type(&self) -> &ActorType {
        &self.actor_type
    }

    fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    fn key(&self) -> ActorKey {
        self.key.clone()
    }

    async fn notify(&self, message: Message) {
        // A closed mailbox means the actor was stopped; late work is dropped.
        let _ = self.sender.send(Envelope::Work(message)).await;
    }

    async fn stop(&self) {
        let _ = self.sender.send(Envelope::Stop).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_identity() {
        let actor = MailboxActor::spawn("container", "worker-1");
        assert_eq!(actor.actor_type().as_str(), "container");
        assert_eq!(actor.actor_id().as_str(), "worker-1");
        assert_eq!(actor.key().as_str(), "container:worker-1");
    }

    #[tokio::test]
    async fn test_messages_run_in_order() {
        let actor = MailboxActor::spawn("container", "worker-1");
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let seen = Arc::clone(&seen);
            actor
                .notify(Box::pin(async move {
                    seen.lock().push(i);
                }))
                .await;
        }

        actor.stop().await;
        actor.wait().await;
        assert_eq!(*seen.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_stop_processes_preceding_messages() {
        let actor = MailboxActor::spawn("container", "worker-1");
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = Arc::clone(&count);
            actor
                .notify(Box::pin(async move {
                    count.fetch_add(1, Ordering::SeqCst);
                }))
                .await;
        }
        actor.stop().await;
        actor.wait().await;

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_notify_after_stop_is_dropped() {
        let actor = MailboxActor::spawn("container", "worker-1");
        actor.stop().await;
        actor.wait().await;

        let count = Arc::new(AtomicUsize::new(0));
        let after = Arc::clone(&count);
        actor
            .notify(Box::pin(async move {
                after.fetch_add(1, Ordering::SeqCst);
            }))
            .await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wait_twice_returns() {
        let actor = MailboxActor::spawn("container", "worker-1");
        actor.stop().await;
        actor.wait().await;
        actor.wait().await;
    }
}
