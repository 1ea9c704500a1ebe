//! The actor capability set the coordinator relies on.
//!
//! The coordinator treats actors as opaque holders of a mailbox: it needs
//! their identity (type, id, key) and a way to enqueue work ([`Actor::notify`])
//! and to terminate the mailbox loop ([`Actor::stop`]). Everything else an
//! actor does is its own business.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use futures::future::BoxFuture;

// Layer 3: Internal module imports
use crate::util::{ActorId, ActorKey, ActorType};

/// A unit of work delivered to an actor's mailbox.
///
/// The coordinator dispatches transition action bodies and subscription
/// observers as messages so they run off its critical path but still
/// serially per actor.
pub type Message = BoxFuture<'static, ()>;

/// Capability set every actor registered with the coordinator must expose.
///
/// Implementations own a mailbox drained by a dedicated task; the drain
/// loop must be running before the actor is registered (the provided
/// [`MailboxActor`](crate::actor::MailboxActor) starts it in its
/// constructor). `notify` suspends when the mailbox is full; that
/// backpressure is the only flow control in the system.
///
/// # Example
///
/// ```rust,ignore
/// use stagehand::{Actor, MailboxActor};
///
/// let actor = MailboxActor::spawn("container", "worker-1");
/// assert_eq!(actor.key().as_str(), "container:worker-1");
/// ```
#[async_trait]
pub trait Actor: Send + Sync + 'static {
    /// The namespace this actor belongs to.
    fn actor_type(&self) -> &ActorType;

    /// The id of this actor, unique within its type.
    fn actor_id(&self) -> &ActorId;

    /// The canonical `"<type>:<id>"` handle.
    fn key(&self) -> ActorKey {
        ActorKey::from_parts(self.actor_type(), self.actor_id())
    }

    /// Enqueue a unit of work onto this actor's mailbox.
    ///
    /// Suspends while the mailbox is full. Work enqueued after the actor
    /// has been stopped is dropped.
    async fn notify(&self, message: Message);

    /// Terminate the mailbox loop after all previously enqueued work has
    /// been processed.
    async fn stop(&self);
}
