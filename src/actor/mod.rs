//! Actor contract, bounded-mailbox implementation, and registry.
//!
//! The coordinator sees actors only through the [`Actor`] trait: identity
//! plus a mailbox that accepts [`Message`] work items and a way to stop the
//! drain loop. [`MailboxActor`] is the bundled implementation;
//! [`ActorRegistry`] is the coordinator-owned key-to-actor index.

pub mod mailbox;
pub mod registry;
pub mod traits;

pub use mailbox::{MailboxActor, DEFAULT_MAILBOX_CAPACITY};
pub use registry::ActorRegistry;
pub use traits::{Actor, Message};
