//! Value types shared by every subsystem.

pub mod keys;

pub use keys::{ActorId, ActorKey, ActorType, Status};
