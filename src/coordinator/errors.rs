//! Coordinator-level error types.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use thiserror::Error;

// Layer 3: Internal
use crate::dependency::DependencyError;
use crate::util::{ActorKey, Status};

/// Errors returned by the coordinator's public operations.
///
/// These are all pre-condition failures surfaced synchronously through the
/// operation's reply channel. Failures of transition actions are never
/// surfaced here; they divert the actor to its terminal status instead.
#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// The operation referenced an actor that was never registered.
    #[error("unknown actor {0}")]
    UnknownActor(ActorKey),

    /// The requested edge violates the structural rules or has no
    /// registered transition action.
    #[error("transitioning from {src} to {dest} is illegal for actor {key}")]
    IllegalTransition {
        /// Actor the transition was requested for.
        key: ActorKey,
        /// Requested source status.
        src: Status,
        /// Requested destination status.
        dest: Status,
    },

    /// The subscription targets the initial or already-reached status.
    #[error("cannot subscribe to status {status} for actor {key}")]
    IllegalSubscription {
        /// Actor the subscription was requested for.
        key: ActorKey,
        /// Rejected subscription target.
        status: Status,
    },

    /// The dependency edge would close a cycle in the prerequisite graph.
    #[error(transparent)]
    CycleDetected(#[from] DependencyError),

    /// Configuration validation error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The coordinator event loop has shut down.
    #[error("coordinator is no longer running")]
    Unavailable,
}
