//! Commands processed by the coordinator event loop.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tokio::sync::oneshot;

// Layer 3: Internal module imports
use super::errors::CoordinatorError;
use crate::actor::Actor;
use crate::subscription::Subscription;
use crate::transition::{Action, ActionResult};
use crate::util::{ActorKey, Status};

/// A unit of work enqueued onto the coordinator mailbox.
///
/// Every public operation marshals into one of these so that all subsystem
/// state is read and written by the single event-loop task. Operations
/// with a synchronous result carry a one-shot reply channel.
pub(crate) enum Command {
    /// Register an actor and initialize its status bookkeeping.
    AddActor {
        actor: Arc<dyn Actor>,
        initial: Status,
        terminal: Status,
    },
    /// Record a cross-actor transition prerequisite.
    AddTransitionDependency {
        src: ActorKey,
        src_status: Status,
        dep: ActorKey,
        dep_status: Status,
        reply: oneshot::Sender<Result<(), CoordinatorError>>,
    },
    /// Register an action for a transition edge.
    AddTransitionAction {
        key: ActorKey,
        src: Status,
        dest: Status,
        action: Action,
        reply: oneshot::Sender<Result<(), CoordinatorError>>,
    },
    /// Steer an actor toward a new status. Deferred re-enqueues carry no
    /// reply channel; their outcome is logged instead.
    UpdateStatus {
        key: ActorKey,
        desired: Status,
        reply: Option<oneshot::Sender<Result<(), CoordinatorError>>>,
    },
    /// Read an actor's known status.
    GetStatus {
        key: ActorKey,
        reply: oneshot::Sender<Status>,
    },
    /// Register a one-shot observer for `(key, status)`.
    Subscribe {
        key: ActorKey,
        status: Status,
        observer: Subscription,
        reply: oneshot::Sender<Result<(), CoordinatorError>>,
    },
    /// Try to move an actor from its known to its desired status.
    PerformTransition { key: ActorKey },
    /// Record the outcome of one dispatched action.
    CompleteAction { key: ActorKey, result: ActionResult },
    /// Stop the event loop.
    Shutdown,
}
