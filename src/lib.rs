//! # stagehand - Dependency-Driven Actor Lifecycle Coordinator
//!
//! An in-process engine that drives a population of named actors through a
//! declared lineage of status transitions: a dependency-driven finite
//! state machine scheduler.
//!
//! Each actor carries four statuses (initial, terminal, desired, known).
//! Steering an actor toward a new status runs the transition actions
//! registered for the edge, but only once every cross-actor prerequisite
//! for that status has been satisfied; completed transitions fire one-shot
//! subscription observers and wake dependent actors. A failed action
//! diverts the actor to its terminal status and stops it.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use stagehand::{Coordinator, MailboxActor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let coordinator = Coordinator::new();
//!
//!     let server = MailboxActor::spawn("service", "server");
//!     let database = MailboxActor::spawn("service", "database");
//!     coordinator.add_actor(server.clone(), "NONE", "STOPPED").await;
//!     coordinator.add_actor(database.clone(), "NONE", "STOPPED").await;
//!
//!     coordinator
//!         .add_transition_action(server.as_ref(), "NONE", "READY", || async {
//!             // bring the server up
//!             Ok(())
//!         })
//!         .await?;
//!     coordinator
//!         .add_transition_action(database.as_ref(), "NONE", "READY", || async {
//!             // bring the database up
//!             Ok(())
//!         })
//!         .await?;
//!
//!     // The server may not become READY before the database is.
//!     coordinator
//!         .add_transition_dependency(server.as_ref(), "READY", database.as_ref(), "READY")
//!         .await?;
//!
//!     coordinator.subscribe(server.as_ref(), "READY", || println!("serving")).await?;
//!
//!     coordinator.update_status(server.as_ref(), "READY").await?;   // blocked
//!     coordinator.update_status(database.as_ref(), "READY").await?; // unblocks it
//!     Ok(())
//! }
//! ```
//!
//! # Concurrency Model
//!
//! Two layers of serialization, no locks:
//!
//! 1. **Coordinator layer** - one event-loop task drains a bounded FIFO
//!    command mailbox and is the only code that reads or writes subsystem
//!    state. Operations with a result thread it back over a one-shot
//!    reply channel.
//! 2. **Actor layer** - each actor drains its own bounded mailbox on its
//!    own task. Transition action bodies and subscription observers run
//!    there, off the coordinator's critical path but serially per actor.
//!
//! A full mailbox suspends the sender; that backpressure is the only flow
//! control. There is no cancellation, no retry, and no deadline handling:
//! an action that never returns leaves its transition open forever.
//!
//! # Module Organization
//!
//! - [`coordinator`] - The event loop and public operation surface
//! - [`actor`] - Actor contract, bounded-mailbox actor, registry
//! - [`status`] - Per-actor FSM bookkeeping
//! - [`dependency`] - Cross-actor prerequisite graph with cycle detection
//! - [`transition`] - Per-edge action lists and outcome aggregation
//! - [`subscription`] - One-shot observers of completed transitions
//! - [`util`] - Shared value types (keys and statuses)

pub mod actor;
pub mod coordinator;
pub mod dependency;
pub mod status;
pub mod subscription;
pub mod transition;
pub mod util;

// Re-export commonly used types
pub use actor::{Actor, ActorRegistry, MailboxActor, Message, DEFAULT_MAILBOX_CAPACITY};
pub use coordinator::{Coordinator, CoordinatorConfig, CoordinatorError};
pub use dependency::{DependencyError, DependencyManager};
pub use status::StatusManager;
pub use subscription::{Subscription, SubscriptionRegistry};
pub use transition::{Action, ActionError, ActionResult, TransitionAction, TransitionManager};
pub use util::{ActorId, ActorKey, ActorType, Status};
