//! Transition action types.

// Layer 1: Standard library imports
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use futures::future::BoxFuture;
use futures::FutureExt;

// Layer 3: Internal module imports
use crate::util::Status;

/// Failure reported by a transition action.
pub type ActionError = Box<dyn Error + Send + Sync + 'static>;

/// Outcome of a single transition action.
pub type ActionResult = Result<(), ActionError>;

/// A callable invoked while an actor transitions between two statuses.
///
/// Actions run on the owning actor's task and report success or failure;
/// a transition succeeds only if every one of its actions does. Actions
/// are reusable because the same `(src, dest)` edge may be traversed more
/// than once over an actor's lifetime.
///
/// # Example
///
/// ```rust
/// use stagehand::transition::Action;
///
/// let action = Action::new(|| async { Ok(()) });
/// # drop(action);
/// ```
#[derive(Clone)]
pub struct Action(Arc<dyn Fn() -> BoxFuture<'static, ActionResult> + Send + Sync>);

impl Action {
    /// Wrap an async callable as a transition action.
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        Self(Arc::new(move || action().boxed()))
    }

    /// Invoke the action, producing its outcome future.
    pub fn call(&self) -> BoxFuture<'static, ActionResult> {
        (self.0)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action")
    }
}

/// One entry of a batch action registration: run `action` whenever the
/// actor transitions from `src_status` to `dest_status`.
#[derive(Debug)]
pub struct TransitionAction {
    /// Status the transition leaves.
    pub src_status: Status,
    /// Status the transition enters.
    pub dest_status: Status,
    /// Callable to run during the transition.
    pub action: Action,
}

impl TransitionAction {
    /// Build a batch entry from an async callable.
    pub fn new<F, Fut>(src_status: impl Into<Status>, dest_status: impl Into<Status>, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        Self {
            src_status: src_status.into(),
            dest_status: dest_status.into(),
            action: Action::new(action),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests are allowed to use unwrap for simplicity
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_action_is_reusable() {
        let action = Action::new(|| async { Ok(()) });
        assert!(action.call().await.is_ok());
        assert!(action.call().await.is_ok());
    }

    #[tokio::test]
    async fn test_action_failure_surfaces() {
        let action = Action::new(|| async { Err(ActionError::from("boom")) });
        let result = action.call().await;
        assert_eq!(result.unwrap_err().to_string(), "boom");
    }

    #[test]
    fn test_transition_action_statuses() {
        let entry = TransitionAction::new("NONE", "READY", || async { Ok(()) });
        assert_eq!(entry.src_status, "NONE".into());
        assert_eq!(entry.dest_status, "READY".into());
    }
}
