//! Coordinator configuration with sensible defaults.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use serde::{Deserialize, Serialize};

// Layer 3: Internal
// (none)

/// Default capacity of the coordinator's command mailbox.
pub const DEFAULT_COORDINATOR_MAILBOX_CAPACITY: usize = 100;

/// Configuration for a [`Coordinator`](crate::coordinator::Coordinator).
///
/// # Examples
///
/// ```rust
/// use stagehand::coordinator::{CoordinatorConfig, DEFAULT_COORDINATOR_MAILBOX_CAPACITY};
///
/// let config = CoordinatorConfig::default();
/// assert_eq!(config.mailbox_capacity, DEFAULT_COORDINATOR_MAILBOX_CAPACITY);
///
/// let config = CoordinatorConfig::default().with_mailbox_capacity(500);
/// assert_eq!(config.mailbox_capacity, 500);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Capacity of the bounded command mailbox the event loop drains.
    /// Enqueueing into a full mailbox suspends the caller until space is
    /// available.
    pub mailbox_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_COORDINATOR_MAILBOX_CAPACITY,
        }
    }
}

impl CoordinatorConfig {
    /// Set the command mailbox capacity.
    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.mailbox_capacity == 0 {
            return Err("mailbox_capacity must be > 0".to_string());
        }
        Ok(())
    }
}
