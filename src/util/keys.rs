// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// Namespace for a family of actors.
///
/// Actor ids are only required to be unique within their type, so the type
/// doubles as the namespace half of an [`ActorKey`].
///
/// # Example
/// ```rust
/// use stagehand::util::ActorType;
///
/// let kind = ActorType::new("container");
/// assert_eq!(kind.as_str(), "container");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorType(String);

impl ActorType {
    /// Create a new actor type.
    pub fn new(actor_type: impl Into<String>) -> Self {
        Self(actor_type.into())
    }

    /// Get the type as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorType {
    fn from(actor_type: &str) -> Self {
        Self::new(actor_type)
    }
}

impl From<String> for ActorType {
    fn from(actor_type: String) -> Self {
        Self::new(actor_type)
    }
}

impl Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for an actor, unique within its [`ActorType`].
///
/// # Example
/// ```rust
/// use stagehand::util::ActorId;
///
/// let id = ActorId::new("worker-1");
/// assert_eq!(id.as_str(), "worker-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    /// Create a new actor id.
    pub fn new(actor_id: impl Into<String>) -> Self {
        Self(actor_id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(actor_id: &str) -> Self {
        Self::new(actor_id)
    }
}

impl From<String> for ActorId {
    fn from(actor_id: String) -> Self {
        Self::new(actor_id)
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical handle for an actor inside the coordinator.
///
/// A key is the composite `"<type>:<id>"` and is the only identity the
/// coordinator and its subsystems ever store or compare.
///
/// # Example
/// ```rust
/// use stagehand::util::{ActorId, ActorKey, ActorType};
///
/// let key = ActorKey::from_parts(&ActorType::new("container"), &ActorId::new("worker-1"));
/// assert_eq!(key.as_str(), "container:worker-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorKey(String);

impl ActorKey {
    /// Compose a key from an actor type and id.
    pub fn from_parts(actor_type: &ActorType, actor_id: &ActorId) -> Self {
        Self(format!("{actor_type}:{actor_id}"))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ActorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque status tag an actor moves through.
///
/// Statuses carry no structure of their own; legality of an edge between
/// two statuses is decided by the status manager and by which transition
/// actions have been registered.
///
/// The default value is the empty status, which subsystem lookups return
/// for keys they have never seen. [`Status::unknown`] is the sentinel the
/// coordinator returns when asked about an unregistered actor.
///
/// # Example
/// ```rust
/// use stagehand::util::Status;
///
/// let ready = Status::new("READY");
/// assert_eq!(ready.as_str(), "READY");
/// assert_ne!(ready, Status::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Status(String);

impl Status {
    /// Create a new status tag.
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// Sentinel returned for actors the coordinator has never seen.
    pub fn unknown() -> Self {
        Self::new("UNKNOWN")
    }

    /// Get the status as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Status {
    fn from(status: &str) -> Self {
        Self::new(status)
    }
}

impl From<String> for Status {
    fn from(status: String) -> Self {
        Self::new(status)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests are allowed to use unwrap for simplicity
mod tests {
    use super::*;

    #[test]
    fn test_key_composition() {
        let key = ActorKey::from_parts(&ActorType::new("service"), &ActorId::new("api"));
        assert_eq!(key.as_str(), "service:api");
        assert_eq!(key.to_string(), "service:api");
    }

    #[test]
    fn test_key_equality() {
        let a = ActorKey::from_parts(&ActorType::new("a"), &ActorId::new("1"));
        let b = ActorKey::from_parts(&ActorType::new("a"), &ActorId::new("1"));
        let c = ActorKey::from_parts(&ActorType::new("a"), &ActorId::new("2"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_status_default_is_empty() {
        assert_eq!(Status::default().as_str(), "");
    }

    #[test]
    fn test_status_unknown_sentinel() {
        assert_eq!(Status::unknown().as_str(), "UNKNOWN");
        assert_ne!(Status::unknown(), Status::default());
    }

    #[test]
    fn test_status_from_str() {
        let status: Status = "READY".into();
        assert_eq!(status, Status::new("READY"));
    }

    #[test]
    fn test_serde_round_trip() {
        let key = ActorKey::from_parts(&ActorType::new("service"), &ActorId::new("api"));
        let json = serde_json::to_string(&key).unwrap();
        let back: ActorKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }
}
