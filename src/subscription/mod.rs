//! One-shot observers of completed transitions.

pub mod registry;

pub use registry::{Subscription, SubscriptionRegistry};
