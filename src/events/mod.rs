//! # Event System
//!
//! Lifecycle event publication for hosts that want to observe workflow
//! transitions. Event names live in [`crate::constants::events`].

pub mod publisher;

pub use publisher::{EventPublisher, WorkflowEvent};
