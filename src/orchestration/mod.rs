//! # Orchestration
//!
//! The workflow engine and the pure policies it coordinates: creation-time
//! approval, the container status resolver, the rework loops, the
//! reverse-deletion guard, and cross-stage job lookup.

pub mod approval;
pub mod deletion_guard;
pub mod engine;
pub mod registry;
pub mod rework;
pub mod status_resolver;

pub use approval::{
    Actor, ActorKind, AllowAll, ApprovalAction, ApprovalOutcome, ApprovalPolicy, PermissionCheck,
};
pub use engine::WorkflowEngine;
pub use registry::JobRegistry;
pub use rework::{QcOutcome, ReworkController};
