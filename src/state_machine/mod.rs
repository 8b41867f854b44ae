//! # State Machine
//!
//! Stage-local status enums with their legal-transition tables, and the
//! creation guards that enforce the workflow ordering between stages.

pub mod guards;
pub mod states;

pub use guards::{creation_guard, CreationGuard, GuardContext};
pub use states::{
    ContainerStatus, EstimateStatus, InspectionStatus, RepairStatus, ShuntingStatus,
    StackingStatus, SurveyStatus, WashingStatus,
};

// Convenience re-export: the inspection outcome travels with the model
pub use crate::models::InspectionResult;
