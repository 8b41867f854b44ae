//! # System Constants
//!
//! Event names, permission screens/actions, and operational defaults for the
//! depot workflow engine.

/// Lifecycle events published on the engine's broadcast channel
pub mod events {
    // Container lifecycle
    pub const CONTAINER_REGISTERED: &str = "container.registered";
    pub const CONTAINER_STATUS_CHANGED: &str = "container.status_changed";

    // Survey lifecycle
    pub const SURVEY_CREATED: &str = "survey.created";
    pub const SURVEY_COMPLETED: &str = "survey.completed";

    // Estimate lifecycle
    pub const ESTIMATE_CREATED: &str = "estimate.created";
    pub const ESTIMATE_AUTO_APPROVED: &str = "estimate.auto_approved";
    pub const ESTIMATE_SENT: &str = "estimate.sent";
    pub const ESTIMATE_APPROVED: &str = "estimate.approved";
    pub const ESTIMATE_REJECTED: &str = "estimate.rejected";

    // Shunting lifecycle
    pub const SHUNTING_CREATED: &str = "shunting.created";
    pub const SHUNTING_COMPLETED: &str = "shunting.completed";

    // Repair lifecycle
    pub const REPAIR_CREATED: &str = "repair.created";
    pub const REPAIR_COMPLETED: &str = "repair.completed";
    pub const REPAIR_REOPENED: &str = "repair.reopened";

    // Washing lifecycle
    pub const WASHING_CREATED: &str = "washing.created";
    pub const WASHING_QC_PASSED: &str = "washing.qc_passed";
    pub const WASHING_REWORK_REQUESTED: &str = "washing.rework_requested";

    // Pre-inspection lifecycle
    pub const INSPECTION_CREATED: &str = "inspection.created";
    pub const INSPECTION_ACCEPTED: &str = "inspection.accepted";
    pub const INSPECTION_REWORK_REQUESTED: &str = "inspection.rework_requested";

    // Stacking lifecycle
    pub const STACKING_CREATED: &str = "stacking.created";
    pub const STACKING_COMPLETED: &str = "stacking.completed";

    // Reverse deletion
    pub const JOB_DELETED: &str = "job.deleted";
}

/// Permission screens consumed through the `PermissionCheck` predicate
pub mod screens {
    pub const ESTIMATE_OF_REPAIR: &str = "estimate_of_repair";
}

/// Permission actions consumed through the `PermissionCheck` predicate
pub mod actions {
    /// Covers both approve and reject decisions on an estimate
    pub const APPROVE: &str = "approve";
}

/// Auto-approval cost threshold applied when no configuration is supplied
pub const DEFAULT_AUTO_APPROVAL_THRESHOLD: f64 = 250.0;

/// Broadcast channel capacity for the event publisher
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;
