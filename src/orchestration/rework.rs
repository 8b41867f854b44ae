//! # Rework Controller
//!
//! Sends a container backward to the repair stage when a post-repair
//! inspection fails, reusing the existing records instead of creating new
//! ones, and handles the analogous washing QC loop. Counters only increase
//! and move by exactly one per failed cycle.

use crate::models::{Container, PreInspection, RepairOrder, WashingOrder};
use crate::state_machine::{InspectionResult, InspectionStatus, RepairStatus, WashingStatus};
use uuid::Uuid;

/// Outcome of a washing QC decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QcOutcome {
    /// QC passed; the order is completed and carries this certificate number
    Passed { certificate_number: String },
    /// QC failed; the order was reopened for another attempt
    ReworkRequested,
}

pub struct ReworkController;

impl ReworkController {
    /// Apply a failed inspection as one atomic transition: the inspection
    /// goes to PENDING_REWORK, the container back to repair, and the existing
    /// repair order is reopened in place. No new jobs are created.
    pub fn inspection_failed(
        container: &mut Container,
        inspection: &mut PreInspection,
        repair: &mut RepairOrder,
    ) {
        inspection.status = InspectionStatus::PendingRework;
        inspection.result = InspectionResult::Rework;
        inspection.rework_count += 1;
        inspection.completed_at = None;
        inspection.completed_by = None;

        container.rework_count += 1;

        repair.status = RepairStatus::InProgress;
        repair.rework_required = true;
        repair.rework_count = container.rework_count;
        repair.completed_at = None;
        repair.completed_by = None;
    }

    /// Apply a washing QC decision. A failure reopens the same order; a pass
    /// completes it and issues a certificate number exactly once.
    pub fn washing_qc(washing: &mut WashingOrder, passed: bool) -> QcOutcome {
        if passed {
            let certificate_number = Self::certificate_number();
            washing.status = WashingStatus::Completed;
            washing.certificate_number = Some(certificate_number.clone());
            QcOutcome::Passed { certificate_number }
        } else {
            washing.status = WashingStatus::Rework;
            washing.rework_count += 1;
            QcOutcome::ReworkRequested
        }
    }

    fn certificate_number() -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("WC-{}", suffix[..8].to_uppercase())
    }
}
