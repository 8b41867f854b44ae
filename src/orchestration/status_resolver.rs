//! # Status Resolver
//!
//! Pure projection of a container's stage-job set onto its single overall
//! status. Evaluated in fixed reverse-precedence order (highest stage first),
//! returning on first match; an empty job set resolves to the default
//! STACKING status. The resolver is the only writer of `Container::status`
//! in the engine, which makes the container status a deterministic function
//! of existing job records rather than independently mutable state.

use crate::models::{InspectionResult, StageJob};
use crate::state_machine::{ContainerStatus, StackingStatus};

/// Derive the container status from its current job set.
///
/// Pure and idempotent: the same job set always yields the same status, on
/// creation, completion, and deletion alike.
pub fn resolve(jobs: &[StageJob]) -> ContainerStatus {
    // 1. A completed stacking job releases the container.
    if jobs
        .iter()
        .filter_map(StageJob::as_stacking)
        .any(|s| s.status == StackingStatus::Completed)
    {
        return ContainerStatus::Available;
    }

    // 2. Any other stacking job: verified and queued for placement.
    if jobs.iter().any(|j| j.as_stacking().is_some()) {
        return ContainerStatus::Completed;
    }

    // 3. An accepted inspection: repair verified.
    if jobs
        .iter()
        .filter_map(StageJob::as_pre_inspection)
        .any(|i| i.result == InspectionResult::Accepted)
    {
        return ContainerStatus::Completed;
    }

    // 4. Any inspection (pending or in rework) keeps the container in repair.
    if jobs.iter().any(|j| j.as_pre_inspection().is_some()) {
        return ContainerStatus::Repair;
    }

    // 5. Any repair order.
    if jobs.iter().any(|j| j.as_repair().is_some()) {
        return ContainerStatus::Repair;
    }

    // 6. A completed shunting job: positioned and awaiting repair.
    if jobs
        .iter()
        .filter_map(StageJob::as_shunting)
        .any(|s| s.status.is_terminal())
    {
        return ContainerStatus::AwaitingRepair;
    }

    // 7. An approved/auto-approved estimate opens the repair pipeline.
    if jobs
        .iter()
        .filter_map(StageJob::as_estimate)
        .any(|e| e.status.is_approved())
    {
        return ContainerStatus::AwaitingRepair;
    }

    // 8. Any estimate.
    if jobs.iter().any(|j| j.as_estimate().is_some()) {
        return ContainerStatus::Damaged;
    }

    // 9. Any survey.
    if jobs.iter().any(|j| j.as_survey().is_some()) {
        return ContainerStatus::Damaged;
    }

    // 10. No jobs at all.
    ContainerStatus::Stacking
}
