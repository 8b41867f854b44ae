mod common;

use common::strategies::*;
use depot_core::models::{Container, EstimateOfRepair, PreInspection, RepairItem, RepairOrder, StageJob, StageKind, Survey};
use depot_core::orchestration::approval::{ApprovalOutcome, ApprovalPolicy};
use depot_core::orchestration::rework::ReworkController;
use depot_core::orchestration::{deletion_guard, status_resolver};
use depot_core::state_machine::{ContainerStatus, InspectionStatus, RepairStatus, StackingStatus};
use proptest::prelude::*;

proptest! {
    /// Property: the resolver is a pure function of the job set; resolving
    /// twice, or in reverse order, always yields the same status
    #[test]
    fn resolver_is_pure_and_order_independent(jobs in job_set_strategy()) {
        let first = status_resolver::resolve(&jobs);
        let second = status_resolver::resolve(&jobs);
        prop_assert_eq!(first, second);

        let reversed: Vec<StageJob> = jobs.iter().rev().cloned().collect();
        prop_assert_eq!(status_resolver::resolve(&reversed), first);
    }

    /// Property: a completed stacking job always dominates every other rule
    #[test]
    fn completed_stacking_always_releases(mut jobs in job_set_strategy()) {
        let container = Container::new("PROP0000002", "MSK", "40HC", None);
        let mut stacking = depot_core::models::StackingRequest::new(
            &container,
            uuid::Uuid::new_v4(),
            depot_core::models::YardLocation { block: "A1".to_string(), row: 1, tier: 1 },
            "clerk-1",
        );
        stacking.status = StackingStatus::Completed;
        jobs.push(StageJob::Stacking(stacking));

        prop_assert_eq!(status_resolver::resolve(&jobs), ContainerStatus::Available);
    }

    /// Property: a job is deletable exactly when no job of a later stage
    /// exists in the set
    #[test]
    fn deletion_guard_allows_only_the_maximal_stage(jobs in job_set_strategy()) {
        let max_precedence = jobs
            .iter()
            .map(|job| job.kind().precedence())
            .max()
            .unwrap_or(0);

        for job in &jobs {
            let deletable = deletion_guard::check_deletable(job, &jobs).is_ok();
            prop_assert_eq!(deletable, job.kind().precedence() == max_precedence);
        }
    }

    /// Property: the blocking stage reported is always strictly later than
    /// the stage being deleted
    #[test]
    fn blocking_stage_is_always_downstream(jobs in job_set_strategy()) {
        for job in &jobs {
            if let Err(depot_core::DepotError::BlockedByDownstreamJob { stage, blocking }) =
                deletion_guard::check_deletable(job, &jobs)
            {
                prop_assert!(blocking.precedence() > stage.precedence());
                prop_assert_eq!(stage, job.kind());
            }
        }
    }

    /// Property: auto-approval is exactly the inclusive threshold comparison
    #[test]
    fn auto_approval_matches_threshold(
        cost in 0.0f64..10_000.0,
        threshold in 0.0f64..10_000.0,
    ) {
        let policy = ApprovalPolicy::new(threshold);
        let expected = if cost <= threshold {
            ApprovalOutcome::AutoApproved
        } else {
            ApprovalOutcome::RequiresApproval
        };
        prop_assert_eq!(policy.decide(cost), expected);
    }

    /// Property: rework counters move by exactly one per failed cycle, on the
    /// container, the inspection and the repair order alike
    #[test]
    fn rework_counters_are_monotonic(cycles in 1usize..8) {
        let mut container = Container::new("PROP0000003", "MSK", "40HC", None);
        let survey = Survey::new(&container, "surveyor-1");
        let estimate = EstimateOfRepair::new(
            &container,
            &survey,
            vec![RepairItem::new("patch roof", 90.0)],
            "estimator-1",
        );
        let mut repair = RepairOrder::new(&container, &estimate, None, "foreman-1");
        let mut inspection = PreInspection::new(&container, &estimate, "inspector-1");

        for cycle in 1..=cycles {
            repair.status = RepairStatus::Completed;
            inspection.status = InspectionStatus::InProgress;
            ReworkController::inspection_failed(&mut container, &mut inspection, &mut repair);

            prop_assert_eq!(container.rework_count as usize, cycle);
            prop_assert_eq!(inspection.rework_count as usize, cycle);
            prop_assert_eq!(repair.rework_count as usize, cycle);
            prop_assert_eq!(repair.status, RepairStatus::InProgress);
        }
    }

    /// Property: resolving a job set never yields the gate-in-only
    /// PENDING_WASH status
    #[test]
    fn resolver_never_yields_pending_wash(jobs in job_set_strategy()) {
        prop_assert_ne!(status_resolver::resolve(&jobs), ContainerStatus::PendingWash);
    }
}

#[test]
fn empty_job_set_resolves_to_stacking() {
    assert_eq!(status_resolver::resolve(&[]), ContainerStatus::Stacking);
}

#[test]
fn stage_precedence_covers_all_kinds_once() {
    let mut seen: Vec<u8> = StageKind::all().iter().map(|k| k.precedence()).collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7]);
}
