//! # Stage Creation Guards
//!
//! The stage precondition table: one guard per stage kind, consulted before
//! any stage-job write. Guards see the container, its full job set, and the
//! engine configuration; they return `PreconditionNotMet` when the required
//! predecessor is missing and `DuplicateActiveJob` when the one-active-job
//! rule would be violated.

use crate::config::DepotConfig;
use crate::error::{DepotError, Result};
use crate::models::{Container, StageJob, StageKind};
use crate::state_machine::InspectionResult;

/// Everything a creation guard may consult
pub struct GuardContext<'a> {
    pub container: &'a Container,
    pub jobs: &'a [StageJob],
    pub config: &'a DepotConfig,
}

/// Trait for stage creation guards
pub trait CreationGuard {
    /// Check whether the stage job may be created
    fn check(&self, ctx: &GuardContext<'_>) -> Result<()>;

    /// Get a description of this guard for logging
    fn description(&self) -> &'static str;
}

/// Look up the creation guard for a stage kind
pub fn creation_guard(kind: StageKind) -> Box<dyn CreationGuard> {
    match kind {
        StageKind::Survey => Box::new(SurveyCreationGuard),
        StageKind::Estimate => Box::new(EstimateCreationGuard),
        StageKind::Shunting => Box::new(ShuntingCreationGuard),
        StageKind::Repair => Box::new(RepairCreationGuard),
        StageKind::Washing => Box::new(WashingCreationGuard),
        StageKind::PreInspection => Box::new(PreInspectionCreationGuard),
        StageKind::Stacking => Box::new(StackingCreationGuard),
    }
}

fn duplicate_active(ctx: &GuardContext<'_>, kind: StageKind) -> Result<()> {
    if ctx
        .jobs
        .iter()
        .any(|job| job.kind() == kind && job.is_active())
    {
        return Err(DepotError::DuplicateActiveJob {
            stage: kind,
            container_number: ctx.container.container_number.clone(),
        });
    }
    Ok(())
}

fn has_approved_estimate(ctx: &GuardContext<'_>) -> bool {
    ctx.jobs
        .iter()
        .filter_map(StageJob::as_estimate)
        .any(|estimate| estimate.status.is_approved())
}

/// Surveys have no predecessor; only the one-active-job rule applies
pub struct SurveyCreationGuard;

impl CreationGuard for SurveyCreationGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        duplicate_active(ctx, StageKind::Survey)
    }

    fn description(&self) -> &'static str {
        "No active survey may exist"
    }
}

/// An estimate requires a completed survey with a DAMAGED verdict
pub struct EstimateCreationGuard;

impl CreationGuard for EstimateCreationGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        use crate::models::InitialCondition;

        let qualifying = ctx.jobs.iter().filter_map(StageJob::as_survey).any(|s| {
            s.status.is_settled() && s.initial_condition == Some(InitialCondition::Damaged)
        });
        if !qualifying {
            return Err(DepotError::PreconditionNotMet {
                stage: StageKind::Estimate,
                missing: "completed survey with DAMAGED condition".to_string(),
            });
        }
        duplicate_active(ctx, StageKind::Estimate)
    }

    fn description(&self) -> &'static str {
        "A completed DAMAGED survey must exist and no non-terminal estimate may exist"
    }
}

/// Shunting requires an approved (or auto-approved) estimate
pub struct ShuntingCreationGuard;

impl CreationGuard for ShuntingCreationGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        if !has_approved_estimate(ctx) {
            return Err(DepotError::PreconditionNotMet {
                stage: StageKind::Shunting,
                missing: "approved or auto-approved estimate".to_string(),
            });
        }
        duplicate_active(ctx, StageKind::Shunting)
    }

    fn description(&self) -> &'static str {
        "An approved estimate must exist"
    }
}

/// A repair order requires a shunting job (any status) and an approved
/// estimate
pub struct RepairCreationGuard;

impl CreationGuard for RepairCreationGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        let has_shunting = ctx
            .jobs
            .iter()
            .any(|job| job.kind() == StageKind::Shunting);
        if !has_shunting {
            return Err(DepotError::PreconditionNotMet {
                stage: StageKind::Repair,
                missing: "shunting job".to_string(),
            });
        }
        if !has_approved_estimate(ctx) {
            return Err(DepotError::PreconditionNotMet {
                stage: StageKind::Repair,
                missing: "approved or auto-approved estimate".to_string(),
            });
        }
        duplicate_active(ctx, StageKind::Repair)
    }

    fn description(&self) -> &'static str {
        "A shunting job and an approved estimate must exist"
    }
}

/// Washing requires the container to be in a configured eligible status
pub struct WashingCreationGuard;

impl CreationGuard for WashingCreationGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        if !ctx.config.is_washing_eligible(ctx.container.status) {
            return Err(DepotError::PreconditionNotMet {
                stage: StageKind::Washing,
                missing: format!(
                    "container status {} is not washing-eligible",
                    ctx.container.status
                ),
            });
        }
        duplicate_active(ctx, StageKind::Washing)
    }

    fn description(&self) -> &'static str {
        "Container must be in a washing-eligible status and no active washing may exist"
    }
}

/// Pre-inspection requires the repair to be finished. A `PENDING_REWORK`
/// inspection does not block: the engine reopens it instead of creating a
/// second row.
pub struct PreInspectionCreationGuard;

impl CreationGuard for PreInspectionCreationGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        use crate::state_machine::RepairStatus;

        let repair_finished = ctx
            .jobs
            .iter()
            .filter_map(StageJob::as_repair)
            .any(|repair| repair.status == RepairStatus::Completed);
        if !repair_finished {
            return Err(DepotError::PreconditionNotMet {
                stage: StageKind::PreInspection,
                missing: "completed repair order".to_string(),
            });
        }
        if ctx
            .jobs
            .iter()
            .filter_map(StageJob::as_pre_inspection)
            .any(|inspection| inspection.status.blocks_new_inspection())
        {
            return Err(DepotError::DuplicateActiveJob {
                stage: StageKind::PreInspection,
                container_number: ctx.container.container_number.clone(),
            });
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Repair must be finished and no in-flight inspection may exist"
    }
}

/// Stacking requires an accepted pre-inspection
pub struct StackingCreationGuard;

impl CreationGuard for StackingCreationGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> Result<()> {
        let accepted = ctx
            .jobs
            .iter()
            .filter_map(StageJob::as_pre_inspection)
            .any(|inspection| inspection.result == InspectionResult::Accepted);
        if !accepted {
            return Err(DepotError::PreconditionNotMet {
                stage: StageKind::Stacking,
                missing: "pre-inspection with ACCEPTED result".to_string(),
            });
        }
        duplicate_active(ctx, StageKind::Stacking)
    }

    fn description(&self) -> &'static str {
        "An accepted pre-inspection must exist"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Container, EstimateOfRepair, InitialCondition, RepairItem, RepairOrder, ShuntingPriority,
        ShuntingRequest, Survey,
    };
    use crate::state_machine::{EstimateStatus, SurveyStatus};

    fn container() -> Container {
        Container::new("MSKU7770001", "MSK", "40HC", None)
    }

    fn damaged_survey(container: &Container) -> Survey {
        let mut survey = Survey::new(container, "surveyor-1");
        survey.status = SurveyStatus::Completed;
        survey.initial_condition = Some(InitialCondition::Damaged);
        survey
    }

    fn approved_estimate(container: &Container, survey: &Survey) -> EstimateOfRepair {
        let mut estimate = EstimateOfRepair::new(
            container,
            survey,
            vec![RepairItem::new("weld post", 80.0)],
            "estimator-1",
        );
        estimate.status = EstimateStatus::Approved;
        estimate
    }

    #[test]
    fn estimate_requires_damaged_survey() {
        let container = container();
        let config = DepotConfig::default();

        // No survey at all
        let err = EstimateCreationGuard
            .check(&GuardContext {
                container: &container,
                jobs: &[],
                config: &config,
            })
            .unwrap_err();
        assert!(matches!(err, DepotError::PreconditionNotMet { .. }));

        // Completed but undamaged
        let mut clean = damaged_survey(&container);
        clean.initial_condition = Some(InitialCondition::NoDamage);
        let jobs = vec![StageJob::Survey(clean)];
        let err = EstimateCreationGuard
            .check(&GuardContext {
                container: &container,
                jobs: &jobs,
                config: &config,
            })
            .unwrap_err();
        assert!(matches!(err, DepotError::PreconditionNotMet { .. }));

        // Damaged and completed
        let jobs = vec![StageJob::Survey(damaged_survey(&container))];
        assert!(EstimateCreationGuard
            .check(&GuardContext {
                container: &container,
                jobs: &jobs,
                config: &config,
            })
            .is_ok());
    }

    #[test]
    fn estimate_rejects_second_active_estimate() {
        let container = container();
        let config = DepotConfig::default();
        let survey = damaged_survey(&container);
        let mut pending = approved_estimate(&container, &survey);
        pending.status = EstimateStatus::Pending;
        let jobs = vec![
            StageJob::Survey(survey),
            StageJob::Estimate(pending),
        ];
        let err = EstimateCreationGuard
            .check(&GuardContext {
                container: &container,
                jobs: &jobs,
                config: &config,
            })
            .unwrap_err();
        assert!(matches!(err, DepotError::DuplicateActiveJob { .. }));
    }

    #[test]
    fn shunting_requires_approved_estimate() {
        let container = container();
        let config = DepotConfig::default();
        let survey = damaged_survey(&container);

        let mut pending = approved_estimate(&container, &survey);
        pending.status = EstimateStatus::Pending;
        let jobs = vec![StageJob::Estimate(pending)];
        let err = ShuntingCreationGuard
            .check(&GuardContext {
                container: &container,
                jobs: &jobs,
                config: &config,
            })
            .unwrap_err();
        assert!(matches!(err, DepotError::PreconditionNotMet { .. }));

        let jobs = vec![StageJob::Estimate(approved_estimate(&container, &survey))];
        assert!(ShuntingCreationGuard
            .check(&GuardContext {
                container: &container,
                jobs: &jobs,
                config: &config,
            })
            .is_ok());
    }

    #[test]
    fn repair_requires_shunting_and_approval() {
        let container = container();
        let config = DepotConfig::default();
        let survey = damaged_survey(&container);
        let estimate = approved_estimate(&container, &survey);
        let shunting = ShuntingRequest::new(
            &container,
            survey.transaction_id,
            "R1",
            ShuntingPriority::Normal,
            "planner-1",
        );

        let jobs = vec![StageJob::Estimate(estimate.clone())];
        let err = RepairCreationGuard
            .check(&GuardContext {
                container: &container,
                jobs: &jobs,
                config: &config,
            })
            .unwrap_err();
        assert!(matches!(err, DepotError::PreconditionNotMet { .. }));

        let jobs = vec![
            StageJob::Estimate(estimate.clone()),
            StageJob::Shunting(shunting),
        ];
        assert!(RepairCreationGuard
            .check(&GuardContext {
                container: &container,
                jobs: &jobs,
                config: &config,
            })
            .is_ok());

        // A repair order already in flight blocks a second one
        let repair = RepairOrder::new(&container, &estimate, None, "foreman-1");
        let mut jobs = jobs;
        jobs.push(StageJob::Repair(repair));
        let err = RepairCreationGuard
            .check(&GuardContext {
                container: &container,
                jobs: &jobs,
                config: &config,
            })
            .unwrap_err();
        assert!(matches!(err, DepotError::DuplicateActiveJob { .. }));
    }

    #[test]
    fn washing_follows_configured_eligibility() {
        use crate::state_machine::ContainerStatus;

        let mut container = container();
        let config = DepotConfig::default();

        container.status = ContainerStatus::Repair;
        let err = WashingCreationGuard
            .check(&GuardContext {
                container: &container,
                jobs: &[],
                config: &config,
            })
            .unwrap_err();
        assert!(matches!(err, DepotError::PreconditionNotMet { .. }));

        container.status = ContainerStatus::PendingWash;
        assert!(WashingCreationGuard
            .check(&GuardContext {
                container: &container,
                jobs: &[],
                config: &config,
            })
            .is_ok());
    }
}
