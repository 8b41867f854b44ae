//! Proptest strategies over the workflow domain: stage jobs in arbitrary
//! (legal-shape) statuses, and whole job sets for resolver and deletion-guard
//! properties.

use depot_core::models::{
    Container, EstimateOfRepair, InitialCondition, PreInspection, RepairItem, RepairOrder,
    ShuntingPriority, ShuntingRequest, StackingRequest, StageJob, Survey, WashingOrder,
    YardLocation,
};
use depot_core::state_machine::{
    EstimateStatus, InspectionResult, InspectionStatus, RepairStatus, ShuntingStatus,
    StackingStatus, SurveyStatus, WashingStatus,
};
use proptest::prelude::*;

fn container() -> Container {
    Container::new("PROP0000001", "MSK", "40HC", None)
}

pub fn survey_status_strategy() -> impl Strategy<Value = SurveyStatus> {
    prop_oneof![
        Just(SurveyStatus::Draft),
        Just(SurveyStatus::InProgress),
        Just(SurveyStatus::Completed),
        Just(SurveyStatus::Released),
    ]
}

pub fn estimate_status_strategy() -> impl Strategy<Value = EstimateStatus> {
    prop_oneof![
        Just(EstimateStatus::Pending),
        Just(EstimateStatus::Sent),
        Just(EstimateStatus::Approved),
        Just(EstimateStatus::AutoApproved),
        Just(EstimateStatus::Rejected),
    ]
}

pub fn shunting_status_strategy() -> impl Strategy<Value = ShuntingStatus> {
    prop_oneof![
        Just(ShuntingStatus::New),
        Just(ShuntingStatus::Dispatched),
        Just(ShuntingStatus::InProgress),
        Just(ShuntingStatus::Completed),
    ]
}

pub fn repair_status_strategy() -> impl Strategy<Value = RepairStatus> {
    prop_oneof![
        Just(RepairStatus::Pending),
        Just(RepairStatus::InProgress),
        Just(RepairStatus::Completed),
    ]
}

pub fn washing_status_strategy() -> impl Strategy<Value = WashingStatus> {
    prop_oneof![
        Just(WashingStatus::PendingApproval),
        Just(WashingStatus::PendingSchedule),
        Just(WashingStatus::Scheduled),
        Just(WashingStatus::InProgress),
        Just(WashingStatus::PendingQc),
        Just(WashingStatus::Rework),
        Just(WashingStatus::Completed),
        Just(WashingStatus::Rejected),
    ]
}

pub fn inspection_state_strategy() -> impl Strategy<Value = (InspectionStatus, InspectionResult)> {
    prop_oneof![
        Just((InspectionStatus::Planned, InspectionResult::Pending)),
        Just((InspectionStatus::InProgress, InspectionResult::Pending)),
        Just((InspectionStatus::PendingRework, InspectionResult::Rework)),
        Just((InspectionStatus::Completed, InspectionResult::Accepted)),
    ]
}

pub fn stacking_status_strategy() -> impl Strategy<Value = StackingStatus> {
    prop_oneof![
        Just(StackingStatus::New),
        Just(StackingStatus::InProgress),
        Just(StackingStatus::Completed),
    ]
}

/// One stage job of any kind, in any reachable status
pub fn stage_job_strategy() -> impl Strategy<Value = StageJob> {
    prop_oneof![
        survey_status_strategy().prop_map(|status| {
            let container = container();
            let mut survey = Survey::new(&container, "surveyor-1");
            survey.status = status;
            if status == SurveyStatus::Completed || status == SurveyStatus::Released {
                survey.initial_condition = Some(InitialCondition::Damaged);
            }
            StageJob::Survey(survey)
        }),
        estimate_status_strategy().prop_map(|status| {
            let container = container();
            let survey = Survey::new(&container, "surveyor-1");
            let mut estimate = EstimateOfRepair::new(
                &container,
                &survey,
                vec![RepairItem::new("patch panel", 75.0)],
                "estimator-1",
            );
            estimate.status = status;
            StageJob::Estimate(estimate)
        }),
        shunting_status_strategy().prop_map(|status| {
            let container = container();
            let mut shunting = ShuntingRequest::new(
                &container,
                uuid::Uuid::new_v4(),
                "R1",
                ShuntingPriority::Normal,
                "planner-1",
            );
            shunting.status = status;
            StageJob::Shunting(shunting)
        }),
        repair_status_strategy().prop_map(|status| {
            let container = container();
            let survey = Survey::new(&container, "surveyor-1");
            let estimate = EstimateOfRepair::new(
                &container,
                &survey,
                vec![RepairItem::new("weld post", 120.0)],
                "estimator-1",
            );
            let mut repair = RepairOrder::new(&container, &estimate, None, "foreman-1");
            repair.status = status;
            StageJob::Repair(repair)
        }),
        washing_status_strategy().prop_map(|status| {
            let container = container();
            let mut washing = WashingOrder::new(
                &container,
                None,
                depot_core::models::CleaningProgram::WaterWash,
                "bay-clerk",
            );
            washing.status = status;
            StageJob::Washing(washing)
        }),
        inspection_state_strategy().prop_map(|(status, result)| {
            let container = container();
            let survey = Survey::new(&container, "surveyor-1");
            let estimate = EstimateOfRepair::new(
                &container,
                &survey,
                vec![RepairItem::new("replace gasket", 40.0)],
                "estimator-1",
            );
            let mut inspection = PreInspection::new(&container, &estimate, "inspector-1");
            inspection.status = status;
            inspection.result = result;
            StageJob::PreInspection(inspection)
        }),
        stacking_status_strategy().prop_map(|status| {
            let container = container();
            let mut stacking = StackingRequest::new(
                &container,
                uuid::Uuid::new_v4(),
                YardLocation {
                    block: "B2".to_string(),
                    row: 4,
                    tier: 1,
                },
                "clerk-1",
            );
            stacking.status = status;
            StageJob::Stacking(stacking)
        }),
    ]
}

/// A whole job set as the resolver and deletion guard see it
pub fn job_set_strategy() -> impl Strategy<Value = Vec<StageJob>> {
    prop::collection::vec(stage_job_strategy(), 0..10)
}
