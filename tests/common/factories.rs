//! Test factories: an engine wired to the in-memory store and helpers that
//! drive a container to a given point in the workflow.

use depot_core::config::DepotConfig;
use depot_core::models::{
    Container, EstimateOfRepair, InitialCondition, PreInspection, RepairItem, RepairOrder,
    ShuntingPriority, ShuntingRequest, Survey,
};
use depot_core::orchestration::{Actor, AllowAll, ApprovalAction, WorkflowEngine};
use depot_core::storage::InMemoryRecordStore;
use std::sync::Arc;

pub fn engine() -> WorkflowEngine {
    engine_with_threshold(DepotConfig::default().auto_approval_threshold)
}

pub fn engine_with_threshold(auto_approval_threshold: f64) -> WorkflowEngine {
    let config = DepotConfig {
        auto_approval_threshold,
        ..DepotConfig::default()
    };
    WorkflowEngine::new(
        Arc::new(InMemoryRecordStore::new()),
        Arc::new(AllowAll),
        config,
    )
}

pub async fn registered_container(engine: &WorkflowEngine, number: &str) -> Container {
    engine
        .register_container(number, "MSK", "40HC", None, false)
        .await
        .expect("container registration")
}

/// Survey completed with a DAMAGED verdict and two damage items
pub async fn damaged_survey(engine: &WorkflowEngine, container: &Container) -> Survey {
    use depot_core::models::DamageItem;

    let survey = engine
        .create_survey(container.id, "surveyor-1")
        .await
        .expect("survey creation");
    engine
        .complete_survey(
            survey.id,
            InitialCondition::Damaged,
            vec![
                DamageItem::new("CORNER_POST", "DT"),
                DamageItem::new("DOOR_PANEL", "BR"),
            ],
            "surveyor-1",
        )
        .await
        .expect("survey completion")
}

/// Estimate over the given items; decided manually when the threshold
/// requires it
pub async fn approved_estimate(
    engine: &WorkflowEngine,
    container: &Container,
    items: Vec<RepairItem>,
) -> EstimateOfRepair {
    let estimate = engine
        .create_estimate(container.id, items, "estimator-1")
        .await
        .expect("estimate creation");
    if !estimate.status.is_approved() {
        return engine
            .decide_estimate(estimate.id, ApprovalAction::Approve, &Actor::internal("manager-1"))
            .await
            .expect("estimate approval");
    }
    estimate
}

pub async fn completed_shunting(
    engine: &WorkflowEngine,
    container: &Container,
) -> ShuntingRequest {
    let shunting = engine
        .create_shunting(container.id, "R1", ShuntingPriority::Normal, "planner-1")
        .await
        .expect("shunting creation");
    engine
        .dispatch_shunting(shunting.id, "driver-7", "planner-1")
        .await
        .expect("shunting dispatch");
    engine
        .start_shunting(shunting.id, "driver-7")
        .await
        .expect("shunting start");
    engine
        .complete_shunting(shunting.id, "driver-7")
        .await
        .expect("shunting completion")
}

pub async fn completed_repair(engine: &WorkflowEngine, container: &Container) -> RepairOrder {
    let repair = engine
        .create_repair_order(container.id, Some("team-a".to_string()), "foreman-1")
        .await
        .expect("repair creation");
    engine
        .start_repair(repair.id, "foreman-1")
        .await
        .expect("repair start");
    engine
        .complete_repair(repair.id, "foreman-1")
        .await
        .expect("repair completion")
}

/// Drive a fresh container through survey, estimate, shunting and repair,
/// leaving it ready for pre-inspection
pub async fn repaired_container(
    engine: &WorkflowEngine,
    number: &str,
    items: Vec<RepairItem>,
) -> (Container, EstimateOfRepair, RepairOrder) {
    let container = registered_container(engine, number).await;
    damaged_survey(engine, &container).await;
    let estimate = approved_estimate(engine, &container, items).await;
    completed_shunting(engine, &container).await;
    let repair = completed_repair(engine, &container).await;
    (container, estimate, repair)
}

/// Accept the in-progress inspection by passing every damage item
pub async fn accept_inspection(
    engine: &WorkflowEngine,
    inspection: &PreInspection,
) -> PreInspection {
    use depot_core::models::ItemVerdict;

    let verdicts: Vec<ItemVerdict> = inspection
        .damage_item_results
        .iter()
        .map(|item| ItemVerdict {
            item_id: item.item_id,
            passed: true,
        })
        .collect();
    engine
        .complete_pre_inspection(inspection.id, &verdicts, Vec::new(), Vec::new(), "inspector-1")
        .await
        .expect("inspection acceptance")
}
