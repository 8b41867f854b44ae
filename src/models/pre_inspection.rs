//! # Post-Repair Pre-Inspection
//!
//! Quality re-inspection performed after repair completion. Acceptance
//! requires every damage-verification item to pass; the general and cleaning
//! checklists are advisory and never block acceptance. A failed inspection is
//! reused for the next attempt rather than replaced.

use crate::state_machine::InspectionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Container, EstimateOfRepair};

/// Inspection outcome for the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionResult {
    Pending,
    Accepted,
    Rework,
}

impl Default for InspectionResult {
    fn default() -> Self {
        Self::Pending
    }
}

/// Mandatory verification line, one per repair line item of the originating
/// survey. `passed` is `None` until the inspector records a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageItemResult {
    /// Id of the estimate repair line item being verified
    pub item_id: Uuid,
    pub description: String,
    pub passed: Option<bool>,
}

/// Advisory checklist line (general or cleaning); never blocks acceptance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub name: String,
    pub passed: Option<bool>,
}

/// Inspector verdict handed to `complete_pre_inspection`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemVerdict {
    pub item_id: Uuid,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreInspection {
    pub id: Uuid,
    pub container_id: Option<Uuid>,
    pub container_number: String,
    /// The originating survey's transaction id
    pub transaction_id: Uuid,
    pub status: InspectionStatus,
    pub result: InspectionResult,
    pub damage_item_results: Vec<DamageItemResult>,
    pub general_checklist: Vec<ChecklistItem>,
    pub cleaning_checklist: Vec<ChecklistItem>,
    /// Names of the damage-verification items that failed the last attempt
    pub failed_checks: Vec<String>,
    /// Failed attempts on this inspection; only increases
    pub rework_count: u32,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub completed_by: Option<String>,
}

impl PreInspection {
    /// Seed an inspection from the approved estimate: one mandatory
    /// verification line per repair line item. A zero-item estimate yields an
    /// empty gate, which auto-passes.
    pub fn new(
        container: &Container,
        estimate: &EstimateOfRepair,
        created_by: impl Into<String>,
    ) -> Self {
        let damage_item_results = estimate
            .repair_items
            .iter()
            .map(|item| DamageItemResult {
                item_id: item.id,
                description: item.description.clone(),
                passed: None,
            })
            .collect();
        Self {
            id: Uuid::new_v4(),
            container_id: Some(container.id),
            container_number: container.container_number.clone(),
            transaction_id: estimate.transaction_id,
            status: InspectionStatus::default(),
            result: InspectionResult::default(),
            damage_item_results,
            general_checklist: Vec::new(),
            cleaning_checklist: Vec::new(),
            failed_checks: Vec::new(),
            rework_count: 0,
            created_at: Utc::now(),
            completed_at: None,
            created_by: created_by.into(),
            completed_by: None,
        }
    }

    /// The mandatory acceptance gate: every damage-verification item passed.
    /// An empty gate (no damage items) passes by definition. Checklists are
    /// not consulted.
    pub fn damage_gate_passes(&self) -> bool {
        self.damage_item_results
            .iter()
            .all(|item| item.passed == Some(true))
    }
}
