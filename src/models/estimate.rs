//! # Estimate of Repair (EOR)
//!
//! The costed list of repair line items for a damaged container, subject to
//! threshold auto-approval or role-gated manual approval.

use crate::state_machine::EstimateStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Container, Survey};

/// One costed repair line item, usually tied back to a surveyed damage item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairItem {
    pub id: Uuid,
    pub damage_item_id: Option<Uuid>,
    pub description: String,
    pub cost: f64,
}

impl RepairItem {
    pub fn new(description: impl Into<String>, cost: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            damage_item_id: None,
            description: description.into(),
            cost,
        }
    }

    pub fn for_damage_item(
        damage_item_id: Uuid,
        description: impl Into<String>,
        cost: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            damage_item_id: Some(damage_item_id),
            description: description.into(),
            cost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateOfRepair {
    pub id: Uuid,
    pub container_id: Option<Uuid>,
    pub container_number: String,
    pub transaction_id: Uuid,
    pub survey_id: Uuid,
    pub status: EstimateStatus,
    /// Liner the estimate is billed to; external approvers must match it
    pub liner: String,
    /// Sum of `repair_items` costs
    pub total_cost: f64,
    /// False when the approval policy auto-approved at creation
    pub need_approval: bool,
    pub auto_approved: bool,
    pub repair_items: Vec<RepairItem>,
    pub created_at: DateTime<Utc>,
    /// Decision time for approved/rejected estimates
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: String,
    /// Deciding actor for approved/rejected estimates
    pub completed_by: Option<String>,
}

impl EstimateOfRepair {
    pub fn new(
        container: &Container,
        survey: &Survey,
        repair_items: Vec<RepairItem>,
        created_by: impl Into<String>,
    ) -> Self {
        let total_cost = repair_items.iter().map(|item| item.cost).sum();
        Self {
            id: Uuid::new_v4(),
            container_id: Some(container.id),
            container_number: container.container_number.clone(),
            transaction_id: survey.transaction_id,
            survey_id: survey.id,
            status: EstimateStatus::Pending,
            liner: container.liner.clone(),
            total_cost,
            need_approval: true,
            auto_approved: false,
            repair_items,
            created_at: Utc::now(),
            completed_at: None,
            created_by: created_by.into(),
            completed_by: None,
        }
    }
}
