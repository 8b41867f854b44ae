//! # Repair Order
//!
//! Physical repair work derived from an approved estimate. A failed
//! post-repair inspection reopens this record in place rather than creating a
//! new one.

use crate::state_machine::RepairStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Container, EstimateOfRepair};

/// One unit of repair work, derived from an estimate line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: Uuid,
    pub repair_item_id: Option<Uuid>,
    pub description: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairOrder {
    pub id: Uuid,
    pub container_id: Option<Uuid>,
    pub container_number: String,
    pub transaction_id: Uuid,
    pub status: RepairStatus,
    pub eor_id: Uuid,
    pub assigned_team: Option<String>,
    pub work_items: Vec<WorkItem>,
    /// Set when a failed inspection reopened this order
    pub rework_required: bool,
    /// Synced to the container's counter on each rework cycle; only increases
    pub rework_count: u32,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub completed_by: Option<String>,
}

impl RepairOrder {
    pub fn new(
        container: &Container,
        estimate: &EstimateOfRepair,
        assigned_team: Option<String>,
        created_by: impl Into<String>,
    ) -> Self {
        let work_items = estimate
            .repair_items
            .iter()
            .map(|item| WorkItem {
                id: Uuid::new_v4(),
                repair_item_id: Some(item.id),
                description: item.description.clone(),
                completed: false,
            })
            .collect();
        Self {
            id: Uuid::new_v4(),
            container_id: Some(container.id),
            container_number: container.container_number.clone(),
            transaction_id: estimate.transaction_id,
            status: RepairStatus::default(),
            eor_id: estimate.id,
            assigned_team,
            work_items,
            rework_required: false,
            rework_count: 0,
            created_at: Utc::now(),
            completed_at: None,
            created_by: created_by.into(),
            completed_by: None,
        }
    }
}
