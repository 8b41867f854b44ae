//! # Damage Survey
//!
//! The originating stage of every repair workflow instance. A survey's own id
//! becomes the `transaction_id` shared by all descendant stage jobs.

use crate::state_machine::SurveyStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Container;

/// Condition recorded by the surveyor at completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InitialCondition {
    Damaged,
    NoDamage,
}

/// One damaged component found during the survey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageItem {
    pub id: Uuid,
    /// Component code, e.g. `DOOR_PANEL`, `CORNER_POST`
    pub component: String,
    pub damage_code: String,
    pub remarks: Option<String>,
}

impl DamageItem {
    pub fn new(component: impl Into<String>, damage_code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            component: component.into(),
            damage_code: damage_code.into(),
            remarks: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: Uuid,
    pub container_id: Option<Uuid>,
    pub container_number: String,
    /// Equal to `id`: the survey roots the workflow transaction
    pub transaction_id: Uuid,
    pub status: SurveyStatus,
    pub initial_condition: Option<InitialCondition>,
    pub damage_items: Vec<DamageItem>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub completed_by: Option<String>,
}

impl Survey {
    pub fn new(container: &Container, created_by: impl Into<String>) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            container_id: Some(container.id),
            container_number: container.container_number.clone(),
            transaction_id: id,
            status: SurveyStatus::default(),
            initial_condition: None,
            damage_items: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
            created_by: created_by.into(),
            completed_by: None,
        }
    }
}
