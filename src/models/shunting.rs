//! # Shunting Request
//!
//! Internal relocation of a container from its stack position to a repair bay.

use crate::state_machine::ShuntingStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Container, YardLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShuntingPriority {
    Low,
    Normal,
    High,
}

impl Default for ShuntingPriority {
    fn default() -> Self {
        Self::Normal
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuntingRequest {
    pub id: Uuid,
    pub container_id: Option<Uuid>,
    pub container_number: String,
    pub transaction_id: Uuid,
    pub status: ShuntingStatus,
    /// Slot the container is picked up from; defaults to its yard location
    pub from_location: Option<YardLocation>,
    /// Destination repair block
    pub to_block: String,
    pub assigned_driver: Option<String>,
    pub priority: ShuntingPriority,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub completed_by: Option<String>,
}

impl ShuntingRequest {
    pub fn new(
        container: &Container,
        transaction_id: Uuid,
        to_block: impl Into<String>,
        priority: ShuntingPriority,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            container_id: Some(container.id),
            container_number: container.container_number.clone(),
            transaction_id,
            status: ShuntingStatus::default(),
            from_location: container.yard_location.clone(),
            to_block: to_block.into(),
            assigned_driver: None,
            priority,
            created_at: Utc::now(),
            completed_at: None,
            created_by: created_by.into(),
            completed_by: None,
        }
    }
}
