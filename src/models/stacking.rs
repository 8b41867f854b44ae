//! # Stacking Request
//!
//! Final yard placement and handover (gate pass) of an available container.

use crate::state_machine::StackingStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Container, YardLocation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackingRequest {
    pub id: Uuid,
    pub container_id: Option<Uuid>,
    pub container_number: String,
    pub transaction_id: Uuid,
    pub status: StackingStatus,
    pub target_location: YardLocation,
    /// Issued at completion/handover
    pub gate_pass_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub completed_by: Option<String>,
}

impl StackingRequest {
    pub fn new(
        container: &Container,
        transaction_id: Uuid,
        target_location: YardLocation,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            container_id: Some(container.id),
            container_number: container.container_number.clone(),
            transaction_id,
            status: StackingStatus::default(),
            target_location,
            gate_pass_number: None,
            created_at: Utc::now(),
            completed_at: None,
            created_by: created_by.into(),
            completed_by: None,
        }
    }
}
