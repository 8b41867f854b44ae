//! # Washing Order
//!
//! Optional cleaning stage. QC failure reopens the same order for another
//! attempt; QC pass completes it and issues a cleanliness certificate.

use crate::state_machine::WashingStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Container;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CleaningProgram {
    Sweep,
    WaterWash,
    ChemicalWash,
    SteamClean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WashingOrder {
    pub id: Uuid,
    pub container_id: Option<Uuid>,
    pub container_number: String,
    /// Rooted at the originating survey when one exists; wash-only flows root
    /// their own transaction
    pub transaction_id: Uuid,
    pub status: WashingStatus,
    pub cleaning_program: CleaningProgram,
    pub assigned_bay: Option<String>,
    /// Failed QC cycles on this order; only increases
    pub rework_count: u32,
    /// Issued exactly once, on QC pass
    pub certificate_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub completed_by: Option<String>,
}

impl WashingOrder {
    /// Create a washing order. With no originating survey on file
    /// (`transaction_id: None`) the order roots its own transaction.
    pub fn new(
        container: &Container,
        transaction_id: Option<Uuid>,
        cleaning_program: CleaningProgram,
        created_by: impl Into<String>,
    ) -> Self {
        let id = Uuid::new_v4();
        let transaction_id = transaction_id.unwrap_or(id);
        Self {
            id,
            container_id: Some(container.id),
            container_number: container.container_number.clone(),
            transaction_id,
            status: WashingStatus::default(),
            cleaning_program,
            assigned_bay: None,
            rework_count: 0,
            certificate_number: None,
            created_at: Utc::now(),
            completed_at: None,
            created_by: created_by.into(),
            completed_by: None,
        }
    }
}
