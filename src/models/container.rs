//! # Container Aggregate
//!
//! The container is created once at gate-in and persists indefinitely; its
//! `status` field is a deterministic projection of the stage jobs on file and
//! is written only by the status resolver.

use crate::state_machine::ContainerStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Physical yard slot (block / row / tier)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YardLocation {
    pub block: String,
    pub row: u32,
    pub tier: u32,
}

impl fmt::Display for YardLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}-{}", self.block, self.row, self.tier)
    }
}

/// A shipping container under depot custody
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: Uuid,
    /// Natural key, e.g. `MSKU1234567`
    pub container_number: String,
    /// Owning/leasing shipping line; external actors are scoped to one liner
    pub liner: String,
    /// ISO size/type code, e.g. `40HC`
    pub size_type: String,
    pub yard_location: Option<YardLocation>,
    /// Written only by the status resolver (and the gate-in pending-wash path)
    pub status: ContainerStatus,
    /// Failed inspection cycles; only ever increases
    pub rework_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Container {
    pub fn new(
        container_number: impl Into<String>,
        liner: impl Into<String>,
        size_type: impl Into<String>,
        yard_location: Option<YardLocation>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            container_number: container_number.into(),
            liner: liner.into(),
            size_type: size_type.into(),
            yard_location,
            status: ContainerStatus::default(),
            rework_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
