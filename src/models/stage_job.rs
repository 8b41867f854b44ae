//! # Stage Job Union
//!
//! Tagged union over the seven stage kinds, sharing the common record
//! envelope. The workflow ordering table lives here as
//! [`StageKind::precedence`]; both the status resolver and the
//! reverse-deletion guard consume it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{
    EstimateOfRepair, PreInspection, RepairOrder, ShuntingRequest, StackingRequest, Survey,
    WashingOrder,
};

/// The seven fixed workflow stages, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Survey,
    Estimate,
    Shunting,
    Repair,
    Washing,
    PreInspection,
    Stacking,
}

impl StageKind {
    /// Static workflow ordering: `{Survey:1, Estimate:2, Shunting:3,
    /// Repair:4, Washing:5, PreInspection:6, Stacking:7}`
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Survey => 1,
            Self::Estimate => 2,
            Self::Shunting => 3,
            Self::Repair => 4,
            Self::Washing => 5,
            Self::PreInspection => 6,
            Self::Stacking => 7,
        }
    }

    /// All stage kinds in precedence order
    pub fn all() -> [StageKind; 7] {
        [
            Self::Survey,
            Self::Estimate,
            Self::Shunting,
            Self::Repair,
            Self::Washing,
            Self::PreInspection,
            Self::Stacking,
        ]
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Survey => write!(f, "survey"),
            Self::Estimate => write!(f, "estimate"),
            Self::Shunting => write!(f, "shunting"),
            Self::Repair => write!(f, "repair"),
            Self::Washing => write!(f, "washing"),
            Self::PreInspection => write!(f, "pre_inspection"),
            Self::Stacking => write!(f, "stacking"),
        }
    }
}

/// A stage job of any kind, carrying the shared record envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageJob {
    Survey(Survey),
    Estimate(EstimateOfRepair),
    Shunting(ShuntingRequest),
    Repair(RepairOrder),
    Washing(WashingOrder),
    PreInspection(PreInspection),
    Stacking(StackingRequest),
}

impl StageJob {
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Survey(_) => StageKind::Survey,
            Self::Estimate(_) => StageKind::Estimate,
            Self::Shunting(_) => StageKind::Shunting,
            Self::Repair(_) => StageKind::Repair,
            Self::Washing(_) => StageKind::Washing,
            Self::PreInspection(_) => StageKind::PreInspection,
            Self::Stacking(_) => StageKind::Stacking,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Survey(j) => j.id,
            Self::Estimate(j) => j.id,
            Self::Shunting(j) => j.id,
            Self::Repair(j) => j.id,
            Self::Washing(j) => j.id,
            Self::PreInspection(j) => j.id,
            Self::Stacking(j) => j.id,
        }
    }

    /// Owning container id; historical records may carry only the number
    pub fn container_id(&self) -> Option<Uuid> {
        match self {
            Self::Survey(j) => j.container_id,
            Self::Estimate(j) => j.container_id,
            Self::Shunting(j) => j.container_id,
            Self::Repair(j) => j.container_id,
            Self::Washing(j) => j.container_id,
            Self::PreInspection(j) => j.container_id,
            Self::Stacking(j) => j.container_id,
        }
    }

    pub fn container_number(&self) -> &str {
        match self {
            Self::Survey(j) => &j.container_number,
            Self::Estimate(j) => &j.container_number,
            Self::Shunting(j) => &j.container_number,
            Self::Repair(j) => &j.container_number,
            Self::Washing(j) => &j.container_number,
            Self::PreInspection(j) => &j.container_number,
            Self::Stacking(j) => &j.container_number,
        }
    }

    /// Correlation key shared by all jobs of one workflow instance
    pub fn transaction_id(&self) -> Uuid {
        match self {
            Self::Survey(j) => j.transaction_id,
            Self::Estimate(j) => j.transaction_id,
            Self::Shunting(j) => j.transaction_id,
            Self::Repair(j) => j.transaction_id,
            Self::Washing(j) => j.transaction_id,
            Self::PreInspection(j) => j.transaction_id,
            Self::Stacking(j) => j.transaction_id,
        }
    }

    /// Whether this job counts against the one-active-job-per-stage rule
    pub fn is_active(&self) -> bool {
        match self {
            Self::Survey(j) => j.status.is_active(),
            Self::Estimate(j) => j.status.is_active(),
            Self::Shunting(j) => j.status.is_active(),
            Self::Repair(j) => j.status.is_active(),
            Self::Washing(j) => j.status.is_active(),
            Self::PreInspection(j) => j.status.is_active(),
            Self::Stacking(j) => j.status.is_active(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Survey(j) => j.created_at,
            Self::Estimate(j) => j.created_at,
            Self::Shunting(j) => j.created_at,
            Self::Repair(j) => j.created_at,
            Self::Washing(j) => j.created_at,
            Self::PreInspection(j) => j.created_at,
            Self::Stacking(j) => j.created_at,
        }
    }

    /// Local status rendered as its wire code, for logging and audit rows
    pub fn status_code(&self) -> String {
        match self {
            Self::Survey(j) => j.status.to_string(),
            Self::Estimate(j) => j.status.to_string(),
            Self::Shunting(j) => j.status.to_string(),
            Self::Repair(j) => j.status.to_string(),
            Self::Washing(j) => j.status.to_string(),
            Self::PreInspection(j) => j.status.to_string(),
            Self::Stacking(j) => j.status.to_string(),
        }
    }

    pub fn as_survey(&self) -> Option<&Survey> {
        match self {
            Self::Survey(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_estimate(&self) -> Option<&EstimateOfRepair> {
        match self {
            Self::Estimate(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_shunting(&self) -> Option<&ShuntingRequest> {
        match self {
            Self::Shunting(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_repair(&self) -> Option<&RepairOrder> {
        match self {
            Self::Repair(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_washing(&self) -> Option<&WashingOrder> {
        match self {
            Self::Washing(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_pre_inspection(&self) -> Option<&PreInspection> {
        match self {
            Self::PreInspection(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_stacking(&self) -> Option<&StackingRequest> {
        match self {
            Self::Stacking(j) => Some(j),
            _ => None,
        }
    }
}

impl From<Survey> for StageJob {
    fn from(job: Survey) -> Self {
        Self::Survey(job)
    }
}

impl From<EstimateOfRepair> for StageJob {
    fn from(job: EstimateOfRepair) -> Self {
        Self::Estimate(job)
    }
}

impl From<ShuntingRequest> for StageJob {
    fn from(job: ShuntingRequest) -> Self {
        Self::Shunting(job)
    }
}

impl From<RepairOrder> for StageJob {
    fn from(job: RepairOrder) -> Self {
        Self::Repair(job)
    }
}

impl From<WashingOrder> for StageJob {
    fn from(job: WashingOrder) -> Self {
        Self::Washing(job)
    }
}

impl From<PreInspection> for StageJob {
    fn from(job: PreInspection) -> Self {
        Self::PreInspection(job)
    }
}

impl From<StackingRequest> for StageJob {
    fn from(job: StackingRequest) -> Self {
        Self::Stacking(job)
    }
}
