use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall container status derived by the status resolver.
///
/// Short codes (`DM`, `AR`, `AV`) match the operational status board and the
/// wire format used by host applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerStatus {
    /// Initial/default state: in the stack, nothing in flight
    Stacking,
    /// Damaged; survey or estimate underway
    #[serde(rename = "DM")]
    Damaged,
    /// Estimate approved, awaiting repair
    #[serde(rename = "AR")]
    AwaitingRepair,
    /// Under repair (or failed inspection sent it back)
    Repair,
    /// Repair finished and verified; awaiting release
    Completed,
    /// Released and available for use
    #[serde(rename = "AV")]
    Available,
    /// Gate-in container waiting for cleaning only
    PendingWash,
}

impl ContainerStatus {
    /// Check if the container has left the repair pipeline
    pub fn is_released(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stacking => write!(f, "STACKING"),
            Self::Damaged => write!(f, "DM"),
            Self::AwaitingRepair => write!(f, "AR"),
            Self::Repair => write!(f, "REPAIR"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Available => write!(f, "AV"),
            Self::PendingWash => write!(f, "PENDING_WASH"),
        }
    }
}

impl std::str::FromStr for ContainerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STACKING" => Ok(Self::Stacking),
            "DM" => Ok(Self::Damaged),
            "AR" => Ok(Self::AwaitingRepair),
            "REPAIR" => Ok(Self::Repair),
            "COMPLETED" => Ok(Self::Completed),
            "AV" => Ok(Self::Available),
            "PENDING_WASH" => Ok(Self::PendingWash),
            _ => Err(format!("Invalid container status: {s}")),
        }
    }
}

impl Default for ContainerStatus {
    fn default() -> Self {
        Self::Stacking
    }
}

/// Damage survey status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurveyStatus {
    Draft,
    InProgress,
    Completed,
    Released,
}

impl SurveyStatus {
    /// Check if this survey still counts against the one-active-job rule
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Draft | Self::InProgress)
    }

    /// Check if no further transitions are allowed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released)
    }

    /// Check if the survey qualifies as a predecessor for an estimate
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Completed | Self::Released)
    }

    /// Check if a transition to `next` is legal
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::InProgress)
                | (Self::Draft, Self::Completed)
                | (Self::InProgress, Self::Completed)
                | (Self::Completed, Self::Released)
        )
    }
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "DRAFT"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Released => write!(f, "RELEASED"),
        }
    }
}

impl std::str::FromStr for SurveyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "RELEASED" => Ok(Self::Released),
            _ => Err(format!("Invalid survey status: {s}")),
        }
    }
}

impl Default for SurveyStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// Estimate of repair (EOR) status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstimateStatus {
    Pending,
    Sent,
    Approved,
    AutoApproved,
    Rejected,
}

impl EstimateStatus {
    /// Check if this estimate still counts against the one-active-job rule
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Sent)
    }

    /// Check if no further transitions are allowed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::AutoApproved | Self::Rejected)
    }

    /// Check if the estimate opens the repair pipeline
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved | Self::AutoApproved)
    }

    /// Check if a manual approve/reject decision may be taken from this status
    pub fn is_decidable(&self) -> bool {
        matches!(self, Self::Pending | Self::Sent)
    }

    /// Check if a transition to `next` is legal.
    ///
    /// `AUTO_APPROVED` is assigned by the approval policy at creation and is
    /// never a transition target.
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Sent)
                | (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Sent, Self::Approved)
                | (Self::Sent, Self::Rejected)
        )
    }
}

impl fmt::Display for EstimateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Sent => write!(f, "SENT"),
            Self::Approved => write!(f, "APPROVED"),
            Self::AutoApproved => write!(f, "AUTO_APPROVED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl std::str::FromStr for EstimateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "SENT" => Ok(Self::Sent),
            "APPROVED" => Ok(Self::Approved),
            "AUTO_APPROVED" => Ok(Self::AutoApproved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(format!("Invalid estimate status: {s}")),
        }
    }
}

impl Default for EstimateStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Shunting (internal relocation) request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShuntingStatus {
    New,
    Dispatched,
    InProgress,
    Completed,
}

impl ShuntingStatus {
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Check if a transition to `next` is legal
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::Dispatched)
                | (Self::Dispatched, Self::InProgress)
                | (Self::InProgress, Self::Completed)
        )
    }
}

impl fmt::Display for ShuntingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "NEW"),
            Self::Dispatched => write!(f, "DISPATCHED"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for ShuntingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "DISPATCHED" => Ok(Self::Dispatched),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(format!("Invalid shunting status: {s}")),
        }
    }
}

impl Default for ShuntingStatus {
    fn default() -> Self {
        Self::New
    }
}

/// Repair order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairStatus {
    Pending,
    InProgress,
    Completed,
}

impl RepairStatus {
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Check if a transition to `next` is legal.
    ///
    /// `COMPLETED -> IN_PROGRESS` is reserved for the rework controller and
    /// rejected here.
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress) | (Self::InProgress, Self::Completed)
        )
    }
}

impl fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for RepairStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(format!("Invalid repair status: {s}")),
        }
    }
}

impl Default for RepairStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Washing order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WashingStatus {
    PendingApproval,
    PendingSchedule,
    Scheduled,
    InProgress,
    PendingQc,
    Rework,
    Completed,
    Rejected,
}

impl WashingStatus {
    /// Check if this order still counts against the one-active-job rule.
    ///
    /// `REWORK` is active: the same record is reused for the next attempt.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// Check if a transition to `next` is legal
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::PendingApproval, Self::PendingSchedule)
                | (Self::PendingApproval, Self::Rejected)
                | (Self::PendingSchedule, Self::Scheduled)
                | (Self::Scheduled, Self::InProgress)
                | (Self::InProgress, Self::PendingQc)
                | (Self::PendingQc, Self::Completed)
                | (Self::PendingQc, Self::Rework)
                | (Self::Rework, Self::Scheduled)
                | (Self::Rework, Self::InProgress)
        )
    }
}

impl fmt::Display for WashingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PendingApproval => write!(f, "PENDING_APPROVAL"),
            Self::PendingSchedule => write!(f, "PENDING_SCHEDULE"),
            Self::Scheduled => write!(f, "SCHEDULED"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::PendingQc => write!(f, "PENDING_QC"),
            Self::Rework => write!(f, "REWORK"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl std::str::FromStr for WashingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING_APPROVAL" => Ok(Self::PendingApproval),
            "PENDING_SCHEDULE" => Ok(Self::PendingSchedule),
            "SCHEDULED" => Ok(Self::Scheduled),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "PENDING_QC" => Ok(Self::PendingQc),
            "REWORK" => Ok(Self::Rework),
            "COMPLETED" => Ok(Self::Completed),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(format!("Invalid washing status: {s}")),
        }
    }
}

impl Default for WashingStatus {
    fn default() -> Self {
        Self::PendingApproval
    }
}

/// Post-repair quality re-inspection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionStatus {
    Planned,
    InProgress,
    PendingRework,
    Completed,
}

impl InspectionStatus {
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Check if this inspection blocks creation of a new one.
    ///
    /// `PENDING_REWORK` does not block: the next attempt reopens the same
    /// record instead of writing a second row.
    pub fn blocks_new_inspection(&self) -> bool {
        matches!(self, Self::Planned | Self::InProgress)
    }

    /// Check if a transition to `next` is legal
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Planned, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::PendingRework)
                | (Self::PendingRework, Self::InProgress)
        )
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planned => write!(f, "PLANNED"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::PendingRework => write!(f, "PENDING_REWORK"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for InspectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANNED" => Ok(Self::Planned),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "PENDING_REWORK" => Ok(Self::PendingRework),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(format!("Invalid inspection status: {s}")),
        }
    }
}

impl Default for InspectionStatus {
    fn default() -> Self {
        Self::Planned
    }
}

/// Stacking (final yard placement / release) request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StackingStatus {
    New,
    InProgress,
    Completed,
}

impl StackingStatus {
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Check if a transition to `next` is legal
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::InProgress) | (Self::InProgress, Self::Completed)
        )
    }
}

impl fmt::Display for StackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "NEW"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for StackingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(format!("Invalid stacking status: {s}")),
        }
    }
}

impl Default for StackingStatus {
    fn default() -> Self {
        Self::New
    }
}
