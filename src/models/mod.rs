//! # Domain Models
//!
//! Typed records for the container aggregate and the seven stage entities of
//! the repair-and-release workflow. Every stage entity shares a common
//! envelope (`id`, `container_id`/`container_number`, `transaction_id`,
//! stage-local `status`, audit timestamps and actors); the [`StageJob`] tagged
//! union carries that envelope across stage kinds so the status resolver and
//! the reverse-deletion guard can handle all of them exhaustively.

pub mod container;
pub mod estimate;
pub mod pre_inspection;
pub mod repair_order;
pub mod shunting;
pub mod stacking;
pub mod stage_job;
pub mod survey;
pub mod washing_order;

pub use container::{Container, YardLocation};
pub use estimate::{EstimateOfRepair, RepairItem};
pub use pre_inspection::{ChecklistItem, DamageItemResult, InspectionResult, ItemVerdict, PreInspection};
pub use repair_order::{RepairOrder, WorkItem};
pub use shunting::{ShuntingPriority, ShuntingRequest};
pub use stacking::StackingRequest;
pub use stage_job::{StageJob, StageKind};
pub use survey::{DamageItem, InitialCondition, Survey};
pub use washing_order::{CleaningProgram, WashingOrder};
