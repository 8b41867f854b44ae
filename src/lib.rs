#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Depot Core
//!
//! Workflow engine for a container depot's repair-and-release pipeline.
//!
//! ## Overview
//!
//! A container moves through up to seven fixed stages between gate-in and
//! release: damage survey, repair estimate, shunting to the repair area, the
//! repair itself, optional washing, post-repair inspection, and final
//! stacking. Each stage is a typed record with its own small state machine;
//! the overall container status is never written directly but derived from
//! the set of stage jobs on file.
//!
//! ## Architecture
//!
//! - [`models`] - Container aggregate and the seven stage entities, unified
//!   by the [`models::StageJob`] tagged union
//! - [`state_machine`] - Stage-local status enums, legal-transition tables,
//!   and the stage creation guards
//! - [`orchestration`] - The [`orchestration::WorkflowEngine`] service
//!   boundary plus the approval policy, status resolver, rework controller,
//!   reverse-deletion guard, and job registry
//! - [`storage`] - The [`storage::RecordStore`] persistence seam with an
//!   in-memory implementation
//! - [`events`] - Broadcast publisher for lifecycle events
//! - [`config`] - Engine configuration (approval threshold, washing
//!   eligibility)
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use depot_core::config::DepotConfig;
//! use depot_core::orchestration::{AllowAll, WorkflowEngine};
//! use depot_core::storage::InMemoryRecordStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> depot_core::error::Result<()> {
//! let engine = WorkflowEngine::new(
//!     Arc::new(InMemoryRecordStore::new()),
//!     Arc::new(AllowAll),
//!     DepotConfig::default(),
//! );
//!
//! let container = engine
//!     .register_container("MSKU1234567", "MSK", "40HC", None, false)
//!     .await?;
//! let survey = engine.create_survey(container.id, "surveyor-1").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod state_machine;
pub mod storage;

pub use config::DepotConfig;
pub use error::{DepotError, Result};
pub use models::{Container, StageJob, StageKind};
pub use orchestration::WorkflowEngine;
pub use state_machine::ContainerStatus;
