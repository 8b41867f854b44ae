//! # Error Types
//!
//! Crate-wide error taxonomy for the depot workflow engine. Every engine
//! operation returns these as typed results; nothing is swallowed and the
//! engine performs no retries itself (retries belong to the persistence
//! collaborator).

use crate::models::StageKind;
use thiserror::Error;
use uuid::Uuid;

/// Errors produced by workflow transitions and lookups
#[derive(Error, Debug)]
pub enum DepotError {
    /// Stage ordering violated: the required predecessor stage is missing or
    /// not in a qualifying state
    #[error("precondition not met for {stage} stage: {missing}")]
    PreconditionNotMet { stage: StageKind, missing: String },

    /// Mutation attempted from a non-qualifying local status
    #[error("invalid state transition for {stage} job {job_id}: {from} -> {to}")]
    InvalidStateTransition {
        stage: StageKind,
        job_id: Uuid,
        from: String,
        to: String,
    },

    /// Actor lacks the required capability or liner ownership
    #[error("permission denied: actor {actor} may not {action} on {screen}")]
    PermissionDenied {
        actor: String,
        screen: String,
        action: String,
    },

    /// Deletion ordering violated: a later-stage job still exists
    #[error("cannot delete {stage} job while a downstream {blocking} job exists")]
    BlockedByDownstreamJob {
        stage: StageKind,
        blocking: StageKind,
    },

    /// A second active job was requested for a stage that already has one
    #[error("an active {stage} job already exists for container {container_number}")]
    DuplicateActiveJob {
        stage: StageKind,
        container_number: String,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl DepotError {
    /// Shorthand for a `NotFound` error over a uuid key
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DepotError>;
