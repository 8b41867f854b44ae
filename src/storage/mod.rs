//! # Record Store
//!
//! Generic keyed persistence seam. The engine is persistence-agnostic: hosts
//! supply any implementation of [`RecordStore`] (a database-backed one in
//! production); [`InMemoryRecordStore`] ships for tests and embedding.

pub mod memory;

use crate::error::Result;
use crate::models::{Container, StageJob};
use async_trait::async_trait;
use uuid::Uuid;

/// Keyed persistence for containers and stage jobs, with the secondary
/// indexes the workflow needs (container number, transaction id)
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or replace a container record
    async fn put_container(&self, container: Container) -> Result<()>;

    async fn container(&self, id: Uuid) -> Result<Option<Container>>;

    async fn container_by_number(&self, container_number: &str) -> Result<Option<Container>>;

    async fn list_containers(&self) -> Result<Vec<Container>>;

    /// Insert or replace a stage job record
    async fn put_job(&self, job: StageJob) -> Result<()>;

    async fn job(&self, id: Uuid) -> Result<Option<StageJob>>;

    /// Remove a stage job; deleting an unknown id is a `NotFound` error
    async fn delete_job(&self, id: Uuid) -> Result<()>;

    /// All jobs owned by a container, matched by id **or** by number
    /// (historical jobs may carry only the number), ordered by creation time
    async fn jobs_for_container(
        &self,
        container_id: Uuid,
        container_number: &str,
    ) -> Result<Vec<StageJob>>;

    /// All jobs carrying a container number, ordered by creation time
    async fn jobs_for_container_number(&self, container_number: &str) -> Result<Vec<StageJob>>;

    /// All jobs of one workflow instance, ordered by creation time
    async fn jobs_for_transaction(&self, transaction_id: Uuid) -> Result<Vec<StageJob>>;
}

pub use memory::InMemoryRecordStore;
