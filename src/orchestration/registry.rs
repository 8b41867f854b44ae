//! # Job Registry
//!
//! Cross-stage lookup of jobs for a container or a workflow transaction.
//! Container lookups match by id **or** by container number, since historical
//! jobs may only carry the number. Used by the status resolver path and by
//! operational search/audit tooling.

use crate::error::Result;
use crate::models::{Container, StageJob};
use crate::storage::RecordStore;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct JobRegistry {
    store: Arc<dyn RecordStore>,
}

impl JobRegistry {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All jobs for a container, ordered by creation time
    pub async fn jobs_for_container(&self, container: &Container) -> Result<Vec<StageJob>> {
        self.store
            .jobs_for_container(container.id, &container.container_number)
            .await
    }

    /// All jobs carrying a container number (including historical records
    /// with no container id)
    pub async fn jobs_for_container_number(
        &self,
        container_number: &str,
    ) -> Result<Vec<StageJob>> {
        self.store.jobs_for_container_number(container_number).await
    }

    /// All jobs of one workflow instance
    pub async fn jobs_for_transaction(&self, transaction_id: Uuid) -> Result<Vec<StageJob>> {
        self.store.jobs_for_transaction(transaction_id).await
    }
}
