//! In-memory record store backed by concurrent maps. Used by the test suite
//! and by hosts that embed the engine without a database.

use crate::error::{DepotError, Result};
use crate::models::{Container, StageJob};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::RecordStore;

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    containers: DashMap<Uuid, Container>,
    /// Natural-key index: container number -> container id
    container_numbers: RwLock<HashMap<String, Uuid>>,
    jobs: DashMap<Uuid, StageJob>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut jobs: Vec<StageJob>) -> Vec<StageJob> {
        jobs.sort_by_key(|job| (job.created_at(), job.id()));
        jobs
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put_container(&self, container: Container) -> Result<()> {
        self.container_numbers
            .write()
            .insert(container.container_number.clone(), container.id);
        self.containers.insert(container.id, container);
        Ok(())
    }

    async fn container(&self, id: Uuid) -> Result<Option<Container>> {
        Ok(self.containers.get(&id).map(|entry| entry.clone()))
    }

    async fn container_by_number(&self, container_number: &str) -> Result<Option<Container>> {
        let id = self.container_numbers.read().get(container_number).copied();
        match id {
            Some(id) => self.container(id).await,
            None => Ok(None),
        }
    }

    async fn list_containers(&self) -> Result<Vec<Container>> {
        let mut containers: Vec<Container> =
            self.containers.iter().map(|entry| entry.clone()).collect();
        containers.sort_by_key(|c| (c.created_at, c.id));
        Ok(containers)
    }

    async fn put_job(&self, job: StageJob) -> Result<()> {
        self.jobs.insert(job.id(), job);
        Ok(())
    }

    async fn job(&self, id: Uuid) -> Result<Option<StageJob>> {
        Ok(self.jobs.get(&id).map(|entry| entry.clone()))
    }

    async fn delete_job(&self, id: Uuid) -> Result<()> {
        match self.jobs.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DepotError::not_found("stage job", id)),
        }
    }

    async fn jobs_for_container(
        &self,
        container_id: Uuid,
        container_number: &str,
    ) -> Result<Vec<StageJob>> {
        let jobs = self
            .jobs
            .iter()
            .filter(|entry| {
                entry.container_id() == Some(container_id)
                    || entry.container_number() == container_number
            })
            .map(|entry| entry.clone())
            .collect();
        Ok(Self::sorted(jobs))
    }

    async fn jobs_for_container_number(&self, container_number: &str) -> Result<Vec<StageJob>> {
        let jobs = self
            .jobs
            .iter()
            .filter(|entry| entry.container_number() == container_number)
            .map(|entry| entry.clone())
            .collect();
        Ok(Self::sorted(jobs))
    }

    async fn jobs_for_transaction(&self, transaction_id: Uuid) -> Result<Vec<StageJob>> {
        let jobs = self
            .jobs
            .iter()
            .filter(|entry| entry.transaction_id() == transaction_id)
            .map(|entry| entry.clone())
            .collect();
        Ok(Self::sorted(jobs))
    }
}
