//! # Workflow Engine
//!
//! The service boundary for the depot repair-and-release workflow. Every
//! operation is a read-check-write unit serialized per container: the engine
//! holds one async lock per container id, consults the stage creation guards
//! and local transition tables inside the critical section, persists through
//! the [`RecordStore`] seam, re-derives the container status, and publishes a
//! lifecycle event.
//!
//! Containers are independent: operations on different containers never
//! contend. Batch operations are sequences of independent per-container
//! transitions; one failed item never affects the others.

use crate::config::DepotConfig;
use crate::constants::events;
use crate::error::{DepotError, Result};
use crate::events::EventPublisher;
use crate::models::{
    ChecklistItem, CleaningProgram, Container, DamageItem, EstimateOfRepair, InitialCondition,
    ItemVerdict, PreInspection, RepairItem, RepairOrder, ShuntingPriority, ShuntingRequest,
    StackingRequest, StageJob, StageKind, Survey, WashingOrder, YardLocation,
};
use crate::orchestration::approval::{
    Actor, ApprovalAction, ApprovalOutcome, ApprovalPolicy, PermissionCheck,
};
use crate::orchestration::deletion_guard;
use crate::orchestration::registry::JobRegistry;
use crate::orchestration::rework::{QcOutcome, ReworkController};
use crate::orchestration::status_resolver;
use crate::state_machine::{
    creation_guard, ContainerStatus, EstimateStatus, GuardContext, InspectionResult,
    InspectionStatus, RepairStatus, ShuntingStatus, StackingStatus, SurveyStatus, WashingStatus,
};
use crate::storage::RecordStore;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// The depot workflow engine
pub struct WorkflowEngine {
    store: Arc<dyn RecordStore>,
    registry: JobRegistry,
    policy: ApprovalPolicy,
    permissions: Arc<dyn PermissionCheck>,
    config: DepotConfig,
    events: EventPublisher,
    container_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl WorkflowEngine {
    pub fn new(
        store: Arc<dyn RecordStore>,
        permissions: Arc<dyn PermissionCheck>,
        config: DepotConfig,
    ) -> Self {
        let registry = JobRegistry::new(store.clone());
        let policy = ApprovalPolicy::new(config.auto_approval_threshold);
        let events = EventPublisher::new(config.event_channel_capacity);
        Self {
            store,
            registry,
            policy,
            permissions,
            config,
            events,
            container_locks: DashMap::new(),
        }
    }

    pub fn config(&self) -> &DepotConfig {
        &self.config
    }

    pub fn policy(&self) -> &ApprovalPolicy {
        &self.policy
    }

    /// The engine's event publisher; subscribe here for lifecycle events
    pub fn events(&self) -> &EventPublisher {
        &self.events
    }

    /// Cross-stage job lookup, for search and audit tooling
    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    // ---- containers ----

    /// Register a container at gate-in. A container requiring cleaning only
    /// enters at PENDING_WASH; everything else starts at STACKING.
    #[instrument(skip(self), fields(container_number = %container_number))]
    pub async fn register_container(
        &self,
        container_number: &str,
        liner: &str,
        size_type: &str,
        yard_location: Option<YardLocation>,
        requires_wash: bool,
    ) -> Result<Container> {
        if self
            .store
            .container_by_number(container_number)
            .await?
            .is_some()
        {
            return Err(DepotError::Storage {
                message: format!("container {container_number} is already registered"),
            });
        }

        let mut container = Container::new(container_number, liner, size_type, yard_location);
        if requires_wash {
            container.status = ContainerStatus::PendingWash;
        }
        self.store.put_container(container.clone()).await?;

        info!(container_id = %container.id, status = %container.status, "container registered");
        self.emit(
            events::CONTAINER_REGISTERED,
            json!({
                "container_id": container.id,
                "container_number": container.container_number,
                "liner": container.liner,
                "status": container.status.to_string(),
            }),
        );
        Ok(container)
    }

    pub async fn container(&self, container_id: Uuid) -> Result<Container> {
        self.require_container(container_id).await
    }

    pub async fn container_by_number(&self, container_number: &str) -> Result<Container> {
        self.store
            .container_by_number(container_number)
            .await?
            .ok_or_else(|| DepotError::NotFound {
                entity: "container",
                id: container_number.to_string(),
            })
    }

    pub async fn list_containers(&self) -> Result<Vec<Container>> {
        self.store.list_containers().await
    }

    /// Project the container status from its current job set without writing
    /// anything
    pub async fn resolve_container_status(&self, container_id: Uuid) -> Result<ContainerStatus> {
        let container = self.require_container(container_id).await?;
        let jobs = self.registry.jobs_for_container(&container).await?;
        Ok(status_resolver::resolve(&jobs))
    }

    /// All jobs for a container, ordered by creation time
    pub async fn jobs_for_container(&self, container_id: Uuid) -> Result<Vec<StageJob>> {
        let container = self.require_container(container_id).await?;
        self.registry.jobs_for_container(&container).await
    }

    /// Jobs of one stage kind for a container, ordered by creation time
    pub async fn stage_jobs(&self, container_id: Uuid, kind: StageKind) -> Result<Vec<StageJob>> {
        Ok(self
            .jobs_for_container(container_id)
            .await?
            .into_iter()
            .filter(|job| job.kind() == kind)
            .collect())
    }

    // ---- surveys ----

    #[instrument(skip(self), fields(container_id = %container_id))]
    pub async fn create_survey(&self, container_id: Uuid, created_by: &str) -> Result<Survey> {
        let _guard = self.lock_container(container_id).await;
        let mut container = self.require_container(container_id).await?;
        let jobs = self.registry.jobs_for_container(&container).await?;
        self.check_creation(StageKind::Survey, &container, &jobs)?;

        let survey = Survey::new(&container, created_by);
        self.store.put_job(survey.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        self.emit(
            events::SURVEY_CREATED,
            json!({
                "survey_id": survey.id,
                "container_number": survey.container_number,
                "transaction_id": survey.transaction_id,
            }),
        );
        Ok(survey)
    }

    pub async fn start_survey(&self, survey_id: Uuid, actor: &str) -> Result<Survey> {
        let (_guard, mut container, job) = self.lock_job(survey_id).await?;
        let mut survey = expect_survey(job, survey_id)?;

        self.require_transition(
            StageKind::Survey,
            survey.id,
            survey.status,
            SurveyStatus::InProgress,
            survey.status.can_transition_to(SurveyStatus::InProgress),
        )?;
        survey.status = SurveyStatus::InProgress;
        self.store.put_job(survey.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        debug!(survey_id = %survey.id, actor, "survey started");
        Ok(survey)
    }

    /// Record the surveyor's verdict and close the survey. The condition
    /// decides whether the container enters the repair pipeline.
    #[instrument(skip(self, damage_items), fields(survey_id = %survey_id))]
    pub async fn complete_survey(
        &self,
        survey_id: Uuid,
        condition: InitialCondition,
        damage_items: Vec<DamageItem>,
        actor: &str,
    ) -> Result<Survey> {
        let (_guard, mut container, job) = self.lock_job(survey_id).await?;
        let mut survey = expect_survey(job, survey_id)?;

        self.require_transition(
            StageKind::Survey,
            survey.id,
            survey.status,
            SurveyStatus::Completed,
            survey.status.can_transition_to(SurveyStatus::Completed),
        )?;
        survey.status = SurveyStatus::Completed;
        survey.initial_condition = Some(condition);
        survey.damage_items = damage_items;
        survey.completed_at = Some(Utc::now());
        survey.completed_by = Some(actor.to_string());
        self.store.put_job(survey.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        self.emit(
            events::SURVEY_COMPLETED,
            json!({
                "survey_id": survey.id,
                "container_number": survey.container_number,
                "condition": condition,
                "damage_items": survey.damage_items.len(),
            }),
        );
        Ok(survey)
    }

    pub async fn release_survey(&self, survey_id: Uuid, actor: &str) -> Result<Survey> {
        let (_guard, mut container, job) = self.lock_job(survey_id).await?;
        let mut survey = expect_survey(job, survey_id)?;

        self.require_transition(
            StageKind::Survey,
            survey.id,
            survey.status,
            SurveyStatus::Released,
            survey.status.can_transition_to(SurveyStatus::Released),
        )?;
        survey.status = SurveyStatus::Released;
        self.store.put_job(survey.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        debug!(survey_id = %survey.id, actor, "survey released");
        Ok(survey)
    }

    // ---- estimates ----

    /// Create an estimate for a surveyed damaged container. The approval
    /// policy is applied immediately: at or under the configured threshold
    /// the estimate is auto-approved and never waits for a decision.
    #[instrument(skip(self, repair_items), fields(container_id = %container_id))]
    pub async fn create_estimate(
        &self,
        container_id: Uuid,
        repair_items: Vec<RepairItem>,
        created_by: &str,
    ) -> Result<EstimateOfRepair> {
        let _guard = self.lock_container(container_id).await;
        let mut container = self.require_container(container_id).await?;
        let jobs = self.registry.jobs_for_container(&container).await?;
        self.check_creation(StageKind::Estimate, &container, &jobs)?;

        let survey = latest_qualifying_survey(&jobs).ok_or_else(|| {
            DepotError::PreconditionNotMet {
                stage: StageKind::Estimate,
                missing: "completed survey with DAMAGED condition".to_string(),
            }
        })?;
        let mut estimate = EstimateOfRepair::new(&container, survey, repair_items, created_by);

        let auto_approved = match self.policy.decide(estimate.total_cost) {
            ApprovalOutcome::AutoApproved => {
                estimate.status = EstimateStatus::AutoApproved;
                estimate.auto_approved = true;
                estimate.need_approval = false;
                estimate.completed_at = Some(Utc::now());
                estimate.completed_by = Some("system".to_string());
                true
            }
            ApprovalOutcome::RequiresApproval => false,
        };
        self.store.put_job(estimate.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        info!(
            estimate_id = %estimate.id,
            total_cost = estimate.total_cost,
            auto_approved,
            "estimate created"
        );
        self.emit(
            events::ESTIMATE_CREATED,
            json!({
                "estimate_id": estimate.id,
                "container_number": estimate.container_number,
                "total_cost": estimate.total_cost,
            }),
        );
        if auto_approved {
            self.emit(
                events::ESTIMATE_AUTO_APPROVED,
                json!({
                    "estimate_id": estimate.id,
                    "total_cost": estimate.total_cost,
                    "threshold": self.policy.threshold(),
                }),
            );
        }
        Ok(estimate)
    }

    /// Send a pending estimate to the liner for an external decision
    pub async fn send_estimate(&self, estimate_id: Uuid, actor: &str) -> Result<EstimateOfRepair> {
        let (_guard, mut container, job) = self.lock_job(estimate_id).await?;
        let mut estimate = expect_estimate(job, estimate_id)?;

        self.require_transition(
            StageKind::Estimate,
            estimate.id,
            estimate.status,
            EstimateStatus::Sent,
            estimate.status.can_transition_to(EstimateStatus::Sent),
        )?;
        estimate.status = EstimateStatus::Sent;
        self.store.put_job(estimate.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        debug!(estimate_id = %estimate.id, actor, "estimate sent");
        self.emit(
            events::ESTIMATE_SENT,
            json!({"estimate_id": estimate.id, "liner": estimate.liner}),
        );
        Ok(estimate)
    }

    /// Approve or reject a pending/sent estimate as `actor`. Internal staff
    /// need the approve capability; external actors must be bound to the
    /// estimate's liner.
    #[instrument(skip(self, actor), fields(estimate_id = %estimate_id, actor_id = %actor.id))]
    pub async fn decide_estimate(
        &self,
        estimate_id: Uuid,
        action: ApprovalAction,
        actor: &Actor,
    ) -> Result<EstimateOfRepair> {
        let (_guard, mut container, job) = self.lock_job(estimate_id).await?;
        let mut estimate = expect_estimate(job, estimate_id)?;

        let target = match action {
            ApprovalAction::Approve => EstimateStatus::Approved,
            ApprovalAction::Reject => EstimateStatus::Rejected,
        };
        self.require_transition(
            StageKind::Estimate,
            estimate.id,
            estimate.status,
            target,
            estimate.status.is_decidable(),
        )?;
        self.policy
            .authorize(&estimate, actor, action, self.permissions.as_ref())?;

        estimate.status = target;
        estimate.completed_at = Some(Utc::now());
        estimate.completed_by = Some(actor.id.clone());
        self.store.put_job(estimate.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        info!(decision = action.as_str(), "estimate decided");
        let event = match action {
            ApprovalAction::Approve => events::ESTIMATE_APPROVED,
            ApprovalAction::Reject => events::ESTIMATE_REJECTED,
        };
        self.emit(
            event,
            json!({
                "estimate_id": estimate.id,
                "container_number": estimate.container_number,
                "decided_by": actor.id,
            }),
        );
        Ok(estimate)
    }

    /// Decide a batch of estimates. Each item is an independent per-container
    /// transition; failures are collected per id, never propagated across the
    /// batch.
    pub async fn batch_decide_estimates(
        &self,
        estimate_ids: &[Uuid],
        action: ApprovalAction,
        actor: &Actor,
    ) -> Vec<(Uuid, Result<EstimateOfRepair>)> {
        let decisions = estimate_ids
            .iter()
            .map(|id| async move { (*id, self.decide_estimate(*id, action, actor).await) });
        futures::future::join_all(decisions).await
    }

    // ---- shunting ----

    #[instrument(skip(self), fields(container_id = %container_id))]
    pub async fn create_shunting(
        &self,
        container_id: Uuid,
        to_block: &str,
        priority: ShuntingPriority,
        created_by: &str,
    ) -> Result<ShuntingRequest> {
        let _guard = self.lock_container(container_id).await;
        let mut container = self.require_container(container_id).await?;
        let jobs = self.registry.jobs_for_container(&container).await?;
        self.check_creation(StageKind::Shunting, &container, &jobs)?;

        let transaction_id = latest_approved_estimate(&jobs)
            .map(|estimate| estimate.transaction_id)
            .ok_or_else(|| DepotError::PreconditionNotMet {
                stage: StageKind::Shunting,
                missing: "approved or auto-approved estimate".to_string(),
            })?;
        let shunting =
            ShuntingRequest::new(&container, transaction_id, to_block, priority, created_by);
        self.store.put_job(shunting.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        self.emit(
            events::SHUNTING_CREATED,
            json!({
                "shunting_id": shunting.id,
                "container_number": shunting.container_number,
                "to_block": shunting.to_block,
            }),
        );
        Ok(shunting)
    }

    /// Assign a driver and dispatch the request in one transition
    pub async fn dispatch_shunting(
        &self,
        shunting_id: Uuid,
        driver: &str,
        actor: &str,
    ) -> Result<ShuntingRequest> {
        let (_guard, mut container, job) = self.lock_job(shunting_id).await?;
        let mut shunting = expect_shunting(job, shunting_id)?;

        self.require_transition(
            StageKind::Shunting,
            shunting.id,
            shunting.status,
            ShuntingStatus::Dispatched,
            shunting.status.can_transition_to(ShuntingStatus::Dispatched),
        )?;
        shunting.status = ShuntingStatus::Dispatched;
        shunting.assigned_driver = Some(driver.to_string());
        self.store.put_job(shunting.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        debug!(shunting_id = %shunting.id, driver, actor, "shunting dispatched");
        Ok(shunting)
    }

    pub async fn start_shunting(&self, shunting_id: Uuid, actor: &str) -> Result<ShuntingRequest> {
        let (_guard, mut container, job) = self.lock_job(shunting_id).await?;
        let mut shunting = expect_shunting(job, shunting_id)?;

        self.require_transition(
            StageKind::Shunting,
            shunting.id,
            shunting.status,
            ShuntingStatus::InProgress,
            shunting.status.can_transition_to(ShuntingStatus::InProgress),
        )?;
        shunting.status = ShuntingStatus::InProgress;
        self.store.put_job(shunting.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        debug!(shunting_id = %shunting.id, actor, "shunting started");
        Ok(shunting)
    }

    pub async fn complete_shunting(
        &self,
        shunting_id: Uuid,
        actor: &str,
    ) -> Result<ShuntingRequest> {
        let (_guard, mut container, job) = self.lock_job(shunting_id).await?;
        let mut shunting = expect_shunting(job, shunting_id)?;

        self.require_transition(
            StageKind::Shunting,
            shunting.id,
            shunting.status,
            ShuntingStatus::Completed,
            shunting.status.can_transition_to(ShuntingStatus::Completed),
        )?;
        shunting.status = ShuntingStatus::Completed;
        shunting.completed_at = Some(Utc::now());
        shunting.completed_by = Some(actor.to_string());
        self.store.put_job(shunting.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        self.emit(
            events::SHUNTING_COMPLETED,
            json!({
                "shunting_id": shunting.id,
                "container_number": shunting.container_number,
            }),
        );
        Ok(shunting)
    }

    // ---- repair ----

    #[instrument(skip(self), fields(container_id = %container_id))]
    pub async fn create_repair_order(
        &self,
        container_id: Uuid,
        assigned_team: Option<String>,
        created_by: &str,
    ) -> Result<RepairOrder> {
        let _guard = self.lock_container(container_id).await;
        let mut container = self.require_container(container_id).await?;
        let jobs = self.registry.jobs_for_container(&container).await?;
        self.check_creation(StageKind::Repair, &container, &jobs)?;

        let estimate = latest_approved_estimate(&jobs).ok_or_else(|| {
            DepotError::PreconditionNotMet {
                stage: StageKind::Repair,
                missing: "approved or auto-approved estimate".to_string(),
            }
        })?;
        let repair = RepairOrder::new(&container, estimate, assigned_team, created_by);
        self.store.put_job(repair.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        self.emit(
            events::REPAIR_CREATED,
            json!({
                "repair_id": repair.id,
                "container_number": repair.container_number,
                "work_items": repair.work_items.len(),
            }),
        );
        Ok(repair)
    }

    pub async fn start_repair(&self, repair_id: Uuid, actor: &str) -> Result<RepairOrder> {
        let (_guard, mut container, job) = self.lock_job(repair_id).await?;
        let mut repair = expect_repair(job, repair_id)?;

        self.require_transition(
            StageKind::Repair,
            repair.id,
            repair.status,
            RepairStatus::InProgress,
            repair.status.can_transition_to(RepairStatus::InProgress),
        )?;
        repair.status = RepairStatus::InProgress;
        self.store.put_job(repair.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        debug!(repair_id = %repair.id, actor, "repair started");
        Ok(repair)
    }

    pub async fn complete_repair(&self, repair_id: Uuid, actor: &str) -> Result<RepairOrder> {
        let (_guard, mut container, job) = self.lock_job(repair_id).await?;
        let mut repair = expect_repair(job, repair_id)?;

        self.require_transition(
            StageKind::Repair,
            repair.id,
            repair.status,
            RepairStatus::Completed,
            repair.status.can_transition_to(RepairStatus::Completed),
        )?;
        repair.status = RepairStatus::Completed;
        for item in &mut repair.work_items {
            item.completed = true;
        }
        repair.completed_at = Some(Utc::now());
        repair.completed_by = Some(actor.to_string());
        self.store.put_job(repair.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        self.emit(
            events::REPAIR_COMPLETED,
            json!({
                "repair_id": repair.id,
                "container_number": repair.container_number,
                "rework_required": repair.rework_required,
            }),
        );
        Ok(repair)
    }

    // ---- washing ----

    /// Create a washing order for an eligible container. A workflow already
    /// rooted by a survey carries its transaction id; a wash-only container
    /// roots a fresh transaction.
    #[instrument(skip(self), fields(container_id = %container_id))]
    pub async fn create_washing_order(
        &self,
        container_id: Uuid,
        cleaning_program: CleaningProgram,
        created_by: &str,
    ) -> Result<WashingOrder> {
        let _guard = self.lock_container(container_id).await;
        let mut container = self.require_container(container_id).await?;
        let jobs = self.registry.jobs_for_container(&container).await?;
        self.check_creation(StageKind::Washing, &container, &jobs)?;

        let transaction_id = latest_survey(&jobs).map(|survey| survey.transaction_id);
        let washing = WashingOrder::new(&container, transaction_id, cleaning_program, created_by);
        self.store.put_job(washing.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        self.emit(
            events::WASHING_CREATED,
            json!({
                "washing_id": washing.id,
                "container_number": washing.container_number,
                "program": washing.cleaning_program,
            }),
        );
        Ok(washing)
    }

    pub async fn approve_washing(&self, washing_id: Uuid, actor: &str) -> Result<WashingOrder> {
        self.washing_transition(washing_id, WashingStatus::PendingSchedule, actor)
            .await
    }

    pub async fn reject_washing(&self, washing_id: Uuid, actor: &str) -> Result<WashingOrder> {
        self.washing_transition(washing_id, WashingStatus::Rejected, actor)
            .await
    }

    /// Assign a wash bay and schedule the order (fresh or after rework)
    pub async fn schedule_washing(
        &self,
        washing_id: Uuid,
        bay: &str,
        actor: &str,
    ) -> Result<WashingOrder> {
        let (_guard, mut container, job) = self.lock_job(washing_id).await?;
        let mut washing = expect_washing(job, washing_id)?;

        self.require_transition(
            StageKind::Washing,
            washing.id,
            washing.status,
            WashingStatus::Scheduled,
            washing.status.can_transition_to(WashingStatus::Scheduled),
        )?;
        washing.status = WashingStatus::Scheduled;
        washing.assigned_bay = Some(bay.to_string());
        self.store.put_job(washing.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        debug!(washing_id = %washing.id, bay, actor, "washing scheduled");
        Ok(washing)
    }

    pub async fn start_washing(&self, washing_id: Uuid, actor: &str) -> Result<WashingOrder> {
        self.washing_transition(washing_id, WashingStatus::InProgress, actor)
            .await
    }

    /// Hand the finished wash over to quality control
    pub async fn submit_washing_for_qc(
        &self,
        washing_id: Uuid,
        actor: &str,
    ) -> Result<WashingOrder> {
        self.washing_transition(washing_id, WashingStatus::PendingQc, actor)
            .await
    }

    /// Record the QC verdict. A pass completes the order and issues the
    /// cleanliness certificate; a failure reopens the same order for another
    /// attempt.
    #[instrument(skip(self), fields(washing_id = %washing_id))]
    pub async fn complete_washing_qc(
        &self,
        washing_id: Uuid,
        passed: bool,
        actor: &str,
    ) -> Result<WashingOrder> {
        let (_guard, mut container, job) = self.lock_job(washing_id).await?;
        let mut washing = expect_washing(job, washing_id)?;

        if washing.status != WashingStatus::PendingQc {
            return Err(transition_error(
                StageKind::Washing,
                washing.id,
                washing.status,
                if passed {
                    WashingStatus::Completed
                } else {
                    WashingStatus::Rework
                },
            ));
        }

        let outcome = ReworkController::washing_qc(&mut washing, passed);
        if passed {
            washing.completed_at = Some(Utc::now());
            washing.completed_by = Some(actor.to_string());
        }
        self.store.put_job(washing.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        match &outcome {
            QcOutcome::Passed { certificate_number } => {
                info!(certificate_number, "washing QC passed");
                self.emit(
                    events::WASHING_QC_PASSED,
                    json!({
                        "washing_id": washing.id,
                        "container_number": washing.container_number,
                        "certificate_number": certificate_number,
                    }),
                );
            }
            QcOutcome::ReworkRequested => {
                info!(rework_count = washing.rework_count, "washing QC failed");
                self.emit(
                    events::WASHING_REWORK_REQUESTED,
                    json!({
                        "washing_id": washing.id,
                        "container_number": washing.container_number,
                        "rework_count": washing.rework_count,
                    }),
                );
            }
        }
        Ok(washing)
    }

    // ---- pre-inspection ----

    /// Plan a post-repair inspection. An existing PENDING_REWORK inspection
    /// is reopened for the next attempt instead of writing a second row.
    #[instrument(skip(self), fields(container_id = %container_id))]
    pub async fn create_pre_inspection(
        &self,
        container_id: Uuid,
        created_by: &str,
    ) -> Result<PreInspection> {
        let _guard = self.lock_container(container_id).await;
        let mut container = self.require_container(container_id).await?;
        let jobs = self.registry.jobs_for_container(&container).await?;

        if let Some(existing) = pending_rework_inspection(&jobs) {
            // The reopened repair must be finished again before the next
            // inspection attempt, same as for a fresh inspection
            let repair_finished = jobs
                .iter()
                .filter_map(StageJob::as_repair)
                .any(|repair| repair.status == RepairStatus::Completed);
            if !repair_finished {
                return Err(DepotError::PreconditionNotMet {
                    stage: StageKind::PreInspection,
                    missing: "completed repair order".to_string(),
                });
            }

            let mut inspection = existing.clone();
            inspection.status = InspectionStatus::InProgress;
            inspection.result = InspectionResult::Pending;
            self.store.put_job(inspection.clone().into()).await?;
            self.refresh_status(&mut container).await?;

            info!(inspection_id = %inspection.id, attempt = inspection.rework_count + 1, "inspection reopened");
            self.emit(
                events::INSPECTION_CREATED,
                json!({
                    "inspection_id": inspection.id,
                    "container_number": inspection.container_number,
                    "reopened": true,
                }),
            );
            return Ok(inspection);
        }

        self.check_creation(StageKind::PreInspection, &container, &jobs)?;
        let estimate = latest_approved_estimate(&jobs).ok_or_else(|| {
            DepotError::PreconditionNotMet {
                stage: StageKind::PreInspection,
                missing: "approved estimate to verify against".to_string(),
            }
        })?;
        let inspection = PreInspection::new(&container, estimate, created_by);
        self.store.put_job(inspection.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        self.emit(
            events::INSPECTION_CREATED,
            json!({
                "inspection_id": inspection.id,
                "container_number": inspection.container_number,
                "reopened": false,
            }),
        );
        Ok(inspection)
    }

    pub async fn start_pre_inspection(
        &self,
        inspection_id: Uuid,
        actor: &str,
    ) -> Result<PreInspection> {
        let (_guard, mut container, job) = self.lock_job(inspection_id).await?;
        let mut inspection = expect_pre_inspection(job, inspection_id)?;

        self.require_transition(
            StageKind::PreInspection,
            inspection.id,
            inspection.status,
            InspectionStatus::InProgress,
            inspection
                .status
                .can_transition_to(InspectionStatus::InProgress),
        )?;
        inspection.status = InspectionStatus::InProgress;
        self.store.put_job(inspection.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        debug!(inspection_id = %inspection.id, actor, "inspection started");
        Ok(inspection)
    }

    /// Record the inspector's verdicts and settle the inspection.
    ///
    /// Acceptance requires every damage-verification item to pass; the
    /// checklists are recorded but never block. A failed gate sends the
    /// container back to repair through the rework controller.
    #[instrument(skip(self, verdicts, general_checklist, cleaning_checklist), fields(inspection_id = %inspection_id))]
    pub async fn complete_pre_inspection(
        &self,
        inspection_id: Uuid,
        verdicts: &[ItemVerdict],
        general_checklist: Vec<ChecklistItem>,
        cleaning_checklist: Vec<ChecklistItem>,
        actor: &str,
    ) -> Result<PreInspection> {
        let (_guard, mut container, job) = self.lock_job(inspection_id).await?;
        let mut inspection = expect_pre_inspection(job, inspection_id)?;

        if inspection.status != InspectionStatus::InProgress {
            return Err(transition_error(
                StageKind::PreInspection,
                inspection.id,
                inspection.status,
                InspectionStatus::Completed,
            ));
        }

        for verdict in verdicts {
            let item = inspection
                .damage_item_results
                .iter_mut()
                .find(|item| item.item_id == verdict.item_id)
                .ok_or_else(|| DepotError::not_found("damage verification item", verdict.item_id))?;
            item.passed = Some(verdict.passed);
        }
        inspection.general_checklist = general_checklist;
        inspection.cleaning_checklist = cleaning_checklist;
        inspection.failed_checks = inspection
            .damage_item_results
            .iter()
            .filter(|item| item.passed != Some(true))
            .map(|item| item.description.clone())
            .collect();

        if inspection.damage_gate_passes() {
            inspection.status = InspectionStatus::Completed;
            inspection.result = InspectionResult::Accepted;
            inspection.completed_at = Some(Utc::now());
            inspection.completed_by = Some(actor.to_string());
            self.store.put_job(inspection.clone().into()).await?;
            self.refresh_status(&mut container).await?;

            info!("inspection accepted");
            self.emit(
                events::INSPECTION_ACCEPTED,
                json!({
                    "inspection_id": inspection.id,
                    "container_number": inspection.container_number,
                }),
            );
            return Ok(inspection);
        }

        let jobs = self.registry.jobs_for_container(&container).await?;
        let mut repair = latest_repair(&jobs)
            .cloned()
            .ok_or_else(|| DepotError::NotFound {
                entity: "repair order",
                id: container.container_number.clone(),
            })?;
        ReworkController::inspection_failed(&mut container, &mut inspection, &mut repair);
        self.store.put_job(inspection.clone().into()).await?;
        self.store.put_job(repair.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        info!(
            rework_count = inspection.rework_count,
            failed = inspection.failed_checks.len(),
            "inspection failed, repair reopened"
        );
        self.emit(
            events::INSPECTION_REWORK_REQUESTED,
            json!({
                "inspection_id": inspection.id,
                "container_number": inspection.container_number,
                "failed_checks": inspection.failed_checks,
                "rework_count": inspection.rework_count,
            }),
        );
        self.emit(
            events::REPAIR_REOPENED,
            json!({
                "repair_id": repair.id,
                "container_number": repair.container_number,
                "rework_count": repair.rework_count,
            }),
        );
        Ok(inspection)
    }

    // ---- stacking ----

    #[instrument(skip(self), fields(container_id = %container_id))]
    pub async fn create_stacking(
        &self,
        container_id: Uuid,
        target_location: YardLocation,
        created_by: &str,
    ) -> Result<StackingRequest> {
        let _guard = self.lock_container(container_id).await;
        let mut container = self.require_container(container_id).await?;
        let jobs = self.registry.jobs_for_container(&container).await?;
        self.check_creation(StageKind::Stacking, &container, &jobs)?;

        let transaction_id = latest_accepted_inspection(&jobs)
            .map(|inspection| inspection.transaction_id)
            .ok_or_else(|| DepotError::PreconditionNotMet {
                stage: StageKind::Stacking,
                missing: "pre-inspection with ACCEPTED result".to_string(),
            })?;
        let stacking =
            StackingRequest::new(&container, transaction_id, target_location, created_by);
        self.store.put_job(stacking.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        self.emit(
            events::STACKING_CREATED,
            json!({
                "stacking_id": stacking.id,
                "container_number": stacking.container_number,
                "target_location": stacking.target_location.to_string(),
            }),
        );
        Ok(stacking)
    }

    pub async fn start_stacking(&self, stacking_id: Uuid, actor: &str) -> Result<StackingRequest> {
        let (_guard, mut container, job) = self.lock_job(stacking_id).await?;
        let mut stacking = expect_stacking(job, stacking_id)?;

        self.require_transition(
            StageKind::Stacking,
            stacking.id,
            stacking.status,
            StackingStatus::InProgress,
            stacking.status.can_transition_to(StackingStatus::InProgress),
        )?;
        stacking.status = StackingStatus::InProgress;
        self.store.put_job(stacking.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        debug!(stacking_id = %stacking.id, actor, "stacking started");
        Ok(stacking)
    }

    /// Complete the final placement, issue the gate pass and release the
    /// container
    #[instrument(skip(self), fields(stacking_id = %stacking_id))]
    pub async fn complete_stacking(
        &self,
        stacking_id: Uuid,
        gate_pass_number: &str,
        actor: &str,
    ) -> Result<StackingRequest> {
        let (_guard, mut container, job) = self.lock_job(stacking_id).await?;
        let mut stacking = expect_stacking(job, stacking_id)?;

        self.require_transition(
            StageKind::Stacking,
            stacking.id,
            stacking.status,
            StackingStatus::Completed,
            stacking.status.can_transition_to(StackingStatus::Completed),
        )?;
        stacking.status = StackingStatus::Completed;
        stacking.gate_pass_number = Some(gate_pass_number.to_string());
        stacking.completed_at = Some(Utc::now());
        stacking.completed_by = Some(actor.to_string());
        self.store.put_job(stacking.clone().into()).await?;

        container.yard_location = Some(stacking.target_location.clone());
        self.refresh_status(&mut container).await?;

        self.emit(
            events::STACKING_COMPLETED,
            json!({
                "stacking_id": stacking.id,
                "container_number": stacking.container_number,
                "gate_pass_number": gate_pass_number,
            }),
        );
        Ok(stacking)
    }

    // ---- deletion ----

    /// Delete a stage job, rewinding the workflow by one stage. Only the
    /// most-advanced job on file may be deleted; the container status is
    /// re-derived afterwards.
    #[instrument(skip(self), fields(job_id = %job_id))]
    pub async fn delete_stage_job(&self, job_id: Uuid) -> Result<()> {
        let (_guard, mut container, job) = self.lock_job(job_id).await?;
        let jobs = self.registry.jobs_for_container(&container).await?;
        deletion_guard::check_deletable(&job, &jobs)?;

        self.store.delete_job(job_id).await?;
        self.refresh_status(&mut container).await?;

        info!(stage = %job.kind(), "stage job deleted");
        self.emit(
            events::JOB_DELETED,
            json!({
                "job_id": job_id,
                "stage": job.kind().to_string(),
                "container_number": job.container_number(),
                "container_status": container.status.to_string(),
            }),
        );
        Ok(())
    }

    // ---- internals ----

    fn lock_for(&self, container_id: Uuid) -> Arc<Mutex<()>> {
        self.container_locks
            .entry(container_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn lock_container(&self, container_id: Uuid) -> OwnedMutexGuard<()> {
        self.lock_for(container_id).lock_owned().await
    }

    /// Lock the owning container of a job, then reload both under the lock
    async fn lock_job(&self, job_id: Uuid) -> Result<(OwnedMutexGuard<()>, Container, StageJob)> {
        let job = self.require_job(job_id).await?;
        let container = self.container_for_job(&job).await?;
        let guard = self.lock_container(container.id).await;
        let container = self.require_container(container.id).await?;
        let job = self.require_job(job_id).await?;
        Ok((guard, container, job))
    }

    async fn require_container(&self, container_id: Uuid) -> Result<Container> {
        self.store
            .container(container_id)
            .await?
            .ok_or_else(|| DepotError::not_found("container", container_id))
    }

    async fn require_job(&self, job_id: Uuid) -> Result<StageJob> {
        self.store
            .job(job_id)
            .await?
            .ok_or_else(|| DepotError::not_found("stage job", job_id))
    }

    async fn container_for_job(&self, job: &StageJob) -> Result<Container> {
        if let Some(container_id) = job.container_id() {
            return self.require_container(container_id).await;
        }
        self.container_by_number(job.container_number()).await
    }

    fn check_creation(
        &self,
        kind: StageKind,
        container: &Container,
        jobs: &[StageJob],
    ) -> Result<()> {
        let guard = creation_guard(kind);
        guard
            .check(&GuardContext {
                container,
                jobs,
                config: &self.config,
            })
            .inspect_err(|error| {
                debug!(stage = %kind, guard = guard.description(), %error, "creation guard rejected");
            })
    }

    fn require_transition(
        &self,
        stage: StageKind,
        job_id: Uuid,
        from: impl fmt::Display,
        to: impl fmt::Display,
        allowed: bool,
    ) -> Result<()> {
        if allowed {
            Ok(())
        } else {
            Err(transition_error(stage, job_id, from, to))
        }
    }

    /// Re-derive the container status from the job set on file and persist
    /// the container. A gate-in PENDING_WASH holds until the repair workflow
    /// starts or the wash requirement is satisfied.
    async fn refresh_status(&self, container: &mut Container) -> Result<()> {
        let jobs = self.registry.jobs_for_container(container).await?;
        let resolved = status_resolver::resolve(&jobs);

        let next = if container.status == ContainerStatus::PendingWash
            && resolved == ContainerStatus::Stacking
            && !jobs
                .iter()
                .filter_map(StageJob::as_washing)
                .any(|washing| washing.status == WashingStatus::Completed)
        {
            ContainerStatus::PendingWash
        } else {
            resolved
        };

        if next != container.status {
            let previous = container.status;
            container.status = next;
            container.updated_at = Utc::now();
            debug!(
                container_number = %container.container_number,
                from = %previous,
                to = %next,
                "container status changed"
            );
            self.emit(
                events::CONTAINER_STATUS_CHANGED,
                json!({
                    "container_id": container.id,
                    "container_number": container.container_number,
                    "from": previous.to_string(),
                    "to": next.to_string(),
                }),
            );
        }
        self.store.put_container(container.clone()).await
    }

    fn emit(&self, event_name: &str, context: serde_json::Value) {
        self.events.publish(event_name, context);
    }

    async fn washing_transition(
        &self,
        washing_id: Uuid,
        to: WashingStatus,
        actor: &str,
    ) -> Result<WashingOrder> {
        let (_guard, mut container, job) = self.lock_job(washing_id).await?;
        let mut washing = expect_washing(job, washing_id)?;

        self.require_transition(
            StageKind::Washing,
            washing.id,
            washing.status,
            to,
            washing.status.can_transition_to(to),
        )?;
        washing.status = to;
        self.store.put_job(washing.clone().into()).await?;
        self.refresh_status(&mut container).await?;

        debug!(washing_id = %washing.id, status = %to, actor, "washing transitioned");
        Ok(washing)
    }
}

fn transition_error(
    stage: StageKind,
    job_id: Uuid,
    from: impl fmt::Display,
    to: impl fmt::Display,
) -> DepotError {
    DepotError::InvalidStateTransition {
        stage,
        job_id,
        from: from.to_string(),
        to: to.to_string(),
    }
}

fn expect_survey(job: StageJob, id: Uuid) -> Result<Survey> {
    match job {
        StageJob::Survey(survey) => Ok(survey),
        _ => Err(DepotError::not_found("survey", id)),
    }
}

fn expect_estimate(job: StageJob, id: Uuid) -> Result<EstimateOfRepair> {
    match job {
        StageJob::Estimate(estimate) => Ok(estimate),
        _ => Err(DepotError::not_found("estimate", id)),
    }
}

fn expect_shunting(job: StageJob, id: Uuid) -> Result<ShuntingRequest> {
    match job {
        StageJob::Shunting(shunting) => Ok(shunting),
        _ => Err(DepotError::not_found("shunting request", id)),
    }
}

fn expect_repair(job: StageJob, id: Uuid) -> Result<RepairOrder> {
    match job {
        StageJob::Repair(repair) => Ok(repair),
        _ => Err(DepotError::not_found("repair order", id)),
    }
}

fn expect_washing(job: StageJob, id: Uuid) -> Result<WashingOrder> {
    match job {
        StageJob::Washing(washing) => Ok(washing),
        _ => Err(DepotError::not_found("washing order", id)),
    }
}

fn expect_pre_inspection(job: StageJob, id: Uuid) -> Result<PreInspection> {
    match job {
        StageJob::PreInspection(inspection) => Ok(inspection),
        _ => Err(DepotError::not_found("pre-inspection", id)),
    }
}

fn expect_stacking(job: StageJob, id: Uuid) -> Result<StackingRequest> {
    match job {
        StageJob::Stacking(stacking) => Ok(stacking),
        _ => Err(DepotError::not_found("stacking request", id)),
    }
}

fn latest_qualifying_survey(jobs: &[StageJob]) -> Option<&Survey> {
    jobs.iter()
        .filter_map(StageJob::as_survey)
        .filter(|survey| {
            survey.status.is_settled()
                && survey.initial_condition == Some(InitialCondition::Damaged)
        })
        .last()
}

fn latest_survey(jobs: &[StageJob]) -> Option<&Survey> {
    jobs.iter().filter_map(StageJob::as_survey).last()
}

fn latest_approved_estimate(jobs: &[StageJob]) -> Option<&EstimateOfRepair> {
    jobs.iter()
        .filter_map(StageJob::as_estimate)
        .filter(|estimate| estimate.status.is_approved())
        .last()
}

fn latest_repair(jobs: &[StageJob]) -> Option<&RepairOrder> {
    jobs.iter().filter_map(StageJob::as_repair).last()
}

fn latest_accepted_inspection(jobs: &[StageJob]) -> Option<&PreInspection> {
    jobs.iter()
        .filter_map(StageJob::as_pre_inspection)
        .filter(|inspection| inspection.result == InspectionResult::Accepted)
        .last()
}

fn pending_rework_inspection(jobs: &[StageJob]) -> Option<&PreInspection> {
    jobs.iter()
        .filter_map(StageJob::as_pre_inspection)
        .find(|inspection| inspection.status == InspectionStatus::PendingRework)
}
