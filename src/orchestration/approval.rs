//! # Approval Policy
//!
//! Cost-threshold auto-approval and role-gated manual decisions for repair
//! estimates. All permission checks funnel through one predicate seam so the
//! host's authentication layer stays outside the engine.

use crate::constants::{actions, screens};
use crate::error::{DepotError, Result};
use crate::models::EstimateOfRepair;
use serde::{Deserialize, Serialize};

/// Manual decision on a pending/sent estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

impl ApprovalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// Outcome of the creation-time policy check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Cost at or under the threshold: approved immediately
    AutoApproved,
    /// Over threshold: a manual decision is required
    RequiresApproval,
}

/// Whether an actor belongs to depot staff or to a shipping line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Internal,
    External,
}

/// The acting user, as handed in by the host's session layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub kind: ActorKind,
    /// External actors are bound to exactly one liner
    pub liner: Option<String>,
}

impl Actor {
    pub fn internal(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ActorKind::Internal,
            liner: None,
        }
    }

    pub fn external(id: impl Into<String>, liner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ActorKind::External,
            liner: Some(liner.into()),
        }
    }
}

/// Capability predicate supplied by the host application
pub trait PermissionCheck: Send + Sync {
    fn has_capability(&self, actor: &Actor, screen: &str, action: &str) -> bool;
}

/// Permissive predicate for tests and trusted embedders
pub struct AllowAll;

impl PermissionCheck for AllowAll {
    fn has_capability(&self, _actor: &Actor, _screen: &str, _action: &str) -> bool {
        true
    }
}

/// The estimate approval policy
#[derive(Debug, Clone)]
pub struct ApprovalPolicy {
    threshold: f64,
}

impl ApprovalPolicy {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Creation-time decision: estimates at or under the threshold are
    /// auto-approved
    pub fn decide(&self, total_cost: f64) -> ApprovalOutcome {
        if total_cost <= self.threshold {
            ApprovalOutcome::AutoApproved
        } else {
            ApprovalOutcome::RequiresApproval
        }
    }

    /// Check that `actor` may apply `action` to `estimate`.
    ///
    /// Internal staff need the `approve` capability for the estimate screen
    /// (one capability covers both decisions); external actors must be bound
    /// to the estimate's liner. The error names the decision that was
    /// attempted.
    pub fn authorize(
        &self,
        estimate: &EstimateOfRepair,
        actor: &Actor,
        action: ApprovalAction,
        permissions: &dyn PermissionCheck,
    ) -> Result<()> {
        let allowed = match actor.kind {
            ActorKind::Internal => {
                permissions.has_capability(actor, screens::ESTIMATE_OF_REPAIR, actions::APPROVE)
            }
            ActorKind::External => actor.liner.as_deref() == Some(estimate.liner.as_str()),
        };

        if allowed {
            Ok(())
        } else {
            Err(DepotError::PermissionDenied {
                actor: actor.id.clone(),
                screen: screens::ESTIMATE_OF_REPAIR.to_string(),
                action: action.as_str().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Container, RepairItem, Survey};

    /// Predicate that denies everything
    struct DenyAll;

    impl PermissionCheck for DenyAll {
        fn has_capability(&self, _actor: &Actor, _screen: &str, _action: &str) -> bool {
            false
        }
    }

    fn estimate_for_liner(liner: &str) -> EstimateOfRepair {
        let container = Container::new("MSCU2224446", liner, "20GP", None);
        let survey = Survey::new(&container, "surveyor-1");
        EstimateOfRepair::new(
            &container,
            &survey,
            vec![RepairItem::new("straighten rail", 300.0)],
            "estimator-1",
        )
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let policy = ApprovalPolicy::new(100.0);
        assert_eq!(policy.decide(99.99), ApprovalOutcome::AutoApproved);
        assert_eq!(policy.decide(100.0), ApprovalOutcome::AutoApproved);
        assert_eq!(policy.decide(100.01), ApprovalOutcome::RequiresApproval);
    }

    #[test]
    fn internal_actor_needs_capability() {
        let policy = ApprovalPolicy::new(100.0);
        let estimate = estimate_for_liner("MSC");
        let staff = Actor::internal("staff-1");

        assert!(policy
            .authorize(&estimate, &staff, ApprovalAction::Approve, &AllowAll)
            .is_ok());
        let err = policy
            .authorize(&estimate, &staff, ApprovalAction::Approve, &DenyAll)
            .unwrap_err();
        assert!(matches!(err, DepotError::PermissionDenied { .. }));
    }

    #[test]
    fn external_actor_is_liner_scoped() {
        let policy = ApprovalPolicy::new(100.0);
        let estimate = estimate_for_liner("MSC");

        let same_liner = Actor::external("agent-1", "MSC");
        assert!(policy
            .authorize(&estimate, &same_liner, ApprovalAction::Approve, &DenyAll)
            .is_ok());

        let other_liner = Actor::external("agent-2", "CMA");
        let err = policy
            .authorize(&estimate, &other_liner, ApprovalAction::Approve, &AllowAll)
            .unwrap_err();
        assert!(matches!(err, DepotError::PermissionDenied { .. }));
    }

    #[test]
    fn denied_rejection_reports_the_attempted_action() {
        let policy = ApprovalPolicy::new(100.0);
        let estimate = estimate_for_liner("MSC");

        let err = policy
            .authorize(
                &estimate,
                &Actor::internal("staff-1"),
                ApprovalAction::Reject,
                &DenyAll,
            )
            .unwrap_err();
        match err {
            DepotError::PermissionDenied { action, .. } => assert_eq!(action, "reject"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
