//! Claims Domain Ports
//!
//! This module defines the port interfaces to the five external collaborators
//! of the claims portal. Each is implemented over its own transport in
//! `infra_protocols`, and by in-memory fakes in `test_utils`.
//!
//! | Port              | Collaborator              | Transport |
//! |-------------------|---------------------------|-----------|
//! | `ClaimStorePort`  | claim store               | REST      |
//! | `IdentityPort`    | identity verifier         | SOAP      |
//! | `PolicyPort`      | policy validator          | GraphQL   |
//! | `FraudPort`       | fraud scorer              | gRPC      |
//! | `WorkflowPort`    | workflow / task engine    | REST      |
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::ports::ClaimStorePort;
//! use std::sync::Arc;
//!
//! pub struct ClaimViewer {
//!     claims: Arc<dyn ClaimStorePort>,
//! }
//!
//! impl ClaimViewer {
//!     pub async fn history(&self, id: &ClaimId) -> Result<Vec<ClaimEvent>, AdapterError> {
//!         self.claims.history(id).await
//!     }
//! }
//! ```

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{AdapterError, ClaimId, DomainPort, ProcessInstanceId, TaskId};

use crate::claim::{Claim, ClaimEvent, ClaimIntake, ClaimType, StatusUpdate};
use crate::workflow::{TaskVariables, WorkflowStartRequest, WorkflowStarted, WorkflowState, WorkflowTask};

/// Port to the claim store
#[async_trait]
pub trait ClaimStorePort: DomainPort {
    /// Persists a new claim and returns it with its assigned id
    async fn create_claim(&self, intake: &ClaimIntake) -> Result<Claim, AdapterError>;

    async fn get_claim(&self, id: &ClaimId) -> Result<Claim, AdapterError>;

    /// The claim's history in the order the store delivers it
    async fn history(&self, id: &ClaimId) -> Result<Vec<ClaimEvent>, AdapterError>;

    async fn list_claims(&self) -> Result<Vec<Claim>, AdapterError>;

    async fn delete_claim(&self, id: &ClaimId) -> Result<(), AdapterError>;

    /// Sets the status and appends a history event
    async fn update_status(&self, id: &ClaimId, update: &StatusUpdate) -> Result<Claim, AdapterError>;
}

/// Input of the identity verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityCheck {
    pub customer_id: String,
    pub full_name: String,
    pub policy_number: String,
}

impl From<&ClaimIntake> for IdentityCheck {
    fn from(intake: &ClaimIntake) -> Self {
        Self {
            customer_id: intake.customer_id.clone(),
            full_name: intake.full_name.clone(),
            policy_number: intake.policy_number.clone(),
        }
    }
}

/// Answer of the identity verifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityVerification {
    pub verified: bool,
    #[serde(default)]
    pub reason: String,
}

/// Port to the identity verifier
#[async_trait]
pub trait IdentityPort: DomainPort {
    async fn verify_identity(&self, check: &IdentityCheck) -> Result<IdentityVerification, AdapterError>;
}

/// Input of the policy validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyCheck {
    pub policy_number: String,
    pub claim_type: ClaimType,
}

impl From<&ClaimIntake> for PolicyCheck {
    fn from(intake: &ClaimIntake) -> Self {
        Self {
            policy_number: intake.policy_number.clone(),
            claim_type: intake.claim_type,
        }
    }
}

/// Answer of the policy validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyValidation {
    pub valid: bool,
    pub covered: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl PolicyValidation {
    /// True when the policy is both valid and covers the claim type
    pub fn accepts(&self) -> bool {
        self.valid && self.covered
    }
}

/// Port to the policy validator
#[async_trait]
pub trait PolicyPort: DomainPort {
    async fn validate_policy(&self, check: &PolicyCheck) -> Result<PolicyValidation, AdapterError>;
}

/// Input of the fraud scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudCheck {
    pub claim_id: ClaimId,
    pub policy_number: String,
    pub claim_type: ClaimType,
    #[serde(with = "rust_decimal::serde::float")]
    pub claimed_amount: Decimal,
}

impl FraudCheck {
    pub fn for_claim(claim_id: ClaimId, intake: &ClaimIntake) -> Self {
        Self {
            claim_id,
            policy_number: intake.policy_number.clone(),
            claim_type: intake.claim_type,
            claimed_amount: intake.claimed_amount,
        }
    }
}

/// Risk assessment returned by the fraud scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudAssessment {
    /// `LOW`, `MEDIUM` or `HIGH`
    pub risk: String,
    pub score: f64,
    #[serde(default)]
    pub explanation: String,
}

/// Port to the fraud scorer
#[async_trait]
pub trait FraudPort: DomainPort {
    async fn score_fraud(&self, check: &FraudCheck) -> Result<FraudAssessment, AdapterError>;
}

/// Port to the workflow / task engine
#[async_trait]
pub trait WorkflowPort: DomainPort {
    async fn start(&self, request: &WorkflowStartRequest) -> Result<WorkflowStarted, AdapterError>;

    async fn state(&self, claim_id: &ClaimId) -> Result<WorkflowState, AdapterError>;

    async fn tasks_for_claim(&self, claim_id: &ClaimId) -> Result<Vec<WorkflowTask>, AdapterError>;

    async fn tasks_for_instance(
        &self,
        instance_id: &ProcessInstanceId,
    ) -> Result<Vec<WorkflowTask>, AdapterError>;

    async fn complete_task(&self, task_id: &TaskId, variables: &TaskVariables) -> Result<(), AdapterError>;
}
