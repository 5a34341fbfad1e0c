//! Claim submission saga
//!
//! Runs the four remote calls of a claim submission strictly in order:
//!
//! 1. create the claim in the claim store (REST)
//! 2. verify the customer's identity (SOAP)
//! 3. validate the policy for the claim type (GraphQL)
//! 4. score fraud for the created claim id (gRPC)
//!
//! Each step needs the previous one to have succeeded: step 4 uses the id
//! returned by step 1. The saga stops at the first failure and returns what it
//! completed so far. Nothing is retried or compensated, so a claim created by
//! step 1 stays in the store when a later step fails.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};

use core_kernel::{AdapterError, ClaimId, ErrorCategory};

use crate::claim::ClaimIntake;
use crate::error::ClaimError;
use crate::ports::{
    ClaimStorePort, FraudCheck, FraudPort, IdentityCheck, IdentityPort, PolicyCheck, PolicyPort,
};

/// The four steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SagaStepName {
    Claim,
    Identity,
    Policy,
    Fraud,
}

impl SagaStepName {
    pub const ALL: [SagaStepName; 4] = [
        SagaStepName::Claim,
        SagaStepName::Identity,
        SagaStepName::Policy,
        SagaStepName::Fraud,
    ];

    /// One-based position in the saga
    pub fn position(&self) -> usize {
        *self as usize + 1
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SagaStepName::Claim => "claim",
            SagaStepName::Identity => "identity",
            SagaStepName::Policy => "policy",
            SagaStepName::Fraud => "fraud",
        }
    }
}

impl fmt::Display for SagaStepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when a backend answers but refuses the claim
///
/// A refused identity (`verified = false`) or policy (`valid`/`covered` false)
/// is not a transport or protocol failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionPolicy {
    /// Stop the saga at the refusing step
    #[default]
    Halt,
    /// Record the refusal on the step and carry on
    Continue,
}

/// Why a step failed
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SagaError {
    #[error(transparent)]
    Adapter(AdapterError),

    #[error("rejected: {reason}")]
    Rejected { reason: String },
}

impl SagaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SagaError::Adapter(error) => error.category(),
            SagaError::Rejected { .. } => ErrorCategory::ValidationRejected,
        }
    }
}

impl From<AdapterError> for SagaError {
    fn from(error: AdapterError) -> Self {
        SagaError::Adapter(error)
    }
}

/// A successfully completed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SagaStep {
    pub name: SagaStepName,
    pub request: Value,
    pub response: Value,
    /// Set when the backend refused the claim and the saga carried on anyway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
}

/// The step the saga stopped at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SagaFailure {
    pub step: SagaStepName,
    pub request: Value,
    pub error: SagaError,
}

/// Outcome of one saga run
///
/// `steps` only ever holds steps that completed before the failure, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SagaResult {
    pub steps: Vec<SagaStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<SagaFailure>,
}

impl SagaResult {
    pub fn ok(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failing_step(&self) -> Option<SagaStepName> {
        self.failure.as_ref().map(|failure| failure.step)
    }

    pub fn error(&self) -> Option<&SagaError> {
        self.failure.as_ref().map(|failure| &failure.error)
    }

    /// Response recorded for a completed step
    pub fn response(&self, name: SagaStepName) -> Option<&Value> {
        self.steps
            .iter()
            .find(|step| step.name == name)
            .map(|step| &step.response)
    }

    /// Id of the claim created by the first step, if it completed
    pub fn claim_id(&self) -> Option<ClaimId> {
        self.response(SagaStepName::Claim)
            .and_then(|claim| claim.get("id"))
            .and_then(Value::as_str)
            .map(ClaimId::from)
    }
}

/// Sequences the claim store, identity, policy and fraud ports
#[derive(Clone)]
pub struct SagaOrchestrator {
    claims: Arc<dyn ClaimStorePort>,
    identity: Arc<dyn IdentityPort>,
    policy: Arc<dyn PolicyPort>,
    fraud: Arc<dyn FraudPort>,
    rejection_policy: RejectionPolicy,
}

impl SagaOrchestrator {
    pub fn new(
        claims: Arc<dyn ClaimStorePort>,
        identity: Arc<dyn IdentityPort>,
        policy: Arc<dyn PolicyPort>,
        fraud: Arc<dyn FraudPort>,
    ) -> Self {
        Self {
            claims,
            identity,
            policy,
            fraud,
            rejection_policy: RejectionPolicy::default(),
        }
    }

    pub fn with_rejection_policy(mut self, policy: RejectionPolicy) -> Self {
        self.rejection_policy = policy;
        self
    }

    pub fn rejection_policy(&self) -> RejectionPolicy {
        self.rejection_policy
    }

    /// Runs the saga for one claim submission
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::InvalidInput`] when the intake fails local
    /// validation; no remote call is made in that case. Remote failures are
    /// not errors of this method: they are reported inside the returned
    /// [`SagaResult`].
    pub async fn run(&self, intake: &ClaimIntake) -> Result<SagaResult, ClaimError> {
        intake.validate()?;

        let span = info_span!(
            "claim_saga",
            customer_id = %intake.customer_id,
            policy_number = %intake.policy_number,
            claim_type = %intake.claim_type,
        );
        Ok(self.execute(intake).instrument(span).await)
    }

    async fn execute(&self, intake: &ClaimIntake) -> SagaResult {
        let mut steps = Vec::with_capacity(SagaStepName::ALL.len());

        let request = to_json(intake);
        let claim = match self.claims.create_claim(intake).await {
            Ok(claim) => claim,
            Err(error) => return halt(steps, SagaStepName::Claim, request, error.into()),
        };
        info!(claim_id = %claim.id, "claim created");
        steps.push(completed(SagaStepName::Claim, request, to_json(&claim), None));

        let check = IdentityCheck::from(intake);
        let request = to_json(&check);
        let verification = match self.identity.verify_identity(&check).await {
            Ok(verification) => verification,
            Err(error) => return halt(steps, SagaStepName::Identity, request, error.into()),
        };
        let refusal = (!verification.verified).then(|| refusal_reason(&verification.reason, "identity not verified"));
        if let Err(failure) = self.settle(&mut steps, SagaStepName::Identity, request, to_json(&verification), refusal) {
            return failure;
        }

        let check = PolicyCheck::from(intake);
        let request = to_json(&check);
        let validation = match self.policy.validate_policy(&check).await {
            Ok(validation) => validation,
            Err(error) => return halt(steps, SagaStepName::Policy, request, error.into()),
        };
        let refusal = (!validation.accepts()).then(|| {
            refusal_reason(
                validation.message.as_deref().unwrap_or_default(),
                if validation.valid { "claim type not covered" } else { "policy invalid" },
            )
        });
        if let Err(failure) = self.settle(&mut steps, SagaStepName::Policy, request, to_json(&validation), refusal) {
            return failure;
        }

        let check = FraudCheck::for_claim(claim.id.clone(), intake);
        let request = to_json(&check);
        let assessment = match self.fraud.score_fraud(&check).await {
            Ok(assessment) => assessment,
            Err(error) => return halt(steps, SagaStepName::Fraud, request, error.into()),
        };
        info!(claim_id = %claim.id, risk = %assessment.risk, score = assessment.score, "fraud scored");
        steps.push(completed(SagaStepName::Fraud, request, to_json(&assessment), None));

        info!(claim_id = %claim.id, "claim saga completed");
        SagaResult {
            steps,
            failure: None,
        }
    }

    /// Records a step that answered, halting on a refusal when configured to
    fn settle(
        &self,
        steps: &mut Vec<SagaStep>,
        name: SagaStepName,
        request: Value,
        response: Value,
        refusal: Option<String>,
    ) -> Result<(), SagaResult> {
        match refusal {
            Some(reason) if self.rejection_policy == RejectionPolicy::Halt => Err(halt(
                std::mem::take(steps),
                name,
                request,
                SagaError::Rejected { reason },
            )),
            Some(reason) => {
                warn!(step = %name, %reason, "step refused the claim, continuing");
                steps.push(completed(name, request, response, Some(reason)));
                Ok(())
            }
            None => {
                info!(step = %name, "step completed");
                steps.push(completed(name, request, response, None));
                Ok(())
            }
        }
    }
}

fn completed(name: SagaStepName, request: Value, response: Value, rejection: Option<String>) -> SagaStep {
    SagaStep {
        name,
        request,
        response,
        rejection,
    }
}

fn halt(steps: Vec<SagaStep>, step: SagaStepName, request: Value, error: SagaError) -> SagaResult {
    warn!(
        step = %step,
        position = step.position(),
        category = %error.category(),
        error = %error,
        "claim saga halted"
    );
    SagaResult {
        steps,
        failure: Some(SagaFailure { step, request, error }),
    }
}

fn refusal_reason(reported: &str, fallback: &str) -> String {
    if reported.trim().is_empty() {
        fallback.to_string()
    } else {
        reported.to_string()
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    // Every payload type here is plain data with string keys.
    serde_json::to_value(value).unwrap_or(Value::Null)
}
