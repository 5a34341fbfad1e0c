//! In-memory Port Fakes
//!
//! Stand-ins for the five backend ports. Each fake counts its calls so tests
//! can assert that a step was, or was not, reached.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use core_kernel::{AdapterError, ClaimId, DomainPort, ProcessInstanceId, TaskId};
use domain_claims::claim::{Claim, ClaimEvent, ClaimIntake, StatusUpdate};
use domain_claims::ports::{
    ClaimStorePort, FraudAssessment, FraudCheck, FraudPort, IdentityCheck, IdentityPort,
    IdentityVerification, PolicyCheck, PolicyPort, PolicyValidation, WorkflowPort,
};
use domain_claims::workflow::{TaskVariables, WorkflowStartRequest, WorkflowStarted, WorkflowState, WorkflowTask};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fixed answer plus a record of what was asked
struct Scripted<Req, Resp> {
    outcome: Mutex<Result<Resp, AdapterError>>,
    calls: AtomicUsize,
    last: Mutex<Option<Req>>,
}

impl<Req: Clone, Resp: Clone> Scripted<Req, Resp> {
    fn new(outcome: Result<Resp, AdapterError>) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    fn answer(&self, request: &Req) -> Result<Resp, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last) = Some(request.clone());
        lock(&self.outcome).clone()
    }

    fn set(&self, outcome: Result<Resp, AdapterError>) {
        *lock(&self.outcome) = outcome;
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last(&self) -> Option<Req> {
        lock(&self.last).clone()
    }
}

// ============================================================================
// Claim store
// ============================================================================

/// Claim store keeping claims in insertion order, ids `CLM-1`, `CLM-2`, ...
#[derive(Default)]
pub struct InMemoryClaimStore {
    claims: Mutex<Vec<Claim>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    failure: Mutex<Option<AdapterError>>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with `error`
    pub fn failing(error: AdapterError) -> Self {
        let store = Self::new();
        store.fail_with(Some(error));
        store
    }

    pub fn fail_with(&self, error: Option<AdapterError>) {
        *lock(&self.failure) = error;
    }

    /// Inserts or replaces a claim
    pub fn seed(&self, claim: Claim) {
        let mut claims = lock(&self.claims);
        claims.retain(|existing| existing.id != claim.id);
        claims.push(claim);
    }

    pub fn set_history(&self, id: &ClaimId, history: Vec<ClaimEvent>) {
        if let Some(claim) = lock(&self.claims).iter_mut().find(|claim| &claim.id == id) {
            claim.history = history;
        }
    }

    pub fn set_status(&self, id: &ClaimId, status: &str) {
        if let Some(claim) = lock(&self.claims).iter_mut().find(|claim| &claim.id == id) {
            claim.status = status.to_string();
        }
    }

    pub fn stored(&self, id: &ClaimId) -> Option<Claim> {
        lock(&self.claims).iter().find(|claim| &claim.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.claims).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match lock(&self.failure).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn find(&self, id: &ClaimId) -> Result<Claim, AdapterError> {
        self.stored(id)
            .ok_or_else(|| AdapterError::protocol(format!("HTTP 404: claim {id} not found")))
    }
}

impl DomainPort for InMemoryClaimStore {}

#[async_trait]
impl ClaimStorePort for InMemoryClaimStore {
    async fn create_claim(&self, intake: &ClaimIntake) -> Result<Claim, AdapterError> {
        self.enter()?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let claim = Claim {
            id: ClaimId::new(format!("CLM-{n}")),
            customer_id: intake.customer_id.clone(),
            full_name: intake.full_name.clone(),
            policy_number: intake.policy_number.clone(),
            claim_type: intake.claim_type,
            claimed_amount: intake.claimed_amount,
            description: intake.description.clone(),
            status: "SUBMITTED".to_string(),
            created_at: now,
            history: vec![ClaimEvent::new(now, "SUBMITTED", "Claim submitted")],
        };
        lock(&self.claims).push(claim.clone());
        Ok(claim)
    }

    async fn get_claim(&self, id: &ClaimId) -> Result<Claim, AdapterError> {
        self.enter()?;
        self.find(id)
    }

    async fn history(&self, id: &ClaimId) -> Result<Vec<ClaimEvent>, AdapterError> {
        self.enter()?;
        self.find(id).map(|claim| claim.history)
    }

    async fn list_claims(&self) -> Result<Vec<Claim>, AdapterError> {
        self.enter()?;
        Ok(lock(&self.claims).clone())
    }

    async fn delete_claim(&self, id: &ClaimId) -> Result<(), AdapterError> {
        self.enter()?;
        self.find(id)?;
        lock(&self.claims).retain(|claim| &claim.id != id);
        Ok(())
    }

    async fn update_status(&self, id: &ClaimId, update: &StatusUpdate) -> Result<Claim, AdapterError> {
        self.enter()?;
        let mut claims = lock(&self.claims);
        let claim = claims
            .iter_mut()
            .find(|claim| &claim.id == id)
            .ok_or_else(|| AdapterError::protocol(format!("HTTP 404: claim {id} not found")))?;
        claim.status = update.status.as_str().to_string();
        claim
            .history
            .push(ClaimEvent::new(Utc::now(), update.status.as_str(), update.message.clone()));
        Ok(claim.clone())
    }
}

// ============================================================================
// Identity, policy and fraud
// ============================================================================

/// Identity verifier with a fixed answer
pub struct StubIdentityVerifier {
    script: Scripted<IdentityCheck, IdentityVerification>,
}

impl StubIdentityVerifier {
    pub fn verified() -> Self {
        Self::answering(IdentityVerification {
            verified: true,
            reason: "IDENTITY_VERIFIED".to_string(),
        })
    }

    pub fn refused(reason: &str) -> Self {
        Self::answering(IdentityVerification {
            verified: false,
            reason: reason.to_string(),
        })
    }

    pub fn answering(verification: IdentityVerification) -> Self {
        Self {
            script: Scripted::new(Ok(verification)),
        }
    }

    pub fn failing(error: AdapterError) -> Self {
        Self {
            script: Scripted::new(Err(error)),
        }
    }

    pub fn set_outcome(&self, outcome: Result<IdentityVerification, AdapterError>) {
        self.script.set(outcome);
    }

    pub fn calls(&self) -> usize {
        self.script.calls()
    }

    pub fn last_check(&self) -> Option<IdentityCheck> {
        self.script.last()
    }
}

impl DomainPort for StubIdentityVerifier {}

#[async_trait]
impl IdentityPort for StubIdentityVerifier {
    async fn verify_identity(&self, check: &IdentityCheck) -> Result<IdentityVerification, AdapterError> {
        self.script.answer(check)
    }
}

/// Policy validator with a fixed answer
pub struct StubPolicyValidator {
    script: Scripted<PolicyCheck, PolicyValidation>,
}

impl StubPolicyValidator {
    pub fn accepting() -> Self {
        Self::answering(PolicyValidation {
            valid: true,
            covered: true,
            message: Some("POLICY_VALID".to_string()),
        })
    }

    pub fn invalid() -> Self {
        Self::answering(PolicyValidation {
            valid: false,
            covered: false,
            message: Some("POLICY_INVALID".to_string()),
        })
    }

    pub fn not_covered() -> Self {
        Self::answering(PolicyValidation {
            valid: true,
            covered: false,
            message: None,
        })
    }

    pub fn answering(validation: PolicyValidation) -> Self {
        Self {
            script: Scripted::new(Ok(validation)),
        }
    }

    pub fn failing(error: AdapterError) -> Self {
        Self {
            script: Scripted::new(Err(error)),
        }
    }

    pub fn calls(&self) -> usize {
        self.script.calls()
    }

    pub fn last_check(&self) -> Option<PolicyCheck> {
        self.script.last()
    }
}

impl DomainPort for StubPolicyValidator {}

#[async_trait]
impl PolicyPort for StubPolicyValidator {
    async fn validate_policy(&self, check: &PolicyCheck) -> Result<PolicyValidation, AdapterError> {
        self.script.answer(check)
    }
}

/// Fraud scorer with a fixed answer
pub struct StubFraudScorer {
    script: Scripted<FraudCheck, FraudAssessment>,
}

impl StubFraudScorer {
    pub fn low() -> Self {
        Self::scoring("LOW", 0.12)
    }

    pub fn scoring(risk: &str, score: f64) -> Self {
        Self {
            script: Scripted::new(Ok(FraudAssessment {
                risk: risk.to_string(),
                score,
                explanation: format!("risk {risk}"),
            })),
        }
    }

    pub fn failing(error: AdapterError) -> Self {
        Self {
            script: Scripted::new(Err(error)),
        }
    }

    pub fn calls(&self) -> usize {
        self.script.calls()
    }

    pub fn last_check(&self) -> Option<FraudCheck> {
        self.script.last()
    }
}

impl DomainPort for StubFraudScorer {}

#[async_trait]
impl FraudPort for StubFraudScorer {
    async fn score_fraud(&self, check: &FraudCheck) -> Result<FraudAssessment, AdapterError> {
        self.script.answer(check)
    }
}

// ============================================================================
// Workflow engine
// ============================================================================

/// Workflow engine whose state is set by the test
pub struct StubWorkflowEngine {
    state: Mutex<WorkflowState>,
    tasks: Mutex<Vec<WorkflowTask>>,
    completed: Mutex<Vec<(TaskId, TaskVariables)>>,
    failure: Mutex<Option<AdapterError>>,
    calls: AtomicUsize,
}

impl StubWorkflowEngine {
    pub fn new(state: WorkflowState) -> Self {
        Self {
            state: Mutex::new(state),
            tasks: Mutex::new(Vec::new()),
            completed: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_tasks(self, tasks: Vec<WorkflowTask>) -> Self {
        *lock(&self.tasks) = tasks;
        self
    }

    pub fn set_state(&self, state: WorkflowState) {
        *lock(&self.state) = state;
    }

    pub fn fail_with(&self, error: Option<AdapterError>) {
        *lock(&self.failure) = error;
    }

    /// Tasks completed so far, with the variables they were completed with
    pub fn completed(&self) -> Vec<(TaskId, TaskVariables)> {
        lock(&self.completed).clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match lock(&self.failure).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl DomainPort for StubWorkflowEngine {}

#[async_trait]
impl WorkflowPort for StubWorkflowEngine {
    async fn start(&self, _request: &WorkflowStartRequest) -> Result<WorkflowStarted, AdapterError> {
        self.enter()?;
        let state = lock(&self.state).clone();
        Ok(WorkflowStarted {
            process_instance_id: state
                .process_instance_id
                .unwrap_or_else(|| ProcessInstanceId::new("PI-1")),
            business_key: state.claim_id,
        })
    }

    async fn state(&self, claim_id: &ClaimId) -> Result<WorkflowState, AdapterError> {
        self.enter()?;
        let state = lock(&self.state).clone();
        if &state.claim_id != claim_id {
            return Err(AdapterError::protocol(format!(
                "HTTP 404: no process for claim {claim_id}"
            )));
        }
        Ok(state)
    }

    async fn tasks_for_claim(&self, _claim_id: &ClaimId) -> Result<Vec<WorkflowTask>, AdapterError> {
        self.enter()?;
        Ok(lock(&self.tasks).clone())
    }

    async fn tasks_for_instance(
        &self,
        _instance_id: &ProcessInstanceId,
    ) -> Result<Vec<WorkflowTask>, AdapterError> {
        self.enter()?;
        Ok(lock(&self.tasks).clone())
    }

    async fn complete_task(&self, task_id: &TaskId, variables: &TaskVariables) -> Result<(), AdapterError> {
        self.enter()?;
        let mut tasks = lock(&self.tasks);
        let before = tasks.len();
        tasks.retain(|task| &task.id != task_id);
        if tasks.len() == before {
            return Err(AdapterError::protocol(format!("HTTP 404: task {task_id} not found")));
        }
        lock(&self.completed).push((task_id.clone(), variables.clone()));
        Ok(())
    }
}
