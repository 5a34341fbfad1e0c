//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for claims, history events and workflow
//! state. These fixtures are deterministic so assertions can name exact values.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, ProcessInstanceId, TaskId};
use domain_claims::claim::{Claim, ClaimEvent, ClaimIntake, ClaimType};
use domain_claims::workflow::{WorkflowRunState, WorkflowState, WorkflowTask, DOCS_ACTIVITY, EXPERT_ACTIVITY};

/// Fixture for claim intake and claim records
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// A valid accident claim
    pub fn intake() -> ClaimIntake {
        ClaimIntake {
            customer_id: "CUST-001".to_string(),
            full_name: "Jane Doe".to_string(),
            policy_number: "POL-1001".to_string(),
            claim_type: ClaimType::Accident,
            claimed_amount: dec!(2500.00),
            description: "Rear-end collision at a traffic light".to_string(),
        }
    }

    /// A claim record as the store would return it after creation
    pub fn claim(id: &str) -> Claim {
        let intake = Self::intake();
        Claim {
            id: ClaimId::new(id),
            customer_id: intake.customer_id,
            full_name: intake.full_name,
            policy_number: intake.policy_number,
            claim_type: intake.claim_type,
            claimed_amount: intake.claimed_amount,
            description: intake.description,
            status: "SUBMITTED".to_string(),
            created_at: TimeFixtures::submitted_at(),
            history: vec![EventFixtures::submitted()],
        }
    }
}

/// Fixture for timestamps
pub struct TimeFixtures;

impl TimeFixtures {
    /// Submission time of the fixture claim
    pub fn submitted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0)
            .single()
            .unwrap_or_default()
    }

    /// `minutes` after submission
    pub fn after(minutes: i64) -> DateTime<Utc> {
        Self::submitted_at() + Duration::minutes(minutes)
    }
}

/// Fixture for history events
pub struct EventFixtures;

impl EventFixtures {
    pub fn submitted() -> ClaimEvent {
        ClaimEvent::new(TimeFixtures::submitted_at(), "SUBMITTED", "Claim submitted")
    }

    /// Builds a history from `(status, message)` pairs, one minute apart
    pub fn history(entries: &[(&str, &str)]) -> Vec<ClaimEvent> {
        entries
            .iter()
            .enumerate()
            .map(|(i, (status, message))| ClaimEvent::new(TimeFixtures::after(i as i64), *status, *message))
            .collect()
    }

    /// History of a claim that passed the automated checks
    pub fn through_fraud() -> Vec<ClaimEvent> {
        Self::history(&[
            ("SUBMITTED", "Claim submitted"),
            ("IDENTITY_VERIFIED", "SOAP identity check passed"),
            ("POLICY_VALID", "GraphQL policy covers ACCIDENT"),
            ("FRAUD_LOW", "gRPC risk LOW"),
        ])
    }
}

/// Fixture for workflow engine state
pub struct WorkflowFixtures;

impl WorkflowFixtures {
    pub fn running(claim_id: &str, activity: &str) -> WorkflowState {
        WorkflowState {
            process_instance_id: Some(ProcessInstanceId::new("PI-1")),
            claim_id: ClaimId::new(claim_id),
            state: WorkflowRunState::Running,
            activity_id: vec![activity.to_string()],
        }
    }

    pub fn finished(claim_id: &str) -> WorkflowState {
        WorkflowState {
            process_instance_id: Some(ProcessInstanceId::new("PI-1")),
            claim_id: ClaimId::new(claim_id),
            state: WorkflowRunState::Finished,
            activity_id: Vec::new(),
        }
    }

    pub fn docs_task() -> WorkflowTask {
        WorkflowTask {
            id: TaskId::new("TSK-docs"),
            name: "Review documents".to_string(),
            task_definition_key: DOCS_ACTIVITY.to_string(),
        }
    }

    pub fn expert_task() -> WorkflowTask {
        WorkflowTask {
            id: TaskId::new("TSK-expert"),
            name: "Expert assessment".to_string(),
            task_definition_key: EXPERT_ACTIVITY.to_string(),
        }
    }
}
