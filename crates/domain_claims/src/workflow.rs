//! Workflow engine view of a claim

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::{ClaimId, ProcessInstanceId, TaskId};
use crate::claim::{ClaimIntake, ClaimType};
use crate::error::ClaimError;

/// Activity id of the document review user task
pub const DOCS_ACTIVITY: &str = "ut_docs";
/// Activity id of the expert assessment user task
pub const EXPERT_ACTIVITY: &str = "ut_expert";

/// Run state of a process instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowRunState {
    Running,
    #[serde(alias = "COMPLETED")]
    Finished,
}

impl WorkflowRunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowRunState::Running => "RUNNING",
            WorkflowRunState::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for WorkflowRunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowRunState {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "RUNNING" => Ok(WorkflowRunState::Running),
            "FINISHED" | "COMPLETED" => Ok(WorkflowRunState::Finished),
            _ => Err(ClaimError::UnknownStatus(s.to_string())),
        }
    }
}

/// Live state of the process instance handling a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    #[serde(default)]
    pub process_instance_id: Option<ProcessInstanceId>,
    pub claim_id: ClaimId,
    pub state: WorkflowRunState,
    #[serde(default)]
    pub activity_id: Vec<String>,
}

impl WorkflowState {
    /// The activity the process is currently waiting in, if any
    pub fn live_activity(&self) -> Option<&str> {
        self.activity_id.first().map(String::as_str)
    }

    pub fn is_finished(&self) -> bool {
        self.state == WorkflowRunState::Finished
    }
}

/// An open user task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTask {
    pub id: TaskId,
    pub name: String,
    pub task_definition_key: String,
}

/// Request to start the claim process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStartRequest {
    pub customer_id: String,
    pub full_name: String,
    pub policy_number: String,
    pub claim_type: ClaimType,
    #[serde(with = "rust_decimal::serde::float")]
    pub claimed_amount: Decimal,
    pub description: String,
}

impl From<&ClaimIntake> for WorkflowStartRequest {
    fn from(intake: &ClaimIntake) -> Self {
        Self {
            customer_id: intake.customer_id.clone(),
            full_name: intake.full_name.clone(),
            policy_number: intake.policy_number.clone(),
            claim_type: intake.claim_type,
            claimed_amount: intake.claimed_amount,
            description: intake.description.clone(),
        }
    }
}

/// Identifiers of a newly started process
///
/// The business key is the claim id the process created in the claim store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStarted {
    pub process_instance_id: ProcessInstanceId,
    pub business_key: ClaimId,
}

/// Decision taken by the expert on the `ut_expert` task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpertDecision {
    Approve,
    Reject,
}

/// Variables submitted when completing a user task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskVariables(BTreeMap<String, Value>);

impl TaskVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome of the document review task
    pub fn docs_ok(provided: bool) -> Self {
        Self::new().with("docsOk", Value::Bool(provided))
    }

    /// Outcome of the expert assessment task
    pub fn expert_decision(decision: ExpertDecision) -> Self {
        let value = match decision {
            ExpertDecision::Approve => "APPROVE",
            ExpertDecision::Reject => "REJECT",
        };
        Self::new().with("expertDecision", Value::String(value.to_string()))
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}
