//! Workflow Engine Client
//!
//! Implements [`WorkflowPort`] against the workflow engine's REST API. The
//! endpoint is the API root (default `http://workflow-engine:8084/api`):
//!
//! | Operation            | Request                                  |
//! |----------------------|------------------------------------------|
//! | start                | `POST /workflow/start`                   |
//! | state                | `GET /workflow/claims/{claimId}/state`   |
//! | tasks for claim      | `GET /workflow/claims/{claimId}/tasks`   |
//! | tasks for instance   | `GET /workflow/instances/{id}/tasks`     |
//! | complete task        | `POST /workflow/tasks/{taskId}/complete` |

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use core_kernel::{AdapterConfig, AdapterError, ClaimId, DomainPort, ProcessInstanceId, TaskId};
use domain_claims::ports::WorkflowPort;
use domain_claims::workflow::{TaskVariables, WorkflowStartRequest, WorkflowStarted, WorkflowState, WorkflowTask};

use crate::error::ProtocolError;
use crate::http::HttpEndpoint;

/// Default API root of the workflow engine
pub const DEFAULT_WORKFLOW_ENDPOINT: &str = "http://workflow-engine:8084/api";

/// HTTP client for the workflow engine
#[derive(Debug, Clone)]
pub struct HttpWorkflowEngine {
    http: HttpEndpoint,
}

impl HttpWorkflowEngine {
    pub fn new(config: &AdapterConfig) -> Result<Self, ProtocolError> {
        Ok(Self {
            http: HttpEndpoint::new(config)?,
        })
    }
}

impl DomainPort for HttpWorkflowEngine {}

#[async_trait]
impl WorkflowPort for HttpWorkflowEngine {
    #[instrument(skip(self, request), fields(policy_number = %request.policy_number))]
    async fn start(&self, request: &WorkflowStartRequest) -> Result<WorkflowStarted, AdapterError> {
        let url = self.http.url(&["workflow", "start"])?;
        let started: WorkflowStarted = self
            .http
            .call_json("startWorkflow", self.http.client().post(url).json(request))
            .await?;
        info!(
            process_instance_id = %started.process_instance_id,
            claim_id = %started.business_key,
            "workflow started"
        );
        Ok(started)
    }

    #[instrument(skip(self), fields(claim_id = %claim_id))]
    async fn state(&self, claim_id: &ClaimId) -> Result<WorkflowState, AdapterError> {
        let url = self.http.url(&["workflow", "claims", claim_id.as_str(), "state"])?;
        let state: WorkflowState = self
            .http
            .call_json("workflowState", self.http.client().get(url))
            .await?;
        debug!(state = %state.state, activity = ?state.live_activity(), "workflow state read");
        Ok(state)
    }

    #[instrument(skip(self), fields(claim_id = %claim_id))]
    async fn tasks_for_claim(&self, claim_id: &ClaimId) -> Result<Vec<WorkflowTask>, AdapterError> {
        let url = self.http.url(&["workflow", "claims", claim_id.as_str(), "tasks"])?;
        self.http.call_json("claimTasks", self.http.client().get(url)).await
    }

    #[instrument(skip(self), fields(process_instance_id = %instance_id))]
    async fn tasks_for_instance(
        &self,
        instance_id: &ProcessInstanceId,
    ) -> Result<Vec<WorkflowTask>, AdapterError> {
        let url = self.http.url(&["workflow", "instances", instance_id.as_str(), "tasks"])?;
        self.http.call_json("instanceTasks", self.http.client().get(url)).await
    }

    #[instrument(skip(self, variables), fields(task_id = %task_id))]
    async fn complete_task(&self, task_id: &TaskId, variables: &TaskVariables) -> Result<(), AdapterError> {
        let url = self.http.url(&["workflow", "tasks", task_id.as_str(), "complete"])?;
        self.http
            .call_empty("completeTask", self.http.client().post(url).json(variables))
            .await?;
        info!("task completed");
        Ok(())
    }
}
