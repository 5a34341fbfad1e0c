//! Claim processing DTOs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use core_kernel::ErrorCategory;
use domain_claims::{SagaError, SagaResult, SagaStep, SagaStepName};

use crate::error::upstream_status;

/// All four steps completed
#[derive(Debug, Serialize)]
pub struct ProcessCompleted {
    pub ok: bool,
    pub claim: Value,
    pub identity: Value,
    pub policy: Value,
    pub fraud: Value,
    pub steps: Vec<SagaStep>,
}

/// The saga stopped at `step`
///
/// `error` is the upstream payload (or the refusal reason) verbatim.
#[derive(Debug, Serialize)]
pub struct ProcessFailed {
    pub ok: bool,
    pub step: SagaStepName,
    pub error: String,
    pub category: ErrorCategory,
    pub steps: Vec<SagaStep>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProcessResponse {
    Completed(ProcessCompleted),
    Failed(ProcessFailed),
}

impl From<SagaResult> for ProcessResponse {
    fn from(result: SagaResult) -> Self {
        let response = |name| result.response(name).cloned().unwrap_or(Value::Null);

        match &result.failure {
            None => ProcessResponse::Completed(ProcessCompleted {
                ok: true,
                claim: response(SagaStepName::Claim),
                identity: response(SagaStepName::Identity),
                policy: response(SagaStepName::Policy),
                fraud: response(SagaStepName::Fraud),
                steps: result.steps.clone(),
            }),
            Some(failure) => {
                let error = match &failure.error {
                    SagaError::Adapter(error) => error.detail.clone(),
                    SagaError::Rejected { reason } => reason.clone(),
                };
                ProcessResponse::Failed(ProcessFailed {
                    ok: false,
                    step: failure.step,
                    error,
                    category: failure.error.category(),
                    steps: result.steps.clone(),
                })
            }
        }
    }
}

/// Renders a saga result with the status matching its outcome
pub fn process_response(result: SagaResult) -> Response {
    let status = match result.error() {
        None => StatusCode::OK,
        Some(SagaError::Rejected { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(SagaError::Adapter(error)) => upstream_status(error),
    };
    (status, Json(ProcessResponse::from(result))).into_response()
}
