//! API error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use core_kernel::{AdapterError, AdapterErrorKind, ErrorCategory};
use domain_claims::ClaimError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was rejected before any backend was called
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A backend call failed; the detail is the upstream payload
    #[error(transparent)]
    Upstream(#[from] AdapterError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    pub category: ErrorCategory,
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::BadRequest(_) => ErrorCategory::ClientInput,
            ApiError::Upstream(error) => error.category(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(error) => upstream_status(error),
        }
    }
}

/// Status reported when a backend call failed
pub fn upstream_status(error: &AdapterError) -> StatusCode {
    match error.kind {
        AdapterErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        AdapterErrorKind::Transport | AdapterErrorKind::Protocol => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            ApiError::Upstream(error) => error.detail.clone(),
            other => other.to_string(),
        };
        let body = ErrorResponse {
            ok: false,
            error,
            category: self.category(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::InvalidInput(message) => ApiError::BadRequest(message),
            ClaimError::UnknownStatus(status) => ApiError::BadRequest(format!("unknown status {status}")),
            ClaimError::Adapter(error) => ApiError::Upstream(error),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
