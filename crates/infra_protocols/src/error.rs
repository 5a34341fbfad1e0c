//! Protocol error types
//!
//! Adapters work with [`ProtocolError`] internally and convert to the uniform
//! [`AdapterError`] at the port boundary. The conversion decides the error
//! kind: whether the backend could not be reached (`transport`), declared a
//! failure (`protocol`), or did not answer in time (`timeout`).

use thiserror::Error;

use core_kernel::{AdapterError, AdapterErrorKind};

/// Errors that can occur while talking to a backend
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The configured endpoint cannot be used
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The HTTP exchange itself failed
    #[error("{operation}: {source}")]
    Http {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend could not be reached or is not serving
    #[error("{0}")]
    Unreachable(String),

    /// SOAP fault returned by the identity service
    #[error("{0}")]
    Fault(String),

    /// Non-empty `errors` array in a GraphQL response
    #[error("{0}")]
    GraphqlErrors(String),

    /// The response did not have the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The proto descriptor set is missing, unreadable or lacks the target
    #[error("descriptor: {0}")]
    Descriptor(String),

    /// Non-OK gRPC status
    #[error("grpc status {code:?}: {message}", code = .0.code(), message = .0.message())]
    Grpc(tonic::Status),
}

impl ProtocolError {
    pub fn http(operation: &str, source: reqwest::Error) -> Self {
        ProtocolError::Http {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn invalid_endpoint(endpoint: &str, reason: impl ToString) -> Self {
        ProtocolError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Kind of adapter failure this error surfaces as
    pub fn kind(&self) -> AdapterErrorKind {
        match self {
            ProtocolError::Http { source, .. } if source.is_timeout() => AdapterErrorKind::Timeout,
            ProtocolError::Http { source, .. } if source.is_decode() => AdapterErrorKind::Protocol,
            ProtocolError::Http { .. } | ProtocolError::Unreachable(_) => AdapterErrorKind::Transport,
            ProtocolError::Grpc(status) => match status.code() {
                tonic::Code::DeadlineExceeded => AdapterErrorKind::Timeout,
                tonic::Code::Unavailable => AdapterErrorKind::Transport,
                _ => AdapterErrorKind::Protocol,
            },
            ProtocolError::InvalidEndpoint { .. }
            | ProtocolError::Status { .. }
            | ProtocolError::Fault(_)
            | ProtocolError::GraphqlErrors(_)
            | ProtocolError::Malformed(_)
            | ProtocolError::Descriptor(_) => AdapterErrorKind::Protocol,
        }
    }

    /// Detail carried into the adapter error
    ///
    /// Upstream payloads (response body, fault string, GraphQL errors) are kept
    /// verbatim.
    fn detail(&self) -> String {
        match self {
            ProtocolError::Status { status, body } if body.trim().is_empty() => {
                format!("HTTP {status}")
            }
            ProtocolError::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

impl From<ProtocolError> for AdapterError {
    fn from(error: ProtocolError) -> Self {
        AdapterError::new(error.kind(), error.detail())
    }
}

impl From<tonic::Status> for ProtocolError {
    fn from(status: tonic::Status) -> Self {
        ProtocolError::Grpc(status)
    }
}

impl From<quick_xml::Error> for ProtocolError {
    fn from(error: quick_xml::Error) -> Self {
        ProtocolError::Malformed(format!("invalid XML: {error}"))
    }
}
