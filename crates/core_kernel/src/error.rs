//! Error taxonomy shared across the system

use serde::{Deserialize, Serialize};

/// Failure taxonomy shared by every layer
///
/// Each error type in the workspace can report which of these buckets it
/// belongs to, so callers can decide how to surface it without matching on
/// crate-specific variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Rejected locally before any network call was attempted
    ClientInput,
    /// Connection failure or timeout
    Transport,
    /// The remote side declared a failure (non-2xx, SOAP fault, GraphQL errors, gRPC status)
    Protocol,
    /// The remote side answered successfully but refused the claim on business grounds
    ValidationRejected,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::ClientInput => "client_input_error",
            ErrorCategory::Transport => "transport_error",
            ErrorCategory::Protocol => "protocol_error",
            ErrorCategory::ValidationRejected => "validation_rejected",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
