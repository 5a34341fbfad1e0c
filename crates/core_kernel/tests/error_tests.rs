//! Tests for core_kernel error types

use std::time::Duration;

use core_kernel::error::ErrorCategory;
use core_kernel::ports::{AdapterError, AdapterErrorKind};

#[test]
fn test_adapter_error_display_names_kind() {
    let error = AdapterError::protocol("HTTP 400: policyNumber is required");
    assert_eq!(error.to_string(), "protocol error: HTTP 400: policyNumber is required");
}

#[test]
fn test_adapter_error_categories() {
    assert_eq!(AdapterError::transport("refused").category(), ErrorCategory::Transport);
    assert_eq!(
        AdapterError::timeout("score_fraud", Duration::from_secs(1)).category(),
        ErrorCategory::Transport
    );
    assert_eq!(AdapterError::protocol("fault").category(), ErrorCategory::Protocol);
}

#[test]
fn test_adapter_error_serializes_kind_in_snake_case() {
    let error = AdapterError::new(AdapterErrorKind::Timeout, "too slow");
    let json = serde_json::to_value(&error).unwrap();

    assert_eq!(json["kind"], "timeout");
    assert_eq!(json["detail"], "too slow");
}

#[test]
fn test_error_category_labels() {
    assert_eq!(ErrorCategory::ClientInput.as_str(), "client_input_error");
    assert_eq!(ErrorCategory::Transport.as_str(), "transport_error");
    assert_eq!(ErrorCategory::Protocol.as_str(), "protocol_error");
    assert_eq!(ErrorCategory::ValidationRejected.to_string(), "validation_rejected");
}
