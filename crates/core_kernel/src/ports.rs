//! Ports and Adapters Infrastructure
//!
//! This module provides the foundational types shared by every protocol
//! adapter in the gateway.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Saga orchestrator / tracker                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Port Traits                             │
//! │   (ClaimStorePort, IdentityPort, PolicyPort, FraudPort, …)   │
//! │        Defined in domain_claims, depend on core_kernel       │
//! └─────────────────────────────────────────────────────────────┘
//!          ▲              ▲               ▲              ▲
//!     ┌────┴───┐     ┌────┴───┐     ┌─────┴────┐    ┌────┴───┐
//!     │  REST  │     │  SOAP  │     │ GraphQL  │    │  gRPC  │
//!     └────────┘     └────────┘     └──────────┘    └────────┘
//! ```
//!
//! Every adapter normalizes its transport into `Result<T, AdapterError>`, so the
//! layers above never see reqwest, XML or tonic types.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ErrorCategory;

/// Classification of an adapter failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterErrorKind {
    /// The request never got a well-formed answer (connection refused, reset, bad payload)
    Transport,
    /// The remote side answered with a declared failure
    Protocol,
    /// The bounded call timeout elapsed
    Timeout,
}

impl fmt::Display for AdapterErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AdapterErrorKind::Transport => "transport",
            AdapterErrorKind::Protocol => "protocol",
            AdapterErrorKind::Timeout => "timeout",
        };
        f.write_str(label)
    }
}

/// Uniform error returned by every protocol adapter
///
/// `detail` carries the upstream payload verbatim where one exists (the
/// response body of a failed REST call, the SOAP fault string, the GraphQL
/// `errors` array, the gRPC status message).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind} error: {detail}")]
pub struct AdapterError {
    pub kind: AdapterErrorKind,
    pub detail: String,
}

impl AdapterError {
    pub fn new(kind: AdapterErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::Transport, detail)
    }

    /// Creates a Protocol error
    pub fn protocol(detail: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::Protocol, detail)
    }

    /// Creates a Timeout error for the named operation
    pub fn timeout(operation: &str, after: Duration) -> Self {
        Self::new(
            AdapterErrorKind::Timeout,
            format!("{operation} timed out after {}ms", after.as_millis()),
        )
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            AdapterErrorKind::Transport | AdapterErrorKind::Timeout
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self.kind {
            AdapterErrorKind::Transport | AdapterErrorKind::Timeout => ErrorCategory::Transport,
            AdapterErrorKind::Protocol => ErrorCategory::Protocol,
        }
    }
}

/// Marker trait for all domain ports
///
/// All port traits should extend this marker to ensure they are
/// thread-safe and can be used in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Transport spoken by an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Rest,
    Soap,
    Graphql,
    Grpc,
    Workflow,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Protocol::Rest => "rest",
            Protocol::Soap => "soap",
            Protocol::Graphql => "graphql",
            Protocol::Grpc => "grpc",
            Protocol::Workflow => "workflow",
        };
        f.write_str(label)
    }
}

/// Configuration for an adapter
///
/// Each adapter owns exactly one external endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Transport this adapter speaks
    pub protocol: Protocol,
    /// The single endpoint this adapter talks to (base URL, WSDL URL, or gRPC address)
    pub endpoint: String,
    /// Upper bound for one call, in milliseconds
    pub timeout_ms: u64,
}

impl AdapterConfig {
    /// Default bound for a single remote call
    pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

    pub fn new(protocol: Protocol, endpoint: impl Into<String>) -> Self {
        Self {
            protocol,
            endpoint: endpoint.into(),
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Endpoint without a trailing slash, for joining request paths
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

/// Runs one adapter call under a deadline
///
/// An elapsed deadline surfaces as [`AdapterErrorKind::Timeout`], distinct
/// from any failure the remote side declares.
pub async fn bounded_call<T, F>(operation: &str, limit: Duration, call: F) -> Result<T, AdapterError>
where
    F: Future<Output = Result<T, AdapterError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(AdapterError::timeout(operation, limit)),
    }
}
