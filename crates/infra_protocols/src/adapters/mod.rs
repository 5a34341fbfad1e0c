//! Port adapter implementations
//!
//! This module provides one adapter per external collaborator. Each adapter
//! implements a `domain_claims` port over its transport and normalizes the
//! outcome into the port's typed result or an [`core_kernel::AdapterError`].
//!
//! # Architecture
//!
//! Each adapter follows these principles:
//! - One configured endpoint, one deadline per call
//! - Upstream failure payloads carried verbatim in the error detail
//! - Expensive clients (WSDL binding, gRPC channel) built once per key

pub mod rest;
pub mod soap;
pub mod graphql;
pub mod grpc;
pub mod workflow;

pub use rest::RestClaimStore;
pub use soap::{SoapIdentityVerifier, WsdlClient};
pub use graphql::GraphqlPolicyValidator;
pub use grpc::{FraudChannel, GrpcFraudScorer, GrpcTarget};
pub use workflow::HttpWorkflowEngine;
