//! Infrastructure Protocol Layer
//!
//! This crate provides the adapters that connect the claims domain ports to
//! the five backends of the insurance platform, each over its own transport.
//!
//! # Architecture
//!
//! Every adapter owns exactly one configured endpoint and reports failures
//! through the uniform [`core_kernel::AdapterError`]. Each call runs under the
//! endpoint's deadline; an elapsed deadline is a `timeout`, never confused with
//! a failure the backend declared.
//!
//! The SOAP and gRPC adapters resolve their client lazily (from the WSDL or
//! the proto descriptor set) and memoize it in a [`core_kernel::ClientCache`]
//! that can be shared between adapter instances.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_protocols::adapters::RestClaimStore;
//! use domain_claims::ports::ClaimStorePort;
//! use std::sync::Arc;
//!
//! let config = AdapterConfig::new(Protocol::Rest, "http://claim-service:8081");
//! let store: Arc<dyn ClaimStorePort> = Arc::new(RestClaimStore::new(&config)?);
//! let claims = store.list_claims().await?;
//! ```

pub mod error;
pub mod http;
pub mod proto;
pub mod adapters;

pub use error::ProtocolError;
pub use http::HttpEndpoint;
pub use adapters::{
    GraphqlPolicyValidator, GrpcFraudScorer, GrpcTarget, HttpWorkflowEngine, RestClaimStore,
    SoapIdentityVerifier, WsdlClient, FraudChannel,
};
