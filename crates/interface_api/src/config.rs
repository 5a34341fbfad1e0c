//! Gateway configuration
//!
//! Read from `GATEWAY_*` environment variables (e.g. `GATEWAY_REST_URL`,
//! `GATEWAY_TIMEOUT_MS`). Every key is optional; the defaults point at the
//! services of the standard deployment.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use core_kernel::{AdapterConfig, Protocol};
use domain_claims::RejectionPolicy;
use infra_protocols::{GrpcTarget, ProtocolError};

/// Errors raised while loading configuration or building adapters from it
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration could not be loaded: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid adapter configuration: {0}")]
    Adapter(#[from] ProtocolError),
}

/// Gateway configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Claim store base URL
    pub rest_url: String,
    /// WSDL of the identity service
    pub soap_wsdl_url: String,
    /// GraphQL endpoint of the policy service
    pub graphql_url: String,
    /// Address of the fraud scoring service
    pub grpc_addr: String,
    pub grpc_package: String,
    pub grpc_service: String,
    pub grpc_method: String,
    /// Optional `FileDescriptorSet` describing the fraud service
    pub grpc_descriptor_path: Option<PathBuf>,
    /// API root of the workflow engine
    pub workflow_url: String,
    /// Deadline of every backend call
    pub timeout_ms: u64,
    /// What the saga does when identity or policy refuse the claim
    pub rejection_policy: RejectionPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let target = GrpcTarget::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            log_level: "info".to_string(),
            rest_url: "http://claim-service:8081".to_string(),
            soap_wsdl_url: "http://identity-soap:8082/ws/identity?wsdl".to_string(),
            graphql_url: "http://policy-graphql:8083/graphql".to_string(),
            grpc_addr: "http://fraud-grpc:9090".to_string(),
            grpc_package: target.package,
            grpc_service: target.service,
            grpc_method: target.method,
            grpc_descriptor_path: None,
            workflow_url: "http://workflow-engine:8084/api".to_string(),
            timeout_ms: 10_000,
            rejection_policy: RejectionPolicy::default(),
        }
    }
}

impl GatewayConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("GATEWAY"))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn adapter(&self, protocol: Protocol, endpoint: &str) -> AdapterConfig {
        AdapterConfig::new(protocol, endpoint).with_timeout_ms(self.timeout_ms)
    }

    pub fn rest(&self) -> AdapterConfig {
        self.adapter(Protocol::Rest, &self.rest_url)
    }

    pub fn soap(&self) -> AdapterConfig {
        self.adapter(Protocol::Soap, &self.soap_wsdl_url)
    }

    pub fn graphql(&self) -> AdapterConfig {
        self.adapter(Protocol::Graphql, &self.graphql_url)
    }

    pub fn grpc(&self) -> AdapterConfig {
        self.adapter(Protocol::Grpc, &self.grpc_addr)
    }

    pub fn workflow(&self) -> AdapterConfig {
        self.adapter(Protocol::Workflow, &self.workflow_url)
    }

    pub fn grpc_target(&self) -> GrpcTarget {
        GrpcTarget {
            package: self.grpc_package.clone(),
            service: self.grpc_service.clone(),
            method: self.grpc_method.clone(),
            descriptor_path: self.grpc_descriptor_path.clone(),
        }
    }
}
