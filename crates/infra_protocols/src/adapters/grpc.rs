//! gRPC Fraud Adapter
//!
//! Implements [`FraudPort`] with a unary call to the fraud scoring service.
//! The package, service and method names come from configuration, defaulting
//! to `fraud.FraudDetectionService/Analyze`.
//!
//! When a descriptor-set path is configured, the first call loads the
//! `FileDescriptorSet` and checks that it declares the configured method
//! before a channel is opened. The resolved channel is memoized in a
//! [`ClientCache`] keyed by descriptor path, address and method, so scorers
//! sharing a cache only share a channel when all three agree.

use std::error::Error as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use prost::Message;
use rust_decimal::prelude::ToPrimitive;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tracing::{debug, info, instrument};

use core_kernel::{bounded_call, AdapterConfig, AdapterError, ClientCache, DomainPort};
use domain_claims::ports::{FraudAssessment, FraudCheck, FraudPort};

use crate::error::ProtocolError;
use crate::proto::{FraudReply, FraudRequest};

/// Fully qualified target of the unary call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpcTarget {
    pub package: String,
    pub service: String,
    pub method: String,
    /// Optional `FileDescriptorSet` (`protoc --descriptor_set_out`) to check
    /// the target against
    pub descriptor_path: Option<PathBuf>,
}

impl Default for GrpcTarget {
    fn default() -> Self {
        Self {
            package: "fraud".to_string(),
            service: "FraudDetectionService".to_string(),
            method: "Analyze".to_string(),
            descriptor_path: None,
        }
    }
}

impl GrpcTarget {
    /// `package.Service`
    pub fn service_name(&self) -> String {
        if self.package.is_empty() {
            self.service.clone()
        } else {
            format!("{}.{}", self.package, self.service)
        }
    }

    /// HTTP/2 path of the method, `/package.Service/Method`
    pub fn path(&self) -> Result<PathAndQuery, ProtocolError> {
        format!("/{}/{}", self.service_name(), self.method)
            .parse::<PathAndQuery>()
            .map_err(|e| ProtocolError::Descriptor(format!("invalid method path: {e}")))
    }

    /// Checks that a descriptor set declares the package, service and method
    pub fn resolve(&self, descriptors: &prost_types::FileDescriptorSet) -> Result<(), ProtocolError> {
        let files: Vec<_> = descriptors
            .file
            .iter()
            .filter(|file| file.package() == self.package)
            .collect();
        if files.is_empty() {
            return Err(ProtocolError::Descriptor(format!("package '{}' not found", self.package)));
        }

        let service = files
            .iter()
            .flat_map(|file| file.service.iter())
            .find(|service| service.name() == self.service)
            .ok_or_else(|| ProtocolError::Descriptor(format!("service '{}' not found", self.service_name())))?;

        if !service.method.iter().any(|method| method.name() == self.method) {
            return Err(ProtocolError::Descriptor(format!(
                "method '{}' not found on '{}'",
                self.method,
                self.service_name()
            )));
        }
        Ok(())
    }
}

/// Channel bound to the resolved method
#[derive(Debug, Clone)]
pub struct FraudChannel {
    pub address: String,
    pub channel: Channel,
    pub path: PathAndQuery,
}

/// gRPC client for the fraud scoring service
pub struct GrpcFraudScorer {
    address: String,
    target: GrpcTarget,
    timeout: Duration,
    clients: Arc<ClientCache<FraudChannel>>,
}

impl GrpcFraudScorer {
    /// Creates a scorer with its own client cache
    pub fn new(config: &AdapterConfig, target: GrpcTarget) -> Result<Self, ProtocolError> {
        Self::with_cache(config, target, Arc::new(ClientCache::new()))
    }

    /// Creates a scorer resolving its channel through a shared cache
    pub fn with_cache(
        config: &AdapterConfig,
        target: GrpcTarget,
        clients: Arc<ClientCache<FraudChannel>>,
    ) -> Result<Self, ProtocolError> {
        let address = normalize_address(&config.endpoint)?;
        Ok(Self {
            address,
            target,
            timeout: config.timeout(),
            clients,
        })
    }

    pub fn target(&self) -> &GrpcTarget {
        &self.target
    }

    fn cache_key(&self) -> String {
        let descriptor = self
            .target
            .descriptor_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        format!(
            "{descriptor}|{}|{}/{}",
            self.address,
            self.target.service_name(),
            self.target.method
        )
    }

    /// The resolved channel, loading the descriptor set on first use
    pub async fn client(&self) -> Result<Arc<FraudChannel>, AdapterError> {
        let client = self
            .clients
            .get_or_try_build(&self.cache_key(), || self.build_client())
            .await?;
        Ok(client)
    }

    async fn build_client(&self) -> Result<FraudChannel, ProtocolError> {
        if let Some(path) = &self.target.descriptor_path {
            info!(descriptor = %path.display(), "loading proto descriptor set");
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| ProtocolError::Descriptor(format!("{}: {e}", path.display())))?;
            let descriptors = prost_types::FileDescriptorSet::decode(bytes.as_slice())
                .map_err(|e| ProtocolError::Descriptor(format!("{}: {e}", path.display())))?;
            self.target.resolve(&descriptors)?;
        }

        let channel = Channel::from_shared(self.address.clone())
            .map_err(|e| ProtocolError::invalid_endpoint(&self.address, e))?
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .connect_lazy();
        let path = self.target.path()?;
        debug!(address = %self.address, path = %path, "gRPC channel ready");

        Ok(FraudChannel {
            address: self.address.clone(),
            channel,
            path,
        })
    }

    async fn analyze(&self, check: &FraudCheck) -> Result<FraudReply, AdapterError> {
        let client = self.client().await?;
        let mut grpc = tonic::client::Grpc::new(client.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| ProtocolError::Unreachable(format!("fraud service not ready: {e}")))?;

        let mut request = tonic::Request::new(FraudRequest::from(check));
        request.set_timeout(self.timeout);
        let codec = tonic::codec::ProstCodec::<FraudRequest, FraudReply>::default();

        let response = grpc
            .unary(request, client.path.clone(), codec)
            .await
            .map_err(status_error)?;
        Ok(response.into_inner())
    }
}

impl From<&FraudCheck> for FraudRequest {
    fn from(check: &FraudCheck) -> Self {
        Self {
            claim_id: check.claim_id.to_string(),
            policy_number: check.policy_number.clone(),
            claim_type: check.claim_type.as_str().to_string(),
            claimed_amount: check.claimed_amount.to_f64().unwrap_or_default(),
        }
    }
}

impl From<FraudReply> for FraudAssessment {
    fn from(reply: FraudReply) -> Self {
        Self {
            risk: reply.risk,
            score: reply.score,
            explanation: reply.explanation,
        }
    }
}

/// A status raised by the local transport (no connection) is a transport
/// failure; anything else was declared by the server.
fn status_error(status: tonic::Status) -> ProtocolError {
    let local = status
        .source()
        .is_some_and(|source| source.downcast_ref::<tonic::transport::Error>().is_some());
    if local {
        ProtocolError::Unreachable(format!("fraud service unreachable: {}", status.message()))
    } else {
        ProtocolError::Grpc(status)
    }
}

/// Accepts `host:port` as well as a full URI
fn normalize_address(endpoint: &str) -> Result<String, ProtocolError> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.is_empty() {
        return Err(ProtocolError::invalid_endpoint(endpoint, "empty address"));
    }
    if endpoint.contains("://") {
        Ok(endpoint.to_string())
    } else {
        Ok(format!("http://{endpoint}"))
    }
}

impl DomainPort for GrpcFraudScorer {}

#[async_trait]
impl FraudPort for GrpcFraudScorer {
    #[instrument(skip(self, check), fields(claim_id = %check.claim_id, method = %self.target.method))]
    async fn score_fraud(&self, check: &FraudCheck) -> Result<FraudAssessment, AdapterError> {
        let assessment: FraudAssessment = bounded_call(&self.target.method, self.timeout, self.analyze(check))
            .await?
            .into();
        debug!(risk = %assessment.risk, score = assessment.score, "fraud scored");
        Ok(assessment)
    }
}
