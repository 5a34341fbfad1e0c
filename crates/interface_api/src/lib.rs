//! HTTP API Layer
//!
//! This crate provides the claims gateway using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: claim processing saga, per-protocol passthroughs, progress
//! - **Middleware**: tracing, access logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: `{ok: false, error}` responses with the upstream payload
//!
//! # Routes
//!
//! | Route                          | Purpose                                  |
//! |--------------------------------|------------------------------------------|
//! | `GET /health`                  | liveness                                 |
//! | `POST /api/process`            | create, verify, validate and score       |
//! | `POST /api/rest/claim`         | create a claim in the claim store        |
//! | `POST /api/soap/verify`        | verify an identity                       |
//! | `POST /api/graphql/policy`     | validate a policy                        |
//! | `POST /api/grpc/fraud`         | score a claim for fraud                  |
//! | `GET /api/claims/:id/progress` | projected position in the pipeline       |
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::from_config(GatewayConfig::from_env()?)?;
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_claims::ports::{ClaimStorePort, FraudPort, IdentityPort, PolicyPort, WorkflowPort};
use domain_claims::{ProgressTracker, SagaOrchestrator};
use infra_protocols::{
    GraphqlPolicyValidator, GrpcFraudScorer, HttpWorkflowEngine, RestClaimStore, SoapIdentityVerifier,
};

use crate::config::{ConfigError, GatewayConfig};
use crate::handlers::{health, passthrough, process, progress};
use crate::middleware::access_log;

/// The five backends the gateway talks to
#[derive(Clone)]
pub struct Backends {
    pub claims: Arc<dyn ClaimStorePort>,
    pub identity: Arc<dyn IdentityPort>,
    pub policy: Arc<dyn PolicyPort>,
    pub fraud: Arc<dyn FraudPort>,
    pub workflow: Arc<dyn WorkflowPort>,
}

impl Backends {
    /// Builds the protocol adapters from configuration
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            claims: Arc::new(RestClaimStore::new(&config.rest())?),
            identity: Arc::new(SoapIdentityVerifier::new(&config.soap())?),
            policy: Arc::new(GraphqlPolicyValidator::new(&config.graphql())?),
            fraud: Arc::new(GrpcFraudScorer::new(&config.grpc(), config.grpc_target())?),
            workflow: Arc::new(HttpWorkflowEngine::new(&config.workflow())?),
        })
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub claims: Arc<dyn ClaimStorePort>,
    pub identity: Arc<dyn IdentityPort>,
    pub policy: Arc<dyn PolicyPort>,
    pub fraud: Arc<dyn FraudPort>,
    pub saga: Arc<SagaOrchestrator>,
    pub tracker: Arc<ProgressTracker>,
}

impl AppState {
    pub fn new(config: GatewayConfig, backends: Backends) -> Self {
        let saga = SagaOrchestrator::new(
            backends.claims.clone(),
            backends.identity.clone(),
            backends.policy.clone(),
            backends.fraud.clone(),
        )
        .with_rejection_policy(config.rejection_policy);
        let tracker = ProgressTracker::new(backends.claims.clone(), backends.workflow);

        Self {
            config,
            claims: backends.claims,
            identity: backends.identity,
            policy: backends.policy,
            fraud: backends.fraud,
            saga: Arc::new(saga),
            tracker: Arc::new(tracker),
        }
    }

    pub fn from_config(config: GatewayConfig) -> Result<Self, ConfigError> {
        let backends = Backends::from_config(&config)?;
        Ok(Self::new(config, backends))
    }
}

/// Creates the gateway router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/process", post(process::process_claim))
        .route("/rest/claim", post(passthrough::create_claim))
        .route("/soap/verify", post(passthrough::verify_identity))
        .route("/graphql/policy", post(passthrough::validate_policy))
        .route("/grpc/fraud", post(passthrough::score_fraud))
        .route("/claims/:id/progress", get(progress::claim_progress))
        .layer(axum_middleware::from_fn(access_log));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
