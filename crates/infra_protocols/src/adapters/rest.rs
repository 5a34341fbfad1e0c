//! REST Claim Store Adapter
//!
//! Implements [`ClaimStorePort`] against the claim store's JSON API:
//!
//! | Operation       | Request                      |
//! |-----------------|------------------------------|
//! | create          | `POST /claims`               |
//! | get             | `GET /claims/{id}`           |
//! | history         | `GET /claims/{id}/history`   |
//! | list            | `GET /claims`                |
//! | delete          | `DELETE /claims/{id}`        |
//! | status update   | `POST /claims/{id}/status`   |
//!
//! Any non-2xx answer is a protocol error carrying the response body.

use async_trait::async_trait;
use tracing::{debug, instrument};

use core_kernel::{AdapterConfig, AdapterError, ClaimId, DomainPort};
use domain_claims::claim::{Claim, ClaimEvent, ClaimIntake, StatusUpdate};
use domain_claims::ports::ClaimStorePort;

use crate::error::ProtocolError;
use crate::http::HttpEndpoint;

/// HTTP client for the claim store
#[derive(Debug, Clone)]
pub struct RestClaimStore {
    http: HttpEndpoint,
}

impl RestClaimStore {
    pub fn new(config: &AdapterConfig) -> Result<Self, ProtocolError> {
        Ok(Self {
            http: HttpEndpoint::new(config)?,
        })
    }

    fn claim_url(&self, id: &ClaimId, tail: Option<&str>) -> Result<reqwest::Url, AdapterError> {
        let url = match tail {
            Some(tail) => self.http.url(&["claims", id.as_str(), tail]),
            None => self.http.url(&["claims", id.as_str()]),
        };
        Ok(url?)
    }
}

impl DomainPort for RestClaimStore {}

#[async_trait]
impl ClaimStorePort for RestClaimStore {
    #[instrument(skip(self, intake), fields(policy_number = %intake.policy_number))]
    async fn create_claim(&self, intake: &ClaimIntake) -> Result<Claim, AdapterError> {
        let url = self.http.url(&["claims"])?;
        let claim: Claim = self
            .http
            .call_json("createClaim", self.http.client().post(url).json(intake))
            .await?;
        debug!(claim_id = %claim.id, "claim created");
        Ok(claim)
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get_claim(&self, id: &ClaimId) -> Result<Claim, AdapterError> {
        let url = self.claim_url(id, None)?;
        self.http.call_json("getClaim", self.http.client().get(url)).await
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn history(&self, id: &ClaimId) -> Result<Vec<ClaimEvent>, AdapterError> {
        let url = self.claim_url(id, Some("history"))?;
        self.http.call_json("claimHistory", self.http.client().get(url)).await
    }

    #[instrument(skip(self))]
    async fn list_claims(&self) -> Result<Vec<Claim>, AdapterError> {
        let url = self.http.url(&["claims"])?;
        self.http.call_json("listClaims", self.http.client().get(url)).await
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn delete_claim(&self, id: &ClaimId) -> Result<(), AdapterError> {
        let url = self.claim_url(id, None)?;
        self.http.call_empty("deleteClaim", self.http.client().delete(url)).await
    }

    #[instrument(skip(self, update), fields(claim_id = %id, status = %update.status))]
    async fn update_status(&self, id: &ClaimId, update: &StatusUpdate) -> Result<Claim, AdapterError> {
        let url = self.claim_url(id, Some("status"))?;
        self.http
            .call_json("updateClaimStatus", self.http.client().post(url).json(update))
            .await
    }
}
