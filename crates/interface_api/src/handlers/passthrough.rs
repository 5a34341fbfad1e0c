//! Per-protocol passthrough handlers
//!
//! Each endpoint drives exactly one backend through its port and answers
//! `{ok: true, data}` or `{ok: false, error}`.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use domain_claims::ports::{
    FraudAssessment, FraudCheck, IdentityCheck, IdentityVerification, PolicyCheck, PolicyValidation,
};
use domain_claims::{Claim, ClaimIntake};

use crate::dto::ApiResponse;
use crate::{error::ApiError, AppState};

/// Creates a claim in the claim store
pub async fn create_claim(
    State(state): State<AppState>,
    payload: Result<Json<ClaimIntake>, JsonRejection>,
) -> Result<Json<ApiResponse<Claim>>, ApiError> {
    let Json(intake) = payload?;
    intake.validate()?;
    let claim = state.claims.create_claim(&intake).await?;
    Ok(Json(ApiResponse::ok(claim)))
}

/// Verifies an identity with the identity service
pub async fn verify_identity(
    State(state): State<AppState>,
    payload: Result<Json<IdentityCheck>, JsonRejection>,
) -> Result<Json<ApiResponse<IdentityVerification>>, ApiError> {
    let Json(check) = payload?;
    let verification = state.identity.verify_identity(&check).await?;
    Ok(Json(ApiResponse::ok(verification)))
}

/// Validates a policy with the policy service
pub async fn validate_policy(
    State(state): State<AppState>,
    payload: Result<Json<PolicyCheck>, JsonRejection>,
) -> Result<Json<ApiResponse<PolicyValidation>>, ApiError> {
    let Json(check) = payload?;
    let validation = state.policy.validate_policy(&check).await?;
    Ok(Json(ApiResponse::ok(validation)))
}

/// Scores a claim with the fraud service
pub async fn score_fraud(
    State(state): State<AppState>,
    payload: Result<Json<FraudCheck>, JsonRejection>,
) -> Result<Json<ApiResponse<FraudAssessment>>, ApiError> {
    let Json(check) = payload?;
    let assessment = state.fraud.score_fraud(&check).await?;
    Ok(Json(ApiResponse::ok(assessment)))
}
