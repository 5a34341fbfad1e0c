//! Claim processing handler

use axum::{extract::rejection::JsonRejection, extract::State, response::Response, Json};
use tracing::info;

use domain_claims::ClaimIntake;

use crate::dto::process::process_response;
use crate::{error::ApiError, AppState};

/// Runs the submission saga for one claim
///
/// Invalid input is answered with 400 before any backend is called.
pub async fn process_claim(
    State(state): State<AppState>,
    payload: Result<Json<ClaimIntake>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(intake) = payload?;
    let result = state.saga.run(&intake).await?;

    info!(
        ok = result.ok(),
        failing_step = ?result.failing_step(),
        claim_id = ?result.claim_id(),
        "claim processed"
    );

    Ok(process_response(result))
}
