//! Claim progress handler

use axum::{extract::{Path, State}, Json};

use core_kernel::ClaimId;

use crate::dto::progress::ProgressResponse;
use crate::{error::ApiError, AppState};

/// Projects a claim's position in the approval pipeline
pub async fn claim_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let snapshot = state.tracker.snapshot(&ClaimId::new(id)).await?;
    Ok(Json(ProgressResponse::from(snapshot)))
}
