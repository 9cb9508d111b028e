//! Accounting period close and reopen routes.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    routing::post,
};
use fieldledger_db::entities::accounting_periods;
use fieldledger_shared::types::{PeriodId, UserId};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// Creates the period routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/periods/{id}/close", post(close_period))
        .route("/periods/{id}/reopen", post(reopen_period))
}

/// Request body for closing a period.
#[derive(Debug, Deserialize)]
pub struct ClosePeriodRequest {
    /// Acting user, authenticated by the surrounding application.
    pub user_id: UserId,
}

/// POST `/periods/{id}/close` - OPEN to CLOSED when no drafts remain.
async fn close_period(
    State(state): State<AppState>,
    id: Result<Path<PeriodId>, PathRejection>,
    payload: Result<Json<ClosePeriodRequest>, JsonRejection>,
) -> Result<Json<accounting_periods::Model>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let period = state
        .periods()
        .close_period(id.into_inner(), payload.user_id.into_inner())
        .await?;
    Ok(Json(period))
}

/// POST `/periods/{id}/reopen` - CLOSED to OPEN.
async fn reopen_period(
    State(state): State<AppState>,
    id: Result<Path<PeriodId>, PathRejection>,
) -> Result<Json<accounting_periods::Model>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.periods().reopen_period(id.into_inner()).await?))
}
