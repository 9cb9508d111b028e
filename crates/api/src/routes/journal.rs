//! Journal entry read and posting routes.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    routing::{get, post},
};
use fieldledger_db::JournalEntryDetail;
use fieldledger_shared::types::{JournalEntryId, UserId};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries/{id}", get(get_entry))
        .route("/journal-entries/{id}/post", post(post_entry))
}

/// Request body for posting an entry.
#[derive(Debug, Deserialize)]
pub struct PostEntryRequest {
    /// Acting user, authenticated by the surrounding application.
    pub user_id: UserId,
}

/// GET `/journal-entries/{id}` - Entry with lines joined to accounts.
async fn get_entry(
    State(state): State<AppState>,
    id: Result<Path<JournalEntryId>, PathRejection>,
) -> Result<Json<JournalEntryDetail>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.journal().get_entry_detail(id.into_inner()).await?))
}

/// POST `/journal-entries/{id}/post` - DRAFT to POSTED.
async fn post_entry(
    State(state): State<AppState>,
    id: Result<Path<JournalEntryId>, PathRejection>,
    payload: Result<Json<PostEntryRequest>, JsonRejection>,
) -> Result<Json<JournalEntryDetail>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let detail = state
        .posting()
        .post_entry(id.into_inner(), payload.user_id.into_inner())
        .await?;
    Ok(Json(detail))
}
