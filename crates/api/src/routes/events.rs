//! Operational event routes that trigger journal automations.
//!
//! A first recording answers 201; a replay of an already-recorded event
//! answers 200 with the existing entry id.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::post,
};
use fieldledger_core::automation::AutomationOutcome;
use fieldledger_shared::types::{JobId, PurchaseOrderId, TimeEntryId};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// Creates the event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/job-completed/{job_id}", post(job_completed))
        .route("/events/time-entries-approved", post(time_entries_approved))
        .route(
            "/events/purchase-order-received/{po_id}",
            post(purchase_order_received),
        )
}

/// Request body for a time approval batch.
#[derive(Debug, Deserialize)]
pub struct TimeEntriesApprovedRequest {
    /// Approved time entries, in any order.
    pub time_entry_ids: Vec<TimeEntryId>,
}

type EventResponse = Result<(StatusCode, Json<AutomationOutcome>), ApiError>;

fn respond(outcome: AutomationOutcome) -> (StatusCode, Json<AutomationOutcome>) {
    let status = if outcome.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    (status, Json(outcome))
}

/// POST `/events/job-completed/{job_id}`
async fn job_completed(
    State(state): State<AppState>,
    job_id: Result<Path<JobId>, PathRejection>,
) -> EventResponse {
    let Path(job_id) = job_id?;
    Ok(respond(state.automation().on_job_completed(job_id).await?))
}

/// POST `/events/time-entries-approved`
async fn time_entries_approved(
    State(state): State<AppState>,
    payload: Result<Json<TimeEntriesApprovedRequest>, JsonRejection>,
) -> EventResponse {
    let Json(payload) = payload?;
    Ok(respond(
        state
            .automation()
            .on_time_entries_approved(&payload.time_entry_ids)
            .await?,
    ))
}

/// POST `/events/purchase-order-received/{po_id}`
async fn purchase_order_received(
    State(state): State<AppState>,
    po_id: Result<Path<PurchaseOrderId>, PathRejection>,
) -> EventResponse {
    let Path(po_id) = po_id?;
    Ok(respond(state.automation().on_po_received(po_id).await?))
}
