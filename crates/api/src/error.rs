//! JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fieldledger_core::ledger::LedgerError;
use fieldledger_shared::AppError;
use serde_json::{Value, json};
use tracing::error;

/// An error rendered as `{ "error", "message", "draft_count"? }`.
#[derive(Debug)]
pub enum ApiError {
    /// A ledger workflow refused or failed.
    Ledger(LedgerError),
    /// The request itself was unusable.
    App(AppError),
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::App(AppError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::App(AppError::Validation(rejection.body_text()))
    }
}

impl ApiError {
    fn parts(&self) -> (u16, &'static str, String) {
        match self {
            Self::Ledger(err) => (err.http_status_code(), err.error_code(), err.to_string()),
            Self::App(err) => (err.status_code(), err.error_code(), err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, error_code, detail) = self.parts();
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Server-side failures are logged, not echoed.
        let message = if status.is_server_error() {
            error!(error = %detail, code = error_code, "Request failed");
            "An error occurred".to_string()
        } else {
            detail
        };

        let mut body: Value = json!({
            "error": error_code,
            "message": message,
        });
        if let Self::Ledger(LedgerError::PeriodHasDrafts { count, .. }) = &self {
            body["draft_count"] = json!(count);
        }

        (status, Json(body)).into_response()
    }
}
