//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - Administrative routes for posting and period close
//! - Event routes that trigger the journal automations
//! - JSON error responses for the ledger error taxonomy

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use fieldledger_core::accounts::AccountCodeResolver;
use fieldledger_db::{AutomationRepository, JournalRepository, PeriodRepository, PostingRepository};
use fieldledger_shared::AccountingConfig;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Semantic role to account code table, built once at startup.
    pub resolver: Arc<AccountCodeResolver>,
    /// Accounting automation settings.
    pub accounting: AccountingConfig,
}

impl AppState {
    pub(crate) fn journal(&self) -> JournalRepository {
        JournalRepository::new(Arc::clone(&self.db))
    }

    pub(crate) fn posting(&self) -> PostingRepository {
        PostingRepository::new(Arc::clone(&self.db))
    }

    pub(crate) fn periods(&self) -> PeriodRepository {
        PeriodRepository::new(Arc::clone(&self.db))
    }

    pub(crate) fn automation(&self) -> AutomationRepository {
        AutomationRepository::new(
            Arc::clone(&self.db),
            Arc::clone(&self.resolver),
            self.accounting.vendor_invoice_terms_days,
        )
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
