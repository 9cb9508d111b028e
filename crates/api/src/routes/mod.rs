//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod events;
pub mod health;
pub mod journal;
pub mod periods;

/// Creates the `/api/v1` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(journal::routes())
        .merge(periods::routes())
        .merge(events::routes())
}
