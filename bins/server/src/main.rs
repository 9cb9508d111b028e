//! FieldLedger API Server
//!
//! Main entry point for the accounting core service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fieldledger_api::{AppState, create_router};
use fieldledger_core::accounts::{AccountCodeResolver, SemanticRole};
use fieldledger_db::connect;
use fieldledger_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Bad accounting settings stop startup here, not on the first event.
    config
        .accounting
        .validate()
        .context("Invalid accounting configuration")?;
    let resolver = AccountCodeResolver::from_overrides(&config.accounting.account_codes)
        .context("Invalid accounting.account_codes")?;
    for role in SemanticRole::ALL {
        info!(role = role.key(), code = resolver.resolve(role)?, "Account mapping");
    }

    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let state = AppState {
        db: Arc::new(db),
        resolver: Arc::new(resolver),
        accounting: config.accounting.clone(),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
