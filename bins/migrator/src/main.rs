//! Database migration runner for FieldLedger.
//!
//! Reads `DATABASE_URL`. Usage:
//!   migrator up      - Apply the ledger and operations schemas
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop everything and re-apply (development only)

use fieldledger_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI sets up its own tracing.
    cli::run_cli(Migrator).await;
}
