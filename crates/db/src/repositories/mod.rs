//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every multi-statement workflow owns its transaction: it commits on success
//! and rolls back explicitly before returning an error.

pub mod account;
pub mod automation;
#[cfg(test)]
mod fixtures;
pub mod journal;
pub mod period;
pub mod posting;

pub use account::{AccountError, AccountFilter, AccountRepository, CreateAccountInput};
pub use automation::AutomationRepository;
pub use journal::{JournalEntryDetail, JournalLineDetail, JournalRepository};
pub use period::PeriodRepository;
pub use posting::PostingRepository;

use fieldledger_core::ledger::LedgerError;
use sea_orm::{DatabaseTransaction, DbErr, SqlErr};

/// Name of the unique index backing the idempotency guard.
pub(crate) const SOURCE_UNIQUE_INDEX: &str = "uq_journal_entries_source";

/// Maps a database error into the ledger taxonomy.
pub(crate) fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}

/// Returns true if `err` is a violation of the idempotency index.
pub(crate) fn is_source_conflict(err: &DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains(SOURCE_UNIQUE_INDEX)
    )
}

/// Rolls back `txn`, logging (not masking) a failed rollback.
pub(crate) async fn rollback(txn: DatabaseTransaction, operation: &'static str) {
    if let Err(err) = txn.rollback().await {
        tracing::warn!(operation, error = %err, "Transaction rollback failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_err_maps_to_database_variant() {
        let err = db_err(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, LedgerError::Database(ref msg) if msg.contains("connection reset")));
        assert_eq!(err.http_status_code(), 500);
    }

    #[test]
    fn test_non_sql_error_is_not_a_source_conflict() {
        assert!(!is_source_conflict(&DbErr::Custom(SOURCE_UNIQUE_INDEX.to_string())));
        assert!(!is_source_conflict(&DbErr::RecordNotFound("x".to_string())));
    }
}
