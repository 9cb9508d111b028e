//! Posting workflow: DRAFT to POSTED, exactly once.

use std::sync::Arc;

use chrono::Utc;
use fieldledger_core::ledger::{
    EntryTotals, LedgerError, ensure_draft, ensure_period_open, validate_posting_lines,
};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter,
    QuerySelect, TransactionTrait,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::journal::{JournalEntryDetail, load_detail};
use super::{db_err, rollback};
use crate::entities::{
    accounting_periods, journal_entries, journal_entry_lines,
    sea_orm_active_enums::JournalEntryStatus,
};

/// Posting repository.
#[derive(Debug, Clone)]
pub struct PostingRepository {
    db: Arc<DatabaseConnection>,
}

impl PostingRepository {
    /// Creates a new posting repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Posts a DRAFT entry.
    ///
    /// The entry row is held `FOR UPDATE` and its period `FOR SHARE` for the
    /// whole transaction. The status flip is conditional on the row still
    /// being DRAFT, so of two racing posters exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The entry does not exist (`EntryNotFound`)
    /// - The entry is already POSTED (`EntryAlreadyPosted`)
    /// - Its period is not OPEN (`PeriodNotOpen`)
    /// - It has fewer than two lines or does not balance
    /// - Another poster won the race (`ConcurrentModification`)
    /// - Database operation fails
    pub async fn post_entry(
        &self,
        entry_id: Uuid,
        user_id: Uuid,
    ) -> Result<JournalEntryDetail, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        match post_in(&txn, entry_id, user_id).await {
            Ok((detail, totals)) => {
                txn.commit().await.map_err(db_err)?;
                info!(
                    entry_id = %entry_id,
                    entry_number = %detail.entry.entry_number,
                    period_id = %detail.entry.period_id,
                    posted_by = %user_id,
                    debit = %totals.debit,
                    credit = %totals.credit,
                    "Posted journal entry"
                );
                Ok(detail)
            }
            Err(err) => {
                rollback(txn, "post_entry").await;
                match &err {
                    LedgerError::Database(_) | LedgerError::Internal(_) => {
                        error!(
                            entry_id = %entry_id,
                            user_id = %user_id,
                            error = %err,
                            "Posting failed"
                        );
                    }
                    _ => {
                        warn!(
                            entry_id = %entry_id,
                            user_id = %user_id,
                            error = %err,
                            "Posting rejected"
                        );
                    }
                }
                Err(err)
            }
        }
    }
}

async fn post_in(
    txn: &DatabaseTransaction,
    entry_id: Uuid,
    user_id: Uuid,
) -> Result<(JournalEntryDetail, EntryTotals), LedgerError> {
    let entry = journal_entries::Entity::find_by_id(entry_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(LedgerError::EntryNotFound(entry_id))?;

    ensure_draft(entry.id, entry.status.into())?;

    let period = accounting_periods::Entity::find_by_id(entry.period_id)
        .lock_shared()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(LedgerError::PeriodNotFound(entry.period_id))?;

    ensure_period_open(period.id, period.status.into())?;

    let amounts: Vec<(Decimal, Decimal)> = journal_entry_lines::Entity::find()
        .select_only()
        .column(journal_entry_lines::Column::Debit)
        .column(journal_entry_lines::Column::Credit)
        .filter(journal_entry_lines::Column::EntryId.eq(entry.id))
        .into_tuple()
        .all(txn)
        .await
        .map_err(db_err)?;

    let totals = validate_posting_lines(&amounts)?;

    let now: DateTimeWithTimeZone = Utc::now().into();
    let result = journal_entries::Entity::update_many()
        .col_expr(
            journal_entries::Column::Status,
            JournalEntryStatus::Posted.as_enum(),
        )
        .col_expr(journal_entries::Column::PostedBy, Expr::value(user_id))
        .col_expr(journal_entries::Column::PostedAt, Expr::value(now))
        .col_expr(journal_entries::Column::UpdatedAt, Expr::value(now))
        .filter(journal_entries::Column::Id.eq(entry.id))
        .filter(journal_entries::Column::Status.eq(JournalEntryStatus::Draft))
        .exec(txn)
        .await
        .map_err(db_err)?;

    if result.rows_affected == 0 {
        return Err(LedgerError::ConcurrentModification);
    }

    let posted = journal_entries::Entity::find_by_id(entry.id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(LedgerError::EntryNotFound(entry.id))?;

    Ok((load_detail(txn, posted).await?, totals))
}
