//! Journal entry writer, idempotency guard and entry reads.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use fieldledger_core::automation::VendorInvoiceDraft;
use fieldledger_core::ledger::{
    LedgerError, NewJournalEntry, SourceKey, WriteOutcome, ensure_period_open, validate_new_entry,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{db_err, is_source_conflict, rollback};
use crate::entities::{
    accounting_periods, accounts, journal_entries, journal_entry_lines,
    sea_orm_active_enums::{JournalEntryStatus, JournalSourceType, VendorInvoiceStatus},
    vendor_invoices,
};

/// A stored line with its account's code and name.
#[derive(Debug, Clone, Serialize)]
pub struct JournalLineDetail {
    /// The line record.
    #[serde(flatten)]
    pub line: journal_entry_lines::Model,
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
}

/// A stored entry with its lines, in line-number order.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntryDetail {
    /// The header record.
    #[serde(flatten)]
    pub entry: journal_entries::Model,
    /// The lines.
    pub lines: Vec<JournalLineDetail>,
}

/// Why a write did not produce a new entry.
enum WriteFailure {
    /// Another writer recorded the same source key first.
    SourceConflict,
    /// Any other failure.
    Ledger(LedgerError),
}

impl From<LedgerError> for WriteFailure {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

/// Journal entry repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: Arc<DatabaseConnection>,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Returns the entry already recorded for `key`, if any.
    ///
    /// Advisory only: the unique index on the source columns is what
    /// guarantees a key owns at most one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_existing_entry(&self, key: &SourceKey) -> Result<Option<Uuid>, LedgerError> {
        Ok(find_by_source(&*self.db, key).await?.map(|entry| entry.id))
    }

    /// Creates a DRAFT entry and its lines atomically.
    ///
    /// Entries carrying a source key are idempotent: if the key is already
    /// recorded, including by a concurrent writer that won the race, the
    /// existing entry is returned with `replayed = true`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The lines are empty, malformed or unbalanced
    /// - An account code is unknown, inactive or not a posting account
    /// - No OPEN period covers the entry date
    /// - Database operation fails
    pub async fn create_entry(&self, entry: NewJournalEntry) -> Result<WriteOutcome, LedgerError> {
        self.record(&entry, None).await
    }

    /// Loads an entry with its lines joined to account code and name.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or a database error.
    pub async fn get_entry_detail(
        &self,
        entry_id: Uuid,
    ) -> Result<JournalEntryDetail, LedgerError> {
        let entry = journal_entries::Entity::find_by_id(entry_id)
            .one(&*self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        load_detail(&*self.db, entry).await
    }

    /// Validates, checks the guard, then writes inside one transaction.
    ///
    /// A vendor invoice, when given, is inserted in the same transaction and
    /// linked to the new entry.
    pub(crate) async fn record(
        &self,
        entry: &NewJournalEntry,
        invoice: Option<&VendorInvoiceDraft>,
    ) -> Result<WriteOutcome, LedgerError> {
        let totals = validate_new_entry(entry).inspect_err(|err| {
            error!(
                description = %entry.description,
                entry_date = %entry.entry_date,
                source = ?entry.source,
                error = %err,
                "Rejected invalid journal entry"
            );
        })?;

        if let Some(key) = &entry.source {
            if let Some(existing) = find_by_source(&*self.db, key).await? {
                info!(
                    entry_id = %existing.id,
                    source_type = %key.source_type,
                    source_id = %key.source_id,
                    "Source event already recorded, returning existing entry"
                );
                return Ok(replayed(existing));
            }
        }

        let txn = self.db.begin().await.map_err(db_err)?;

        match write_entry(&txn, entry, invoice).await {
            Ok(header) => {
                txn.commit().await.map_err(db_err)?;
                info!(
                    entry_id = %header.id,
                    entry_number = %header.entry_number,
                    period_id = %header.period_id,
                    debit = %totals.debit,
                    credit = %totals.credit,
                    source = ?entry.source,
                    "Created draft journal entry"
                );
                Ok(WriteOutcome {
                    entry_id: header.id,
                    entry_number: header.entry_number,
                    replayed: false,
                })
            }
            Err(WriteFailure::SourceConflict) => {
                rollback(txn, "create_entry").await;
                self.resolve_conflict(entry).await
            }
            Err(WriteFailure::Ledger(err)) => {
                rollback(txn, "create_entry").await;
                error!(
                    description = %entry.description,
                    entry_date = %entry.entry_date,
                    debit = %totals.debit,
                    credit = %totals.credit,
                    source = ?entry.source,
                    error = %err,
                    "Failed to create journal entry, rolled back"
                );
                Err(err)
            }
        }
    }

    /// Re-reads the guard after losing the insert race.
    async fn resolve_conflict(&self, entry: &NewJournalEntry) -> Result<WriteOutcome, LedgerError> {
        let Some(key) = &entry.source else {
            return Err(LedgerError::ConcurrentModification);
        };

        match find_by_source(&*self.db, key).await? {
            Some(existing) => {
                info!(
                    entry_id = %existing.id,
                    source_type = %key.source_type,
                    source_id = %key.source_id,
                    "Lost idempotency race, returning the winning entry"
                );
                Ok(replayed(existing))
            }
            None => {
                warn!(
                    source_type = %key.source_type,
                    source_id = %key.source_id,
                    "Idempotency conflict reported but no entry found"
                );
                Err(LedgerError::ConcurrentModification)
            }
        }
    }
}

fn replayed(entry: journal_entries::Model) -> WriteOutcome {
    WriteOutcome {
        entry_id: entry.id,
        entry_number: entry.entry_number,
        replayed: true,
    }
}

/// Looks up the entry recorded for a source key.
pub(crate) async fn find_by_source<C: ConnectionTrait>(
    conn: &C,
    key: &SourceKey,
) -> Result<Option<journal_entries::Model>, LedgerError> {
    journal_entries::Entity::find()
        .filter(journal_entries::Column::SourceType.eq(JournalSourceType::from(key.source_type)))
        .filter(journal_entries::Column::SourceId.eq(key.source_id.as_str()))
        .one(conn)
        .await
        .map_err(db_err)
}

/// Loads the lines of `entry` joined to their accounts.
pub(crate) async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    entry: journal_entries::Model,
) -> Result<JournalEntryDetail, LedgerError> {
    let rows = journal_entry_lines::Entity::find()
        .filter(journal_entry_lines::Column::EntryId.eq(entry.id))
        .order_by_asc(journal_entry_lines::Column::LineNumber)
        .find_also_related(accounts::Entity)
        .all(conn)
        .await
        .map_err(db_err)?;

    let mut lines = Vec::with_capacity(rows.len());
    for (line, account) in rows {
        let account = account.ok_or_else(|| {
            LedgerError::Internal(format!("line {} references a missing account", line.id))
        })?;
        lines.push(JournalLineDetail {
            line,
            account_code: account.code,
            account_name: account.name,
        });
    }

    Ok(JournalEntryDetail { entry, lines })
}

/// Inserts the header, lines and optional invoice on `conn`.
///
/// The covering period is read `FOR SHARE`, so a concurrent close waits for
/// this transaction and then sees the new draft.
async fn write_entry<C: ConnectionTrait>(
    conn: &C,
    entry: &NewJournalEntry,
    invoice: Option<&VendorInvoiceDraft>,
) -> Result<journal_entries::Model, WriteFailure> {
    let period = accounting_periods::Entity::find()
        .filter(accounting_periods::Column::StartDate.lte(entry.entry_date))
        .filter(accounting_periods::Column::EndDate.gte(entry.entry_date))
        .lock_shared()
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or(LedgerError::NoPeriodForDate(entry.entry_date))?;

    ensure_period_open(period.id, period.status.into())?;

    let account_ids = resolve_accounts(conn, entry).await?;

    let now = Utc::now().into();
    let header = journal_entries::ActiveModel {
        id: Set(Uuid::now_v7()),
        entry_date: Set(entry.entry_date),
        period_id: Set(period.id),
        status: Set(JournalEntryStatus::Draft),
        description: Set(entry.description.clone()),
        reference: Set(entry.reference.clone()),
        source_type: Set(entry.source.as_ref().map(|k| k.source_type.into())),
        source_id: Set(entry.source.as_ref().map(|k| k.source_id.clone())),
        posted_by: Set(None),
        posted_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        // Assigned by the database sequence.
        ..Default::default()
    };

    let header = match header.insert(conn).await {
        Ok(header) => header,
        Err(err) if is_source_conflict(&err) => return Err(WriteFailure::SourceConflict),
        Err(err) => return Err(db_err(err).into()),
    };

    for (idx, (line, account_id)) in entry.lines.iter().zip(account_ids).enumerate() {
        let line_number = i32::try_from(idx + 1)
            .map_err(|_| LedgerError::Internal("too many journal lines".to_string()))?;
        journal_entry_lines::ActiveModel {
            id: Set(Uuid::now_v7()),
            entry_id: Set(header.id),
            line_number: Set(line_number),
            account_id: Set(account_id),
            debit: Set(line.debit),
            credit: Set(line.credit),
            description: Set(line.description.clone()),
            created_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(db_err)?;
    }

    if let Some(invoice) = invoice {
        vendor_invoices::ActiveModel {
            id: Set(Uuid::now_v7()),
            purchase_order_id: Set(invoice.purchase_order_id.into_inner()),
            vendor_id: Set(invoice.vendor_id),
            invoice_number: Set(invoice.invoice_number.clone()),
            invoice_date: Set(invoice.invoice_date),
            due_date: Set(invoice.due_date),
            amount: Set(invoice.amount),
            status: Set(VendorInvoiceStatus::Pending),
            journal_entry_id: Set(header.id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(db_err)?;
    }

    Ok(header)
}

/// Resolves each line's account code to an active posting account id.
async fn resolve_accounts<C: ConnectionTrait>(
    conn: &C,
    entry: &NewJournalEntry,
) -> Result<Vec<Uuid>, LedgerError> {
    let mut codes: Vec<&str> = entry.lines.iter().map(|l| l.account_code.as_str()).collect();
    codes.sort_unstable();
    codes.dedup();

    let found: HashMap<String, accounts::Model> = accounts::Entity::find()
        .filter(accounts::Column::Code.is_in(codes))
        .all(conn)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|account| (account.code.clone(), account))
        .collect();

    entry
        .lines
        .iter()
        .map(|line| {
            let account = found
                .get(&line.account_code)
                .ok_or_else(|| LedgerError::AccountNotFound(line.account_code.clone()))?;
            if !account.is_active {
                return Err(LedgerError::AccountInactive(account.code.clone()));
            }
            if !account.is_posting {
                return Err(LedgerError::AccountNotPostable(account.code.clone()));
            }
            Ok(account.id)
        })
        .collect()
}
