//! Posting preconditions.
//!
//! The posting workflow re-validates an entry against the lines currently
//! stored, not the totals seen at creation time.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{EntryTotals, JournalEntryStatus};
use crate::fiscal::PeriodStatus;

/// Minimum number of lines a postable entry carries.
pub const MIN_POSTING_LINES: usize = 2;

/// Rejects entries that are already posted.
///
/// # Errors
///
/// Returns `EntryAlreadyPosted`.
pub fn ensure_draft(entry_id: Uuid, status: JournalEntryStatus) -> Result<(), LedgerError> {
    match status {
        JournalEntryStatus::Draft => Ok(()),
        JournalEntryStatus::Posted => Err(LedgerError::EntryAlreadyPosted(entry_id)),
    }
}

/// Rejects periods that are not OPEN.
///
/// # Errors
///
/// Returns `PeriodNotOpen` with the current status.
pub fn ensure_period_open(period_id: Uuid, status: PeriodStatus) -> Result<(), LedgerError> {
    if status.allows_posting() {
        Ok(())
    } else {
        Err(LedgerError::PeriodNotOpen { period_id, status })
    }
}

/// Recomputes totals from stored `(debit, credit)` pairs.
///
/// # Errors
///
/// Returns `InsufficientLines` for fewer than two lines and
/// `UnbalancedEntry` when the totals differ by more than the tolerance.
pub fn validate_posting_lines(amounts: &[(Decimal, Decimal)]) -> Result<EntryTotals, LedgerError> {
    if amounts.len() < MIN_POSTING_LINES {
        return Err(LedgerError::InsufficientLines {
            count: amounts.len(),
        });
    }

    let totals = EntryTotals::from_amounts(amounts.iter().copied());
    if !totals.is_balanced() {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.debit,
            credit: totals.credit,
        });
    }
    Ok(totals)
}
