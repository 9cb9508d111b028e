//! Ledger domain types for entry creation and posting.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::source::SourceKey;

/// Largest |debits - credits| an entry may carry and still be posted.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Journal entry lifecycle. One-way: `DRAFT -> POSTED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JournalEntryStatus {
    /// Created, not yet part of the books.
    Draft,
    /// Posted to the ledger (immutable).
    Posted,
}

impl JournalEntryStatus {
    /// Returns the database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Posted => "POSTED",
        }
    }
}

/// One debit or credit movement within a new entry.
///
/// Lines reference accounts by code; the writer resolves codes to rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// Chart-of-accounts code.
    pub account_code: String,
    /// Debit amount (zero on credit lines).
    pub debit: Decimal,
    /// Credit amount (zero on debit lines).
    pub credit: Decimal,
    /// Optional line memo.
    pub description: Option<String>,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(
        account_code: impl Into<String>,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_code: account_code.into(),
            debit: amount,
            credit: Decimal::ZERO,
            description: Some(description.into()),
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(
        account_code: impl Into<String>,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_code: account_code.into(),
            debit: Decimal::ZERO,
            credit: amount,
            description: Some(description.into()),
        }
    }
}

/// Everything the writer needs to persist a draft entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalEntry {
    /// Originating business event; `None` for manual entries.
    pub source: Option<SourceKey>,
    /// Accounting date. Selects the period.
    pub entry_date: NaiveDate,
    /// Header description.
    pub description: String,
    /// Optional external reference (PO number, job number).
    pub reference: Option<String>,
    /// The lines, in line-number order.
    pub lines: Vec<JournalLineInput>,
}

impl NewJournalEntry {
    /// Returns the debit and credit sums of the lines.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        EntryTotals::from_amounts(self.lines.iter().map(|l| (l.debit, l.credit)))
    }
}

/// Debit and credit sums for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryTotals {
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
}

impl EntryTotals {
    /// Sums `(debit, credit)` pairs.
    pub fn from_amounts(amounts: impl IntoIterator<Item = (Decimal, Decimal)>) -> Self {
        amounts.into_iter().fold(
            Self {
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
            },
            |acc, (debit, credit)| Self {
                debit: acc.debit + debit,
                credit: acc.credit + credit,
            },
        )
    }

    /// Returns `debit - credit`.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true if the difference is within `BALANCE_TOLERANCE`.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.difference().abs() <= BALANCE_TOLERANCE
    }
}

/// Result of a writer call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    /// The new or pre-existing entry.
    pub entry_id: Uuid,
    /// Human-facing entry number, e.g. `JE-000042`.
    pub entry_number: String,
    /// True if the source key already had an entry and nothing was written.
    pub replayed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_is_one_cent() {
        assert_eq!(BALANCE_TOLERANCE, dec!(0.01));
    }

    #[test]
    fn test_totals_balanced_within_tolerance() {
        let totals = EntryTotals::from_amounts([(dec!(100.00), dec!(0)), (dec!(0), dec!(99.99))]);
        assert_eq!(totals.difference(), dec!(0.01));
        assert!(totals.is_balanced());
    }

    #[test]
    fn test_totals_unbalanced_beyond_tolerance() {
        let totals = EntryTotals::from_amounts([(dec!(0), dec!(100.00)), (dec!(99.98), dec!(0))]);
        assert_eq!(totals.difference(), dec!(-0.02));
        assert!(!totals.is_balanced());
    }

    #[test]
    fn test_line_constructors() {
        let debit = JournalLineInput::debit("5100", dec!(12.50), "Labor");
        assert_eq!(debit.debit, dec!(12.50));
        assert_eq!(debit.credit, Decimal::ZERO);

        let credit = JournalLineInput::credit("2100", dec!(12.50), "Wages");
        assert_eq!(credit.debit, Decimal::ZERO);
        assert_eq!(credit.credit, dec!(12.50));
        assert_eq!(credit.description.as_deref(), Some("Wages"));
    }
}
