//! Business rule validation for new journal entries.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryTotals, NewJournalEntry};

/// Validates one line: exactly one side strictly positive, neither negative.
///
/// # Errors
///
/// Returns `InvalidLine` describing the violation.
pub fn validate_line(
    line_number: usize,
    debit: Decimal,
    credit: Decimal,
) -> Result<(), LedgerError> {
    let reason = if debit < Decimal::ZERO || credit < Decimal::ZERO {
        Some("amounts cannot be negative")
    } else if debit > Decimal::ZERO && credit > Decimal::ZERO {
        Some("line cannot carry both a debit and a credit")
    } else if debit.is_zero() && credit.is_zero() {
        Some("line must carry a debit or a credit")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(LedgerError::InvalidLine { line_number, reason }),
        None => Ok(()),
    }
}

/// Validates a new entry before any database work.
///
/// Checks that lines exist, that each line is well formed, and that the
/// entry balances within the tolerance. Account and period checks need the
/// database and happen in the writer.
///
/// # Errors
///
/// Returns `EmptyEntry`, `InvalidLine` or `UnbalancedEntry`.
pub fn validate_new_entry(entry: &NewJournalEntry) -> Result<EntryTotals, LedgerError> {
    if entry.lines.is_empty() {
        return Err(LedgerError::EmptyEntry);
    }

    for (idx, line) in entry.lines.iter().enumerate() {
        validate_line(idx + 1, line.debit, line.credit)?;
    }

    let totals = entry.totals();
    if !totals.is_balanced() {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::JournalLineInput;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn make_entry(lines: Vec<JournalLineInput>) -> NewJournalEntry {
        NewJournalEntry {
            source: None,
            entry_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: "Test entry".to_string(),
            reference: None,
            lines,
        }
    }

    #[test]
    fn test_balanced_entry() {
        let entry = make_entry(vec![
            JournalLineInput::debit("1300", dec!(100.00), "Inventory"),
            JournalLineInput::credit("2000", dec!(100.00), "AP"),
        ]);
        let totals = validate_new_entry(&entry).unwrap();
        assert_eq!(totals.debit, dec!(100.00));
        assert_eq!(totals.credit, dec!(100.00));
    }

    #[test]
    fn test_empty_entry() {
        assert!(matches!(
            validate_new_entry(&make_entry(vec![])),
            Err(LedgerError::EmptyEntry)
        ));
    }

    #[test]
    fn test_unbalanced_entry() {
        let entry = make_entry(vec![
            JournalLineInput::debit("1300", dec!(100.00), "Inventory"),
            JournalLineInput::credit("2000", dec!(99.98), "AP"),
        ]);
        assert!(matches!(
            validate_new_entry(&entry),
            Err(LedgerError::UnbalancedEntry { .. })
        ));
    }

    #[test]
    fn test_cent_difference_tolerated() {
        let entry = make_entry(vec![
            JournalLineInput::debit("1300", dec!(100.00), "Inventory"),
            JournalLineInput::credit("2000", dec!(99.99), "AP"),
        ]);
        assert!(validate_new_entry(&entry).is_ok());
    }

    #[test]
    fn test_line_with_both_sides_rejected() {
        let mut line = JournalLineInput::debit("1300", dec!(10), "both");
        line.credit = dec!(10);
        assert!(matches!(
            validate_new_entry(&make_entry(vec![line])),
            Err(LedgerError::InvalidLine { line_number: 1, .. })
        ));
    }

    #[test]
    fn test_zero_line_rejected() {
        let entry = make_entry(vec![
            JournalLineInput::debit("1300", dec!(10), "ok"),
            JournalLineInput::credit("2000", dec!(10), "ok"),
            JournalLineInput::debit("5100", Decimal::ZERO, "zero"),
        ]);
        assert!(matches!(
            validate_new_entry(&entry),
            Err(LedgerError::InvalidLine { line_number: 3, .. })
        ));
    }

    #[test]
    fn test_negative_line_rejected() {
        assert!(matches!(
            validate_line(2, dec!(-5), Decimal::ZERO),
            Err(LedgerError::InvalidLine {
                line_number: 2,
                reason: "amounts cannot be negative"
            })
        ));
    }
}
