//! Property-based tests for entry validation rules.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{JournalLineInput, NewJournalEntry};
use super::validation::validate_new_entry;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_entry(lines: Vec<JournalLineInput>) -> NewJournalEntry {
    NewJournalEntry {
        source: None,
        entry_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        description: "prop".to_string(),
        reference: None,
        lines,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any split of debits against a single balancing credit validates.
    #[test]
    fn prop_balanced_entries_accepted(debits in prop::collection::vec(positive_amount(), 1..6)) {
        let total: Decimal = debits.iter().copied().sum();
        let mut lines: Vec<JournalLineInput> = debits
            .iter()
            .map(|amount| JournalLineInput::debit("5100", *amount, "debit"))
            .collect();
        lines.push(JournalLineInput::credit("1350", total, "credit"));

        let totals = validate_new_entry(&make_entry(lines)).unwrap();
        prop_assert_eq!(totals.debit, totals.credit);
    }

    /// Differences beyond one cent are rejected with the computed totals.
    #[test]
    fn prop_unbalanced_entries_rejected(
        amount in positive_amount(),
        extra_cents in 2i64..10_000i64,
    ) {
        let credit = amount + Decimal::new(extra_cents, 2);
        let entry = make_entry(vec![
            JournalLineInput::debit("1300", amount, "debit"),
            JournalLineInput::credit("2000", credit, "credit"),
        ]);

        match validate_new_entry(&entry) {
            Err(LedgerError::UnbalancedEntry { debit, credit: got }) => {
                prop_assert_eq!(debit, amount);
                prop_assert_eq!(got, credit);
            }
            other => prop_assert!(false, "expected UnbalancedEntry, got {:?}", other),
        }
    }

    /// A negative amount on either side is rejected regardless of balance.
    #[test]
    fn prop_negative_amount_rejected(amount in positive_amount()) {
        let mut line = JournalLineInput::debit("1300", Decimal::ZERO, "neg");
        line.credit = -amount;
        let entry = make_entry(vec![
            JournalLineInput::debit("1300", amount, "ok"),
            line,
        ]);

        let result = validate_new_entry(&entry);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidLine { line_number: 2, .. })),
            "Negative amount should be rejected, got: {:?}",
            result
        );
    }
}
