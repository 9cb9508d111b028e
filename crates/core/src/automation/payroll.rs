//! Time approval: accrue payroll owed for approved hours.

use std::collections::HashSet;

use chrono::NaiveDate;
use fieldledger_shared::types::TimeEntryId;
use rust_decimal::Decimal;

use super::{TIME_ENTRY_STATUS_APPROVED, round_to_cents};
use crate::accounts::{AccountCodeResolver, SemanticRole};
use crate::ledger::{JournalLineInput, LedgerError, NewJournalEntry, SourceKey};

/// Hours, rates and status of one time entry.
///
/// Missing hours or rates count as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntryPay {
    /// The time entry.
    pub id: TimeEntryId,
    /// Current status.
    pub status: String,
    /// Work date.
    pub entry_date: NaiveDate,
    /// Regular hours worked.
    pub regular_hours: Option<Decimal>,
    /// Regular hourly rate.
    pub regular_rate: Option<Decimal>,
    /// Overtime hours worked.
    pub overtime_hours: Option<Decimal>,
    /// Overtime hourly rate.
    pub overtime_rate: Option<Decimal>,
    /// Double-time hours worked.
    pub double_time_hours: Option<Decimal>,
    /// Double-time hourly rate.
    pub double_time_rate: Option<Decimal>,
}

impl TimeEntryPay {
    /// Gross pay for the entry, rounded to cents.
    #[must_use]
    pub fn gross_pay(&self) -> Decimal {
        let part = |hours: Option<Decimal>, rate: Option<Decimal>| {
            hours.unwrap_or_default() * rate.unwrap_or_default()
        };
        round_to_cents(
            part(self.regular_hours, self.regular_rate)
                + part(self.overtime_hours, self.overtime_rate)
                + part(self.double_time_hours, self.double_time_rate),
        )
    }

    fn is_approved(&self) -> bool {
        self.status == TIME_ENTRY_STATUS_APPROVED
    }
}

/// Checks that every requested entry was found and is approved.
///
/// A batch is accrued whole or not at all.
///
/// # Errors
///
/// Returns `TimeEntriesNotApproved` listing missing or unapproved IDs in
/// sorted order.
pub fn ensure_all_approved(
    requested: &[TimeEntryId],
    found: &[TimeEntryPay],
) -> Result<(), LedgerError> {
    let approved: HashSet<TimeEntryId> = found
        .iter()
        .filter(|entry| entry.is_approved())
        .map(|entry| entry.id)
        .collect();

    let mut rejected: Vec<_> = requested
        .iter()
        .filter(|id| !approved.contains(*id))
        .map(|id| id.into_inner())
        .collect();

    if rejected.is_empty() {
        return Ok(());
    }
    rejected.sort_unstable();
    rejected.dedup();
    Err(LedgerError::TimeEntriesNotApproved { ids: rejected })
}

/// Builds the payroll accrual entry for an approved batch.
///
/// Exactly two lines: debit labor expense, credit wages payable, both equal
/// to the batch's gross pay. Dated on the latest work date in the batch.
///
/// # Errors
///
/// - `EmptyTimeEntryBatch` for an empty request
/// - `TimeEntriesNotApproved` if any requested entry is missing or unapproved
/// - `NegativeAmount` if an entry computes negative pay
/// - `NothingToPost` if the batch pays nothing
/// - `MissingAccountMapping` if a needed role is unmapped
pub fn build_payroll_accrual_entry(
    requested: &[TimeEntryId],
    entries: &[TimeEntryPay],
    resolver: &AccountCodeResolver,
) -> Result<NewJournalEntry, LedgerError> {
    let source = SourceKey::time_approval(requested)?;
    ensure_all_approved(requested, entries)?;

    let mut total = Decimal::ZERO;
    for entry in entries {
        let pay = entry.gross_pay();
        if pay < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount {
                component: "Payroll",
                amount: pay,
            });
        }
        total += pay;
    }

    let Some(entry_date) = entries.iter().map(|e| e.entry_date).max() else {
        return Err(LedgerError::EmptyTimeEntryBatch);
    };

    if total <= Decimal::ZERO {
        return Err(LedgerError::NothingToPost(format!(
            "{} approved time entries carry no pay",
            entries.len()
        )));
    }

    let description = format!("Payroll accrual - {} time entries", entries.len());
    let lines = vec![
        JournalLineInput::debit(
            resolver.resolve(SemanticRole::LaborExpense)?,
            total,
            "Labor expense",
        ),
        JournalLineInput::credit(
            resolver.resolve(SemanticRole::WagesPayable)?,
            total,
            "Wages payable",
        ),
    ];

    Ok(NewJournalEntry {
        source: Some(source),
        entry_date,
        description,
        reference: None,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn id(n: u128) -> TimeEntryId {
        TimeEntryId::from_uuid(Uuid::from_u128(n))
    }

    fn entry(n: u128, day: u32) -> TimeEntryPay {
        TimeEntryPay {
            id: id(n),
            status: "approved".to_string(),
            entry_date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            regular_hours: None,
            regular_rate: None,
            overtime_hours: None,
            overtime_rate: None,
            double_time_hours: None,
            double_time_rate: None,
        }
    }

    fn regular(n: u128, day: u32, hours: Decimal, rate: Decimal) -> TimeEntryPay {
        TimeEntryPay {
            regular_hours: Some(hours),
            regular_rate: Some(rate),
            ..entry(n, day)
        }
    }

    fn overtime(n: u128, day: u32, hours: Decimal, rate: Decimal) -> TimeEntryPay {
        TimeEntryPay {
            overtime_hours: Some(hours),
            overtime_rate: Some(rate),
            ..entry(n, day)
        }
    }

    #[test]
    fn test_regular_plus_overtime_accrual() {
        let entries = vec![
            regular(1, 2, dec!(8), dec!(30)),
            overtime(2, 3, dec!(2), dec!(45)),
        ];
        let built = build_payroll_accrual_entry(
            &[id(1), id(2)],
            &entries,
            &AccountCodeResolver::with_defaults(),
        )
        .unwrap();

        assert_eq!(built.lines.len(), 2);
        assert_eq!(built.lines[0].account_code, "5100");
        assert_eq!(built.lines[0].debit, dec!(330));
        assert_eq!(built.lines[1].account_code, "2100");
        assert_eq!(built.lines[1].credit, dec!(330));
        assert_eq!(built.entry_date, NaiveDate::from_ymd_opt(2024, 4, 3).unwrap());
    }

    #[test]
    fn test_gross_pay_all_tiers() {
        let e = TimeEntryPay {
            regular_hours: Some(dec!(8)),
            regular_rate: Some(dec!(30)),
            overtime_hours: Some(dec!(1.5)),
            overtime_rate: Some(dec!(45)),
            double_time_hours: Some(dec!(0.333)),
            double_time_rate: Some(dec!(60)),
            ..entry(1, 1)
        };
        // 240 + 67.5 + 19.98
        assert_eq!(e.gross_pay(), dec!(327.48));
    }

    #[test]
    fn test_missing_rate_counts_as_zero() {
        let e = TimeEntryPay {
            regular_hours: Some(dec!(8)),
            ..entry(1, 1)
        };
        assert_eq!(e.gross_pay(), Decimal::ZERO);
    }

    #[test]
    fn test_key_ignores_request_order() {
        let entries = vec![regular(1, 2, dec!(1), dec!(10)), regular(2, 2, dec!(1), dec!(10))];
        let resolver = AccountCodeResolver::with_defaults();
        let a = build_payroll_accrual_entry(&[id(1), id(2)], &entries, &resolver).unwrap();
        let b = build_payroll_accrual_entry(&[id(2), id(1)], &entries, &resolver).unwrap();
        assert_eq!(a.source, b.source);
    }

    #[test]
    fn test_missing_entry_rejects_batch() {
        let entries = vec![regular(1, 2, dec!(8), dec!(30))];
        let err = build_payroll_accrual_entry(
            &[id(1), id(9)],
            &entries,
            &AccountCodeResolver::with_defaults(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::TimeEntriesNotApproved { ref ids } if ids == &vec![Uuid::from_u128(9)]
        ));
    }

    #[test]
    fn test_unapproved_entry_rejects_batch() {
        let mut pending = regular(2, 2, dec!(8), dec!(30));
        pending.status = "submitted".to_string();
        let entries = vec![regular(1, 2, dec!(8), dec!(30)), pending];
        assert!(matches!(
            ensure_all_approved(&[id(1), id(2)], &entries),
            Err(LedgerError::TimeEntriesNotApproved { ids }) if ids == vec![Uuid::from_u128(2)]
        ));
    }

    #[test]
    fn test_zero_pay_batch_rejected() {
        let entries = vec![entry(1, 2)];
        let err =
            build_payroll_accrual_entry(&[id(1)], &entries, &AccountCodeResolver::with_defaults())
                .unwrap_err();
        assert!(matches!(err, LedgerError::NothingToPost(_)));
    }

    #[test]
    fn test_empty_request_rejected() {
        let err = build_payroll_accrual_entry(&[], &[], &AccountCodeResolver::with_defaults())
            .unwrap_err();
        assert!(matches!(err, LedgerError::EmptyTimeEntryBatch));
    }
}
