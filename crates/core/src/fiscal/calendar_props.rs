//! Property-based tests for monthly period generation.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use super::calendar::{generate_monthly_periods, months_spanned};
use crate::ledger::LedgerError;

/// Strategy to generate a date range that stays within twelve calendar months.
fn date_range() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (2000i32..2100, 1u32..=12, 1u32..=28, 0i64..330).prop_map(|(y, m, d, len)| {
        let start = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        (start, start + chrono::Duration::days(len))
    })
}

/// Strategy to generate a range that reaches into a thirteenth month or beyond.
fn long_range() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (2000i32..2100, 1u32..=12, 1u32..=28, 366i64..1500).prop_map(|(y, m, d, len)| {
        let start = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        (start, start + chrono::Duration::days(len))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Generated periods tile the range with no gaps or overlaps.
    #[test]
    fn prop_periods_are_contiguous((start, end) in date_range()) {
        let periods = generate_monthly_periods(start.year(), start, end).unwrap();

        prop_assert!(!periods.is_empty());
        prop_assert_eq!(periods[0].start_date, start);
        prop_assert_eq!(periods[periods.len() - 1].end_date, end);

        for pair in periods.windows(2) {
            prop_assert_eq!(pair[0].end_date.succ_opt().unwrap(), pair[1].start_date);
        }
    }

    /// Each period stays within one calendar month and numbers increase by one.
    #[test]
    fn prop_periods_stay_within_a_month((start, end) in date_range()) {
        let periods = generate_monthly_periods(start.year(), start, end).unwrap();

        for (idx, period) in periods.iter().enumerate() {
            prop_assert!(period.start_date <= period.end_date);
            prop_assert_eq!(period.start_date.month(), period.end_date.month());
            prop_assert_eq!(period.start_date.year(), period.end_date.year());
            prop_assert_eq!(usize::try_from(period.period_number).unwrap(), idx + 1);
        }
    }

    /// Ranges reaching a thirteenth month are refused rather than numbered past 12.
    #[test]
    fn prop_long_ranges_rejected((start, end) in long_range()) {
        prop_assert!(months_spanned(start, end) > 12);
        let result = generate_monthly_periods(start.year(), start, end);
        let rejected = matches!(result, Err(LedgerError::FiscalYearTooLong { .. }));
        prop_assert!(rejected);
    }
}
