//! Monthly period calendars.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::ledger::LedgerError;

/// Most monthly periods one fiscal year may hold.
pub const MAX_PERIODS_PER_YEAR: i64 = 12;

/// One generated period, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSpec {
    /// Display name, e.g. "March 2024".
    pub name: String,
    /// Fiscal year the period belongs to.
    pub fiscal_year: i32,
    /// 1-based position within the fiscal year.
    pub period_number: i16,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
}

/// Splits `[start_date, end_date]` into calendar-month periods.
///
/// The first and last periods are truncated to the range.
///
/// # Errors
///
/// Returns `InvalidPeriodRange` when `start_date > end_date` and
/// `FiscalYearTooLong` when the range touches more than twelve months.
pub fn generate_monthly_periods(
    fiscal_year: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<PeriodSpec>, LedgerError> {
    if start_date > end_date {
        return Err(LedgerError::InvalidPeriodRange {
            start: start_date,
            end: end_date,
        });
    }

    let months = months_spanned(start_date, end_date);
    if months > MAX_PERIODS_PER_YEAR {
        return Err(LedgerError::FiscalYearTooLong {
            start: start_date,
            end: end_date,
            months,
        });
    }

    let mut periods = Vec::new();
    let mut current = start_date;

    for period_number in 1..=12_i16 {
        let month_end = last_day_of_month(current.year(), current.month());
        let period_end = month_end.min(end_date);

        periods.push(PeriodSpec {
            name: format!("{} {}", month_name(current.month()), current.year()),
            fiscal_year,
            period_number,
            start_date: current,
            end_date: period_end,
        });

        match month_end.succ_opt() {
            Some(next) if next <= end_date => current = next,
            _ => break,
        }
    }

    Ok(periods)
}

/// Number of calendar months touched by `[start, end]`, counting partial months.
#[must_use]
pub fn months_spanned(start: NaiveDate, end: NaiveDate) -> i64 {
    let years = i64::from(end.year()) - i64::from(start.year());
    years * 12 + i64::from(end.month()) - i64::from(start.month()) + 1
}

/// Returns the last day of a month.
#[must_use]
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Returns the English month name.
#[must_use]
pub const fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_generate_monthly_periods_full_year() {
        let periods =
            generate_monthly_periods(2024, date(2024, 1, 1), date(2024, 12, 31)).unwrap();

        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0].name, "January 2024");
        assert_eq!(periods[0].start_date, date(2024, 1, 1));
        assert_eq!(periods[0].end_date, date(2024, 1, 31));
        assert_eq!(periods[1].end_date, date(2024, 2, 29));
        assert_eq!(periods[11].name, "December 2024");
        assert_eq!(periods[11].period_number, 12);
        assert_eq!(periods[11].end_date, date(2024, 12, 31));
        assert!(periods.iter().all(|p| p.fiscal_year == 2024));
    }

    #[test]
    fn test_generate_monthly_periods_partial_year() {
        let periods =
            generate_monthly_periods(2025, date(2024, 7, 15), date(2024, 9, 10)).unwrap();

        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].start_date, date(2024, 7, 15));
        assert_eq!(periods[0].end_date, date(2024, 7, 31));
        assert_eq!(periods[1].start_date, date(2024, 8, 1));
        assert_eq!(periods[2].end_date, date(2024, 9, 10));
    }

    #[test]
    fn test_generate_monthly_periods_reversed_range() {
        assert!(matches!(
            generate_monthly_periods(2024, date(2024, 2, 1), date(2024, 1, 1)),
            Err(LedgerError::InvalidPeriodRange { .. })
        ));
    }

    #[test]
    fn test_offset_fiscal_year_fills_twelve_periods() {
        let periods =
            generate_monthly_periods(2025, date(2024, 7, 15), date(2025, 6, 30)).unwrap();

        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0].start_date, date(2024, 7, 15));
        assert_eq!(periods[11].period_number, 12);
        assert_eq!(periods[11].start_date, date(2025, 6, 1));
        assert_eq!(periods[11].end_date, date(2025, 6, 30));
    }

    #[test]
    fn test_range_over_twelve_months_rejected() {
        let err = generate_monthly_periods(2024, date(2024, 1, 1), date(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, LedgerError::FiscalYearTooLong { months: 13, .. }));

        let err = generate_monthly_periods(2024, date(2024, 1, 1), date(2026, 12, 31)).unwrap_err();
        assert!(matches!(err, LedgerError::FiscalYearTooLong { months: 36, .. }));
    }

    #[test]
    fn test_months_spanned() {
        assert_eq!(months_spanned(date(2024, 3, 31), date(2024, 3, 31)), 1);
        assert_eq!(months_spanned(date(2024, 3, 31), date(2024, 4, 1)), 2);
        assert_eq!(months_spanned(date(2024, 1, 1), date(2024, 12, 31)), 12);
        assert_eq!(months_spanned(date(2024, 11, 1), date(2025, 2, 1)), 4);
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2024, 1), date(2024, 1, 31));
        assert_eq!(last_day_of_month(2024, 2), date(2024, 2, 29));
        assert_eq!(last_day_of_month(2023, 2), date(2023, 2, 28));
        assert_eq!(last_day_of_month(2024, 4), date(2024, 4, 30));
        assert_eq!(last_day_of_month(2024, 12), date(2024, 12, 31));
    }
}
