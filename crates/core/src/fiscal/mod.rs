//! Accounting periods and their lifecycle.

pub mod calendar;
pub mod period;

#[cfg(test)]
mod calendar_props;

pub use calendar::{PeriodSpec, generate_monthly_periods, last_day_of_month, month_name};
pub use period::{PeriodAction, PeriodStatus, ensure_no_drafts, validate_transition};
