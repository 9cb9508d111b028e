//! Ledger error types.
//!
//! One taxonomy covers the writer, the automations, posting and period
//! close. Idempotent replays are not errors and never appear here.

use chrono::NaiveDate;
use fieldledger_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::accounts::SemanticRole;
use crate::fiscal::{PeriodAction, PeriodStatus};

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Not Found ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Accounting period not found.
    #[error("Accounting period not found: {0}")]
    PeriodNotFound(Uuid),

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    /// Purchase order not found.
    #[error("Purchase order not found: {0}")]
    PurchaseOrderNotFound(Uuid),

    // ========== Entry Validation ==========
    /// Entry has no lines.
    #[error("Journal entry must have at least one line")]
    EmptyEntry,

    /// A line does not carry exactly one positive side.
    #[error("Line {line_number} is invalid: {reason}")]
    InvalidLine {
        /// 1-based line number.
        line_number: usize,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Debits and credits differ by more than the tolerance.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debits.
        debit: Decimal,
        /// Total credits.
        credit: Decimal,
    },

    /// Entry has fewer than two lines at posting time.
    #[error("Journal entry must have at least 2 lines to post, found {count}")]
    InsufficientLines {
        /// Lines found.
        count: usize,
    },

    /// An empty time-entry batch was submitted.
    #[error("At least one time entry is required")]
    EmptyTimeEntryBatch,

    // ========== Accounts ==========
    /// No account exists with the code.
    #[error("Account not found for code {0}")]
    AccountNotFound(String),

    /// Account is deactivated.
    #[error("Account {0} is inactive")]
    AccountInactive(String),

    /// Account is a header account and cannot receive lines.
    #[error("Account {0} does not allow direct posting")]
    AccountNotPostable(String),

    // ========== Periods ==========
    /// No period covers the entry date.
    #[error("No accounting period found for date {0}")]
    NoPeriodForDate(NaiveDate),

    /// Period does not accept entries or postings.
    #[error("Accounting period {period_id} is {status}, not OPEN")]
    PeriodNotOpen {
        /// The period.
        period_id: Uuid,
        /// Its current status.
        status: PeriodStatus,
    },

    /// Period status change not allowed from the current status.
    #[error("Cannot {action} accounting period {period_id} while it is {status}")]
    InvalidPeriodTransition {
        /// The period.
        period_id: Uuid,
        /// Its current status.
        status: PeriodStatus,
        /// Requested change.
        action: PeriodAction,
    },

    /// Period range is empty.
    #[error("Period range is invalid: {start} is after {end}")]
    InvalidPeriodRange {
        /// First day.
        start: NaiveDate,
        /// Last day.
        end: NaiveDate,
    },

    /// A fiscal year cannot hold more than twelve monthly periods.
    #[error("Fiscal year from {start} to {end} spans {months} months, at most 12 allowed")]
    FiscalYearTooLong {
        /// First day.
        start: NaiveDate,
        /// Last day.
        end: NaiveDate,
        /// Calendar months touched by the range.
        months: i64,
    },

    /// Periods for the fiscal year already exist.
    #[error("Accounting periods for fiscal year {0} already exist")]
    FiscalYearExists(i32),

    /// Period still holds draft entries.
    #[error("Accounting period {period_id} has {count} draft journal entries")]
    PeriodHasDrafts {
        /// The period.
        period_id: Uuid,
        /// Number of DRAFT entries.
        count: u64,
    },

    // ========== Posting ==========
    /// Entry is already posted.
    #[error("Journal entry {0} is already posted")]
    EntryAlreadyPosted(Uuid),

    // ========== Source Events ==========
    /// Job is not COMPLETED.
    #[error("Job {job_id} is {status}, expected COMPLETED")]
    JobNotCompleted {
        /// The job.
        job_id: Uuid,
        /// Its current status.
        status: String,
    },

    /// Purchase order is not RECEIVED.
    #[error("Purchase order {po_id} is {status}, expected RECEIVED")]
    PurchaseOrderNotReceived {
        /// The purchase order.
        po_id: Uuid,
        /// Its current status.
        status: String,
    },

    /// Some requested time entries are missing or not approved.
    #[error("Time entries missing or not approved: {ids:?}")]
    TimeEntriesNotApproved {
        /// The offending IDs.
        ids: Vec<Uuid>,
    },

    /// A cost component is negative.
    #[error("{component} amount cannot be negative: {amount}")]
    NegativeAmount {
        /// Which component.
        component: &'static str,
        /// The computed amount.
        amount: Decimal,
    },

    /// Computed total is zero, so there is nothing to record.
    #[error("Nothing to post: {0}")]
    NothingToPost(String),

    // ========== Configuration ==========
    /// Resolver has no account for the role.
    #[error("No account code configured for role {0}")]
    MissingAccountMapping(SemanticRole),

    /// Resolver configuration is malformed.
    #[error("Invalid account mapping: {0}")]
    InvalidAccountMapping(String),

    // ========== Concurrency ==========
    /// A concurrent caller changed the row first.
    #[error("Concurrent modification detected, please re-fetch")]
    ConcurrentModification,

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::JobNotFound(_) => "JOB_NOT_FOUND",
            Self::PurchaseOrderNotFound(_) => "PURCHASE_ORDER_NOT_FOUND",
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::InvalidLine { .. } => "INVALID_LINE",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::InsufficientLines { .. } => "INSUFFICIENT_LINES",
            Self::EmptyTimeEntryBatch => "EMPTY_TIME_ENTRY_BATCH",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::AccountNotPostable(_) => "ACCOUNT_NOT_POSTABLE",
            Self::NoPeriodForDate(_) => "NO_PERIOD_FOR_DATE",
            Self::PeriodNotOpen { .. } => "PERIOD_NOT_OPEN",
            Self::InvalidPeriodTransition { .. } => "INVALID_PERIOD_TRANSITION",
            Self::InvalidPeriodRange { .. } => "INVALID_PERIOD_RANGE",
            Self::FiscalYearTooLong { .. } => "FISCAL_YEAR_TOO_LONG",
            Self::FiscalYearExists(_) => "FISCAL_YEAR_EXISTS",
            Self::PeriodHasDrafts { .. } => "PERIOD_HAS_DRAFTS",
            Self::EntryAlreadyPosted(_) => "ENTRY_ALREADY_POSTED",
            Self::JobNotCompleted { .. } => "JOB_NOT_COMPLETED",
            Self::PurchaseOrderNotReceived { .. } => "PURCHASE_ORDER_NOT_RECEIVED",
            Self::TimeEntriesNotApproved { .. } => "TIME_ENTRIES_NOT_APPROVED",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::NothingToPost(_) => "NOTHING_TO_POST",
            Self::MissingAccountMapping(_) => "MISSING_ACCOUNT_MAPPING",
            Self::InvalidAccountMapping(_) => "INVALID_ACCOUNT_MAPPING",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed entries and invalid period changes
            Self::EmptyEntry
            | Self::InvalidLine { .. }
            | Self::UnbalancedEntry { .. }
            | Self::InsufficientLines { .. }
            | Self::EmptyTimeEntryBatch
            | Self::InvalidPeriodTransition { .. }
            | Self::InvalidPeriodRange { .. }
            | Self::FiscalYearTooLong { .. }
            | Self::PeriodHasDrafts { .. } => 400,

            // 404 Not Found
            Self::EntryNotFound(_)
            | Self::PeriodNotFound(_)
            | Self::JobNotFound(_)
            | Self::PurchaseOrderNotFound(_) => 404,

            // 409 Conflict - state already moved on
            Self::PeriodNotOpen { .. }
            | Self::EntryAlreadyPosted(_)
            | Self::FiscalYearExists(_)
            | Self::ConcurrentModification => 409,

            // 422 Unprocessable - source data not in a bookable state
            Self::AccountNotFound(_)
            | Self::AccountInactive(_)
            | Self::AccountNotPostable(_)
            | Self::NoPeriodForDate(_)
            | Self::JobNotCompleted { .. }
            | Self::PurchaseOrderNotReceived { .. }
            | Self::TimeEntriesNotApproved { .. }
            | Self::NegativeAmount { .. }
            | Self::NothingToPost(_) => 422,

            // 500 Internal Server Error
            Self::MissingAccountMapping(_)
            | Self::InvalidAccountMapping(_)
            | Self::Database(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Returns true for configuration errors that need an operator, not a retry.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingAccountMapping(_) | Self::InvalidAccountMapping(_)
        )
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::MissingAccountMapping(_) | LedgerError::InvalidAccountMapping(_) => {
                Self::Configuration(message)
            }
            LedgerError::Database(_) => Self::Database(message),
            LedgerError::Internal(_) => Self::Internal(message),
            other => match other.http_status_code() {
                404 => Self::NotFound(message),
                409 => Self::Conflict(message),
                422 => Self::BusinessRule(message),
                _ => Self::Validation(message),
            },
        }
    }
}
