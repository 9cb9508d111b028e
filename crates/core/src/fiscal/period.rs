//! Period status machine.
//!
//! `OPEN <-> CLOSED`, `CLOSED -> LOCKED`. Nothing leaves `LOCKED`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::LedgerError;

/// Status of an accounting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodStatus {
    /// Entries may be created and posted.
    Open,
    /// No new entries or postings; may be reopened.
    Closed,
    /// Terminal audit state.
    Locked,
}

impl PeriodStatus {
    /// Returns true if entries may be created or posted in this period.
    #[must_use]
    pub const fn allows_posting(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns the database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Locked => "LOCKED",
        }
    }
}

impl std::fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested period status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodAction {
    /// `OPEN -> CLOSED`.
    Close,
    /// `CLOSED -> OPEN`.
    Reopen,
    /// `CLOSED -> LOCKED`.
    Lock,
}

impl std::fmt::Display for PeriodAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Close => "close",
            Self::Reopen => "reopen",
            Self::Lock => "lock",
        })
    }
}

/// Validates a status change and returns the resulting status.
///
/// # Errors
///
/// Returns `InvalidPeriodTransition` when `action` is not allowed from `from`.
pub fn validate_transition(
    period_id: Uuid,
    from: PeriodStatus,
    action: PeriodAction,
) -> Result<PeriodStatus, LedgerError> {
    match (from, action) {
        (PeriodStatus::Open, PeriodAction::Close) => Ok(PeriodStatus::Closed),
        (PeriodStatus::Closed, PeriodAction::Reopen) => Ok(PeriodStatus::Open),
        (PeriodStatus::Closed, PeriodAction::Lock) => Ok(PeriodStatus::Locked),
        _ => Err(LedgerError::InvalidPeriodTransition {
            period_id,
            status: from,
            action,
        }),
    }
}

/// Rejects a close while draft entries remain in the period.
///
/// # Errors
///
/// Returns `PeriodHasDrafts` carrying the exact count.
pub fn ensure_no_drafts(period_id: Uuid, draft_count: u64) -> Result<(), LedgerError> {
    if draft_count > 0 {
        return Err(LedgerError::PeriodHasDrafts {
            period_id,
            count: draft_count,
        });
    }
    Ok(())
}
