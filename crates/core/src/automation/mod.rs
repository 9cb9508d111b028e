//! Line builders for automated journal entries.
//!
//! Each builder turns a snapshot of collaborator data (a job's costs, a batch
//! of time entries, a received purchase order) into a balanced
//! `NewJournalEntry`. Builders are pure: the repository layer fetches the
//! snapshot, checks the idempotency key and persists the result.
//!
//! Amounts are rounded to cents before lines are built, so generated entries
//! balance exactly rather than within the posting tolerance.

pub mod job;
pub mod payroll;
pub mod purchase;

#[cfg(test)]
mod automation_props;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::WriteOutcome;

pub use job::{JobCostSummary, build_job_completion_entry};
pub use payroll::{TimeEntryPay, build_payroll_accrual_entry, ensure_all_approved};
pub use purchase::{
    PoReceiptEntry, PurchaseOrderReceipt, VendorInvoiceDraft, build_po_receipt_entry,
};

/// Job status that allows COGS recognition.
pub const JOB_STATUS_COMPLETED: &str = "COMPLETED";
/// Purchase order status that allows AP recognition.
pub const PO_STATUS_RECEIVED: &str = "RECEIVED";
/// Time entry status that allows payroll accrual.
pub const TIME_ENTRY_STATUS_APPROVED: &str = "approved";

/// Result of an automation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutomationOutcome {
    /// The created or pre-existing entry.
    pub entry_id: Uuid,
    /// True if the event had already been recorded.
    pub replayed: bool,
}

impl From<WriteOutcome> for AutomationOutcome {
    fn from(outcome: WriteOutcome) -> Self {
        Self {
            entry_id: outcome.entry_id,
            replayed: outcome.replayed,
        }
    }
}

/// Rounds a money amount to cents (banker's rounding).
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(dec!(10.005)), dec!(10.00));
        assert_eq!(round_to_cents(dec!(10.015)), dec!(10.02));
        assert_eq!(round_to_cents(dec!(10.0149)), dec!(10.01));
    }

    #[test]
    fn test_outcome_from_write() {
        let outcome = AutomationOutcome::from(WriteOutcome {
            entry_id: Uuid::from_u128(5),
            entry_number: "JE-000005".to_string(),
            replayed: true,
        });
        assert_eq!(outcome.entry_id, Uuid::from_u128(5));
        assert!(outcome.replayed);
    }
}
