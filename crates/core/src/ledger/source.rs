//! Idempotency keys for automated entries.
//!
//! A `(source_type, source_id)` pair names the business event that produced
//! an entry. The database holds a unique index over the pair, so a key can
//! own at most one entry.

use fieldledger_shared::types::{JobId, PurchaseOrderId, TimeEntryId};
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Kind of business event behind an automated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    /// A job moved to COMPLETED.
    JobCompletion,
    /// A batch of time entries was approved.
    TimeApproval,
    /// A purchase order was received.
    PurchaseOrder,
}

impl SourceType {
    /// Returns the database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JobCompletion => "JOB_COMPLETION",
            Self::TimeApproval => "TIME_APPROVAL",
            Self::PurchaseOrder => "PURCHASE_ORDER",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies the business event that produced an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceKey {
    /// Event kind.
    pub source_type: SourceType,
    /// Event identifier, canonicalized per kind.
    pub source_id: String,
}

impl SourceKey {
    /// Key for a completed job.
    #[must_use]
    pub fn job_completion(job_id: JobId) -> Self {
        Self {
            source_type: SourceType::JobCompletion,
            source_id: job_id.to_string(),
        }
    }

    /// Key for a received purchase order.
    #[must_use]
    pub fn purchase_order(po_id: PurchaseOrderId) -> Self {
        Self {
            source_type: SourceType::PurchaseOrder,
            source_id: po_id.to_string(),
        }
    }

    /// Key for an approved batch of time entries.
    ///
    /// IDs are sorted and de-duplicated before serializing as a JSON array,
    /// so every permutation of the same set yields the same key. Adding or
    /// removing an entry yields a different key.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTimeEntryBatch` for an empty slice.
    pub fn time_approval(ids: &[TimeEntryId]) -> Result<Self, LedgerError> {
        let ids = canonical_time_entry_ids(ids);
        if ids.is_empty() {
            return Err(LedgerError::EmptyTimeEntryBatch);
        }
        let source_id =
            serde_json::to_string(&ids).map_err(|e| LedgerError::Internal(e.to_string()))?;
        Ok(Self {
            source_type: SourceType::TimeApproval,
            source_id,
        })
    }
}

impl std::fmt::Display for SourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.source_type, self.source_id)
    }
}

/// Sorts and de-duplicates a batch of time-entry IDs.
#[must_use]
pub fn canonical_time_entry_ids(ids: &[TimeEntryId]) -> Vec<TimeEntryId> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}
