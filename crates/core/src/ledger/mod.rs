//! Double-entry journal logic.
//!
//! This module implements the rules every journal entry obeys regardless of
//! how it was produced:
//! - Domain types for entry creation and posting
//! - Idempotency keys derived from the originating business event
//! - Line and balance validation
//! - Posting preconditions
//! - Error types for ledger operations

pub mod error;
pub mod posting;
pub mod source;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use posting::{ensure_draft, ensure_period_open, validate_posting_lines};
pub use source::{SourceKey, SourceType};
pub use types::{
    BALANCE_TOLERANCE, EntryTotals, JournalEntryStatus, JournalLineInput, NewJournalEntry,
    WriteOutcome,
};
pub use validation::{validate_line, validate_new_entry};
