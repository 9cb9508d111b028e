//! Purchase order receipt: recognize inventory and the vendor liability.

use chrono::{NaiveDate, TimeDelta};
use fieldledger_shared::types::PurchaseOrderId;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{PO_STATUS_RECEIVED, round_to_cents};
use crate::accounts::{AccountCodeResolver, SemanticRole};
use crate::ledger::{JournalLineInput, LedgerError, NewJournalEntry, SourceKey};

/// A purchase order and the dates needed to place its entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOrderReceipt {
    /// The purchase order.
    pub po_id: PurchaseOrderId,
    /// Human-facing PO number.
    pub po_number: String,
    /// Vendor owed.
    pub vendor_id: Uuid,
    /// Current PO status.
    pub status: String,
    /// PO total.
    pub total_amount: Decimal,
    /// Latest `received_at` across receipt records, if any.
    pub last_received_on: Option<NaiveDate>,
    /// PO last update date.
    pub updated_on: Option<NaiveDate>,
    /// PO creation date.
    pub created_on: NaiveDate,
}

impl PurchaseOrderReceipt {
    /// Receipt date: latest receipt record, else last update, else creation.
    #[must_use]
    pub fn receipt_date(&self) -> NaiveDate {
        self.last_received_on
            .or(self.updated_on)
            .unwrap_or(self.created_on)
    }
}

/// Vendor invoice to insert alongside the AP entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorInvoiceDraft {
    /// Purchase order invoiced.
    pub purchase_order_id: PurchaseOrderId,
    /// Vendor owed.
    pub vendor_id: Uuid,
    /// Invoice number.
    pub invoice_number: String,
    /// Invoice date (the receipt date).
    pub invoice_date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Amount owed.
    pub amount: Decimal,
}

/// The AP entry and its vendor invoice, persisted together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoReceiptEntry {
    /// Debit inventory / credit accounts payable.
    pub entry: NewJournalEntry,
    /// Invoice linked to the entry.
    pub invoice: VendorInvoiceDraft,
}

/// Builds the AP entry and vendor invoice for a received purchase order.
///
/// # Errors
///
/// - `PurchaseOrderNotReceived` if the PO is in any other status
/// - `NegativeAmount` or `NothingToPost` unless the total is positive
/// - `MissingAccountMapping` if a needed role is unmapped
pub fn build_po_receipt_entry(
    po: &PurchaseOrderReceipt,
    resolver: &AccountCodeResolver,
    terms_days: i64,
) -> Result<PoReceiptEntry, LedgerError> {
    if po.status != PO_STATUS_RECEIVED {
        return Err(LedgerError::PurchaseOrderNotReceived {
            po_id: po.po_id.into_inner(),
            status: po.status.clone(),
        });
    }

    let amount = round_to_cents(po.total_amount);
    if amount < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount {
            component: "Purchase order",
            amount,
        });
    }
    if amount.is_zero() {
        return Err(LedgerError::NothingToPost(format!(
            "purchase order {} has a zero total",
            po.po_number
        )));
    }

    let received_on = po.receipt_date();
    let due_date = TimeDelta::try_days(terms_days)
        .and_then(|terms| received_on.checked_add_signed(terms))
        .ok_or_else(|| {
            LedgerError::Internal(format!(
                "vendor invoice terms of {terms_days} days are out of range"
            ))
        })?;

    let lines = vec![
        JournalLineInput::debit(
            resolver.resolve(SemanticRole::Inventory)?,
            amount,
            format!("Inventory received - PO {}", po.po_number),
        ),
        JournalLineInput::credit(
            resolver.resolve(SemanticRole::AccountsPayable)?,
            amount,
            format!("Accounts payable - PO {}", po.po_number),
        ),
    ];

    Ok(PoReceiptEntry {
        entry: NewJournalEntry {
            source: Some(SourceKey::purchase_order(po.po_id)),
            entry_date: received_on,
            description: format!("Purchase order receipt - PO {}", po.po_number),
            reference: Some(po.po_number.clone()),
            lines,
        },
        invoice: VendorInvoiceDraft {
            purchase_order_id: po.po_id,
            vendor_id: po.vendor_id,
            invoice_number: format!("VI-{}", po.po_number),
            invoice_date: received_on,
            due_date,
            amount,
        },
    })
}
