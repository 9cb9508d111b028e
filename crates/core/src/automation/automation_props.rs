//! Property-based tests for generated entries.
//!
//! Generated entries must balance exactly, not merely within the posting
//! tolerance.

use chrono::NaiveDate;
use fieldledger_shared::types::{JobId, PurchaseOrderId, TimeEntryId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::job::{JobCostSummary, build_job_completion_entry};
use super::payroll::{TimeEntryPay, build_payroll_accrual_entry};
use super::purchase::{PurchaseOrderReceipt, build_po_receipt_entry};
use crate::accounts::AccountCodeResolver;
use crate::ledger::validate_new_entry;

/// Amounts with up to four decimal places, as stored in NUMERIC(19,4).
fn cost_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|units| Decimal::new(units, 4))
}

fn hours() -> impl Strategy<Value = Option<Decimal>> {
    prop::option::of((0i64..2_400i64).prop_map(|h| Decimal::new(h, 2)))
}

fn rate() -> impl Strategy<Value = Option<Decimal>> {
    prop::option::of((0i64..20_000i64).prop_map(|r| Decimal::new(r, 2)))
}

fn time_entry() -> impl Strategy<Value = TimeEntryPay> {
    (any::<u128>(), 1u32..=28, hours(), rate(), hours(), rate(), hours(), rate()).prop_map(
        |(id, day, rh, rr, oh, or, dh, dr)| TimeEntryPay {
            id: TimeEntryId::from_uuid(Uuid::from_u128(id)),
            status: "approved".to_string(),
            entry_date: NaiveDate::from_ymd_opt(2024, 8, day).unwrap(),
            regular_hours: rh,
            regular_rate: rr,
            overtime_hours: oh,
            overtime_rate: or,
            double_time_hours: dh,
            double_time_rate: dr,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Job completion entries balance exactly whenever they are produced.
    #[test]
    fn prop_job_entry_balances_exactly(
        labor in cost_amount(),
        material in cost_amount(),
        equipment in cost_amount(),
    ) {
        let job = JobCostSummary {
            job_id: JobId::from_uuid(Uuid::from_u128(1)),
            job_number: None,
            status: "COMPLETED".to_string(),
            completed_on: None,
            labor,
            material,
            equipment,
        };
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let resolver = AccountCodeResolver::with_defaults();
        if let Ok(entry) = build_job_completion_entry(&job, &resolver, today) {
            let totals = entry.totals();
            prop_assert_eq!(totals.debit, totals.credit);
            prop_assert!(validate_new_entry(&entry).is_ok());
            prop_assert!(entry.lines.len() >= 2 && entry.lines.len() <= 4);
        }
    }

    /// Payroll accruals balance exactly and are independent of request order.
    #[test]
    fn prop_payroll_entry_balances_and_ignores_order(
        entries in prop::collection::vec(time_entry(), 1..8),
    ) {
        let ids: Vec<TimeEntryId> = entries.iter().map(|e| e.id).collect();
        let mut reversed = ids.clone();
        reversed.reverse();
        let resolver = AccountCodeResolver::with_defaults();

        let forward = build_payroll_accrual_entry(&ids, &entries, &resolver);
        let backward = build_payroll_accrual_entry(&reversed, &entries, &resolver);

        match (forward, backward) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.totals().debit, a.totals().credit);
                prop_assert_eq!(a.lines.len(), 2);
                prop_assert_eq!(a.source, b.source);
                prop_assert_eq!(a.lines, b.lines);
            }
            (Err(_), Err(_)) => {}
            (a, b) => prop_assert!(false, "order changed the outcome: {:?} vs {:?}", a, b),
        }
    }

    /// PO entries balance exactly and match the invoice amount.
    #[test]
    fn prop_po_entry_matches_invoice(total in cost_amount(), terms in 0i64..120) {
        let po = PurchaseOrderReceipt {
            po_id: PurchaseOrderId::from_uuid(Uuid::from_u128(3)),
            po_number: "PO-1".to_string(),
            vendor_id: Uuid::from_u128(4),
            status: "RECEIVED".to_string(),
            total_amount: total,
            last_received_on: NaiveDate::from_ymd_opt(2024, 3, 1),
            updated_on: None,
            created_on: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };

        let resolver = AccountCodeResolver::with_defaults();
        if let Ok(built) = build_po_receipt_entry(&po, &resolver, terms) {
            let totals = built.entry.totals();
            prop_assert_eq!(totals.debit, totals.credit);
            prop_assert_eq!(totals.debit, built.invoice.amount);
            let days = (built.invoice.due_date - built.invoice.invoice_date).num_days();
            prop_assert_eq!(days, terms);
        }
    }
}
