//! `SeaORM` entity prelude.

pub use super::accounting_periods::Entity as AccountingPeriods;
pub use super::accounts::Entity as Accounts;
pub use super::job_equipment_costs::Entity as JobEquipmentCosts;
pub use super::job_labor_costs::Entity as JobLaborCosts;
pub use super::job_material_costs::Entity as JobMaterialCosts;
pub use super::jobs::Entity as Jobs;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_entry_lines::Entity as JournalEntryLines;
pub use super::purchase_order_receipts::Entity as PurchaseOrderReceipts;
pub use super::purchase_orders::Entity as PurchaseOrders;
pub use super::time_entries::Entity as TimeEntries;
pub use super::vendor_invoices::Entity as VendorInvoices;
