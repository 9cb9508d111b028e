//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounting_periods;
pub mod accounts;
pub mod job_equipment_costs;
pub mod job_labor_costs;
pub mod job_material_costs;
pub mod jobs;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod purchase_order_receipts;
pub mod purchase_orders;
pub mod sea_orm_active_enums;
pub mod time_entries;
pub mod vendor_invoices;
