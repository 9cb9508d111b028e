//! Core accounting logic for FieldLedger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and line builders live here; the `db`
//! crate fetches inputs and persists what these functions produce.
//!
//! # Modules
//!
//! - `ledger` - Journal entries, idempotency keys, balance and posting rules
//! - `accounts` - Chart-of-accounts types and the semantic role resolver
//! - `fiscal` - Accounting periods, status transitions, monthly calendars
//! - `automation` - Line builders for job, payroll and purchase-order events

pub mod accounts;
pub mod automation;
pub mod fiscal;
pub mod ledger;
