//! `SeaORM` active enums mirroring the Postgres enum types.
//!
//! Each enum converts to and from its counterpart in `fieldledger_core`.

use fieldledger_core::{accounts, fiscal, ledger};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    #[sea_orm(string_value = "ASSET")]
    Asset,
    #[sea_orm(string_value = "LIABILITY")]
    Liability,
    #[sea_orm(string_value = "EQUITY")]
    Equity,
    #[sea_orm(string_value = "REVENUE")]
    Revenue,
    #[sea_orm(string_value = "COGS")]
    Cogs,
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "balance_type")]
pub enum BalanceType {
    #[sea_orm(string_value = "DEBIT")]
    Debit,
    #[sea_orm(string_value = "CREDIT")]
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_status")]
pub enum PeriodStatus {
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
    #[sea_orm(string_value = "LOCKED")]
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_entry_status")]
pub enum JournalEntryStatus {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "POSTED")]
    Posted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_source_type")]
pub enum JournalSourceType {
    #[sea_orm(string_value = "JOB_COMPLETION")]
    JobCompletion,
    #[sea_orm(string_value = "TIME_APPROVAL")]
    TimeApproval,
    #[sea_orm(string_value = "PURCHASE_ORDER")]
    PurchaseOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "vendor_invoice_status")]
pub enum VendorInvoiceStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl From<accounts::AccountType> for AccountType {
    fn from(value: accounts::AccountType) -> Self {
        match value {
            accounts::AccountType::Asset => Self::Asset,
            accounts::AccountType::Liability => Self::Liability,
            accounts::AccountType::Equity => Self::Equity,
            accounts::AccountType::Revenue => Self::Revenue,
            accounts::AccountType::Cogs => Self::Cogs,
            accounts::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for accounts::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Cogs => Self::Cogs,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<accounts::BalanceType> for BalanceType {
    fn from(value: accounts::BalanceType) -> Self {
        match value {
            accounts::BalanceType::Debit => Self::Debit,
            accounts::BalanceType::Credit => Self::Credit,
        }
    }
}

impl From<PeriodStatus> for fiscal::PeriodStatus {
    fn from(value: PeriodStatus) -> Self {
        match value {
            PeriodStatus::Open => Self::Open,
            PeriodStatus::Closed => Self::Closed,
            PeriodStatus::Locked => Self::Locked,
        }
    }
}

impl From<fiscal::PeriodStatus> for PeriodStatus {
    fn from(value: fiscal::PeriodStatus) -> Self {
        match value {
            fiscal::PeriodStatus::Open => Self::Open,
            fiscal::PeriodStatus::Closed => Self::Closed,
            fiscal::PeriodStatus::Locked => Self::Locked,
        }
    }
}

impl From<JournalEntryStatus> for ledger::JournalEntryStatus {
    fn from(value: JournalEntryStatus) -> Self {
        match value {
            JournalEntryStatus::Draft => Self::Draft,
            JournalEntryStatus::Posted => Self::Posted,
        }
    }
}

impl From<ledger::SourceType> for JournalSourceType {
    fn from(value: ledger::SourceType) -> Self {
        match value {
            ledger::SourceType::JobCompletion => Self::JobCompletion,
            ledger::SourceType::TimeApproval => Self::TimeApproval,
            ledger::SourceType::PurchaseOrder => Self::PurchaseOrder,
        }
    }
}
