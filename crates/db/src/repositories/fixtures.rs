//! Model builders for `MockDatabase` tests.

use chrono::{NaiveDate, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

use crate::entities::{
    accounting_periods, accounts, journal_entries,
    sea_orm_active_enums::{AccountType, BalanceType, JournalEntryStatus, PeriodStatus},
};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

pub(crate) const PERIOD_ID: Uuid = Uuid::from_u128(1);

pub(crate) fn header(id: Uuid, status: JournalEntryStatus) -> journal_entries::Model {
    journal_entries::Model {
        id,
        entry_number: "JE-000007".to_string(),
        entry_date: date(2024, 3, 1),
        period_id: PERIOD_ID,
        status,
        description: "Existing".to_string(),
        reference: None,
        source_type: None,
        source_id: None,
        posted_by: None,
        posted_at: None,
        created_at: now(),
        updated_at: now(),
    }
}

pub(crate) fn period(status: PeriodStatus) -> accounting_periods::Model {
    accounting_periods::Model {
        id: PERIOD_ID,
        name: "March 2024".to_string(),
        fiscal_year: 2024,
        period_number: 3,
        start_date: date(2024, 3, 1),
        end_date: date(2024, 3, 31),
        status,
        closed_by: None,
        closed_at: None,
        created_at: now(),
        updated_at: now(),
    }
}

pub(crate) fn account(code: &str, is_active: bool, is_posting: bool) -> accounts::Model {
    accounts::Model {
        id: Uuid::now_v7(),
        code: code.to_string(),
        name: format!("Account {code}"),
        account_type: AccountType::Asset,
        balance_type: BalanceType::Debit,
        parent_account_id: None,
        is_posting,
        is_active,
        created_at: now(),
        updated_at: now(),
    }
}
