//! Database seeder for FieldLedger.
//!
//! Seeds a header account per account type used by the automations, one
//! posting account per semantic role (honouring configured overrides), and
//! monthly periods for the current calendar year. Safe to run repeatedly.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use fieldledger_core::accounts::{AccountCodeResolver, AccountType, SemanticRole};
use fieldledger_core::ledger::LedgerError;
use fieldledger_db::repositories::{
    AccountFilter, AccountRepository, CreateAccountInput, PeriodRepository,
};
use fieldledger_shared::AppConfig;
use uuid::Uuid;

/// Non-posting headers the role accounts hang under.
const HEADERS: [(&str, &str, AccountType); 4] = [
    ("1000", "Current Assets", AccountType::Asset),
    ("2500", "Current Liabilities", AccountType::Liability),
    ("4900", "Cost of Sales", AccountType::Cogs),
    ("6000", "Operating Expenses", AccountType::Expense),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let resolver = AccountCodeResolver::from_overrides(&config.accounting.account_codes)?;

    println!("Connecting to database...");
    let db = fieldledger_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let db = Arc::new(db);

    println!("Seeding chart of accounts...");
    let accounts = AccountRepository::new(Arc::clone(&db));
    seed_chart(&accounts, &resolver).await?;
    let active = accounts
        .list_accounts(AccountFilter {
            account_type: None,
            active_only: true,
        })
        .await?;
    println!("  {} active accounts", active.len());

    let year = Utc::now().year();
    println!("Seeding fiscal year {year}...");
    seed_fiscal_year(&PeriodRepository::new(db), year).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_chart(
    accounts: &AccountRepository,
    resolver: &AccountCodeResolver,
) -> anyhow::Result<()> {
    let mut parents: Vec<(AccountType, Uuid)> = Vec::with_capacity(HEADERS.len());
    for (code, name, account_type) in HEADERS {
        let id = ensure_account(accounts, code, name, account_type, None, false).await?;
        parents.push((account_type, id));
    }

    for role in SemanticRole::ALL {
        let account_type = role.account_type();
        let parent = parents
            .iter()
            .find(|(t, _)| *t == account_type)
            .map(|(_, id)| *id);
        ensure_account(
            accounts,
            resolver.resolve(role)?,
            role.default_name(),
            account_type,
            parent,
            true,
        )
        .await?;
    }
    Ok(())
}

async fn ensure_account(
    accounts: &AccountRepository,
    code: &str,
    name: &str,
    account_type: AccountType,
    parent_account_id: Option<Uuid>,
    is_posting: bool,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = accounts.find_by_code(code).await? {
        println!("  {code} {} already exists, skipping...", existing.name);
        return Ok(existing.id);
    }

    let account = accounts
        .create_account(CreateAccountInput {
            code: code.to_string(),
            name: name.to_string(),
            account_type,
            parent_account_id,
            is_posting,
        })
        .await
        .with_context(|| format!("Failed to create account {code}"))?;
    println!("  Created {code} {name}");
    Ok(account.id)
}

async fn seed_fiscal_year(periods: &PeriodRepository, year: i32) -> anyhow::Result<()> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).context("invalid fiscal year start")?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).context("invalid fiscal year end")?;

    if let Some(existing) = periods.find_period_for_date(start).await? {
        let count = periods.list_periods(existing.fiscal_year).await?.len();
        println!(
            "  {start} is already covered by fiscal year {} ({count} periods), skipping...",
            existing.fiscal_year
        );
        return Ok(());
    }

    match periods.create_fiscal_year(year, start, end).await {
        Ok(created) => println!("  Created {} periods", created.len()),
        Err(LedgerError::FiscalYearExists(_)) => {
            println!("  Fiscal year {year} already exists, skipping...");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
