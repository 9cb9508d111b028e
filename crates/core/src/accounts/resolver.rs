//! Semantic role to account code resolution.
//!
//! Automations never hard-code account codes. They ask the resolver for the
//! account playing a role ("wages payable") and the resolver answers from a
//! fixed table built once at startup. A missing role is a configuration error
//! and fails loudly instead of posting to a guessed account.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::AccountType;
use crate::ledger::LedgerError;

/// The role an account plays in an automated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticRole {
    /// Labor cost recognized on job completion and payroll accrual.
    LaborExpense,
    /// Material cost of goods sold.
    MaterialCogs,
    /// Equipment usage expense.
    EquipmentExpense,
    /// Work-in-progress holding account relieved on job completion.
    WorkInProgress,
    /// Inventory received from vendors.
    Inventory,
    /// Amounts owed to vendors.
    AccountsPayable,
    /// Payroll owed to employees but not yet paid.
    WagesPayable,
}

impl SemanticRole {
    /// Every role the automations use.
    pub const ALL: [Self; 7] = [
        Self::LaborExpense,
        Self::MaterialCogs,
        Self::EquipmentExpense,
        Self::WorkInProgress,
        Self::Inventory,
        Self::AccountsPayable,
        Self::WagesPayable,
    ];

    /// Returns the snake_case configuration key for this role.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::LaborExpense => "labor_expense",
            Self::MaterialCogs => "material_cogs",
            Self::EquipmentExpense => "equipment_expense",
            Self::WorkInProgress => "work_in_progress",
            Self::Inventory => "inventory",
            Self::AccountsPayable => "accounts_payable",
            Self::WagesPayable => "wages_payable",
        }
    }

    /// Returns the account code used when no override is configured.
    #[must_use]
    pub const fn default_code(self) -> &'static str {
        match self {
            Self::MaterialCogs => "5000",
            Self::LaborExpense => "5100",
            Self::EquipmentExpense => "5200",
            Self::Inventory => "1300",
            Self::WorkInProgress => "1350",
            Self::AccountsPayable => "2000",
            Self::WagesPayable => "2100",
        }
    }

    /// Returns the account type an account in this role must have.
    #[must_use]
    pub const fn account_type(self) -> AccountType {
        match self {
            Self::MaterialCogs => AccountType::Cogs,
            Self::LaborExpense | Self::EquipmentExpense => AccountType::Expense,
            Self::Inventory | Self::WorkInProgress => AccountType::Asset,
            Self::AccountsPayable | Self::WagesPayable => AccountType::Liability,
        }
    }

    /// Returns the account name used when seeding the default chart.
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::MaterialCogs => "Materials Cost of Goods Sold",
            Self::LaborExpense => "Labor Expense",
            Self::EquipmentExpense => "Equipment Expense",
            Self::Inventory => "Inventory",
            Self::WorkInProgress => "Work in Progress",
            Self::AccountsPayable => "Accounts Payable",
            Self::WagesPayable => "Wages Payable",
        }
    }

    /// Parses a configuration key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.key() == key)
    }
}

impl std::fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Fixed lookup table from semantic role to account code.
///
/// Read-only after construction; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCodeResolver {
    codes: HashMap<SemanticRole, String>,
}

impl AccountCodeResolver {
    /// Builds the resolver from the default chart of accounts.
    #[must_use]
    pub fn with_defaults() -> Self {
        let codes = SemanticRole::ALL
            .into_iter()
            .map(|role| (role, role.default_code().to_string()))
            .collect();
        Self { codes }
    }

    /// Builds the resolver from explicit entries only.
    ///
    /// Roles absent from `codes` fail at resolve time.
    #[must_use]
    pub fn from_table(codes: HashMap<SemanticRole, String>) -> Self {
        Self { codes }
    }

    /// Builds the resolver from the defaults with configured overrides applied.
    ///
    /// Keys are snake_case role names, e.g. `wages_payable`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccountMapping` for an unknown role name or a blank code.
    pub fn from_overrides(overrides: &HashMap<String, String>) -> Result<Self, LedgerError> {
        let mut resolver = Self::with_defaults();
        for (key, code) in overrides {
            let role = SemanticRole::from_key(key).ok_or_else(|| {
                LedgerError::InvalidAccountMapping(format!("unknown account role '{key}'"))
            })?;
            let code = code.trim();
            if code.is_empty() {
                return Err(LedgerError::InvalidAccountMapping(format!(
                    "empty account code for role '{key}'"
                )));
            }
            resolver.codes.insert(role, code.to_string());
        }
        Ok(resolver)
    }

    /// Returns the account code mapped to `role`.
    ///
    /// # Errors
    ///
    /// Returns `MissingAccountMapping` if the table has no entry for the role.
    pub fn resolve(&self, role: SemanticRole) -> Result<&str, LedgerError> {
        self.codes
            .get(&role)
            .map(String::as_str)
            .ok_or(LedgerError::MissingAccountMapping(role))
    }
}

impl Default for AccountCodeResolver {
    fn default() -> Self {
        Self::with_defaults()
    }
}
