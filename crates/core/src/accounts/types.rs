//! Account classification.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Things the business owns.
    Asset,
    /// Things the business owes.
    Liability,
    /// Owner's stake.
    Equity,
    /// Income from operations.
    Revenue,
    /// Cost of goods sold.
    Cogs,
    /// Operating expenses.
    Expense,
}

impl AccountType {
    /// Returns the side that increases an account of this type.
    #[must_use]
    pub const fn normal_balance(self) -> BalanceType {
        match self {
            Self::Asset | Self::Cogs | Self::Expense => BalanceType::Debit,
            Self::Liability | Self::Equity | Self::Revenue => BalanceType::Credit,
        }
    }

    /// Returns the database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Revenue => "REVENUE",
            Self::Cogs => "COGS",
            Self::Expense => "EXPENSE",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side increases an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceType {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

/// A child account was placed under a parent of a different type.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Parent account type {parent} does not match child account type {child}")]
pub struct ParentTypeMismatch {
    /// The parent's account type.
    pub parent: AccountType,
    /// The child's account type.
    pub child: AccountType,
}

/// Checks that a child account shares its parent's type.
///
/// # Errors
///
/// Returns `ParentTypeMismatch` when the types differ.
pub fn validate_parent_type(
    parent: AccountType,
    child: AccountType,
) -> Result<(), ParentTypeMismatch> {
    if parent == child {
        Ok(())
    } else {
        Err(ParentTypeMismatch { parent, child })
    }
}
