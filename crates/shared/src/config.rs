//! Application configuration management.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Accounting automation configuration.
    #[serde(default)]
    pub accounting: AccountingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Accounting automation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountingConfig {
    /// Payment terms applied to vendor invoices raised on PO receipt.
    #[serde(default = "default_vendor_invoice_terms_days")]
    pub vendor_invoice_terms_days: i64,
    /// Overrides for the semantic-role to account-code table, keyed by
    /// snake_case role name (e.g. `labor_expense = "5150"`).
    #[serde(default)]
    pub account_codes: HashMap<String, String>,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            vendor_invoice_terms_days: default_vendor_invoice_terms_days(),
            account_codes: HashMap::new(),
        }
    }
}

fn default_vendor_invoice_terms_days() -> i64 {
    30 // net 30
}

impl AccountingConfig {
    /// Checks settings that the database would otherwise reject on first use.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` for negative payment terms.
    pub fn validate(&self) -> AppResult<()> {
        if self.vendor_invoice_terms_days < 0 {
            return Err(AppError::Configuration(format!(
                "accounting.vendor_invoice_terms_days must not be negative, got {}",
                self.vendor_invoice_terms_days
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FIELDLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("FIELDLEDGER__DATABASE__URL", Some("postgres://localhost/ledger")),
                ("FIELDLEDGER__SERVER__PORT", Some("9090")),
                ("FIELDLEDGER__ACCOUNTING__VENDOR_INVOICE_TERMS_DAYS", Some("45")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/ledger");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.accounting.vendor_invoice_terms_days, 45);
                assert!(config.accounting.account_codes.is_empty());
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars_unset(["FIELDLEDGER__DATABASE__URL"], || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_accounting_defaults() {
        let accounting = AccountingConfig::default();
        assert_eq!(accounting.vendor_invoice_terms_days, 30);
        assert!(accounting.account_codes.is_empty());
        assert!(accounting.validate().is_ok());
    }

    #[test]
    fn test_negative_terms_rejected() {
        temp_env::with_vars(
            [
                ("FIELDLEDGER__DATABASE__URL", Some("postgres://localhost/ledger")),
                ("FIELDLEDGER__ACCOUNTING__VENDOR_INVOICE_TERMS_DAYS", Some("-5")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                let err = config.accounting.validate().unwrap_err();
                assert!(matches!(err, AppError::Configuration(_)));
                assert_eq!(err.status_code(), 500);
            },
        );
    }

    #[test]
    fn test_same_day_terms_allowed() {
        let accounting = AccountingConfig {
            vendor_invoice_terms_days: 0,
            ..AccountingConfig::default()
        };
        assert!(accounting.validate().is_ok());
    }
}
