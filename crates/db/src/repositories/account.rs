//! Account repository for chart of accounts database operations.

use std::sync::Arc;

use chrono::Utc;
use fieldledger_core::accounts::{AccountType, ParentTypeMismatch, validate_parent_type};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{
    accounts,
    sea_orm_active_enums::{AccountType as DbAccountType, BalanceType},
};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Parent account receives journal lines, so it cannot be a header.
    #[error("Parent account '{0}' is a posting account")]
    ParentIsPosting(String),

    /// Parent account has a different account type.
    #[error(transparent)]
    ParentTypeMismatch(#[from] ParentTypeMismatch),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code, unique across the chart.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type. The balance type follows from it.
    pub account_type: AccountType,
    /// Parent account for hierarchical structure.
    pub parent_account_id: Option<Uuid>,
    /// Whether journal lines may reference this account directly.
    pub is_posting: bool,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Only return active accounts.
    pub active_only: bool,
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: Arc<DatabaseConnection>,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a new active account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Account code already exists
    /// - Parent account does not exist, has a different type, or is a
    ///   posting account (only leaves may receive lines)
    /// - Database operation fails
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        if self.find_by_code(&input.code).await?.is_some() {
            return Err(AccountError::DuplicateCode(input.code));
        }

        if let Some(parent_id) = input.parent_account_id {
            let parent = accounts::Entity::find_by_id(parent_id)
                .one(&*self.db)
                .await?
                .ok_or(AccountError::ParentNotFound(parent_id))?;
            validate_parent_type(parent.account_type.into(), input.account_type)?;
            if parent.is_posting {
                return Err(AccountError::ParentIsPosting(parent.code));
            }
        }

        let balance_type: BalanceType = input.account_type.normal_balance().into();
        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type.into()),
            balance_type: Set(balance_type),
            parent_account_id: Set(input.parent_account_id),
            is_posting: Set(input.is_posting),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = account.insert(&*self.db).await?;
        info!(account_id = %account.id, code = %account.code, "Created account");
        Ok(account)
    }

    /// Finds an account by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(&*self.db)
            .await?)
    }

    /// Lists accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let mut query = accounts::Entity::find().order_by_asc(accounts::Column::Code);

        if let Some(account_type) = filter.account_type {
            query =
                query.filter(accounts::Column::AccountType.eq(DbAccountType::from(account_type)));
        }

        if filter.active_only {
            query = query.filter(accounts::Column::IsActive.eq(true));
        }

        Ok(query.all(&*self.db).await?)
    }

    /// Marks an account inactive. New lines can no longer reference it;
    /// existing lines are untouched.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or a database error.
    pub async fn deactivate_account(&self, id: Uuid) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());

        let account = active.update(&*self.db).await?;
        info!(account_id = %account.id, code = %account.code, "Deactivated account");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::repositories::fixtures::account;

    fn input(code: &str, account_type: AccountType, parent: Option<Uuid>) -> CreateAccountInput {
        CreateAccountInput {
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type,
            parent_account_id: parent,
            is_posting: true,
        }
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![account("1300", true, true)]])
            .into_connection();
        let repo = AccountRepository::new(Arc::new(db));

        assert!(matches!(
            repo.create_account(input("1300", AccountType::Asset, None)).await,
            Err(AccountError::DuplicateCode(code)) if code == "1300"
        ));
    }

    #[tokio::test]
    async fn test_missing_parent_rejected() {
        let parent_id = Uuid::from_u128(11);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<accounts::Model>::new()])
            .append_query_results([Vec::<accounts::Model>::new()])
            .into_connection();
        let repo = AccountRepository::new(Arc::new(db));

        assert!(matches!(
            repo.create_account(input("1310", AccountType::Asset, Some(parent_id))).await,
            Err(AccountError::ParentNotFound(id)) if id == parent_id
        ));
    }

    #[tokio::test]
    async fn test_parent_type_mismatch_rejected() {
        // Fixture accounts are assets.
        let parent = account("1000", true, false);
        let parent_id = parent.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<accounts::Model>::new()])
            .append_query_results([vec![parent]])
            .into_connection();
        let repo = AccountRepository::new(Arc::new(db));

        let err = repo
            .create_account(input("2000", AccountType::Liability, Some(parent_id)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::ParentTypeMismatch(ParentTypeMismatch {
                parent: AccountType::Asset,
                child: AccountType::Liability,
            })
        ));
    }

    #[tokio::test]
    async fn test_posting_parent_rejected() {
        let parent = account("1300", true, true);
        let parent_id = parent.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<accounts::Model>::new()])
            .append_query_results([vec![parent]])
            .into_connection();
        let repo = AccountRepository::new(Arc::new(db));

        assert!(matches!(
            repo.create_account(input("1310", AccountType::Asset, Some(parent_id))).await,
            Err(AccountError::ParentIsPosting(code)) if code == "1300"
        ));
    }

    #[tokio::test]
    async fn test_deactivate_missing_account() {
        let id = Uuid::from_u128(99);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<accounts::Model>::new()])
            .into_connection();
        let repo = AccountRepository::new(Arc::new(db));

        assert!(matches!(
            repo.deactivate_account(id).await,
            Err(AccountError::AccountNotFound(got)) if got == id
        ));
    }

    #[tokio::test]
    async fn test_deactivate_account() {
        let original = account("5000", true, true);
        let mut deactivated = original.clone();
        deactivated.is_active = false;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![original.clone()]])
            .append_query_results([vec![deactivated]])
            .into_connection();
        let repo = AccountRepository::new(Arc::new(db));

        let account = repo.deactivate_account(original.id).await.unwrap();
        assert!(!account.is_active);
        assert_eq!(account.code, "5000");
    }
}
