//! Accounting period provisioning and the close/reopen/lock workflow.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use fieldledger_core::fiscal::{
    PeriodAction, ensure_no_drafts, generate_monthly_periods, validate_transition,
};
use fieldledger_core::ledger::LedgerError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::{db_err, rollback};
use crate::entities::{
    accounting_periods, journal_entries,
    sea_orm_active_enums::{JournalEntryStatus, PeriodStatus},
};

/// Accounting period repository.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: Arc<DatabaseConnection>,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates OPEN monthly periods covering `[start_date, end_date]`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - start_date > end_date (`InvalidPeriodRange`)
    /// - The range touches more than twelve months (`FiscalYearTooLong`)
    /// - The fiscal year already has periods, or the range overlaps an
    ///   existing period (`FiscalYearExists`)
    /// - Database operation fails
    pub async fn create_fiscal_year(
        &self,
        fiscal_year: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<accounting_periods::Model>, LedgerError> {
        let specs = generate_monthly_periods(fiscal_year, start_date, end_date)?;

        let clash = accounting_periods::Entity::find()
            .filter(
                accounting_periods::Column::FiscalYear.eq(fiscal_year).or(
                    accounting_periods::Column::StartDate
                        .lte(end_date)
                        .and(accounting_periods::Column::EndDate.gte(start_date)),
                ),
            )
            .one(&*self.db)
            .await
            .map_err(db_err)?;

        if let Some(existing) = clash {
            return Err(LedgerError::FiscalYearExists(existing.fiscal_year));
        }

        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now().into();

        let mut inserted = Vec::new();
        for spec in specs {
            let period = accounting_periods::ActiveModel {
                id: Set(Uuid::now_v7()),
                name: Set(spec.name),
                fiscal_year: Set(spec.fiscal_year),
                period_number: Set(spec.period_number),
                start_date: Set(spec.start_date),
                end_date: Set(spec.end_date),
                status: Set(PeriodStatus::Open),
                closed_by: Set(None),
                closed_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            match period.insert(&txn).await {
                Ok(model) => inserted.push(model),
                Err(err) => {
                    rollback(txn, "create_fiscal_year").await;
                    return Err(db_err(err));
                }
            }
        }

        txn.commit().await.map_err(db_err)?;

        info!(
            fiscal_year,
            start_date = %start_date,
            end_date = %end_date,
            periods = inserted.len(),
            "Created accounting periods"
        );

        Ok(inserted)
    }

    /// Lists the periods of a fiscal year in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_periods(
        &self,
        fiscal_year: i32,
    ) -> Result<Vec<accounting_periods::Model>, LedgerError> {
        accounting_periods::Entity::find()
            .filter(accounting_periods::Column::FiscalYear.eq(fiscal_year))
            .order_by_asc(accounting_periods::Column::PeriodNumber)
            .all(&*self.db)
            .await
            .map_err(db_err)
    }

    /// Finds a period by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_period_by_id(
        &self,
        period_id: Uuid,
    ) -> Result<Option<accounting_periods::Model>, LedgerError> {
        accounting_periods::Entity::find_by_id(period_id)
            .one(&*self.db)
            .await
            .map_err(db_err)
    }

    /// Finds the period covering `date`, in any status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_period_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<accounting_periods::Model>, LedgerError> {
        accounting_periods::Entity::find()
            .filter(accounting_periods::Column::StartDate.lte(date))
            .filter(accounting_periods::Column::EndDate.gte(date))
            .one(&*self.db)
            .await
            .map_err(db_err)
    }

    /// Closes an OPEN period that holds no DRAFT entries.
    ///
    /// The draft count is taken under the period's row lock, after any
    /// in-flight writer holding the period `FOR SHARE` has committed.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `InvalidPeriodTransition`,
    /// `PeriodHasDrafts` with the exact count, or a database error.
    pub async fn close_period(
        &self,
        period_id: Uuid,
        user_id: Uuid,
    ) -> Result<accounting_periods::Model, LedgerError> {
        self.transition(period_id, PeriodAction::Close, Some(user_id))
            .await
    }

    /// Reopens a CLOSED period and clears its close stamp.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `InvalidPeriodTransition`, or a database
    /// error.
    pub async fn reopen_period(
        &self,
        period_id: Uuid,
    ) -> Result<accounting_periods::Model, LedgerError> {
        self.transition(period_id, PeriodAction::Reopen, None).await
    }

    /// Permanently locks a CLOSED period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `InvalidPeriodTransition`, or a database
    /// error.
    pub async fn lock_period(
        &self,
        period_id: Uuid,
        user_id: Uuid,
    ) -> Result<accounting_periods::Model, LedgerError> {
        self.transition(period_id, PeriodAction::Lock, Some(user_id))
            .await
    }

    async fn transition(
        &self,
        period_id: Uuid,
        action: PeriodAction,
        user_id: Option<Uuid>,
    ) -> Result<accounting_periods::Model, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        match transition_in(&txn, period_id, action, user_id).await {
            Ok(period) => {
                txn.commit().await.map_err(db_err)?;
                info!(
                    period_id = %period_id,
                    action = %action,
                    status = ?period.status,
                    user_id = ?user_id,
                    "Accounting period transitioned"
                );
                Ok(period)
            }
            Err(err) => {
                rollback(txn, "period_transition").await;
                warn!(
                    period_id = %period_id,
                    action = %action,
                    error = %err,
                    "Accounting period transition rejected"
                );
                Err(err)
            }
        }
    }
}

async fn transition_in(
    txn: &DatabaseTransaction,
    period_id: Uuid,
    action: PeriodAction,
    user_id: Option<Uuid>,
) -> Result<accounting_periods::Model, LedgerError> {
    let period = accounting_periods::Entity::find_by_id(period_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(LedgerError::PeriodNotFound(period_id))?;

    let next = validate_transition(period.id, period.status.into(), action)?;

    if action == PeriodAction::Close {
        let drafts = journal_entries::Entity::find()
            .filter(journal_entries::Column::PeriodId.eq(period.id))
            .filter(journal_entries::Column::Status.eq(JournalEntryStatus::Draft))
            .count(txn)
            .await
            .map_err(db_err)?;
        ensure_no_drafts(period.id, drafts)?;
    }

    let now = Utc::now().into();
    let mut active: accounting_periods::ActiveModel = period.into();
    active.status = Set(next.into());
    active.updated_at = Set(now);
    match action {
        PeriodAction::Close => {
            active.closed_by = Set(user_id);
            active.closed_at = Set(Some(now));
        }
        PeriodAction::Reopen => {
            active.closed_by = Set(None);
            active.closed_at = Set(None);
        }
        PeriodAction::Lock => {}
    }

    active.update(txn).await.map_err(db_err)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use fieldledger_core::fiscal::PeriodStatus as CorePeriodStatus;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use crate::repositories::fixtures::{PERIOD_ID, date, period};

    fn repo_with(db: MockDatabase) -> PeriodRepository {
        PeriodRepository::new(Arc::new(db.into_connection()))
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
    }

    #[tokio::test]
    async fn test_invalid_range_rejected_before_database() {
        let repo = repo_with(MockDatabase::new(DatabaseBackend::Postgres));

        assert!(matches!(
            repo.create_fiscal_year(2024, date(2024, 12, 31), date(2024, 1, 1)).await,
            Err(LedgerError::InvalidPeriodRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_range_over_twelve_months_rejected_before_database() {
        let repo = repo_with(MockDatabase::new(DatabaseBackend::Postgres));

        assert!(matches!(
            repo.create_fiscal_year(2024, date(2024, 1, 1), date(2025, 3, 31)).await,
            Err(LedgerError::FiscalYearTooLong { months: 15, .. })
        ));
    }

    #[tokio::test]
    async fn test_existing_fiscal_year_rejected() {
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![period(PeriodStatus::Open)]]),
        );

        assert!(matches!(
            repo.create_fiscal_year(2024, date(2024, 1, 1), date(2024, 12, 31)).await,
            Err(LedgerError::FiscalYearExists(2024))
        ));
    }

    #[tokio::test]
    async fn test_close_missing_period() {
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<accounting_periods::Model>::new()]),
        );

        assert!(matches!(
            repo.close_period(PERIOD_ID, Uuid::from_u128(7)).await,
            Err(LedgerError::PeriodNotFound(id)) if id == PERIOD_ID
        ));
    }

    #[tokio::test]
    async fn test_close_blocked_by_drafts_reports_count() {
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![period(PeriodStatus::Open)]])
                .append_query_results([vec![count_row(2)]]),
        );

        let err = repo
            .close_period(PERIOD_ID, Uuid::from_u128(7))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::PeriodHasDrafts { count: 2, .. }));
        assert_eq!(err.http_status_code(), 400);
    }

    #[tokio::test]
    async fn test_close_already_closed_rejected() {
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![period(PeriodStatus::Closed)]]),
        );

        assert!(matches!(
            repo.close_period(PERIOD_ID, Uuid::from_u128(7)).await,
            Err(LedgerError::InvalidPeriodTransition {
                status: CorePeriodStatus::Closed,
                action: PeriodAction::Close,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_reopen_open_period_rejected() {
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![period(PeriodStatus::Open)]]),
        );

        assert!(matches!(
            repo.reopen_period(PERIOD_ID).await,
            Err(LedgerError::InvalidPeriodTransition {
                action: PeriodAction::Reopen,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_close_stamps_user() {
        let user_id = Uuid::from_u128(7);
        let mut closed = period(PeriodStatus::Closed);
        closed.closed_by = Some(user_id);
        closed.closed_at = Some(closed.updated_at);

        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![period(PeriodStatus::Open)]])
                .append_query_results([vec![count_row(0)]])
                .append_query_results([vec![closed]]),
        );

        let result = repo.close_period(PERIOD_ID, user_id).await.unwrap();
        assert_eq!(result.status, PeriodStatus::Closed);
        assert_eq!(result.closed_by, Some(user_id));
    }

    #[tokio::test]
    async fn test_locked_period_cannot_reopen() {
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![period(PeriodStatus::Locked)]]),
        );

        assert!(matches!(
            repo.reopen_period(PERIOD_ID).await,
            Err(LedgerError::InvalidPeriodTransition {
                status: CorePeriodStatus::Locked,
                ..
            })
        ));
    }
}
