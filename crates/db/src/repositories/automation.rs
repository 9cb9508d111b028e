//! Event-driven journal generation for operational events.

use std::sync::Arc;

use chrono::Utc;
use fieldledger_core::accounts::AccountCodeResolver;
use fieldledger_core::automation::{
    AutomationOutcome, JobCostSummary, PurchaseOrderReceipt, TimeEntryPay,
    build_job_completion_entry, build_payroll_accrual_entry, build_po_receipt_entry,
};
use fieldledger_core::ledger::{LedgerError, SourceKey};
use fieldledger_shared::types::{JobId, PurchaseOrderId, TimeEntryId};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::db_err;
use super::journal::JournalRepository;
use crate::entities::{
    job_equipment_costs, job_labor_costs, job_material_costs, jobs, purchase_order_receipts,
    purchase_orders, time_entries,
};

/// Generates journal entries from job, time and purchasing events.
///
/// Each entry point is idempotent per source event: a second call for the
/// same event returns the entry recorded by the first.
#[derive(Debug, Clone)]
pub struct AutomationRepository {
    db: Arc<DatabaseConnection>,
    journal: JournalRepository,
    resolver: Arc<AccountCodeResolver>,
    vendor_invoice_terms_days: i64,
}

impl AutomationRepository {
    /// Creates a new automation repository.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        resolver: Arc<AccountCodeResolver>,
        vendor_invoice_terms_days: i64,
    ) -> Self {
        Self {
            journal: JournalRepository::new(Arc::clone(&db)),
            db,
            resolver,
            vendor_invoice_terms_days,
        }
    }

    /// Records cost of goods sold for a completed job.
    ///
    /// # Errors
    ///
    /// Returns `JobNotFound`, `JobNotCompleted`, `NothingToPost`, any writer
    /// error, or a database error.
    pub async fn on_job_completed(&self, job_id: JobId) -> Result<AutomationOutcome, LedgerError> {
        let key = SourceKey::job_completion(job_id);
        if let Some(outcome) = self.replay(&key).await? {
            return Ok(outcome);
        }

        let job = jobs::Entity::find_by_id(job_id.into_inner())
            .one(&*self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::JobNotFound(job_id.into_inner()))?;

        let summary = JobCostSummary {
            job_id,
            job_number: Some(job.job_number),
            status: job.status,
            completed_on: job.completed_at.map(|at| at.date_naive()),
            labor: sum_costs::<job_labor_costs::Entity, _>(
                &*self.db,
                job_labor_costs::Column::JobId,
                job_labor_costs::Column::TotalCost,
                job.id,
            )
            .await?,
            material: sum_costs::<job_material_costs::Entity, _>(
                &*self.db,
                job_material_costs::Column::JobId,
                job_material_costs::Column::TotalCost,
                job.id,
            )
            .await?,
            equipment: sum_costs::<job_equipment_costs::Entity, _>(
                &*self.db,
                job_equipment_costs::Column::JobId,
                job_equipment_costs::Column::TotalCost,
                job.id,
            )
            .await?,
        };

        let entry = build_job_completion_entry(&summary, &self.resolver, Utc::now().date_naive())
            .inspect_err(|err| {
                warn!(
                    job_id = %job_id,
                    labor = %summary.labor,
                    material = %summary.material,
                    equipment = %summary.equipment,
                    error = %err,
                    "Job completion not recorded"
                );
            })?;

        Ok(self.journal.record(&entry, None).await?.into())
    }

    /// Accrues payroll for a batch of approved time entries.
    ///
    /// The batch is keyed by its sorted, de-duplicated id list, so the same
    /// set in any order maps to one entry.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTimeEntryBatch`, `TimeEntriesNotApproved`,
    /// `NothingToPost`, any writer error, or a database error.
    pub async fn on_time_entries_approved(
        &self,
        time_entry_ids: &[TimeEntryId],
    ) -> Result<AutomationOutcome, LedgerError> {
        let key = SourceKey::time_approval(time_entry_ids)?;
        if let Some(outcome) = self.replay(&key).await? {
            return Ok(outcome);
        }

        let ids: Vec<Uuid> = time_entry_ids.iter().map(|id| id.into_inner()).collect();
        let entries: Vec<TimeEntryPay> = time_entries::Entity::find()
            .filter(time_entries::Column::Id.is_in(ids))
            .all(&*self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|row| TimeEntryPay {
                id: TimeEntryId::from_uuid(row.id),
                status: row.status,
                entry_date: row.entry_date,
                regular_hours: row.regular_hours,
                regular_rate: row.regular_rate,
                overtime_hours: row.overtime_hours,
                overtime_rate: row.overtime_rate,
                double_time_hours: row.double_time_hours,
                double_time_rate: row.double_time_rate,
            })
            .collect();

        let entry = build_payroll_accrual_entry(time_entry_ids, &entries, &self.resolver)
            .inspect_err(|err| {
                warn!(
                    source_id = %key.source_id,
                    found = entries.len(),
                    error = %err,
                    "Payroll accrual not recorded"
                );
            })?;

        Ok(self.journal.record(&entry, None).await?.into())
    }

    /// Recognizes inventory and payables for a received purchase order and
    /// raises the matching vendor invoice.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseOrderNotFound`, `PurchaseOrderNotReceived`,
    /// `NothingToPost`, any writer error, or a database error.
    pub async fn on_po_received(
        &self,
        po_id: PurchaseOrderId,
    ) -> Result<AutomationOutcome, LedgerError> {
        let key = SourceKey::purchase_order(po_id);
        if let Some(outcome) = self.replay(&key).await? {
            return Ok(outcome);
        }

        let po = purchase_orders::Entity::find_by_id(po_id.into_inner())
            .one(&*self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::PurchaseOrderNotFound(po_id.into_inner()))?;

        let last_receipt = purchase_order_receipts::Entity::find()
            .filter(purchase_order_receipts::Column::PurchaseOrderId.eq(po.id))
            .order_by_desc(purchase_order_receipts::Column::ReceivedAt)
            .one(&*self.db)
            .await
            .map_err(db_err)?;

        let receipt = PurchaseOrderReceipt {
            po_id,
            po_number: po.po_number,
            vendor_id: po.vendor_id,
            status: po.status,
            total_amount: po.total_amount,
            last_received_on: last_receipt.map(|r| r.received_at.date_naive()),
            updated_on: po.updated_at.map(|at| at.date_naive()),
            created_on: po.created_at.date_naive(),
        };

        let built = build_po_receipt_entry(&receipt, &self.resolver, self.vendor_invoice_terms_days)
            .inspect_err(|err| {
                warn!(
                    po_id = %po_id,
                    total_amount = %receipt.total_amount,
                    error = %err,
                    "Purchase order receipt not recorded"
                );
            })?;

        Ok(self
            .journal
            .record(&built.entry, Some(&built.invoice))
            .await?
            .into())
    }

    /// Fast path of the idempotency guard.
    async fn replay(&self, key: &SourceKey) -> Result<Option<AutomationOutcome>, LedgerError> {
        let existing = self.journal.find_existing_entry(key).await?;
        if let Some(entry_id) = existing {
            info!(
                entry_id = %entry_id,
                source_type = %key.source_type,
                source_id = %key.source_id,
                "Event already recorded, returning existing entry"
            );
        }
        Ok(existing.map(|entry_id| AutomationOutcome {
            entry_id,
            replayed: true,
        }))
    }
}

/// Sums one job cost table's `total_cost` for a job.
async fn sum_costs<E, C>(
    conn: &C,
    job_column: E::Column,
    cost_column: E::Column,
    job_id: Uuid,
) -> Result<Decimal, LedgerError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let costs: Vec<Decimal> = E::find()
        .select_only()
        .column(cost_column)
        .filter(job_column.eq(job_id))
        .into_tuple()
        .all(conn)
        .await
        .map_err(db_err)?;

    Ok(costs.into_iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::entities::journal_entries;
    use crate::entities::sea_orm_active_enums::JournalEntryStatus;
    use crate::repositories::fixtures::{date, header, now};

    fn repo_with(db: MockDatabase) -> AutomationRepository {
        AutomationRepository::new(
            Arc::new(db.into_connection()),
            Arc::new(AccountCodeResolver::with_defaults()),
            30,
        )
    }

    fn no_entry() -> Vec<journal_entries::Model> {
        Vec::new()
    }

    fn job(id: Uuid, status: &str) -> jobs::Model {
        jobs::Model {
            id,
            job_number: "J-1001".to_string(),
            status: status.to_string(),
            completed_at: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn time_entry(id: Uuid, status: &str) -> time_entries::Model {
        time_entries::Model {
            id,
            user_id: None,
            job_id: None,
            entry_date: date(2024, 3, 4),
            status: status.to_string(),
            regular_hours: None,
            regular_rate: None,
            overtime_hours: None,
            overtime_rate: None,
            double_time_hours: None,
            double_time_rate: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[tokio::test]
    async fn test_job_replay_skips_source_lookup() {
        let existing = Uuid::from_u128(9);
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![header(existing, JournalEntryStatus::Draft)]]),
        );

        let outcome = repo
            .on_job_completed(JobId::from_uuid(Uuid::from_u128(5)))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            AutomationOutcome {
                entry_id: existing,
                replayed: true,
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let job_id = Uuid::from_u128(5);
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([no_entry()])
                .append_query_results([Vec::<jobs::Model>::new()]),
        );

        assert!(matches!(
            repo.on_job_completed(JobId::from_uuid(job_id)).await,
            Err(LedgerError::JobNotFound(id)) if id == job_id
        ));
    }

    #[tokio::test]
    async fn test_job_not_completed() {
        let job_id = Uuid::from_u128(5);
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([no_entry()])
                .append_query_results([vec![job(job_id, "IN_PROGRESS")]])
                .append_query_results([Vec::<job_labor_costs::Model>::new()])
                .append_query_results([Vec::<job_material_costs::Model>::new()])
                .append_query_results([Vec::<job_equipment_costs::Model>::new()]),
        );

        assert!(matches!(
            repo.on_job_completed(JobId::from_uuid(job_id)).await,
            Err(LedgerError::JobNotCompleted { status, .. }) if status == "IN_PROGRESS"
        ));
    }

    #[tokio::test]
    async fn test_completed_job_without_costs_posts_nothing() {
        let job_id = Uuid::from_u128(5);
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([no_entry()])
                .append_query_results([vec![job(job_id, "COMPLETED")]])
                .append_query_results([Vec::<job_labor_costs::Model>::new()])
                .append_query_results([Vec::<job_material_costs::Model>::new()])
                .append_query_results([Vec::<job_equipment_costs::Model>::new()]),
        );

        assert!(matches!(
            repo.on_job_completed(JobId::from_uuid(job_id)).await,
            Err(LedgerError::NothingToPost(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_time_batch_rejected_before_database() {
        let repo = repo_with(MockDatabase::new(DatabaseBackend::Postgres));

        assert!(matches!(
            repo.on_time_entries_approved(&[]).await,
            Err(LedgerError::EmptyTimeEntryBatch)
        ));
    }

    #[tokio::test]
    async fn test_unapproved_time_entry_rejects_batch() {
        let approved = Uuid::from_u128(1);
        let submitted = Uuid::from_u128(2);
        let missing = Uuid::from_u128(3);
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([no_entry()])
                .append_query_results([vec![
                    time_entry(approved, "approved"),
                    time_entry(submitted, "submitted"),
                ]]),
        );

        let ids = [approved, submitted, missing].map(TimeEntryId::from_uuid);
        assert!(matches!(
            repo.on_time_entries_approved(&ids).await,
            Err(LedgerError::TimeEntriesNotApproved { ids }) if ids == vec![submitted, missing]
        ));
    }

    #[tokio::test]
    async fn test_unknown_purchase_order() {
        let po_id = Uuid::from_u128(8);
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([no_entry()])
                .append_query_results([Vec::<purchase_orders::Model>::new()]),
        );

        assert!(matches!(
            repo.on_po_received(PurchaseOrderId::from_uuid(po_id)).await,
            Err(LedgerError::PurchaseOrderNotFound(id)) if id == po_id
        ));
    }

    #[tokio::test]
    async fn test_purchase_order_not_received() {
        let po_id = Uuid::from_u128(8);
        let po = purchase_orders::Model {
            id: po_id,
            po_number: "PO-0042".to_string(),
            vendor_id: Uuid::from_u128(20),
            status: "ORDERED".to_string(),
            total_amount: Decimal::new(1200, 0),
            created_at: now(),
            updated_at: None,
        };
        let repo = repo_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([no_entry()])
                .append_query_results([vec![po]])
                .append_query_results([Vec::<purchase_order_receipts::Model>::new()]),
        );

        assert!(matches!(
            repo.on_po_received(PurchaseOrderId::from_uuid(po_id)).await,
            Err(LedgerError::PurchaseOrderNotReceived { status, .. }) if status == "ORDERED"
        ));
    }
}
