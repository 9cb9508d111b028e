//! Operational tables read by the accounting automations.
//!
//! Jobs, their cost rows, time entries, purchase orders and receipts belong to
//! the surrounding field-service application. These minimal versions keep the
//! workspace self-contained; the ledger only ever reads them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(JOBS_SQL).await?;
        db.execute_unprepared(JOB_COSTS_SQL).await?;
        db.execute_unprepared(TIME_ENTRIES_SQL).await?;
        db.execute_unprepared(PURCHASE_ORDERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const JOBS_SQL: &str = r"
CREATE TABLE jobs (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    job_number      VARCHAR(50) NOT NULL UNIQUE,
    status          VARCHAR(30) NOT NULL DEFAULT 'SCHEDULED',
    completed_at    TIMESTAMPTZ,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const JOB_COSTS_SQL: &str = r"
CREATE TABLE job_labor_costs (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    job_id          UUID NOT NULL REFERENCES jobs(id),
    description     TEXT,
    total_cost      NUMERIC(19, 4) NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_job_labor_costs_job ON job_labor_costs(job_id);

CREATE TABLE job_material_costs (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    job_id          UUID NOT NULL REFERENCES jobs(id),
    description     TEXT,
    total_cost      NUMERIC(19, 4) NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_job_material_costs_job ON job_material_costs(job_id);

CREATE TABLE job_equipment_costs (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    job_id          UUID NOT NULL REFERENCES jobs(id),
    description     TEXT,
    total_cost      NUMERIC(19, 4) NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_job_equipment_costs_job ON job_equipment_costs(job_id);
";

const TIME_ENTRIES_SQL: &str = r"
CREATE TABLE time_entries (
    id                  UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id             UUID,
    job_id              UUID REFERENCES jobs(id),
    entry_date          DATE NOT NULL,
    status              VARCHAR(30) NOT NULL DEFAULT 'submitted',
    regular_hours       NUMERIC(8, 2),
    regular_rate        NUMERIC(19, 4),
    overtime_hours      NUMERIC(8, 2),
    overtime_rate       NUMERIC(19, 4),
    double_time_hours   NUMERIC(8, 2),
    double_time_rate    NUMERIC(19, 4),
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_time_entries_status ON time_entries(status);
";

const PURCHASE_ORDERS_SQL: &str = r"
CREATE TABLE purchase_orders (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    po_number       VARCHAR(50) NOT NULL UNIQUE,
    vendor_id       UUID NOT NULL,
    status          VARCHAR(30) NOT NULL DEFAULT 'DRAFT',
    total_amount    NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ
);

CREATE TABLE purchase_order_receipts (
    id                  UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    purchase_order_id   UUID NOT NULL REFERENCES purchase_orders(id),
    received_at         TIMESTAMPTZ NOT NULL,
    received_by         UUID,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_purchase_order_receipts_po ON purchase_order_receipts(purchase_order_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS purchase_order_receipts CASCADE;
DROP TABLE IF EXISTS purchase_orders CASCADE;
DROP TABLE IF EXISTS time_entries CASCADE;
DROP TABLE IF EXISTS job_equipment_costs CASCADE;
DROP TABLE IF EXISTS job_material_costs CASCADE;
DROP TABLE IF EXISTS job_labor_costs CASCADE;
DROP TABLE IF EXISTS jobs CASCADE;
";
