//! Ledger schema migration.
//!
//! Creates the chart of accounts, accounting periods, journal entries and
//! lines, and vendor invoices, together with the idempotency index and the
//! guard triggers that keep posted data immutable.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CHART OF ACCOUNTS & PERIODS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(ACCOUNTING_PERIODS_SQL).await?;

        // ============================================================
        // PART 3: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRY_LINES_SQL).await?;

        // ============================================================
        // PART 4: PAYABLES
        // ============================================================
        db.execute_unprepared(VENDOR_INVOICES_SQL).await?;

        // ============================================================
        // PART 5: GUARD TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM ('ASSET', 'LIABILITY', 'EQUITY', 'REVENUE', 'COGS', 'EXPENSE');
CREATE TYPE balance_type AS ENUM ('DEBIT', 'CREDIT');
CREATE TYPE period_status AS ENUM ('OPEN', 'CLOSED', 'LOCKED');
CREATE TYPE journal_entry_status AS ENUM ('DRAFT', 'POSTED');
CREATE TYPE journal_source_type AS ENUM ('JOB_COMPLETION', 'TIME_APPROVAL', 'PURCHASE_ORDER');
CREATE TYPE vendor_invoice_status AS ENUM ('PENDING', 'APPROVED', 'PAID', 'CANCELLED');
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id                  UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code                VARCHAR(20) NOT NULL,
    name                VARCHAR(255) NOT NULL,
    account_type        account_type NOT NULL,
    balance_type        balance_type NOT NULL,
    parent_account_id   UUID REFERENCES accounts(id),
    is_posting          BOOLEAN NOT NULL DEFAULT true,
    is_active           BOOLEAN NOT NULL DEFAULT true,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_accounts_code UNIQUE (code),
    CONSTRAINT chk_accounts_not_own_parent
        CHECK (parent_account_id IS NULL OR parent_account_id <> id)
);

CREATE INDEX idx_accounts_parent ON accounts(parent_account_id) WHERE parent_account_id IS NOT NULL;
";

const ACCOUNTING_PERIODS_SQL: &str = r"
CREATE TABLE accounting_periods (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name            VARCHAR(50) NOT NULL,
    fiscal_year     INTEGER NOT NULL,
    period_number   SMALLINT NOT NULL,
    start_date      DATE NOT NULL,
    end_date        DATE NOT NULL,
    status          period_status NOT NULL DEFAULT 'OPEN',
    closed_by       UUID,
    closed_at       TIMESTAMPTZ,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_accounting_periods_number UNIQUE (fiscal_year, period_number),
    CONSTRAINT chk_accounting_periods_dates CHECK (start_date <= end_date)
);

CREATE INDEX idx_accounting_periods_dates ON accounting_periods(start_date, end_date);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE SEQUENCE journal_entry_number_seq;

CREATE TABLE journal_entries (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_number    VARCHAR(20) NOT NULL
                    DEFAULT 'JE-' || lpad(nextval('journal_entry_number_seq')::text, 6, '0'),
    entry_date      DATE NOT NULL,
    period_id       UUID NOT NULL REFERENCES accounting_periods(id),
    status          journal_entry_status NOT NULL DEFAULT 'DRAFT',
    description     TEXT NOT NULL,
    reference       VARCHAR(100),
    source_type     journal_source_type,
    source_id       TEXT,
    posted_by       UUID,
    posted_at       TIMESTAMPTZ,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_journal_entries_number UNIQUE (entry_number),
    CONSTRAINT chk_journal_entries_source CHECK ((source_type IS NULL) = (source_id IS NULL)),
    CONSTRAINT chk_journal_entries_posted CHECK (
        (status = 'POSTED') = (posted_at IS NOT NULL)
    )
);

ALTER SEQUENCE journal_entry_number_seq OWNED BY journal_entries.entry_number;

-- Authoritative idempotency constraint. Time-approval keys can exceed the
-- B-tree key limit, so the unique index is taken over a digest.
CREATE UNIQUE INDEX uq_journal_entries_source
    ON journal_entries (source_type, md5(source_id))
    WHERE source_type IS NOT NULL;

CREATE INDEX idx_journal_entries_source_id ON journal_entries USING hash (source_id);
CREATE INDEX idx_journal_entries_period_status ON journal_entries(period_id, status);
";

const JOURNAL_ENTRY_LINES_SQL: &str = r"
CREATE TABLE journal_entry_lines (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_id        UUID NOT NULL REFERENCES journal_entries(id) ON DELETE RESTRICT,
    line_number     INTEGER NOT NULL,
    account_id      UUID NOT NULL REFERENCES accounts(id),
    debit           NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit          NUMERIC(19, 4) NOT NULL DEFAULT 0,
    description     TEXT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_journal_entry_lines_number UNIQUE (entry_id, line_number),
    CONSTRAINT chk_journal_entry_lines_amounts CHECK (debit >= 0 AND credit >= 0)
);

CREATE INDEX idx_journal_entry_lines_account ON journal_entry_lines(account_id);
";

const VENDOR_INVOICES_SQL: &str = r"
CREATE TABLE vendor_invoices (
    id                  UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    purchase_order_id   UUID NOT NULL,
    vendor_id           UUID NOT NULL,
    invoice_number      VARCHAR(100) NOT NULL,
    invoice_date        DATE NOT NULL,
    due_date            DATE NOT NULL,
    amount              NUMERIC(19, 4) NOT NULL,
    status              vendor_invoice_status NOT NULL DEFAULT 'PENDING',
    journal_entry_id    UUID NOT NULL REFERENCES journal_entries(id),
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_vendor_invoices_journal_entry UNIQUE (journal_entry_id),
    CONSTRAINT chk_vendor_invoices_amount CHECK (amount > 0),
    CONSTRAINT chk_vendor_invoices_due CHECK (due_date >= invoice_date)
);

CREATE INDEX idx_vendor_invoices_po ON vendor_invoices(purchase_order_id);
";

const TRIGGERS_SQL: &str = r"
-- Lines are written once, together with their header.
CREATE OR REPLACE FUNCTION prevent_journal_line_mutation()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'journal entry lines are immutable (entry %)', OLD.entry_id
        USING ERRCODE = 'integrity_constraint_violation';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_journal_entry_lines_immutable
    BEFORE UPDATE OR DELETE ON journal_entry_lines
    FOR EACH ROW EXECUTE FUNCTION prevent_journal_line_mutation();

-- DRAFT -> POSTED is one-way and posted headers are frozen.
CREATE OR REPLACE FUNCTION guard_posted_journal_entry()
RETURNS TRIGGER AS $$
BEGIN
    IF TG_OP = 'DELETE' THEN
        RAISE EXCEPTION 'journal entries cannot be deleted (entry %)', OLD.id
            USING ERRCODE = 'integrity_constraint_violation';
    END IF;
    IF OLD.status = 'POSTED' THEN
        RAISE EXCEPTION 'posted journal entry % cannot be modified', OLD.id
            USING ERRCODE = 'integrity_constraint_violation';
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_journal_entries_guard
    BEFORE UPDATE OR DELETE ON journal_entries
    FOR EACH ROW EXECUTE FUNCTION guard_posted_journal_entry();
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_journal_entries_guard ON journal_entries;
DROP TRIGGER IF EXISTS trg_journal_entry_lines_immutable ON journal_entry_lines;
DROP FUNCTION IF EXISTS guard_posted_journal_entry();
DROP FUNCTION IF EXISTS prevent_journal_line_mutation();

DROP TABLE IF EXISTS vendor_invoices CASCADE;
DROP TABLE IF EXISTS journal_entry_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS accounting_periods CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;

DROP TYPE IF EXISTS vendor_invoice_status CASCADE;
DROP TYPE IF EXISTS journal_source_type CASCADE;
DROP TYPE IF EXISTS journal_entry_status CASCADE;
DROP TYPE IF EXISTS period_status CASCADE;
DROP TYPE IF EXISTS balance_type CASCADE;
DROP TYPE IF EXISTS account_type CASCADE;
";
