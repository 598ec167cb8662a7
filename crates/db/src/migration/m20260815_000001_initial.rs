//! Initial database migration.
//!
//! Creates all enums, tables, and the uniqueness constraints the posting
//! flow relies on: one posted journal per document, and one journal per
//! idempotency key.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(FISCAL_PERIODS_SQL).await?;
        db.execute_unprepared(EXCHANGE_RATES_SQL).await?;
        db.execute_unprepared(APPROVAL_RULES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;
        db.execute_unprepared(JOURNAL_SEQUENCES_SQL).await?;
        db.execute_unprepared(DOCUMENTS_SQL).await?;
        db.execute_unprepared(AUDIT_RECORDS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "DROP TABLE IF EXISTS audit_records, documents, journal_sequences, journal_lines, \
             journal_entries, approval_rules, exchange_rates, fiscal_periods, accounts, companies;",
        )
        .await?;
        db.execute_unprepared(
            "DROP TYPE IF EXISTS account_type, period_status, document_kind, document_status, \
             journal_status, line_role;",
        )
        .await?;

        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM ('asset', 'liability', 'equity', 'income', 'expense');
CREATE TYPE period_status AS ENUM ('open', 'closed', 'locked');
CREATE TYPE document_kind AS ENUM ('invoice', 'bill', 'payment_in', 'payment_out');
CREATE TYPE document_status AS ENUM ('draft', 'pending_approval', 'posted', 'voided');
CREATE TYPE journal_status AS ENUM ('draft', 'posted', 'reversed');
CREATE TYPE line_role AS ENUM ('control', 'detail', 'tax');
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    base_currency VARCHAR(3) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX idx_companies_tenant ON companies (tenant_id);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies (id),
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    currency VARCHAR(3) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    allow_direct_posting BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (company_id, code)
);
CREATE INDEX idx_accounts_company ON accounts (company_id);
";

const FISCAL_PERIODS_SQL: &str = r"
CREATE TABLE fiscal_periods (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies (id),
    name VARCHAR(100) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status period_status NOT NULL DEFAULT 'open',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CHECK (start_date <= end_date)
);
CREATE INDEX idx_fiscal_periods_company_dates
    ON fiscal_periods (company_id, start_date, end_date);
";

const EXCHANGE_RATES_SQL: &str = r"
CREATE TABLE exchange_rates (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies (id),
    from_currency VARCHAR(3) NOT NULL,
    to_currency VARCHAR(3) NOT NULL,
    rate NUMERIC(20, 10) NOT NULL CHECK (rate > 0),
    effective_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (company_id, from_currency, to_currency, effective_date)
);
";

const APPROVAL_RULES_SQL: &str = r"
CREATE TABLE approval_rules (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies (id),
    name VARCHAR(255) NOT NULL,
    min_amount NUMERIC(20, 4),
    max_amount NUMERIC(20, 4),
    document_kinds JSONB NOT NULL DEFAULT '[]',
    required_role VARCHAR(20) NOT NULL,
    priority SMALLINT NOT NULL DEFAULT 100,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX idx_approval_rules_company ON approval_rules (company_id) WHERE is_active;
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    company_id UUID NOT NULL REFERENCES companies (id),
    journal_number VARCHAR(30) NOT NULL,
    posting_date DATE NOT NULL,
    currency VARCHAR(3) NOT NULL,
    status journal_status NOT NULL DEFAULT 'posted',
    source_kind VARCHAR(20) NOT NULL,
    source_document_id UUID NOT NULL,
    source_document_number VARCHAR(50) NOT NULL,
    idempotency_key VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    posted_at TIMESTAMPTZ,
    created_by UUID NOT NULL,
    UNIQUE (company_id, journal_number)
);
-- At most one posted journal per source document.
CREATE UNIQUE INDEX uq_journal_entries_posted_document
    ON journal_entries (company_id, source_document_id)
    WHERE status = 'posted' AND source_kind <> 'reversal';
-- At most one journal per idempotency key.
CREATE UNIQUE INDEX uq_journal_entries_idempotency_key
    ON journal_entries (company_id, idempotency_key);
CREATE INDEX idx_journal_entries_company_date
    ON journal_entries (company_id, posting_date);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY,
    journal_entry_id UUID NOT NULL REFERENCES journal_entries (id),
    line_no SMALLINT NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts (id),
    role line_role NOT NULL,
    debit NUMERIC(20, 4) NOT NULL DEFAULT 0 CHECK (debit >= 0),
    credit NUMERIC(20, 4) NOT NULL DEFAULT 0 CHECK (credit >= 0),
    memo VARCHAR(500),
    UNIQUE (journal_entry_id, line_no),
    CHECK (debit = 0 OR credit = 0)
);
CREATE INDEX idx_journal_lines_account ON journal_lines (account_id);
";

const JOURNAL_SEQUENCES_SQL: &str = r"
CREATE TABLE journal_sequences (
    company_id UUID NOT NULL REFERENCES companies (id),
    year INT NOT NULL,
    next_value BIGINT NOT NULL DEFAULT 1,
    PRIMARY KEY (company_id, year)
);
";

const DOCUMENTS_SQL: &str = r"
CREATE TABLE documents (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    company_id UUID NOT NULL REFERENCES companies (id),
    kind document_kind NOT NULL,
    status document_status NOT NULL DEFAULT 'draft',
    document_number VARCHAR(50) NOT NULL,
    journal_entry_id UUID REFERENCES journal_entries (id),
    payload JSONB NOT NULL,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (company_id, document_number)
);
CREATE INDEX idx_documents_company_status ON documents (company_id, status);
";

const AUDIT_RECORDS_SQL: &str = r"
CREATE TABLE audit_records (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    company_id UUID NOT NULL,
    actor UUID NOT NULL,
    actor_role VARCHAR(20) NOT NULL,
    action VARCHAR(30) NOT NULL,
    entity_type VARCHAR(30) NOT NULL,
    entity_id VARCHAR(100) NOT NULL,
    sod JSONB,
    metadata JSONB NOT NULL DEFAULT '{}',
    recorded_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX idx_audit_records_company_time
    ON audit_records (company_id, recorded_at DESC);
-- Append-only: no UPDATE or DELETE, ever.
CREATE RULE audit_records_no_update AS ON UPDATE TO audit_records DO INSTEAD NOTHING;
CREATE RULE audit_records_no_delete AS ON DELETE TO audit_records DO INSTEAD NOTHING;
";
