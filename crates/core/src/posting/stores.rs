//! Storage seams the posting orchestrator depends on.
//!
//! The core crate defines the traits; the database crate implements
//! them. Tests run the orchestrator against in-memory doubles.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use keel_shared::types::{
    AccountId, CompanyId, Currency, DocumentId, JournalEntryId, PeriodId,
};

use crate::accounts::Account;
use crate::approval::ApprovalRule;
use crate::fiscal::AccountingPeriod;
use crate::ledger::{JournalDraft, JournalEntry, JournalTotals};

use super::types::{Actor, PostingResult, SourceDocument};

/// Transient storage failures. All variants are safe to retry.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store is unreachable.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The operation timed out.
    #[error("store operation timed out: {0}")]
    Timeout(String),

    /// Any other storage failure.
    #[error("store error: {0}")]
    Other(String),
}

/// Read access to source documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads a document by id, scoped to the company.
    async fn find_document(
        &self,
        company_id: CompanyId,
        document_id: DocumentId,
    ) -> Result<Option<SourceDocument>, StoreError>;
}

/// Read access to the chart of accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Loads the named accounts for a company, keyed by id. Unknown ids
    /// are simply absent from the map.
    async fn find_accounts(
        &self,
        company_id: CompanyId,
        ids: &[AccountId],
    ) -> Result<HashMap<AccountId, Account>, StoreError>;
}

/// Read access to accounting periods.
#[async_trait]
pub trait PeriodStore: Send + Sync {
    /// Finds the period covering a date, if any.
    async fn find_period_for_date(
        &self,
        company_id: CompanyId,
        date: NaiveDate,
    ) -> Result<Option<AccountingPeriod>, StoreError>;

    /// Loads a period by id for the commit-time re-check.
    async fn find_period(
        &self,
        company_id: CompanyId,
        period_id: PeriodId,
    ) -> Result<Option<AccountingPeriod>, StoreError>;
}

/// Exchange rate lookup.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Rate from `from` to `to` effective on `date`, if known.
    async fn find_rate(
        &self,
        company_id: CompanyId,
        from: Currency,
        to: Currency,
        date: NaiveDate,
    ) -> Result<Option<Decimal>, StoreError>;
}

/// Read access to approval rules.
#[async_trait]
pub trait ApprovalRuleStore: Send + Sync {
    /// All active rules for a company.
    async fn find_rules(&self, company_id: CompanyId) -> Result<Vec<ApprovalRule>, StoreError>;
}

/// Read access to company settings.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// The company base currency, or None when the company is unknown.
    async fn base_currency(&self, company_id: CompanyId)
        -> Result<Option<Currency>, StoreError>;
}

/// A journal committed by the unit of work.
#[derive(Debug, Clone)]
pub struct CommittedJournal {
    /// The new journal entry id.
    pub id: JournalEntryId,
    /// The assigned journal number.
    pub journal_number: String,
    /// Debit and credit totals.
    pub totals: JournalTotals,
}

/// Why a commit was refused.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The commit-time period re-check found the period no longer open.
    #[error("accounting period is no longer open")]
    PeriodNotOpen {
        /// The status found at commit time, if the period still exists.
        status: Option<crate::fiscal::PeriodStatus>,
    },

    /// Another request posted this document first.
    #[error("document was posted concurrently")]
    DocumentConflict,

    /// A transient storage failure. Nothing was written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The atomic commit seam.
///
/// One `commit` call performs, in a single transaction: the period
/// re-check, the document status flip, journal number allocation, and
/// all inserts. Either everything lands or nothing does.
#[async_trait]
pub trait PostingUnitOfWork: Send + Sync {
    /// Finds a previously stored posting outcome for an idempotency key.
    async fn find_by_idempotency_key(
        &self,
        company_id: CompanyId,
        key: &str,
    ) -> Result<Option<PostingResult>, StoreError>;

    /// Finds the posted journal for a document, if one exists.
    async fn find_journal_for_document(
        &self,
        company_id: CompanyId,
        document_id: DocumentId,
    ) -> Result<Option<JournalEntry>, StoreError>;

    /// Loads a journal by id.
    async fn find_journal(
        &self,
        company_id: CompanyId,
        journal_id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, StoreError>;

    /// Atomically posts a draft against its source document.
    async fn commit(
        &self,
        draft: &JournalDraft,
        document_id: DocumentId,
        idempotency_key: &str,
        actor: Actor,
    ) -> Result<CommittedJournal, CommitError>;

    /// Atomically posts a reversing draft and marks the original
    /// journal reversed.
    async fn commit_reversal(
        &self,
        draft: &JournalDraft,
        original: JournalEntryId,
        actor: Actor,
    ) -> Result<CommittedJournal, CommitError>;
}
