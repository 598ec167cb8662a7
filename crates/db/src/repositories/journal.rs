//! Journal repository: the atomic posting unit of work.
//!
//! One transaction performs the period re-check, the document status
//! flip, journal number allocation, and all inserts. The partial unique
//! indexes on journal_entries back the at-most-once guarantees even if
//! two transactions race past the status check.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr,
    EntityTrait, QueryFilter, QuerySelect, Set, SqlErr, Statement, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use keel_core::ledger::{
    JournalDraft, JournalEntry, JournalLine, JournalTotals, SourceRef,
};
use keel_core::posting::{
    Actor, CommitError, CommittedJournal, PostingResult, PostingUnitOfWork, StoreError,
};
use keel_shared::types::{
    AccountId, CompanyId, Currency, DocumentId, JournalEntryId, Money, TenantId, UserId,
};

use crate::entities::sea_orm_active_enums::{DocumentStatus, JournalStatus, PeriodStatus};
use crate::entities::{documents, fiscal_periods, journal_entries, journal_lines};

use super::{corrupt, store_err};

const REVERSAL_KIND: &str = "reversal";

fn to_domain(
    entry: journal_entries::Model,
    mut lines: Vec<journal_lines::Model>,
) -> Result<JournalEntry, StoreError> {
    let currency =
        Currency::from_str(&entry.currency).map_err(|_| corrupt("currency", &entry.currency))?;
    lines.sort_by_key(|l| l.line_no);
    let lines = lines
        .into_iter()
        .map(|l| JournalLine {
            account_id: AccountId::from_uuid(l.account_id),
            role: l.role.into(),
            debit: Money::new(l.debit, currency),
            credit: Money::new(l.credit, currency),
            memo: l.memo,
        })
        .collect();

    Ok(JournalEntry {
        id: JournalEntryId::from_uuid(entry.id),
        tenant_id: TenantId::from_uuid(entry.tenant_id),
        company_id: CompanyId::from_uuid(entry.company_id),
        journal_number: entry.journal_number,
        posting_date: entry.posting_date,
        currency,
        lines,
        status: entry.status.into(),
        source: SourceRef {
            kind: entry.source_kind,
            document_id: DocumentId::from_uuid(entry.source_document_id),
            document_number: entry.source_document_number,
        },
        idempotency_key: entry.idempotency_key,
        created_at: entry.created_at.into(),
        posted_at: entry.posted_at.map(Into::into),
        created_by: UserId::from_uuid(entry.created_by),
    })
}

fn commit_db_err(err: DbErr) -> CommitError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        CommitError::DocumentConflict
    } else {
        CommitError::Store(store_err(err))
    }
}

/// Journal persistence and the posting unit of work.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    number_prefix: String,
}

impl JournalRepository {
    /// Creates a new journal repository.
    ///
    /// `number_prefix` leads every journal number, e.g. "JRN".
    #[must_use]
    pub const fn new(db: DatabaseConnection, number_prefix: String) -> Self {
        Self { db, number_prefix }
    }

    async fn load_entry(
        &self,
        model: journal_entries::Model,
    ) -> Result<JournalEntry, StoreError> {
        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalEntryId.eq(model.id))
            .all(&self.db)
            .await
            .map_err(store_err)?;
        to_domain(model, lines)
    }

    /// Re-checks inside the transaction that the posting date still
    /// falls in an open period. Takes a shared row lock so a concurrent
    /// period close waits for this commit.
    async fn recheck_period(
        &self,
        txn: &DatabaseTransaction,
        company_id: Uuid,
        date: chrono::NaiveDate,
    ) -> Result<(), CommitError> {
        let period = fiscal_periods::Entity::find()
            .filter(fiscal_periods::Column::CompanyId.eq(company_id))
            .filter(fiscal_periods::Column::StartDate.lte(date))
            .filter(fiscal_periods::Column::EndDate.gte(date))
            .lock_shared()
            .one(txn)
            .await
            .map_err(commit_db_err)?;

        match period {
            Some(p) if p.status == PeriodStatus::Open => Ok(()),
            Some(p) => Err(CommitError::PeriodNotOpen {
                status: Some(p.status.into()),
            }),
            None => Err(CommitError::PeriodNotOpen { status: None }),
        }
    }

    /// Allocates the next journal number for the company and year.
    async fn next_journal_number(
        &self,
        txn: &DatabaseTransaction,
        company_id: Uuid,
        year: i32,
    ) -> Result<String, CommitError> {
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "INSERT INTO journal_sequences (company_id, year) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
            [company_id.into(), year.into()],
        ))
        .await
        .map_err(commit_db_err)?;

        let row = txn
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "UPDATE journal_sequences SET next_value = next_value + 1 \
                 WHERE company_id = $1 AND year = $2 \
                 RETURNING next_value - 1 AS seq",
                [company_id.into(), year.into()],
            ))
            .await
            .map_err(commit_db_err)?
            .ok_or_else(|| {
                CommitError::Store(StoreError::Other(
                    "journal sequence row missing".to_string(),
                ))
            })?;
        let seq: i64 = row
            .try_get("", "seq")
            .map_err(|err| CommitError::Store(store_err(err)))?;

        Ok(format!("{}-{year}-{seq:06}", self.number_prefix))
    }

    async fn insert_entry(
        &self,
        txn: &DatabaseTransaction,
        draft: &JournalDraft,
        journal_id: Uuid,
        journal_number: &str,
        source_kind: &str,
        idempotency_key: &str,
        actor: Actor,
    ) -> Result<(), CommitError> {
        let now = Utc::now();

        let entry = journal_entries::ActiveModel {
            id: Set(journal_id),
            tenant_id: Set(draft.tenant_id.into_inner()),
            company_id: Set(draft.company_id.into_inner()),
            journal_number: Set(journal_number.to_string()),
            posting_date: Set(draft.posting_date),
            currency: Set(draft.currency.code().to_string()),
            status: Set(JournalStatus::Posted),
            source_kind: Set(source_kind.to_string()),
            source_document_id: Set(draft.source.document_id.into_inner()),
            source_document_number: Set(draft.source.document_number.clone()),
            idempotency_key: Set(idempotency_key.to_string()),
            created_at: Set(now.into()),
            posted_at: Set(Some(now.into())),
            created_by: Set(actor.user_id.into_inner()),
        };
        journal_entries::Entity::insert(entry)
            .exec(txn)
            .await
            .map_err(commit_db_err)?;

        let lines: Vec<journal_lines::ActiveModel> = draft
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| journal_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                journal_entry_id: Set(journal_id),
                line_no: Set(i16::try_from(i).unwrap_or(i16::MAX)),
                account_id: Set(line.account_id.into_inner()),
                role: Set(line.role.into()),
                debit: Set(line.debit.amount),
                credit: Set(line.credit.amount),
                memo: Set(line.memo.clone()),
            })
            .collect();
        journal_lines::Entity::insert_many(lines)
            .exec(txn)
            .await
            .map_err(commit_db_err)?;

        Ok(())
    }
}

#[async_trait]
impl PostingUnitOfWork for JournalRepository {
    async fn find_by_idempotency_key(
        &self,
        company_id: CompanyId,
        key: &str,
    ) -> Result<Option<PostingResult>, StoreError> {
        let Some(model) = journal_entries::Entity::find()
            .filter(journal_entries::Column::CompanyId.eq(company_id.into_inner()))
            .filter(journal_entries::Column::IdempotencyKey.eq(key))
            .one(&self.db)
            .await
            .map_err(store_err)?
        else {
            return Ok(None);
        };

        let entry = self.load_entry(model).await?;
        Ok(Some(PostingResult::Posted {
            journal_id: entry.id,
            journal_number: entry.journal_number.clone(),
            totals: JournalTotals::of(&entry.lines),
        }))
    }

    async fn find_journal_for_document(
        &self,
        company_id: CompanyId,
        document_id: DocumentId,
    ) -> Result<Option<JournalEntry>, StoreError> {
        let model = journal_entries::Entity::find()
            .filter(journal_entries::Column::CompanyId.eq(company_id.into_inner()))
            .filter(journal_entries::Column::SourceDocumentId.eq(document_id.into_inner()))
            .filter(journal_entries::Column::SourceKind.ne(REVERSAL_KIND))
            .filter(journal_entries::Column::Status.eq(JournalStatus::Posted))
            .one(&self.db)
            .await
            .map_err(store_err)?;

        match model {
            Some(model) => Ok(Some(self.load_entry(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_journal(
        &self,
        company_id: CompanyId,
        journal_id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, StoreError> {
        let model = journal_entries::Entity::find_by_id(journal_id.into_inner())
            .filter(journal_entries::Column::CompanyId.eq(company_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_err)?;

        match model {
            Some(model) => Ok(Some(self.load_entry(model).await?)),
            None => Ok(None),
        }
    }

    async fn commit(
        &self,
        draft: &JournalDraft,
        document_id: DocumentId,
        idempotency_key: &str,
        actor: Actor,
    ) -> Result<CommittedJournal, CommitError> {
        let company_id = draft.company_id.into_inner();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|err| CommitError::Store(store_err(err)))?;

        self.recheck_period(&txn, company_id, draft.posting_date)
            .await?;

        let journal_id = JournalEntryId::new();

        // Status flip doubles as the CAS guard: zero rows affected means
        // another request posted this document first.
        let updated = documents::Entity::update_many()
            .col_expr(documents::Column::Status, Expr::value(DocumentStatus::Posted))
            .col_expr(
                documents::Column::JournalEntryId,
                Expr::value(journal_id.into_inner()),
            )
            .col_expr(documents::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(documents::Column::Id.eq(document_id.into_inner()))
            .filter(documents::Column::CompanyId.eq(company_id))
            .filter(documents::Column::Status.ne(DocumentStatus::Posted))
            .exec(&txn)
            .await
            .map_err(commit_db_err)?;
        if updated.rows_affected == 0 {
            return Err(CommitError::DocumentConflict);
        }

        let journal_number = self
            .next_journal_number(&txn, company_id, draft.posting_date.year())
            .await?;

        self.insert_entry(
            &txn,
            draft,
            journal_id.into_inner(),
            &journal_number,
            &draft.source.kind,
            idempotency_key,
            actor,
        )
        .await?;

        txn.commit().await.map_err(commit_db_err)?;
        debug!(%journal_number, "journal committed");

        Ok(CommittedJournal {
            id: journal_id,
            journal_number,
            totals: draft.totals(),
        })
    }

    async fn commit_reversal(
        &self,
        draft: &JournalDraft,
        original: JournalEntryId,
        actor: Actor,
    ) -> Result<CommittedJournal, CommitError> {
        let company_id = draft.company_id.into_inner();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|err| CommitError::Store(store_err(err)))?;

        self.recheck_period(&txn, company_id, draft.posting_date)
            .await?;

        // Only a posted journal can flip to reversed; losing this CAS
        // means a concurrent reversal won.
        let updated = journal_entries::Entity::update_many()
            .col_expr(
                journal_entries::Column::Status,
                Expr::value(JournalStatus::Reversed),
            )
            .filter(journal_entries::Column::Id.eq(original.into_inner()))
            .filter(journal_entries::Column::CompanyId.eq(company_id))
            .filter(journal_entries::Column::Status.eq(JournalStatus::Posted))
            .exec(&txn)
            .await
            .map_err(commit_db_err)?;
        if updated.rows_affected == 0 {
            return Err(CommitError::DocumentConflict);
        }

        let journal_id = JournalEntryId::new();
        let journal_number = self
            .next_journal_number(&txn, company_id, draft.posting_date.year())
            .await?;

        self.insert_entry(
            &txn,
            draft,
            journal_id.into_inner(),
            &journal_number,
            REVERSAL_KIND,
            &format!("{REVERSAL_KIND}:{original}"),
            actor,
        )
        .await?;

        txn.commit().await.map_err(commit_db_err)?;
        debug!(%journal_number, "reversal committed");

        Ok(CommittedJournal {
            id: journal_id,
            journal_number,
            totals: draft.totals(),
        })
    }
}
