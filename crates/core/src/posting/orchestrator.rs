//! The posting orchestrator.
//!
//! Drives one document through the full flow: idempotency check, load,
//! context gathering, journal construction, validation, segregation of
//! duties, atomic commit, and audit. The orchestrator itself is
//! stateless; all state lives behind the store traits.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use keel_shared::types::{CompanyId, JournalEntryId};

use crate::audit::{AuditAction, AuditRecord, AuditSink};
use crate::fiscal::PeriodGate;
use crate::ledger::{
    codes, JournalBuilder, LedgerError, ReversalBuilder, Severity, ValidationContext,
    ValidationEngine, ValidationIssue,
};

use super::stores::{
    AccountStore, ApprovalRuleStore, CommitError, CompanyStore, DocumentStore, PeriodStore,
    PostingUnitOfWork, RateProvider, StoreError,
};
use super::types::{Actor, DocumentStatus, PostingRequest, PostingResult};

/// Failure codes carried by [`PostingResult::Failed`].
pub mod failure {
    /// A storage backend was unavailable or timed out. Retry later.
    pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
    /// The company configuration could not be loaded.
    pub const COMPANY_NOT_FOUND: &str = "COMPANY_NOT_FOUND";
    /// An internal invariant was violated. Not caller-correctable.
    pub const INTERNAL: &str = "INTERNAL";
}

enum PostingFailure {
    Store(StoreError),
    CompanyNotFound(CompanyId),
    Internal(String),
}

impl From<StoreError> for PostingFailure {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl PostingFailure {
    fn code(&self) -> &'static str {
        match self {
            Self::Store(_) => failure::STORE_UNAVAILABLE,
            Self::CompanyNotFound(_) => failure::COMPANY_NOT_FOUND,
            Self::Internal(_) => failure::INTERNAL,
        }
    }
}

/// Stateless posting coordinator.
pub struct PostingOrchestrator {
    documents: Arc<dyn DocumentStore>,
    accounts: Arc<dyn AccountStore>,
    periods: Arc<dyn PeriodStore>,
    rates: Arc<dyn RateProvider>,
    rules: Arc<dyn ApprovalRuleStore>,
    companies: Arc<dyn CompanyStore>,
    journals: Arc<dyn PostingUnitOfWork>,
    audit: Arc<dyn AuditSink>,
}

impl PostingOrchestrator {
    /// Creates an orchestrator over the given stores.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        accounts: Arc<dyn AccountStore>,
        periods: Arc<dyn PeriodStore>,
        rates: Arc<dyn RateProvider>,
        rules: Arc<dyn ApprovalRuleStore>,
        companies: Arc<dyn CompanyStore>,
        journals: Arc<dyn PostingUnitOfWork>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            documents,
            accounts,
            periods,
            rates,
            rules,
            companies,
            journals,
            audit,
        }
    }

    /// Posts one document.
    ///
    /// Never returns an error: every failure mode maps onto a
    /// [`PostingResult`] variant the caller can act on.
    #[instrument(skip(self), fields(
        company_id = %request.company_id,
        document_id = %request.document_id,
        kind = %request.kind,
    ))]
    pub async fn post_document(&self, request: &PostingRequest) -> PostingResult {
        match self.try_post(request).await {
            Ok(result) => result,
            Err(failure) => {
                let code = failure.code();
                match &failure {
                    PostingFailure::Store(err) => {
                        error!(error = %err, "posting failed on storage")
                    }
                    PostingFailure::CompanyNotFound(company_id) => {
                        error!(%company_id, "posting failed: unknown company")
                    }
                    PostingFailure::Internal(message) => {
                        error!(message, "posting failed on internal invariant")
                    }
                }
                self.record_audit(
                    request,
                    AuditAction::Failed,
                    json!({ "code": code }),
                )
                .await;
                PostingResult::Failed {
                    code: code.to_string(),
                }
            }
        }
    }

    async fn try_post(&self, request: &PostingRequest) -> Result<PostingResult, PostingFailure> {
        let key = request.effective_idempotency_key();

        // Fast path: an identical request already ran to completion.
        if let Some(stored) = self
            .journals
            .find_by_idempotency_key(request.company_id, &key)
            .await?
        {
            info!(idempotency_key = %key, "replaying stored posting outcome");
            self.record_audit(
                request,
                AuditAction::DuplicateSuppressed,
                json!({ "idempotency_key": key }),
            )
            .await;
            return Ok(stored);
        }

        let Some(document) = self
            .documents
            .find_document(request.company_id, request.document_id)
            .await?
        else {
            return Ok(Self::rejected_with(
                codes::DOCUMENT_NOT_FOUND,
                "document does not exist",
            ));
        };

        match document.status {
            DocumentStatus::Posted => {
                // A prior request with a different key already posted it.
                return match self
                    .journals
                    .find_journal_for_document(request.company_id, request.document_id)
                    .await?
                {
                    Some(journal) => {
                        self.record_audit(
                            request,
                            AuditAction::AlreadyPosted,
                            json!({ "journal_number": journal.journal_number }),
                        )
                        .await;
                        Ok(PostingResult::Posted {
                            journal_id: journal.id,
                            journal_number: journal.journal_number.clone(),
                            totals: crate::ledger::JournalTotals::of(&journal.lines),
                        })
                    }
                    None => Err(PostingFailure::Internal(
                        "posted document has no journal".to_string(),
                    )),
                };
            }
            DocumentStatus::Voided => {
                return Ok(Self::rejected_with(
                    codes::DOCUMENT_VOIDED,
                    "voided documents cannot be posted",
                ));
            }
            DocumentStatus::Draft | DocumentStatus::PendingApproval => {}
        }

        let input = &document.input;
        let base_currency = self
            .companies
            .base_currency(request.company_id)
            .await?
            .ok_or(PostingFailure::CompanyNotFound(request.company_id))?;

        let mut account_ids: Vec<_> = std::iter::once(input.control_account_id)
            .chain(input.lines.iter().map(|l| l.account_id))
            .chain(input.tax_lines.iter().map(|t| t.account_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        account_ids.sort_by_key(|id| id.into_inner());
        let accounts = self
            .accounts
            .find_accounts(request.company_id, &account_ids)
            .await?;

        let period = self
            .periods
            .find_period_for_date(request.company_id, input.posting_date)
            .await?;
        let period_check = PeriodGate::check(period.as_ref(), input.posting_date);

        let exchange_rate = if input.currency == base_currency {
            None
        } else {
            match input.exchange_rate {
                Some(rate) => Some(rate),
                None => {
                    self.rates
                        .find_rate(
                            request.company_id,
                            input.currency,
                            base_currency,
                            input.posting_date,
                        )
                        .await?
                }
            }
        };

        let rules = self.rules.find_rules(request.company_id).await?;

        let draft = match JournalBuilder::build(input, base_currency, exchange_rate) {
            Ok(draft) => Some(draft),
            // User-attributable build errors surface as validation
            // issues below; validation sees the raw input either way.
            Err(err) if err.is_user_error() => None,
            Err(err) => return Err(PostingFailure::Internal(err.to_string())),
        };

        let ctx = ValidationContext {
            accounts: &accounts,
            period: &period_check,
            base_currency,
            exchange_rate,
            rules: &rules,
        };
        let validation = ValidationEngine::validate(input, draft.as_ref(), &ctx, request.actor);

        if !validation.validated {
            let error_codes: Vec<_> =
                validation.errors().map(|i| i.code.clone()).collect();
            warn!(codes = ?error_codes, "posting rejected by validation");
            self.record_audit(
                request,
                AuditAction::Rejected,
                json!({ "codes": error_codes }),
            )
            .await;
            let code = validation
                .first_error_code()
                .unwrap_or(failure::INTERNAL)
                .to_string();
            return Ok(PostingResult::Rejected {
                code,
                errors: validation.issues,
            });
        }

        if validation.requires_approval {
            info!(roles = ?validation.approver_roles, "posting held for approval");
            self.record_audit(
                request,
                AuditAction::RequiresApproval,
                json!({
                    "approver_roles": validation.approver_roles.clone(),
                }),
            )
            .await;
            return Ok(PostingResult::RequiresApproval {
                approver_roles: validation.approver_roles,
            });
        }

        let Some(draft) = draft else {
            return Err(PostingFailure::Internal(
                "validated input produced no draft".to_string(),
            ));
        };

        match self
            .journals
            .commit(&draft, request.document_id, &key, request.actor)
            .await
        {
            Ok(committed) => {
                info!(journal_number = %committed.journal_number, "document posted");
                self.record_audit(
                    request,
                    AuditAction::Posted,
                    json!({
                        "journal_number": committed.journal_number,
                        "idempotency_key": key,
                    }),
                )
                .await;
                Ok(PostingResult::Posted {
                    journal_id: committed.id,
                    journal_number: committed.journal_number,
                    totals: committed.totals,
                })
            }
            Err(CommitError::PeriodNotOpen { status }) => {
                // The period flipped between validation and commit.
                let (code, message) = match status {
                    Some(status) => (
                        codes::PERIOD_CLOSED,
                        format!("accounting period became {status} before commit"),
                    ),
                    None => (
                        codes::NO_PERIOD,
                        "accounting period disappeared before commit".to_string(),
                    ),
                };
                warn!(code, "commit refused by period re-check");
                self.record_audit(request, AuditAction::Rejected, json!({ "codes": [code] }))
                    .await;
                Ok(Self::rejected_with(code, message))
            }
            Err(CommitError::DocumentConflict) => {
                // Lost the race. The winner's journal is the outcome.
                match self
                    .journals
                    .find_journal_for_document(request.company_id, request.document_id)
                    .await?
                {
                    Some(journal) => {
                        self.record_audit(
                            request,
                            AuditAction::AlreadyPosted,
                            json!({ "journal_number": journal.journal_number }),
                        )
                        .await;
                        Ok(PostingResult::Posted {
                            journal_id: journal.id,
                            journal_number: journal.journal_number.clone(),
                            totals: crate::ledger::JournalTotals::of(&journal.lines),
                        })
                    }
                    None => Err(PostingFailure::Internal(
                        "document conflict without a posted journal".to_string(),
                    )),
                }
            }
            Err(CommitError::Store(err)) => Err(PostingFailure::Store(err)),
        }
    }

    /// Reverses a posted journal with an inverted draft.
    ///
    /// The reversal posts under the given date, which must fall in an
    /// open period.
    #[instrument(skip(self), fields(company_id = %company_id, journal_id = %journal_id))]
    pub async fn reverse_journal(
        &self,
        company_id: CompanyId,
        journal_id: JournalEntryId,
        reversal_date: NaiveDate,
        reason: Option<&str>,
        actor: Actor,
    ) -> PostingResult {
        match self
            .try_reverse(company_id, journal_id, reversal_date, reason, actor)
            .await
        {
            Ok(result) => result,
            Err(failure) => {
                error!(code = failure.code(), "reversal failed");
                PostingResult::Failed {
                    code: failure.code().to_string(),
                }
            }
        }
    }

    async fn try_reverse(
        &self,
        company_id: CompanyId,
        journal_id: JournalEntryId,
        reversal_date: NaiveDate,
        reason: Option<&str>,
        actor: Actor,
    ) -> Result<PostingResult, PostingFailure> {
        let Some(journal) = self.journals.find_journal(company_id, journal_id).await? else {
            return Ok(Self::rejected_with(
                codes::DOCUMENT_NOT_FOUND,
                "journal does not exist",
            ));
        };

        let draft = match ReversalBuilder::build(&journal, reversal_date, reason) {
            Ok(draft) => draft,
            Err(err @ (LedgerError::NotPosted(_) | LedgerError::AlreadyReversed(_))) => {
                return Ok(Self::rejected_with(err.error_code(), err.to_string()));
            }
            Err(err) => return Err(PostingFailure::Internal(err.to_string())),
        };

        let period = self
            .periods
            .find_period_for_date(company_id, reversal_date)
            .await?;
        let check = PeriodGate::check(period.as_ref(), reversal_date);
        if !check.open {
            let code = match check.status {
                Some(_) => codes::PERIOD_CLOSED,
                None => codes::NO_PERIOD,
            };
            return Ok(Self::rejected_with(
                code,
                "reversal date does not fall in an open period",
            ));
        }

        match self.journals.commit_reversal(&draft, journal_id, actor).await {
            Ok(committed) => {
                info!(journal_number = %committed.journal_number, "journal reversed");
                let record = AuditRecord::for_journal(
                    journal.tenant_id,
                    company_id,
                    actor.user_id,
                    actor.role,
                    AuditAction::Reversed,
                    journal_id.to_string(),
                    json!({
                        "reversing_journal": committed.journal_number,
                        "reason": reason,
                    }),
                );
                self.append_audit(record).await;
                Ok(PostingResult::Posted {
                    journal_id: committed.id,
                    journal_number: committed.journal_number,
                    totals: committed.totals,
                })
            }
            Err(CommitError::PeriodNotOpen { .. }) => Ok(Self::rejected_with(
                codes::PERIOD_CLOSED,
                "accounting period closed before the reversal committed",
            )),
            Err(CommitError::DocumentConflict) => Ok(Self::rejected_with(
                LedgerError::AlreadyReversed(journal_id.into_inner()).error_code(),
                "journal was reversed concurrently",
            )),
            Err(CommitError::Store(err)) => Err(PostingFailure::Store(err)),
        }
    }

    fn rejected_with(code: &str, message: impl Into<String>) -> PostingResult {
        PostingResult::Rejected {
            code: code.to_string(),
            errors: vec![ValidationIssue {
                code: code.to_string(),
                field: None,
                message: message.into(),
                severity: Severity::Error,
            }],
        }
    }

    async fn record_audit(
        &self,
        request: &PostingRequest,
        action: AuditAction,
        metadata: serde_json::Value,
    ) {
        let record = AuditRecord::for_document(
            request.tenant_id,
            request.company_id,
            request.actor.user_id,
            request.actor.role,
            action,
            request.document_id.to_string(),
            metadata,
        );
        self.append_audit(record).await;
    }

    async fn append_audit(&self, record: AuditRecord) {
        if let Err(err) = self.audit.record(record).await {
            // Audit loss is an operational incident, not a business
            // failure. The posting outcome stands.
            error!(error = %err, "failed to append audit record");
        }
    }
}
