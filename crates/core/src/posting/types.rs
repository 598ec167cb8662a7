//! Source document types and posting request/result shapes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use keel_shared::types::{
    AccountId, CompanyId, CounterpartyId, Currency, DocumentId, JournalEntryId, Money, TenantId,
    UserId,
};

use crate::accounts::AccountType;
use crate::approval::UserRole;
use crate::ledger::{JournalTotals, ValidationIssue};

/// Kinds of source documents that can be posted to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Sales invoice to a customer.
    Invoice,
    /// Vendor bill.
    Bill,
    /// Incoming payment.
    PaymentIn,
    /// Outgoing payment.
    PaymentOut,
}

impl DocumentKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Bill => "bill",
            Self::PaymentIn => "payment_in",
            Self::PaymentOut => "payment_out",
        }
    }

    /// Parses a kind from its string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "invoice" => Some(Self::Invoice),
            "bill" => Some(Self::Bill),
            "payment_in" => Some(Self::PaymentIn),
            "payment_out" => Some(Self::PaymentOut),
            _ => None,
        }
    }

    /// Account type the control line must post to.
    #[must_use]
    pub const fn control_account_type(self) -> AccountType {
        match self {
            Self::Invoice | Self::PaymentIn | Self::PaymentOut => AccountType::Asset,
            Self::Bill => AccountType::Liability,
        }
    }

    /// Account type detail lines must post to, if constrained.
    #[must_use]
    pub const fn detail_account_type(self) -> Option<AccountType> {
        match self {
            Self::Invoice => Some(AccountType::Income),
            Self::Bill => Some(AccountType::Expense),
            // Payments settle open balances on AR/AP accounts.
            Self::PaymentIn => Some(AccountType::Asset),
            Self::PaymentOut => Some(AccountType::Liability),
        }
    }

    /// Account type tax lines must post to, if tax lines are allowed.
    #[must_use]
    pub const fn tax_account_type(self) -> Option<AccountType> {
        match self {
            Self::Invoice => Some(AccountType::Liability),
            Self::Bill => Some(AccountType::Asset),
            Self::PaymentIn | Self::PaymentOut => None,
        }
    }

    /// Whether the control line is the debit side of the journal.
    #[must_use]
    pub const fn control_is_debit(self) -> bool {
        matches!(self, Self::Invoice | Self::PaymentIn)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single document line in the document currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingLine {
    /// Account this line posts to.
    pub account_id: AccountId,
    /// Line description.
    pub description: String,
    /// Quantity, must be positive.
    pub quantity: Decimal,
    /// Unit price in the document currency.
    pub unit_price: Money,
    /// Declared line amount, must equal quantity times unit price
    /// rounded to the currency scale.
    pub amount: Money,
}

/// A tax line in the document currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxLine {
    /// Tax code (e.g. "VAT20").
    pub tax_code: String,
    /// Account the tax posts to.
    pub account_id: AccountId,
    /// Tax amount in the document currency.
    pub amount: Money,
}

/// Everything needed to post one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingInput {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Document kind.
    pub kind: DocumentKind,
    /// Source document id.
    pub document_id: DocumentId,
    /// Human-readable document number.
    pub document_number: String,
    /// Customer or vendor, if any.
    pub counterparty_id: Option<CounterpartyId>,
    /// Counterparty display name for memos.
    pub counterparty_name: Option<String>,
    /// Control account (AR, AP, or bank).
    pub control_account_id: AccountId,
    /// Date on the document itself.
    pub document_date: NaiveDate,
    /// Ledger date the journal posts under.
    pub posting_date: NaiveDate,
    /// Document currency.
    pub currency: Currency,
    /// Exchange rate to base currency, required when currencies differ
    /// and no rate provider can supply one.
    pub exchange_rate: Option<Decimal>,
    /// Document lines.
    pub lines: Vec<PostingLine>,
    /// Tax lines.
    pub tax_lines: Vec<TaxLine>,
    /// Document description.
    pub description: String,
    /// Declared document total in the document currency.
    pub total: Money,
    /// User who created the document.
    pub created_by: UserId,
}

impl PostingInput {
    /// Sum of declared line amounts.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(|l| l.amount.amount).sum()
    }

    /// Sum of tax line amounts.
    #[must_use]
    pub fn tax_total(&self) -> Decimal {
        self.tax_lines.iter().map(|t| t.amount.amount).sum()
    }

    /// Subtotal plus tax, which the declared total must equal.
    #[must_use]
    pub fn computed_total(&self) -> Decimal {
        self.subtotal() + self.tax_total()
    }
}

/// Lifecycle status of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Editable, not yet submitted for posting.
    Draft,
    /// Submitted, waiting for an approver.
    PendingApproval,
    /// Posted to the ledger.
    Posted,
    /// Voided, never to be posted.
    Voided,
}

impl DocumentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Posted => "posted",
            Self::Voided => "voided",
        }
    }
}

/// A stored source document with its posting state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Same as `input.document_id`.
    pub id: DocumentId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Journal this document produced, once posted.
    pub journal_entry_id: Option<JournalEntryId>,
    /// The document payload.
    pub input: PostingInput,
}

/// The identity a posting request runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Requesting user.
    pub user_id: UserId,
    /// Role the user holds in the company.
    pub role: UserRole,
}

/// A request to post one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingRequest {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Document to post.
    pub document_id: DocumentId,
    /// Document kind, used to derive the idempotency key.
    pub kind: DocumentKind,
    /// Caller-supplied idempotency key, if any.
    pub idempotency_key: Option<String>,
    /// The requesting identity.
    pub actor: Actor,
}

impl PostingRequest {
    /// The effective idempotency key: caller-supplied, or derived from
    /// the document identity so each document has a stable default.
    #[must_use]
    pub fn effective_idempotency_key(&self) -> String {
        self.idempotency_key
            .clone()
            .unwrap_or_else(|| format!("{}:{}", self.kind.as_str(), self.document_id))
    }
}

/// Outcome of a posting attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PostingResult {
    /// The document was posted (now or by an earlier identical request).
    Posted {
        /// The journal entry id.
        journal_id: JournalEntryId,
        /// The assigned journal number.
        journal_number: String,
        /// Debit and credit totals.
        totals: JournalTotals,
    },
    /// Business-rule validation failed. Nothing was written.
    Rejected {
        /// Code of the first blocking issue.
        code: String,
        /// All issues found.
        errors: Vec<ValidationIssue>,
    },
    /// Valid, but a distinct approver must repeat the request.
    RequiresApproval {
        /// Roles that may approve.
        approver_roles: Vec<UserRole>,
    },
    /// A transient or internal failure. Safe to retry.
    Failed {
        /// Stable failure code.
        code: String,
    },
}
