//! Journal entry and journal line types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use keel_shared::types::{
    AccountId, CompanyId, Currency, DocumentId, JournalEntryId, Money, TenantId, UserId,
};

/// Lifecycle status of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Draft, not yet visible in reports.
    Draft,
    /// Posted and immutable.
    Posted,
    /// Posted, then reversed by a later entry.
    Reversed,
}

impl JournalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Reversed => "reversed",
        }
    }
}

impl std::fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a line plays within a generated journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineRole {
    /// The balancing line against the control account (AR, AP, bank).
    Control,
    /// A line derived from a document line.
    Detail,
    /// A line derived from a tax line.
    Tax,
}

/// One side of a double-entry journal, in the company base currency.
///
/// Exactly one of `debit` and `credit` is non-zero; the other is the
/// zero amount in the same currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Account being debited or credited.
    pub account_id: AccountId,
    /// Role of this line within the journal.
    pub role: LineRole,
    /// Debit amount. Zero when the line is a credit.
    pub debit: Money,
    /// Credit amount. Zero when the line is a debit.
    pub credit: Money,
    /// Optional line memo.
    pub memo: Option<String>,
}

impl JournalLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, role: LineRole, amount: Money, memo: Option<String>) -> Self {
        Self {
            account_id,
            role,
            credit: Money::zero(amount.currency),
            debit: amount,
            memo,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, role: LineRole, amount: Money, memo: Option<String>) -> Self {
        Self {
            account_id,
            role,
            debit: Money::zero(amount.currency),
            credit: amount,
            memo,
        }
    }

    /// Returns true if this line carries a debit amount.
    #[must_use]
    pub fn is_debit(&self) -> bool {
        !self.debit.is_zero()
    }
}

/// Debit and credit totals of a journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Sum of all debit amounts.
    pub debit: Decimal,
    /// Sum of all credit amounts.
    pub credit: Decimal,
}

impl JournalTotals {
    /// Computes totals over a set of lines.
    #[must_use]
    pub fn of(lines: &[JournalLine]) -> Self {
        let mut debit = Decimal::ZERO;
        let mut credit = Decimal::ZERO;
        for line in lines {
            debit += line.debit.amount;
            credit += line.credit.amount;
        }
        Self { debit, credit }
    }

    /// Exact equality of debits and credits, no tolerance.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}

/// Link from a journal back to the document that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Document kind, stored as its string form.
    pub kind: String,
    /// The source document id.
    pub document_id: DocumentId,
    /// Human-readable document number.
    pub document_number: String,
}

/// A balanced journal draft, ready for validation and commit.
///
/// All amounts are in the company base currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalDraft {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Base currency all lines are expressed in.
    pub currency: Currency,
    /// Ledger date of the posting.
    pub posting_date: NaiveDate,
    /// Journal lines in deterministic order.
    pub lines: Vec<JournalLine>,
    /// The source document this draft was built from.
    pub source: SourceRef,
    /// Journal description.
    pub description: String,
}

impl JournalDraft {
    /// Computes the draft's debit and credit totals.
    #[must_use]
    pub fn totals(&self) -> JournalTotals {
        JournalTotals::of(&self.lines)
    }
}

/// A persisted journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Assigned journal number, e.g. "JRN-2026-000042".
    pub journal_number: String,
    /// Ledger date.
    pub posting_date: NaiveDate,
    /// Base currency of all lines.
    pub currency: Currency,
    /// Journal lines.
    pub lines: Vec<JournalLine>,
    /// Lifecycle status.
    pub status: JournalStatus,
    /// The source document.
    pub source: SourceRef,
    /// Idempotency key the posting was committed under.
    pub idempotency_key: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Posting timestamp.
    pub posted_at: Option<DateTime<Utc>>,
    /// User who created the posting.
    pub created_by: UserId,
}
