//! Postgres enum mappings and conversions to the core domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use keel_core::accounts::AccountType as CoreAccountType;
use keel_core::fiscal::PeriodStatus as CorePeriodStatus;
use keel_core::ledger::{JournalStatus as CoreJournalStatus, LineRole as CoreLineRole};
use keel_core::posting::{DocumentKind as CoreDocumentKind, DocumentStatus as CoreDocumentStatus};

/// Mapped `account_type` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    /// Asset account.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability account.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity account.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Income account.
    #[sea_orm(string_value = "income")]
    Income,
    /// Expense account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<AccountType> for CoreAccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<CoreAccountType> for AccountType {
    fn from(value: CoreAccountType) -> Self {
        match value {
            CoreAccountType::Asset => Self::Asset,
            CoreAccountType::Liability => Self::Liability,
            CoreAccountType::Equity => Self::Equity,
            CoreAccountType::Income => Self::Income,
            CoreAccountType::Expense => Self::Expense,
        }
    }
}

/// Mapped `period_status` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_status")]
pub enum PeriodStatus {
    /// Open for postings.
    #[sea_orm(string_value = "open")]
    Open,
    /// Closed to new postings.
    #[sea_orm(string_value = "closed")]
    Closed,
    /// Fully locked.
    #[sea_orm(string_value = "locked")]
    Locked,
}

impl From<PeriodStatus> for CorePeriodStatus {
    fn from(value: PeriodStatus) -> Self {
        match value {
            PeriodStatus::Open => Self::Open,
            PeriodStatus::Closed => Self::Closed,
            PeriodStatus::Locked => Self::Locked,
        }
    }
}

impl From<CorePeriodStatus> for PeriodStatus {
    fn from(value: CorePeriodStatus) -> Self {
        match value {
            CorePeriodStatus::Open => Self::Open,
            CorePeriodStatus::Closed => Self::Closed,
            CorePeriodStatus::Locked => Self::Locked,
        }
    }
}

/// Mapped `document_kind` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_kind")]
pub enum DocumentKind {
    /// Sales invoice.
    #[sea_orm(string_value = "invoice")]
    Invoice,
    /// Vendor bill.
    #[sea_orm(string_value = "bill")]
    Bill,
    /// Incoming payment.
    #[sea_orm(string_value = "payment_in")]
    PaymentIn,
    /// Outgoing payment.
    #[sea_orm(string_value = "payment_out")]
    PaymentOut,
}

impl From<DocumentKind> for CoreDocumentKind {
    fn from(value: DocumentKind) -> Self {
        match value {
            DocumentKind::Invoice => Self::Invoice,
            DocumentKind::Bill => Self::Bill,
            DocumentKind::PaymentIn => Self::PaymentIn,
            DocumentKind::PaymentOut => Self::PaymentOut,
        }
    }
}

impl From<CoreDocumentKind> for DocumentKind {
    fn from(value: CoreDocumentKind) -> Self {
        match value {
            CoreDocumentKind::Invoice => Self::Invoice,
            CoreDocumentKind::Bill => Self::Bill,
            CoreDocumentKind::PaymentIn => Self::PaymentIn,
            CoreDocumentKind::PaymentOut => Self::PaymentOut,
        }
    }
}

/// Mapped `document_status` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_status")]
pub enum DocumentStatus {
    /// Editable draft.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Waiting for an approver.
    #[sea_orm(string_value = "pending_approval")]
    PendingApproval,
    /// Posted to the ledger.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Voided.
    #[sea_orm(string_value = "voided")]
    Voided,
}

impl From<DocumentStatus> for CoreDocumentStatus {
    fn from(value: DocumentStatus) -> Self {
        match value {
            DocumentStatus::Draft => Self::Draft,
            DocumentStatus::PendingApproval => Self::PendingApproval,
            DocumentStatus::Posted => Self::Posted,
            DocumentStatus::Voided => Self::Voided,
        }
    }
}

impl From<CoreDocumentStatus> for DocumentStatus {
    fn from(value: CoreDocumentStatus) -> Self {
        match value {
            CoreDocumentStatus::Draft => Self::Draft,
            CoreDocumentStatus::PendingApproval => Self::PendingApproval,
            CoreDocumentStatus::Posted => Self::Posted,
            CoreDocumentStatus::Voided => Self::Voided,
        }
    }
}

/// Mapped `journal_status` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_status")]
pub enum JournalStatus {
    /// Draft journal.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Posted and immutable.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Reversed by a later entry.
    #[sea_orm(string_value = "reversed")]
    Reversed,
}

impl From<JournalStatus> for CoreJournalStatus {
    fn from(value: JournalStatus) -> Self {
        match value {
            JournalStatus::Draft => Self::Draft,
            JournalStatus::Posted => Self::Posted,
            JournalStatus::Reversed => Self::Reversed,
        }
    }
}

impl From<CoreJournalStatus> for JournalStatus {
    fn from(value: CoreJournalStatus) -> Self {
        match value {
            CoreJournalStatus::Draft => Self::Draft,
            CoreJournalStatus::Posted => Self::Posted,
            CoreJournalStatus::Reversed => Self::Reversed,
        }
    }
}

/// Mapped `line_role` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "line_role")]
pub enum LineRole {
    /// Balancing line on the control account.
    #[sea_orm(string_value = "control")]
    Control,
    /// Line from a document line.
    #[sea_orm(string_value = "detail")]
    Detail,
    /// Line from a tax line.
    #[sea_orm(string_value = "tax")]
    Tax,
}

impl From<LineRole> for CoreLineRole {
    fn from(value: LineRole) -> Self {
        match value {
            LineRole::Control => Self::Control,
            LineRole::Detail => Self::Detail,
            LineRole::Tax => Self::Tax,
        }
    }
}

impl From<CoreLineRole> for LineRole {
    fn from(value: CoreLineRole) -> Self {
        match value {
            CoreLineRole::Control => Self::Control,
            CoreLineRole::Detail => Self::Detail,
            CoreLineRole::Tax => Self::Tax,
        }
    }
}
