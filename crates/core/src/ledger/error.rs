//! Ledger error types for journal construction and state errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use keel_shared::types::MoneyError;

/// Errors that can occur while building or manipulating journals.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Construction Errors ==========
    /// Document has no lines to post.
    #[error("Document has no lines")]
    NoLines,

    /// Line quantity must be positive.
    #[error("Line quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    /// Line unit price cannot be negative.
    #[error("Line unit price cannot be negative, got {0}")]
    InvalidUnitPrice(Decimal),

    /// Tax line amount must be positive.
    #[error("Tax amount must be positive, got {0}")]
    InvalidTaxAmount(Decimal),

    /// Builder produced an unbalanced draft. Internal defect, never user input.
    #[error("Generated draft is unbalanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedDraft {
        /// Total debit amount in base currency.
        debit: Decimal,
        /// Total credit amount in base currency.
        credit: Decimal,
    },

    // ========== Account Errors ==========
    /// Referenced account not found in the company chart.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    // ========== Currency Errors ==========
    /// Document currency differs from base and no exchange rate is available.
    #[error("No exchange rate available for {from} to {to} on {date}")]
    NoExchangeRate {
        /// Document currency code.
        from: String,
        /// Base currency code.
        to: String,
        /// Posting date the rate was needed for.
        date: NaiveDate,
    },

    /// Money arithmetic failed.
    #[error(transparent)]
    Money(#[from] MoneyError),

    // ========== State Errors ==========
    /// Only posted journals can be reversed.
    #[error("Journal {0} is not posted and cannot be reversed")]
    NotPosted(Uuid),

    /// Journal has already been reversed.
    #[error("Journal {0} has already been reversed")]
    AlreadyReversed(Uuid),
}

impl LedgerError {
    /// Stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidUnitPrice(_) => "INVALID_UNIT_PRICE",
            Self::InvalidTaxAmount(_) => "INVALID_TAX_AMOUNT",
            Self::UnbalancedDraft { .. } => "UNBALANCED_DRAFT",
            Self::AccountNotFound(_) => "INVALID_ACCOUNT",
            Self::NoExchangeRate { .. } | Self::Money(_) => "CURRENCY_MISMATCH",
            Self::NotPosted(_) => "JOURNAL_NOT_POSTED",
            Self::AlreadyReversed(_) => "JOURNAL_ALREADY_REVERSED",
        }
    }

    /// Returns true if the error is attributable to caller input rather
    /// than an internal defect.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::UnbalancedDraft { .. })
    }
}
