//! Ledger account types.

use keel_shared::types::{AccountId, CompanyId, Currency};
use serde::{Deserialize, Serialize};

/// Ledger account classification.
///
/// Determines which side of the balance sheet (or P&L) an account
/// lives on, and which document roles it is compatible with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Asset (cash, bank, receivables).
    Asset,
    /// Liability (payables, tax owed).
    Liability,
    /// Equity.
    Equity,
    /// Income / revenue.
    Income,
    /// Expense.
    Expense,
}

impl AccountType {
    /// Returns the string representation of the account type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses an account type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "income" | "revenue" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chart-of-accounts entry, read-only to the posting core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Company this account belongs to.
    pub company_id: CompanyId,
    /// Account code (e.g. "1200").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Account currency.
    pub currency: Currency,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether documents may post directly to this account.
    pub allow_direct_posting: bool,
}

impl Account {
    /// Returns true if a posting may target this account.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        self.is_active && self.allow_direct_posting
    }
}
