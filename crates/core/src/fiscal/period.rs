//! Accounting period types and the period gate.
//!
//! The gate fails closed: a posting date not covered by any period
//! record cannot be posted, regardless of everything else.

use chrono::NaiveDate;
use keel_shared::types::{CompanyId, PeriodId};
use serde::{Deserialize, Serialize};

/// Status of an accounting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period is open for postings.
    Open,
    /// Period is closed, no new postings allowed.
    Closed,
    /// Period is locked, no changes of any kind allowed.
    Locked,
}

impl PeriodStatus {
    /// Returns true if postings are allowed.
    #[must_use]
    pub fn allows_posting(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Locked => "locked",
        }
    }
}

impl std::fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A company-scoped accounting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountingPeriod {
    /// Unique identifier.
    pub id: PeriodId,
    /// Company this period belongs to.
    pub company_id: CompanyId,
    /// Period name (e.g. "January 2026").
    pub name: String,
    /// Start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// End date of the period (inclusive).
    pub end_date: NaiveDate,
    /// Current status.
    pub status: PeriodStatus,
}

impl AccountingPeriod {
    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if postings are allowed into this period.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status.allows_posting()
    }
}

/// Outcome of a period-gate check for one posting date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCheck {
    /// Whether a posting on this date is allowed.
    pub open: bool,
    /// The covering period, if one exists.
    pub period_id: Option<PeriodId>,
    /// Its status, if a covering period exists.
    pub status: Option<PeriodStatus>,
}

impl PeriodCheck {
    /// The fail-closed result: no period covers the date.
    #[must_use]
    pub fn not_covered() -> Self {
        Self {
            open: false,
            period_id: None,
            status: None,
        }
    }
}

/// Stateless period gate.
pub struct PeriodGate;

impl PeriodGate {
    /// Checks whether a posting date falls in an open period.
    ///
    /// Fails closed: no covering period means not-open.
    #[must_use]
    pub fn check(period: Option<&AccountingPeriod>, posting_date: NaiveDate) -> PeriodCheck {
        match period {
            Some(p) if p.contains_date(posting_date) => PeriodCheck {
                open: p.is_open(),
                period_id: Some(p.id),
                status: Some(p.status),
            },
            _ => PeriodCheck::not_covered(),
        }
    }
}
