//! Repository implementations of the core store traits.

pub mod account;
pub mod approval_rule;
pub mod audit;
pub mod company;
pub mod document;
pub mod exchange_rate;
pub mod fiscal;
pub mod journal;

pub use account::{AccountRepository, CachedAccountStore};
pub use approval_rule::ApprovalRuleRepository;
pub use audit::AuditRepository;
pub use company::CompanyRepository;
pub use document::DocumentRepository;
pub use exchange_rate::ExchangeRateRepository;
pub use fiscal::PeriodRepository;
pub use journal::JournalRepository;

use sea_orm::DbErr;

use keel_core::posting::StoreError;

/// Maps a database error onto the transient store error the core
/// orchestrator understands.
pub(crate) fn store_err(err: DbErr) -> StoreError {
    match &err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Other(err.to_string()),
    }
}

/// A stored value that no longer parses, e.g. an unknown currency code.
pub(crate) fn corrupt(what: &str, value: &str) -> StoreError {
    StoreError::Other(format!("corrupt {what} in storage: {value}"))
}
