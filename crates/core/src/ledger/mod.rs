//! Journal construction and validation.
//!
//! This module implements the general-ledger side of document posting:
//! - Journal line and entry types
//! - The journal builder (source document to balanced draft)
//! - The validation engine (structured issues, never panics on user input)
//! - Reversal drafts for posted journals
//! - Error types for ledger operations

pub mod builder;
pub mod error;
pub mod reversal;
pub mod types;
pub mod validation;

#[cfg(test)]
mod builder_props;
#[cfg(test)]
mod validation_props;

pub use builder::JournalBuilder;
pub use error::LedgerError;
pub use reversal::ReversalBuilder;
pub use types::{
    JournalDraft, JournalEntry, JournalLine, JournalStatus, JournalTotals, LineRole, SourceRef,
};
pub use validation::{
    codes, Severity, ValidationContext, ValidationEngine, ValidationIssue, ValidationResult,
};
