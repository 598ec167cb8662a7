//! Document posting orchestration.
//!
//! This module ties the chart of accounts, period gate, journal builder,
//! validation engine, and approval rules together into a single
//! post-document flow with idempotency and at-most-once guarantees.

pub mod orchestrator;
pub mod stores;
pub mod types;


pub use orchestrator::PostingOrchestrator;
pub use stores::{
    AccountStore, ApprovalRuleStore, CommitError, CommittedJournal, CompanyStore, DocumentStore,
    PeriodStore, PostingUnitOfWork, RateProvider, StoreError,
};
pub use types::{
    Actor, DocumentKind, DocumentStatus, PostingInput, PostingLine, PostingRequest, PostingResult,
    SourceDocument, TaxLine,
};
