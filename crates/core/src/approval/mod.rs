//! Approval rules and segregation-of-duties enforcement.

pub mod engine;
pub mod error;

pub use engine::{ApprovalEngine, ApprovalRule, SodDecision, UserRole};
pub use error::ApprovalError;
