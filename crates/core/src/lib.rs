//! Core business logic for Keel.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and posting flows live here.
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts types
//! - `fiscal` - Accounting periods and the period gate
//! - `approval` - Approval rules and segregation of duties
//! - `ledger` - Journal construction, validation, and reversal
//! - `posting` - The document posting orchestrator and its store seams
//! - `audit` - Append-only audit trail types

pub mod accounts;
pub mod approval;
pub mod audit;
pub mod fiscal;
pub mod ledger;
pub mod posting;
