//! Chart-of-accounts domain types.
//!
//! Accounts are maintained elsewhere; the posting core only reads them.

pub mod account;

pub use account::{Account, AccountType};
