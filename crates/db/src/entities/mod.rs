//! `SeaORM` entity definitions.

pub mod accounts;
pub mod approval_rules;
pub mod audit_records;
pub mod companies;
pub mod documents;
pub mod exchange_rates;
pub mod fiscal_periods;
pub mod journal_entries;
pub mod journal_lines;
pub mod sea_orm_active_enums;
