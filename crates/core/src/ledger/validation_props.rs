//! Property-based tests for the validation engine.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use keel_shared::types::{
    AccountId, CompanyId, Currency, DocumentId, Money, PeriodId, TenantId, UserId,
};

use crate::accounts::{Account, AccountType};
use crate::approval::UserRole;
use crate::fiscal::{PeriodCheck, PeriodStatus};
use crate::posting::{Actor, DocumentKind, PostingInput, PostingLine};

use super::validation::{codes, ValidationContext, ValidationEngine};

fn positive_cents() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn closed_check() -> impl Strategy<Value = PeriodCheck> {
    prop_oneof![
        Just(PeriodCheck::not_covered()),
        Just(PeriodCheck {
            open: false,
            period_id: Some(PeriodId::new()),
            status: Some(PeriodStatus::Closed),
        }),
        Just(PeriodCheck {
            open: false,
            period_id: Some(PeriodId::new()),
            status: Some(PeriodStatus::Locked),
        }),
    ]
}

fn fixture(amounts: &[Decimal]) -> (PostingInput, HashMap<AccountId, Account>) {
    let mut accounts = HashMap::new();
    let mut add_account = |account_type: AccountType| {
        let id = AccountId::new();
        accounts.insert(
            id,
            Account {
                id,
                company_id: CompanyId::new(),
                code: "1000".to_string(),
                name: "Account".to_string(),
                account_type,
                currency: Currency::Usd,
                is_active: true,
                allow_direct_posting: true,
            },
        );
        id
    };

    let control = add_account(AccountType::Asset);
    let lines: Vec<PostingLine> = amounts
        .iter()
        .map(|&amount| PostingLine {
            account_id: add_account(AccountType::Income),
            description: "Line".to_string(),
            quantity: Decimal::ONE,
            unit_price: Money::new(amount, Currency::Usd),
            amount: Money::new(amount, Currency::Usd),
        })
        .collect();
    let total: Decimal = amounts.iter().sum();

    let input = PostingInput {
        tenant_id: TenantId::new(),
        company_id: CompanyId::new(),
        kind: DocumentKind::Invoice,
        document_id: DocumentId::new(),
        document_number: "INV-1".to_string(),
        counterparty_id: None,
        counterparty_name: None,
        control_account_id: control,
        document_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        posting_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        currency: Currency::Usd,
        exchange_rate: None,
        lines,
        tax_lines: vec![],
        description: "Property test".to_string(),
        total: Money::new(total, Currency::Usd),
        created_by: UserId::new(),
    };
    (input, accounts)
}

fn actor() -> Actor {
    Actor {
        user_id: UserId::new(),
        role: UserRole::Clerk,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A posting into anything but an open covering period never validates.
    #[test]
    fn prop_period_gate_fails_closed(
        amounts in prop::collection::vec(positive_cents(), 1..5),
        period in closed_check(),
    ) {
        let (input, accounts) = fixture(&amounts);
        let ctx = ValidationContext {
            accounts: &accounts,
            period: &period,
            base_currency: Currency::Usd,
            exchange_rate: None,
            rules: &[],
        };
        let result = ValidationEngine::validate(&input, None, &ctx, actor());
        prop_assert!(!result.validated);
        let period_blocked = result
            .errors()
            .any(|i| i.code == codes::NO_PERIOD || i.code == codes::PERIOD_CLOSED);
        prop_assert!(period_blocked);
    }

    /// Any declared total that differs from the line sum is rejected.
    #[test]
    fn prop_total_mismatch_rejected(
        amounts in prop::collection::vec(positive_cents(), 1..5),
        delta in 1i64..10_000i64,
    ) {
        let (mut input, accounts) = fixture(&amounts);
        input.total = Money::new(
            input.total.amount + Decimal::new(delta, 2),
            Currency::Usd,
        );
        let period = PeriodCheck {
            open: true,
            period_id: Some(PeriodId::new()),
            status: Some(PeriodStatus::Open),
        };
        let ctx = ValidationContext {
            accounts: &accounts,
            period: &period,
            base_currency: Currency::Usd,
            exchange_rate: None,
            rules: &[],
        };
        let result = ValidationEngine::validate(&input, None, &ctx, actor());
        prop_assert!(!result.validated);
        prop_assert!(result.errors().any(|i| i.code == codes::UNBALANCED_ENTRY));
    }

    /// A well-formed base-currency document with known open accounts
    /// always validates.
    #[test]
    fn prop_well_formed_document_validates(
        amounts in prop::collection::vec(positive_cents(), 1..5),
    ) {
        let (input, accounts) = fixture(&amounts);
        let period = PeriodCheck {
            open: true,
            period_id: Some(PeriodId::new()),
            status: Some(PeriodStatus::Open),
        };
        let ctx = ValidationContext {
            accounts: &accounts,
            period: &period,
            base_currency: Currency::Usd,
            exchange_rate: None,
            rules: &[],
        };
        let result = ValidationEngine::validate(&input, None, &ctx, actor());
        prop_assert!(result.validated, "issues: {:?}", result.issues);
    }
}
