//! Property-based tests for journal construction.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use keel_shared::types::{
    AccountId, CompanyId, Currency, DocumentId, Money, TenantId, UserId,
};

use crate::posting::{DocumentKind, PostingInput, PostingLine, TaxLine};

use super::builder::JournalBuilder;
use super::types::LineRole;

/// Strategy for amounts from 0.01 to 1,000,000.00.
fn positive_cents() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for exchange rates from 0.0001 to 100.0000.
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

fn kind_strategy() -> impl Strategy<Value = DocumentKind> {
    prop_oneof![
        Just(DocumentKind::Invoice),
        Just(DocumentKind::Bill),
        Just(DocumentKind::PaymentIn),
        Just(DocumentKind::PaymentOut),
    ]
}

fn make_input(kind: DocumentKind, currency: Currency, amounts: Vec<Decimal>) -> PostingInput {
    let lines: Vec<PostingLine> = amounts
        .iter()
        .map(|&amount| PostingLine {
            account_id: AccountId::new(),
            description: "Line".to_string(),
            quantity: Decimal::ONE,
            unit_price: Money::new(amount, currency),
            amount: Money::new(amount, currency),
        })
        .collect();
    let total: Decimal = amounts.iter().sum();

    PostingInput {
        tenant_id: TenantId::new(),
        company_id: CompanyId::new(),
        kind,
        document_id: DocumentId::new(),
        document_number: "DOC-1".to_string(),
        counterparty_id: None,
        counterparty_name: None,
        control_account_id: AccountId::new(),
        document_date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
        posting_date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
        currency,
        exchange_rate: None,
        lines,
        tax_lines: vec![],
        description: "Property test document".to_string(),
        total: Money::new(total, currency),
        created_by: UserId::new(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every draft built in the base currency balances exactly.
    #[test]
    fn prop_base_currency_draft_balances(
        kind in kind_strategy(),
        amounts in prop::collection::vec(positive_cents(), 1..8),
    ) {
        let input = make_input(kind, Currency::Usd, amounts);
        let draft = JournalBuilder::build(&input, Currency::Usd, None).unwrap();
        prop_assert!(draft.totals().is_balanced());
    }

    /// Conversion rounds each line once and still balances exactly,
    /// because the control line is the sum of the rounded lines.
    #[test]
    fn prop_converted_draft_balances(
        kind in kind_strategy(),
        amounts in prop::collection::vec(positive_cents(), 1..8),
        rate in rate_strategy(),
    ) {
        let input = make_input(kind, Currency::Eur, amounts);
        let draft = JournalBuilder::build(&input, Currency::Usd, Some(rate)).unwrap();

        let totals = draft.totals();
        prop_assert!(totals.is_balanced(), "unbalanced: {totals:?}");
        for line in &draft.lines {
            prop_assert_eq!(line.debit.currency, Currency::Usd);
            prop_assert_eq!(line.debit.amount.scale() <= 2, true);
            prop_assert_eq!(line.credit.amount.scale() <= 2, true);
        }
    }

    /// The control line always comes first and carries the document total.
    #[test]
    fn prop_control_line_first(
        kind in kind_strategy(),
        amounts in prop::collection::vec(positive_cents(), 1..8),
    ) {
        let total: Decimal = amounts.iter().sum();
        let input = make_input(kind, Currency::Usd, amounts);
        let draft = JournalBuilder::build(&input, Currency::Usd, None).unwrap();

        prop_assert_eq!(draft.lines[0].role, LineRole::Control);
        let control = &draft.lines[0];
        let carried = if kind.control_is_debit() {
            control.debit.amount
        } else {
            control.credit.amount
        };
        prop_assert_eq!(carried, total.round_dp(2));
    }

    /// Building the same input twice yields identical drafts.
    #[test]
    fn prop_builder_is_deterministic(
        kind in kind_strategy(),
        amounts in prop::collection::vec(positive_cents(), 1..8),
        rate in rate_strategy(),
    ) {
        let input = make_input(kind, Currency::Eur, amounts);
        let a = JournalBuilder::build(&input, Currency::Usd, Some(rate)).unwrap();
        let b = JournalBuilder::build(&input, Currency::Usd, Some(rate)).unwrap();
        prop_assert_eq!(a.lines, b.lines);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Tax lines land after detail lines, ordered by tax code.
    #[test]
    fn prop_tax_lines_ordered(codes in prop::collection::vec("[A-Z]{2,6}", 1..5)) {
        let mut input = make_input(
            DocumentKind::Invoice,
            Currency::Usd,
            vec![Decimal::new(10000, 2)],
        );
        input.tax_lines = codes
            .iter()
            .map(|code| TaxLine {
                tax_code: code.clone(),
                account_id: AccountId::new(),
                amount: Money::new(Decimal::new(500, 2), Currency::Usd),
            })
            .collect();
        let tax_total: Decimal = input.tax_lines.iter().map(|t| t.amount.amount).sum();
        input.total = Money::new(input.total.amount + tax_total, Currency::Usd);

        let draft = JournalBuilder::build(&input, Currency::Usd, None).unwrap();
        let tax_memos: Vec<_> = draft
            .lines
            .iter()
            .filter(|l| l.role == LineRole::Tax)
            .filter_map(|l| l.memo.clone())
            .collect();
        let mut sorted = tax_memos.clone();
        sorted.sort();
        prop_assert_eq!(tax_memos, sorted);
    }
}
