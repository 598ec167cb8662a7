//! Business rule validation for document postings.
//!
//! Validation never fails with an error for bad user input. It returns a
//! structured result listing every issue found, so callers can show all
//! problems at once instead of fixing them one at a time.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use keel_shared::types::{round_to_scale, AccountId, Currency};

use crate::accounts::Account;
use crate::approval::{ApprovalEngine, ApprovalRule, UserRole};
use crate::fiscal::PeriodCheck;
use crate::posting::{Actor, PostingInput};

use super::types::JournalDraft;

/// Stable issue codes.
pub mod codes {
    /// Document has no lines.
    pub const NO_LINES: &str = "NO_LINES";
    /// A required field is empty or missing.
    pub const MISSING_REQUIRED_FIELD: &str = "MISSING_REQUIRED_FIELD";
    /// Line quantity is zero or negative.
    pub const INVALID_QUANTITY: &str = "INVALID_QUANTITY";
    /// Line unit price is negative.
    pub const INVALID_UNIT_PRICE: &str = "INVALID_UNIT_PRICE";
    /// Line amount does not equal quantity times unit price.
    pub const LINE_AMOUNT_MISMATCH: &str = "LINE_AMOUNT_MISMATCH";
    /// Tax line amount is zero or negative.
    pub const INVALID_TAX_AMOUNT: &str = "INVALID_TAX_AMOUNT";
    /// Declared total does not match lines, or debits do not equal credits.
    pub const UNBALANCED_ENTRY: &str = "UNBALANCED_ENTRY";
    /// Referenced account does not exist in the company chart.
    pub const INVALID_ACCOUNT: &str = "INVALID_ACCOUNT";
    /// Referenced account is inactive.
    pub const ACCOUNT_INACTIVE: &str = "ACCOUNT_INACTIVE";
    /// Referenced account does not allow direct posting.
    pub const ACCOUNT_NOT_POSTABLE: &str = "ACCOUNT_NOT_POSTABLE";
    /// Account type is unusual for its role in this document kind.
    pub const ACCOUNT_TYPE_MISMATCH: &str = "ACCOUNT_TYPE_MISMATCH";
    /// No accounting period covers the posting date.
    pub const NO_PERIOD: &str = "NO_PERIOD";
    /// The covering accounting period is not open.
    pub const PERIOD_CLOSED: &str = "PERIOD_CLOSED";
    /// Currency problem: mixed line currencies or missing exchange rate.
    pub const CURRENCY_MISMATCH: &str = "CURRENCY_MISMATCH";
    /// The referenced document does not exist.
    pub const DOCUMENT_NOT_FOUND: &str = "DOCUMENT_NOT_FOUND";
    /// The referenced document is voided and cannot be posted.
    pub const DOCUMENT_VOIDED: &str = "DOCUMENT_VOIDED";
}

/// How severe an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks posting.
    Error,
    /// Recorded but does not block posting.
    Warning,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Stable machine-readable code from [`codes`].
    pub code: String,
    /// Field path the issue refers to, if one applies.
    pub field: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Issue severity.
    pub severity: Severity,
}

impl ValidationIssue {
    fn error(code: &str, field: Option<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            field,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    fn warning(code: &str, field: Option<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            field,
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

/// Outcome of validating one posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Every issue found, errors and warnings.
    pub issues: Vec<ValidationIssue>,
    /// True when no error-severity issues were found.
    pub validated: bool,
    /// True when an approval rule matched this document.
    pub requires_approval: bool,
    /// Roles that may approve, when approval is required.
    pub approver_roles: Vec<UserRole>,
}

impl ValidationResult {
    /// Error-severity issues only.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
    }

    /// Code of the first blocking issue, if any.
    #[must_use]
    pub fn first_error_code(&self) -> Option<&str> {
        self.errors().next().map(|i| i.code.as_str())
    }
}

/// Everything the validation engine looks at besides the document itself.
pub struct ValidationContext<'a> {
    /// The company chart of accounts, keyed by account id.
    pub accounts: &'a HashMap<AccountId, Account>,
    /// Period-gate result for the posting date.
    pub period: &'a PeriodCheck,
    /// The company base currency.
    pub base_currency: Currency,
    /// Document-to-base exchange rate, if one is available.
    pub exchange_rate: Option<Decimal>,
    /// Approval rules configured for the company.
    pub rules: &'a [ApprovalRule],
}

/// Stateless validation engine.
pub struct ValidationEngine;

impl ValidationEngine {
    /// Validates a posting input and its generated draft.
    ///
    /// `draft` is absent when the builder could not produce one; the
    /// structural issues that prevented it are still reported here.
    #[must_use]
    pub fn validate(
        input: &PostingInput,
        draft: Option<&JournalDraft>,
        ctx: &ValidationContext<'_>,
        actor: Actor,
    ) -> ValidationResult {
        let mut issues = Vec::new();

        Self::check_structure(input, &mut issues);
        if let Some(draft) = draft {
            let totals = draft.totals();
            if !totals.is_balanced() {
                issues.push(ValidationIssue::error(
                    codes::UNBALANCED_ENTRY,
                    None,
                    format!(
                        "journal debits ({}) do not equal credits ({})",
                        totals.debit, totals.credit
                    ),
                ));
            }
        }
        Self::check_accounts(input, ctx, &mut issues);
        Self::check_period(ctx, &mut issues);
        Self::check_currency(input, ctx, &mut issues);

        let decision = ApprovalEngine::evaluate(
            ctx.rules,
            input.kind,
            Self::base_total(input, ctx),
        );
        // Approval applies when the submitter cannot approve their own work.
        let requires_approval = decision.requires_approval
            && ApprovalEngine::can_approve(
                &decision,
                input.created_by,
                actor.user_id,
                actor.role,
            )
            .is_err();

        let validated = !issues.iter().any(|i| i.severity == Severity::Error);
        ValidationResult {
            issues,
            validated,
            requires_approval,
            approver_roles: decision.approver_roles,
        }
    }

    fn check_structure(input: &PostingInput, issues: &mut Vec<ValidationIssue>) {
        if input.lines.is_empty() {
            issues.push(ValidationIssue::error(
                codes::NO_LINES,
                Some("lines".to_string()),
                "document has no lines",
            ));
            return;
        }
        if input.document_number.trim().is_empty() {
            issues.push(ValidationIssue::error(
                codes::MISSING_REQUIRED_FIELD,
                Some("document_number".to_string()),
                "document number is required",
            ));
        }

        for (i, line) in input.lines.iter().enumerate() {
            if line.quantity <= Decimal::ZERO {
                issues.push(ValidationIssue::error(
                    codes::INVALID_QUANTITY,
                    Some(format!("lines[{i}].quantity")),
                    format!("quantity must be positive, got {}", line.quantity),
                ));
            }
            if line.unit_price.amount < Decimal::ZERO {
                issues.push(ValidationIssue::error(
                    codes::INVALID_UNIT_PRICE,
                    Some(format!("lines[{i}].unit_price")),
                    format!("unit price cannot be negative, got {}", line.unit_price.amount),
                ));
            }
            if line.unit_price.currency != input.currency
                || line.amount.currency != input.currency
            {
                issues.push(ValidationIssue::error(
                    codes::CURRENCY_MISMATCH,
                    Some(format!("lines[{i}]")),
                    "line currency differs from document currency",
                ));
                continue;
            }
            if line.quantity > Decimal::ZERO && line.unit_price.amount >= Decimal::ZERO {
                let expected = round_to_scale(
                    line.quantity * line.unit_price.amount,
                    input.currency.minor_units(),
                );
                if line.amount.amount != expected {
                    issues.push(ValidationIssue::error(
                        codes::LINE_AMOUNT_MISMATCH,
                        Some(format!("lines[{i}].amount")),
                        format!(
                            "line amount {} does not equal quantity x unit price ({expected})",
                            line.amount.amount
                        ),
                    ));
                }
            }
        }

        for (i, tax) in input.tax_lines.iter().enumerate() {
            if tax.amount.amount <= Decimal::ZERO {
                issues.push(ValidationIssue::error(
                    codes::INVALID_TAX_AMOUNT,
                    Some(format!("tax_lines[{i}].amount")),
                    format!("tax amount must be positive, got {}", tax.amount.amount),
                ));
            }
            if tax.amount.currency != input.currency {
                issues.push(ValidationIssue::error(
                    codes::CURRENCY_MISMATCH,
                    Some(format!("tax_lines[{i}]")),
                    "tax line currency differs from document currency",
                ));
            }
        }

        if input.total.currency != input.currency {
            issues.push(ValidationIssue::error(
                codes::CURRENCY_MISMATCH,
                Some("total".to_string()),
                "declared total currency differs from document currency",
            ));
        } else if input.total.amount != input.computed_total() {
            issues.push(ValidationIssue::error(
                codes::UNBALANCED_ENTRY,
                Some("total".to_string()),
                format!(
                    "declared total {} does not match lines plus tax ({})",
                    input.total.amount,
                    input.computed_total()
                ),
            ));
        }
    }

    fn check_accounts(
        input: &PostingInput,
        ctx: &ValidationContext<'_>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let check = |account_id: AccountId,
                         field: String,
                         expected_type: Option<crate::accounts::AccountType>,
                         issues: &mut Vec<ValidationIssue>| {
            let Some(account) = ctx.accounts.get(&account_id) else {
                issues.push(ValidationIssue::error(
                    codes::INVALID_ACCOUNT,
                    Some(field),
                    format!("account {account_id} does not exist"),
                ));
                return;
            };
            if !account.is_active {
                issues.push(ValidationIssue::error(
                    codes::ACCOUNT_INACTIVE,
                    Some(field),
                    format!("account {} is inactive", account.code),
                ));
                return;
            }
            if !account.allow_direct_posting {
                issues.push(ValidationIssue::error(
                    codes::ACCOUNT_NOT_POSTABLE,
                    Some(field),
                    format!("account {} does not allow direct posting", account.code),
                ));
                return;
            }
            if let Some(expected) = expected_type {
                if account.account_type != expected {
                    issues.push(ValidationIssue::warning(
                        codes::ACCOUNT_TYPE_MISMATCH,
                        Some(field),
                        format!(
                            "account {} is {} where {} is expected",
                            account.code, account.account_type, expected
                        ),
                    ));
                }
            }
        };

        check(
            input.control_account_id,
            "control_account_id".to_string(),
            Some(input.kind.control_account_type()),
            issues,
        );
        for (i, line) in input.lines.iter().enumerate() {
            check(
                line.account_id,
                format!("lines[{i}].account_id"),
                input.kind.detail_account_type(),
                issues,
            );
        }
        for (i, tax) in input.tax_lines.iter().enumerate() {
            check(
                tax.account_id,
                format!("tax_lines[{i}].account_id"),
                input.kind.tax_account_type(),
                issues,
            );
        }
    }

    fn check_period(ctx: &ValidationContext<'_>, issues: &mut Vec<ValidationIssue>) {
        if ctx.period.open {
            return;
        }
        match ctx.period.status {
            None => issues.push(ValidationIssue::error(
                codes::NO_PERIOD,
                Some("posting_date".to_string()),
                "no accounting period covers the posting date",
            )),
            Some(status) => issues.push(ValidationIssue::error(
                codes::PERIOD_CLOSED,
                Some("posting_date".to_string()),
                format!("accounting period is {status}"),
            )),
        }
    }

    fn check_currency(
        input: &PostingInput,
        ctx: &ValidationContext<'_>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        if input.currency != ctx.base_currency && ctx.exchange_rate.is_none() {
            issues.push(ValidationIssue::error(
                codes::CURRENCY_MISMATCH,
                Some("exchange_rate".to_string()),
                format!(
                    "no exchange rate available for {} to {}",
                    input.currency.code(),
                    ctx.base_currency.code()
                ),
            ));
        }
        if let Some(rate) = ctx.exchange_rate {
            if rate <= Decimal::ZERO {
                issues.push(ValidationIssue::error(
                    codes::CURRENCY_MISMATCH,
                    Some("exchange_rate".to_string()),
                    format!("exchange rate must be positive, got {rate}"),
                ));
            }
        }
    }

    /// The document total expressed in base currency, used for rule matching.
    fn base_total(input: &PostingInput, ctx: &ValidationContext<'_>) -> Decimal {
        if input.currency == ctx.base_currency {
            return input.total.amount;
        }
        match ctx.exchange_rate {
            Some(rate) if rate > Decimal::ZERO => round_to_scale(
                input.total.amount * rate,
                ctx.base_currency.minor_units(),
            ),
            _ => input.total.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use keel_shared::types::{
        AccountId, CompanyId, DocumentId, Money, TenantId, UserId,
    };

    use crate::accounts::{Account, AccountType};
    use crate::approval::ApprovalRule;
    use crate::fiscal::{PeriodCheck, PeriodStatus};
    use crate::posting::{DocumentKind, PostingLine, TaxLine};
    use keel_shared::types::PeriodId;

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::Usd)
    }

    fn account(id: AccountId, account_type: AccountType) -> Account {
        Account {
            id,
            company_id: CompanyId::new(),
            code: "1200".to_string(),
            name: "Test account".to_string(),
            account_type,
            currency: Currency::Usd,
            is_active: true,
            allow_direct_posting: true,
        }
    }

    struct Fixture {
        input: PostingInput,
        accounts: HashMap<AccountId, Account>,
    }

    fn invoice_fixture() -> Fixture {
        let control = AccountId::new();
        let revenue = AccountId::new();
        let tax = AccountId::new();

        let mut accounts = HashMap::new();
        accounts.insert(control, account(control, AccountType::Asset));
        accounts.insert(revenue, account(revenue, AccountType::Income));
        accounts.insert(tax, account(tax, AccountType::Liability));

        let input = PostingInput {
            tenant_id: TenantId::new(),
            company_id: CompanyId::new(),
            kind: DocumentKind::Invoice,
            document_id: DocumentId::new(),
            document_number: "INV-0001".to_string(),
            counterparty_id: None,
            counterparty_name: None,
            control_account_id: control,
            document_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            posting_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            currency: Currency::Usd,
            exchange_rate: None,
            lines: vec![PostingLine {
                account_id: revenue,
                description: "Consulting".to_string(),
                quantity: dec!(4),
                unit_price: usd(dec!(25.00)),
                amount: usd(dec!(100.00)),
            }],
            tax_lines: vec![TaxLine {
                tax_code: "VAT20".to_string(),
                account_id: tax,
                amount: usd(dec!(20.00)),
            }],
            description: "January consulting".to_string(),
            total: usd(dec!(120.00)),
            created_by: UserId::new(),
        };
        Fixture { input, accounts }
    }

    fn open_period() -> PeriodCheck {
        PeriodCheck {
            open: true,
            period_id: Some(PeriodId::new()),
            status: Some(PeriodStatus::Open),
        }
    }

    fn ctx<'a>(
        accounts: &'a HashMap<AccountId, Account>,
        period: &'a PeriodCheck,
        rules: &'a [ApprovalRule],
    ) -> ValidationContext<'a> {
        ValidationContext {
            accounts,
            period,
            base_currency: Currency::Usd,
            exchange_rate: None,
            rules,
        }
    }

    fn clerk() -> Actor {
        Actor {
            user_id: UserId::new(),
            role: UserRole::Clerk,
        }
    }

    #[test]
    fn test_valid_invoice_passes() {
        let fx = invoice_fixture();
        let period = open_period();
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert!(result.validated, "unexpected issues: {:?}", result.issues);
        assert!(!result.requires_approval);
    }

    #[test]
    fn test_empty_document_short_circuits() {
        let mut fx = invoice_fixture();
        fx.input.lines.clear();
        fx.input.tax_lines.clear();
        fx.input.total = usd(dec!(0));
        let period = open_period();
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert!(!result.validated);
        assert_eq!(result.first_error_code(), Some(codes::NO_LINES));
    }

    #[test]
    fn test_line_amount_mismatch() {
        let mut fx = invoice_fixture();
        fx.input.lines[0].amount = usd(dec!(99.00));
        fx.input.total = usd(dec!(119.00));
        let period = open_period();
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert_eq!(result.first_error_code(), Some(codes::LINE_AMOUNT_MISMATCH));
    }

    #[test]
    fn test_declared_total_mismatch() {
        let mut fx = invoice_fixture();
        fx.input.total = usd(dec!(130.00));
        let period = open_period();
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert!(!result.validated);
        assert_eq!(result.first_error_code(), Some(codes::UNBALANCED_ENTRY));
    }

    #[test]
    fn test_negative_tax_amount_blocks() {
        let mut fx = invoice_fixture();
        fx.input.tax_lines[0].amount = usd(dec!(-20.00));
        fx.input.total = usd(dec!(80.00));
        let period = open_period();
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert!(!result.validated);
        assert_eq!(result.first_error_code(), Some(codes::INVALID_TAX_AMOUNT));
    }

    #[test]
    fn test_total_in_wrong_currency_blocks() {
        let mut fx = invoice_fixture();
        fx.input.total = Money::new(dec!(120.00), Currency::Eur);
        let period = open_period();
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert!(!result.validated);
        let issue = result.errors().next().unwrap();
        assert_eq!(issue.code, codes::CURRENCY_MISMATCH);
        assert_eq!(issue.field.as_deref(), Some("total"));
    }

    #[test]
    fn test_unknown_account() {
        let mut fx = invoice_fixture();
        fx.input.lines[0].account_id = AccountId::new();
        let period = open_period();
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert_eq!(result.first_error_code(), Some(codes::INVALID_ACCOUNT));
    }

    #[test]
    fn test_inactive_account() {
        let mut fx = invoice_fixture();
        if let Some(acc) = fx.accounts.get_mut(&fx.input.lines[0].account_id) {
            acc.is_active = false;
        }
        let period = open_period();
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert_eq!(result.first_error_code(), Some(codes::ACCOUNT_INACTIVE));
    }

    #[test]
    fn test_summary_account_not_postable() {
        let mut fx = invoice_fixture();
        if let Some(acc) = fx.accounts.get_mut(&fx.input.control_account_id) {
            acc.allow_direct_posting = false;
        }
        let period = open_period();
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert_eq!(result.first_error_code(), Some(codes::ACCOUNT_NOT_POSTABLE));
    }

    #[test]
    fn test_type_mismatch_is_warning_only() {
        let mut fx = invoice_fixture();
        if let Some(acc) = fx.accounts.get_mut(&fx.input.lines[0].account_id) {
            acc.account_type = AccountType::Expense;
        }
        let period = open_period();
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert!(result.validated);
        assert!(result
            .issues
            .iter()
            .any(|i| i.code == codes::ACCOUNT_TYPE_MISMATCH && i.severity == Severity::Warning));
    }

    #[test]
    fn test_closed_period_blocks() {
        let fx = invoice_fixture();
        let period = PeriodCheck {
            open: false,
            period_id: Some(PeriodId::new()),
            status: Some(PeriodStatus::Closed),
        };
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert_eq!(result.first_error_code(), Some(codes::PERIOD_CLOSED));
    }

    #[test]
    fn test_missing_period_fails_closed() {
        let fx = invoice_fixture();
        let period = PeriodCheck::not_covered();
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert_eq!(result.first_error_code(), Some(codes::NO_PERIOD));
    }

    #[test]
    fn test_foreign_currency_without_rate() {
        let mut fx = invoice_fixture();
        fx.input.currency = Currency::Eur;
        fx.input.lines[0].unit_price = Money::new(dec!(25.00), Currency::Eur);
        fx.input.lines[0].amount = Money::new(dec!(100.00), Currency::Eur);
        fx.input.tax_lines[0].amount = Money::new(dec!(20.00), Currency::Eur);
        fx.input.total = Money::new(dec!(120.00), Currency::Eur);
        let period = open_period();
        let result =
            ValidationEngine::validate(&fx.input, None, &ctx(&fx.accounts, &period, &[]), clerk());
        assert!(!result.validated);
        let issue = result.errors().next().unwrap();
        assert_eq!(issue.code, codes::CURRENCY_MISMATCH);
        assert_eq!(issue.field.as_deref(), Some("exchange_rate"));
    }

    #[test]
    fn test_approval_rule_flags_result() {
        let fx = invoice_fixture();
        let rules = vec![ApprovalRule {
            id: keel_shared::types::ApprovalRuleId::new(),
            name: "High value".to_string(),
            min_amount: Some(dec!(100)),
            max_amount: None,
            document_kinds: vec![],
            required_role: UserRole::Approver,
            priority: 10,
        }];
        let period = open_period();
        let result = ValidationEngine::validate(
            &fx.input,
            None,
            &ctx(&fx.accounts, &period, &rules),
            clerk(),
        );
        assert!(result.validated);
        assert!(result.requires_approval);
        assert_eq!(
            result.approver_roles,
            vec![UserRole::Approver, UserRole::Controller, UserRole::Admin]
        );
    }

    #[test]
    fn test_distinct_approver_does_not_require_approval() {
        let fx = invoice_fixture();
        let rules = vec![ApprovalRule {
            id: keel_shared::types::ApprovalRuleId::new(),
            name: "High value".to_string(),
            min_amount: Some(dec!(100)),
            max_amount: None,
            document_kinds: vec![],
            required_role: UserRole::Approver,
            priority: 10,
        }];
        let period = open_period();
        let approver = Actor {
            user_id: UserId::new(),
            role: UserRole::Controller,
        };
        let result = ValidationEngine::validate(
            &fx.input,
            None,
            &ctx(&fx.accounts, &period, &rules),
            approver,
        );
        assert!(result.validated);
        assert!(!result.requires_approval);
    }

    #[test]
    fn test_creator_cannot_self_approve() {
        let fx = invoice_fixture();
        let rules = vec![ApprovalRule {
            id: keel_shared::types::ApprovalRuleId::new(),
            name: "High value".to_string(),
            min_amount: Some(dec!(100)),
            max_amount: None,
            document_kinds: vec![],
            required_role: UserRole::Approver,
            priority: 10,
        }];
        let period = open_period();
        let creator_as_admin = Actor {
            user_id: fx.input.created_by,
            role: UserRole::Admin,
        };
        let result = ValidationEngine::validate(
            &fx.input,
            None,
            &ctx(&fx.accounts, &period, &rules),
            creator_as_admin,
        );
        assert!(result.requires_approval);
    }
}
