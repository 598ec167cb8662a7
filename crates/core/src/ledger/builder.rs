//! Journal builder: turns a source document into a balanced draft.
//!
//! Counterpart lines (details and taxes) are each converted to the base
//! currency and rounded exactly once. The control line is then the sum
//! of the already-rounded counterparts, so the draft balances by
//! construction and never by tolerance.

use rust_decimal::Decimal;

use keel_shared::types::{Currency, Money};

use crate::posting::{DocumentKind, PostingInput};

use super::error::LedgerError;
use super::types::{JournalDraft, JournalLine, LineRole, SourceRef};

/// Stateless journal builder.
pub struct JournalBuilder;

impl JournalBuilder {
    /// Builds a balanced journal draft from a posting input.
    ///
    /// `rate` is the document-to-base exchange rate; it is ignored when
    /// the document is already in the base currency.
    ///
    /// # Errors
    ///
    /// Returns an error for empty documents, non-positive quantities or
    /// tax amounts, negative unit prices, or a missing exchange rate. An
    /// `UnbalancedDraft` error indicates an internal defect.
    pub fn build(
        input: &PostingInput,
        base_currency: Currency,
        rate: Option<Decimal>,
    ) -> Result<JournalDraft, LedgerError> {
        if input.lines.is_empty() {
            return Err(LedgerError::NoLines);
        }
        for line in &input.lines {
            if line.quantity <= Decimal::ZERO {
                return Err(LedgerError::InvalidQuantity(line.quantity));
            }
            if line.unit_price.amount < Decimal::ZERO {
                return Err(LedgerError::InvalidUnitPrice(line.unit_price.amount));
            }
        }
        for tax in &input.tax_lines {
            if tax.amount.amount <= Decimal::ZERO {
                return Err(LedgerError::InvalidTaxAmount(tax.amount.amount));
            }
        }

        let convert = |amount: Money| -> Result<Money, LedgerError> {
            if input.currency == base_currency {
                return Ok(amount.rounded());
            }
            let rate = rate.ok_or_else(|| LedgerError::NoExchangeRate {
                from: input.currency.code().to_string(),
                to: base_currency.code().to_string(),
                date: input.posting_date,
            })?;
            Ok(amount.convert(rate, base_currency)?)
        };

        let control_is_debit = input.kind.control_is_debit();
        let counterpart =
            |account_id, role, amount, memo: Option<String>| -> JournalLine {
                if control_is_debit {
                    JournalLine::credit(account_id, role, amount, memo)
                } else {
                    JournalLine::debit(account_id, role, amount, memo)
                }
            };

        let mut lines = Vec::with_capacity(input.lines.len() + input.tax_lines.len() + 1);
        let mut control_total = Money::zero(base_currency);

        for line in &input.lines {
            let amount = convert(line.amount)?;
            control_total = control_total.checked_add(amount)?;
            lines.push(counterpart(
                line.account_id,
                LineRole::Detail,
                amount,
                Some(line.description.clone()),
            ));
        }

        let mut tax_lines: Vec<_> = input.tax_lines.iter().collect();
        tax_lines.sort_by(|a, b| a.tax_code.cmp(&b.tax_code));
        for tax in tax_lines {
            let amount = convert(tax.amount)?;
            control_total = control_total.checked_add(amount)?;
            lines.push(counterpart(
                tax.account_id,
                LineRole::Tax,
                amount,
                Some(tax.tax_code.clone()),
            ));
        }

        let control_memo = input
            .counterparty_name
            .clone()
            .unwrap_or_else(|| input.description.clone());
        let control = if control_is_debit {
            JournalLine::debit(
                input.control_account_id,
                LineRole::Control,
                control_total,
                Some(control_memo),
            )
        } else {
            JournalLine::credit(
                input.control_account_id,
                LineRole::Control,
                control_total,
                Some(control_memo),
            )
        };
        lines.insert(0, control);

        let draft = JournalDraft {
            tenant_id: input.tenant_id,
            company_id: input.company_id,
            currency: base_currency,
            posting_date: input.posting_date,
            lines,
            source: SourceRef {
                kind: input.kind.as_str().to_string(),
                document_id: input.document_id,
                document_number: input.document_number.clone(),
            },
            description: input.description.clone(),
        };

        let totals = draft.totals();
        if !totals.is_balanced() {
            return Err(LedgerError::UnbalancedDraft {
                debit: totals.debit,
                credit: totals.credit,
            });
        }
        Ok(draft)
    }
}
