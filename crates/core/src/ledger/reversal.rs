//! Reversal drafts for posted journals.

use chrono::NaiveDate;

use super::error::LedgerError;
use super::types::{JournalDraft, JournalEntry, JournalLine, JournalStatus, SourceRef};

/// Builds reversing drafts from posted journal entries.
pub struct ReversalBuilder;

impl ReversalBuilder {
    /// Builds a draft whose lines exactly invert the given entry.
    ///
    /// The reversing draft carries the same amounts with debit and
    /// credit swapped, so the two entries net to zero on every account.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is not posted, or was already
    /// reversed.
    pub fn build(
        entry: &JournalEntry,
        reversal_date: NaiveDate,
        reason: Option<&str>,
    ) -> Result<JournalDraft, LedgerError> {
        match entry.status {
            JournalStatus::Posted => {}
            JournalStatus::Reversed => {
                return Err(LedgerError::AlreadyReversed(entry.id.into_inner()))
            }
            JournalStatus::Draft => return Err(LedgerError::NotPosted(entry.id.into_inner())),
        }

        let lines = entry
            .lines
            .iter()
            .map(|line| JournalLine {
                account_id: line.account_id,
                role: line.role,
                debit: line.credit,
                credit: line.debit,
                memo: line.memo.clone(),
            })
            .collect();

        let description = match reason {
            Some(reason) => format!("Reversal of {}: {reason}", entry.journal_number),
            None => format!("Reversal of {}", entry.journal_number),
        };

        Ok(JournalDraft {
            tenant_id: entry.tenant_id,
            company_id: entry.company_id,
            currency: entry.currency,
            posting_date: reversal_date,
            lines,
            source: SourceRef {
                kind: "reversal".to_string(),
                document_id: entry.source.document_id,
                document_number: entry.journal_number.clone(),
            },
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use keel_shared::types::{
        AccountId, CompanyId, Currency, DocumentId, JournalEntryId, Money, TenantId, UserId,
    };

    use super::super::types::LineRole;

    fn posted_entry() -> JournalEntry {
        let usd = |amount| Money::new(amount, Currency::Usd);
        JournalEntry {
            id: JournalEntryId::new(),
            tenant_id: TenantId::new(),
            company_id: CompanyId::new(),
            journal_number: "JRN-2026-000007".to_string(),
            posting_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            currency: Currency::Usd,
            lines: vec![
                JournalLine::debit(AccountId::new(), LineRole::Control, usd(dec!(120)), None),
                JournalLine::credit(AccountId::new(), LineRole::Detail, usd(dec!(100)), None),
                JournalLine::credit(AccountId::new(), LineRole::Tax, usd(dec!(20)), None),
            ],
            status: JournalStatus::Posted,
            source: SourceRef {
                kind: "invoice".to_string(),
                document_id: DocumentId::new(),
                document_number: "INV-0001".to_string(),
            },
            idempotency_key: "invoice:test".to_string(),
            created_at: Utc::now(),
            posted_at: Some(Utc::now()),
            created_by: UserId::new(),
        }
    }

    #[test]
    fn test_reversal_inverts_every_line() {
        let entry = posted_entry();
        let date = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        let draft = ReversalBuilder::build(&entry, date, None).unwrap();

        assert_eq!(draft.lines.len(), 3);
        for (original, reversed) in entry.lines.iter().zip(&draft.lines) {
            assert_eq!(reversed.account_id, original.account_id);
            assert_eq!(reversed.debit, original.credit);
            assert_eq!(reversed.credit, original.debit);
        }
        assert!(draft.totals().is_balanced());
        assert_eq!(draft.posting_date, date);
        assert_eq!(draft.source.kind, "reversal");
    }

    #[test]
    fn test_reason_appears_in_description() {
        let entry = posted_entry();
        let date = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        let draft = ReversalBuilder::build(&entry, date, Some("duplicate billing")).unwrap();
        assert_eq!(
            draft.description,
            "Reversal of JRN-2026-000007: duplicate billing"
        );
    }

    #[test]
    fn test_draft_entry_cannot_be_reversed() {
        let mut entry = posted_entry();
        entry.status = JournalStatus::Draft;
        let date = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        assert!(matches!(
            ReversalBuilder::build(&entry, date, None),
            Err(LedgerError::NotPosted(_))
        ));
    }

    #[test]
    fn test_already_reversed_entry_rejected() {
        let mut entry = posted_entry();
        entry.status = JournalStatus::Reversed;
        let date = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        assert!(matches!(
            ReversalBuilder::build(&entry, date, None),
            Err(LedgerError::AlreadyReversed(_))
        ));
    }
}
