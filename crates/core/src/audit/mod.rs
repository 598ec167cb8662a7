//! Append-only audit trail for posting decisions.
//!
//! Every posting attempt leaves a record regardless of outcome. Sink
//! failures are logged and never change the business result.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use keel_shared::types::{AuditRecordId, CompanyId, TenantId, UserId};

use crate::approval::{SodDecision, UserRole};

/// What happened to a posting attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// The document was posted.
    Posted,
    /// Validation rejected the document.
    Rejected,
    /// The document needs a distinct approver.
    RequiresApproval,
    /// A transient or internal failure stopped the attempt.
    Failed,
    /// A repeated idempotency key replayed the stored outcome.
    DuplicateSuppressed,
    /// The document was already posted by an earlier request.
    AlreadyPosted,
    /// A posted journal was reversed.
    Reversed,
}

impl AuditAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Posted => "posted",
            Self::Rejected => "rejected",
            Self::RequiresApproval => "requires_approval",
            Self::Failed => "failed",
            Self::DuplicateSuppressed => "duplicate_suppressed",
            Self::AlreadyPosted => "already_posted",
            Self::Reversed => "reversed",
        }
    }

    /// Parses an action from its string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "posted" => Some(Self::Posted),
            "rejected" => Some(Self::Rejected),
            "requires_approval" => Some(Self::RequiresApproval),
            "failed" => Some(Self::Failed),
            "duplicate_suppressed" => Some(Self::DuplicateSuppressed),
            "already_posted" => Some(Self::AlreadyPosted),
            "reversed" => Some(Self::Reversed),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique identifier.
    pub id: AuditRecordId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning company.
    pub company_id: CompanyId,
    /// User whose request produced the record.
    pub actor: UserId,
    /// Role the user held at the time.
    pub actor_role: UserRole,
    /// What happened.
    pub action: AuditAction,
    /// Entity type the record refers to, e.g. "document" or "journal".
    pub entity_type: String,
    /// Id of that entity, as a string.
    pub entity_id: String,
    /// The segregation-of-duties decision in effect, if one was computed.
    pub sod: Option<SodDecision>,
    /// Free-form context: issue codes, journal numbers, error codes.
    pub metadata: serde_json::Value,
    /// When the record was captured.
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Creates a record for a posting attempt against a document.
    #[must_use]
    pub fn for_document(
        tenant_id: TenantId,
        company_id: CompanyId,
        actor: UserId,
        actor_role: UserRole,
        action: AuditAction,
        entity_id: String,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: AuditRecordId::new(),
            tenant_id,
            company_id,
            actor,
            actor_role,
            action,
            entity_type: "document".to_string(),
            entity_id,
            sod: None,
            metadata,
            recorded_at: Utc::now(),
        }
    }

    /// Creates a record for an action against a journal entry.
    #[must_use]
    pub fn for_journal(
        tenant_id: TenantId,
        company_id: CompanyId,
        actor: UserId,
        actor_role: UserRole,
        action: AuditAction,
        entity_id: String,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            entity_type: "journal".to_string(),
            ..Self::for_document(
                tenant_id, company_id, actor, actor_role, action, entity_id, metadata,
            )
        }
    }

    /// Attaches the segregation-of-duties decision.
    #[must_use]
    pub fn with_sod(mut self, sod: SodDecision) -> Self {
        self.sod = Some(sod);
        self
    }
}

/// Error appending an audit record.
#[derive(Debug, Error)]
#[error("audit sink failure: {0}")]
pub struct AuditError(pub String);

/// Destination for audit records.
///
/// Implementations must be append-only. Callers route failures to the
/// error log; the business outcome of the posting never depends on the
/// sink succeeding.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Durably appends one record.
    ///
    /// # Errors
    ///
    /// Returns an error when the record could not be persisted.
    async fn record(&self, record: AuditRecord) -> Result<(), AuditError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_strings() {
        assert_eq!(AuditAction::Posted.as_str(), "posted");
        assert_eq!(AuditAction::DuplicateSuppressed.as_str(), "duplicate_suppressed");
        assert_eq!(AuditAction::RequiresApproval.as_str(), "requires_approval");
    }

    #[test]
    fn test_record_builder() {
        let record = AuditRecord::for_document(
            TenantId::new(),
            CompanyId::new(),
            UserId::new(),
            UserRole::Clerk,
            AuditAction::Rejected,
            "doc-1".to_string(),
            json!({"codes": ["UNBALANCED_ENTRY"]}),
        )
        .with_sod(SodDecision::none_required());

        assert_eq!(record.entity_type, "document");
        assert_eq!(record.action, AuditAction::Rejected);
        assert!(record.sod.is_some());
    }
}
