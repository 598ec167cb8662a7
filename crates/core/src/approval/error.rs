//! Approval and segregation-of-duties errors.

use thiserror::Error;

use super::engine::UserRole;

/// Errors raised when an approval attempt is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    /// The approver is the same user who created the document.
    #[error("self-approval is not permitted")]
    SelfApproval,

    /// The approver's role is below the rule's required role.
    #[error("role {actual} is insufficient, {required} or higher required")]
    InsufficientRole {
        /// Role the matched rule requires.
        required: UserRole,
        /// Role the approver actually holds.
        actual: UserRole,
    },
}

impl ApprovalError {
    /// Stable machine-readable code for API responses and audit records.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::SelfApproval => "SELF_APPROVAL",
            Self::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
        }
    }
}
