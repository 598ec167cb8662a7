//! Segregation-of-duties evaluation for document postings.
//!
//! Rules are matched against the document kind and base-currency total.
//! Any matching rule means the posting needs a second pair of eyes; the
//! lowest-priority matching rule decides the required role.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use keel_shared::types::{ApprovalRuleId, UserId};

use crate::posting::DocumentKind;

use super::error::ApprovalError;

/// User roles, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Read-only access.
    Viewer = 0,
    /// Can create and submit documents.
    Clerk = 1,
    /// Can approve documents within rule limits.
    Approver = 2,
    /// Can approve any document and manage periods.
    Controller = 3,
    /// Full administrative access.
    Admin = 4,
}

impl UserRole {
    /// All roles that may act as approvers.
    pub const APPROVER_CAPABLE: [Self; 3] = [Self::Approver, Self::Controller, Self::Admin];

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Clerk => "clerk",
            Self::Approver => "approver",
            Self::Controller => "controller",
            Self::Admin => "admin",
        }
    }

    /// Parses a role from its string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "viewer" => Some(Self::Viewer),
            "clerk" => Some(Self::Clerk),
            "approver" => Some(Self::Approver),
            "controller" => Some(Self::Controller),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns true if this role can act as an approver at all.
    #[must_use]
    pub fn can_act_as_approver(self) -> bool {
        self >= Self::Approver
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A company-scoped approval rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRule {
    /// Unique identifier.
    pub id: ApprovalRuleId,
    /// Human-readable rule name.
    pub name: String,
    /// Inclusive lower bound on the base-currency total, if any.
    pub min_amount: Option<Decimal>,
    /// Inclusive upper bound on the base-currency total, if any.
    pub max_amount: Option<Decimal>,
    /// Document kinds this rule applies to. Empty means all kinds.
    pub document_kinds: Vec<DocumentKind>,
    /// Minimum role an approver must hold.
    pub required_role: UserRole,
    /// Lower priority wins when multiple rules match.
    pub priority: i16,
}

impl ApprovalRule {
    /// Returns true if this rule matches the given document.
    #[must_use]
    pub fn matches(&self, kind: DocumentKind, total: Decimal) -> bool {
        if !self.document_kinds.is_empty() && !self.document_kinds.contains(&kind) {
            return false;
        }
        if let Some(min) = self.min_amount {
            if total < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if total > max {
                return false;
            }
        }
        true
    }
}

/// Outcome of evaluating the approval rules for one posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SodDecision {
    /// Whether a second approver is required before posting.
    pub requires_approval: bool,
    /// The minimum role the approver must hold, if approval is required.
    pub required_role: Option<UserRole>,
    /// Roles that would satisfy the requirement.
    pub approver_roles: Vec<UserRole>,
}

impl SodDecision {
    /// Decision when no rule matched.
    #[must_use]
    pub fn none_required() -> Self {
        Self {
            requires_approval: false,
            required_role: None,
            approver_roles: Vec::new(),
        }
    }
}

/// Stateless rule evaluator.
pub struct ApprovalEngine;

impl ApprovalEngine {
    /// Evaluates the rules against a document kind and base-currency total.
    ///
    /// Any matching rule makes approval required. When several match, the
    /// one with the lowest priority value supplies the required role.
    #[must_use]
    pub fn evaluate(rules: &[ApprovalRule], kind: DocumentKind, total: Decimal) -> SodDecision {
        let winner = rules
            .iter()
            .filter(|r| r.matches(kind, total))
            .min_by_key(|r| r.priority);

        match winner {
            Some(rule) => SodDecision {
                requires_approval: true,
                required_role: Some(rule.required_role),
                approver_roles: UserRole::APPROVER_CAPABLE
                    .into_iter()
                    .filter(|r| *r >= rule.required_role)
                    .collect(),
            },
            None => SodDecision::none_required(),
        }
    }

    /// Checks whether a user may approve a document created by another user.
    ///
    /// # Errors
    ///
    /// Returns `SelfApproval` if approver and creator are the same user, or
    /// `InsufficientRole` if the approver's role is below the required one.
    pub fn can_approve(
        decision: &SodDecision,
        creator: UserId,
        approver: UserId,
        approver_role: UserRole,
    ) -> Result<(), ApprovalError> {
        if approver == creator {
            return Err(ApprovalError::SelfApproval);
        }
        let required = decision.required_role.unwrap_or(UserRole::Approver);
        if approver_role < required || !approver_role.can_act_as_approver() {
            return Err(ApprovalError::InsufficientRole {
                required,
                actual: approver_role,
            });
        }
        Ok(())
    }
}
