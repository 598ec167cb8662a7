//! Approval rule repository.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use keel_core::approval::{ApprovalRule, UserRole};
use keel_core::posting::{ApprovalRuleStore, DocumentKind, StoreError};
use keel_shared::types::{ApprovalRuleId, CompanyId};

use crate::entities::approval_rules;

use super::{corrupt, store_err};

fn to_domain(model: approval_rules::Model) -> Result<ApprovalRule, StoreError> {
    let required_role = UserRole::parse(&model.required_role)
        .ok_or_else(|| corrupt("required_role", &model.required_role))?;

    let kinds = model
        .document_kinds
        .as_array()
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str())
                .filter_map(DocumentKind::parse)
                .collect()
        })
        .unwrap_or_default();

    Ok(ApprovalRule {
        id: ApprovalRuleId::from_uuid(model.id),
        name: model.name,
        min_amount: model.min_amount,
        max_amount: model.max_amount,
        document_kinds: kinds,
        required_role,
        priority: model.priority,
    })
}

/// Approval rule reads.
#[derive(Debug, Clone)]
pub struct ApprovalRuleRepository {
    db: DatabaseConnection,
}

impl ApprovalRuleRepository {
    /// Creates a new approval rule repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApprovalRuleStore for ApprovalRuleRepository {
    async fn find_rules(&self, company_id: CompanyId) -> Result<Vec<ApprovalRule>, StoreError> {
        let models = approval_rules::Entity::find()
            .filter(approval_rules::Column::CompanyId.eq(company_id.into_inner()))
            .filter(approval_rules::Column::IsActive.eq(true))
            .order_by_asc(approval_rules::Column::Priority)
            .all(&self.db)
            .await
            .map_err(store_err)?;

        models.into_iter().map(to_domain).collect()
    }
}
