//! Audit record repository: append-only sink plus paginated reads.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use keel_core::approval::{SodDecision, UserRole};
use keel_core::audit::{AuditAction, AuditError, AuditRecord, AuditSink};
use keel_core::posting::StoreError;
use keel_shared::types::{
    AuditRecordId, CompanyId, PageRequest, PageResponse, TenantId, UserId,
};

use crate::entities::audit_records;

use super::{corrupt, store_err};

fn to_domain(model: audit_records::Model) -> Result<AuditRecord, StoreError> {
    let actor_role =
        UserRole::parse(&model.actor_role).ok_or_else(|| corrupt("actor_role", &model.actor_role))?;
    let action =
        AuditAction::parse(&model.action).ok_or_else(|| corrupt("action", &model.action))?;
    let sod: Option<SodDecision> = match model.sod {
        Some(value) => Some(
            serde_json::from_value(value)
                .map_err(|err| corrupt("sod decision", &err.to_string()))?,
        ),
        None => None,
    };

    Ok(AuditRecord {
        id: AuditRecordId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        company_id: CompanyId::from_uuid(model.company_id),
        actor: UserId::from_uuid(model.actor),
        actor_role,
        action,
        entity_type: model.entity_type,
        entity_id: model.entity_id,
        sod,
        metadata: model.metadata,
        recorded_at: model.recorded_at.into(),
    })
}

/// Append-only audit storage.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a company's audit records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored record no longer
    /// parses.
    pub async fn list(
        &self,
        company_id: CompanyId,
        page: &PageRequest,
    ) -> Result<PageResponse<AuditRecord>, StoreError> {
        let query = audit_records::Entity::find()
            .filter(audit_records::Column::CompanyId.eq(company_id.into_inner()));

        let total = query.clone().count(&self.db).await.map_err(store_err)?;

        let models = query
            .order_by_desc(audit_records::Column::RecordedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(store_err)?;

        let records: Result<Vec<_>, _> = models.into_iter().map(to_domain).collect();
        Ok(PageResponse::new(records?, page.page, page.per_page, total))
    }
}

#[async_trait]
impl AuditSink for AuditRepository {
    async fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        let sod = match record.sod {
            Some(decision) => Some(
                serde_json::to_value(decision)
                    .map_err(|err| AuditError(err.to_string()))?,
            ),
            None => None,
        };

        let model = audit_records::ActiveModel {
            id: Set(record.id.into_inner()),
            tenant_id: Set(record.tenant_id.into_inner()),
            company_id: Set(record.company_id.into_inner()),
            actor: Set(record.actor.into_inner()),
            actor_role: Set(record.actor_role.as_str().to_string()),
            action: Set(record.action.as_str().to_string()),
            entity_type: Set(record.entity_type),
            entity_id: Set(record.entity_id),
            sod: Set(sod),
            metadata: Set(record.metadata),
            recorded_at: Set(record.recorded_at.into()),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|err| AuditError(err.to_string()))?;
        Ok(())
    }
}
