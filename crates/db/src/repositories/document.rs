//! Source document repository.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use keel_core::posting::{DocumentStore, PostingInput, SourceDocument, StoreError};
use keel_shared::types::{CompanyId, DocumentId, JournalEntryId, TenantId};

use crate::entities::documents;

use super::{corrupt, store_err};

pub(crate) fn to_domain(model: documents::Model) -> Result<SourceDocument, StoreError> {
    let input: PostingInput = serde_json::from_value(model.payload)
        .map_err(|err| corrupt("document payload", &err.to_string()))?;

    Ok(SourceDocument {
        id: DocumentId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        company_id: CompanyId::from_uuid(model.company_id),
        status: model.status.into(),
        journal_entry_id: model.journal_entry_id.map(JournalEntryId::from_uuid),
        input,
    })
}

/// Source document reads.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn find_document(
        &self,
        company_id: CompanyId,
        document_id: DocumentId,
    ) -> Result<Option<SourceDocument>, StoreError> {
        let model = documents::Entity::find_by_id(document_id.into_inner())
            .filter(documents::Column::CompanyId.eq(company_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_err)?;

        model.map(to_domain).transpose()
    }
}
