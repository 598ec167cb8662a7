//! Document posting routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use keel_core::posting::{DocumentKind, PostingRequest};
use keel_shared::types::{CompanyId, DocumentId};

use crate::{AppState, extractors::RequestContext, routes::posting_response};

/// Creates the posting routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/companies/{company_id}/documents/{document_id}/post",
        post(post_document),
    )
}

/// Request body for posting a document.
#[derive(Debug, Deserialize)]
pub struct PostDocumentRequest {
    /// Document kind: "invoice", "bill", "payment_in", or "payment_out".
    pub kind: String,
    /// Optional caller-supplied idempotency key. When absent a stable
    /// key is derived from the document identity.
    pub idempotency_key: Option<String>,
}

/// POST `/companies/{company_id}/documents/{document_id}/post` - Post a
/// source document to the general ledger.
async fn post_document(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((company_id, document_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<PostDocumentRequest>,
) -> impl IntoResponse {
    let Some(kind) = DocumentKind::parse(&body.kind) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_kind",
                "message": format!("unknown document kind: {}", body.kind)
            })),
        )
            .into_response();
    };

    let request = PostingRequest {
        tenant_id: ctx.tenant_id,
        company_id: CompanyId::from_uuid(company_id),
        document_id: DocumentId::from_uuid(document_id),
        kind,
        idempotency_key: body.idempotency_key,
        actor: ctx.actor,
    };

    posting_response(state.orchestrator.post_document(&request).await)
}
