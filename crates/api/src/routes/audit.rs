//! Audit trail query routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::error;
use uuid::Uuid;

use keel_shared::AppError;
use keel_shared::types::{CompanyId, PageRequest};

use crate::{AppState, extractors::RequestContext, routes::error_response};

/// Creates the audit routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/companies/{company_id}/audit-records",
        get(list_audit_records),
    )
}

/// GET `/companies/{company_id}/audit-records` - List audit records,
/// newest first.
async fn list_audit_records(
    State(state): State<AppState>,
    _ctx: RequestContext,
    Path(company_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    match state
        .audit
        .list(CompanyId::from_uuid(company_id), &page)
        .await
    {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => {
            error!(error = %err, %company_id, "failed to list audit records");
            error_response(&AppError::Database(err.to_string()))
        }
    }
}
