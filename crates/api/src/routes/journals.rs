//! Journal reversal routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use keel_shared::types::{CompanyId, JournalEntryId};

use crate::{AppState, extractors::RequestContext, routes::posting_response};

/// Creates the journal routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/companies/{company_id}/journals/{journal_id}/reverse",
        post(reverse_journal),
    )
}

/// Request body for reversing a posted journal.
#[derive(Debug, Deserialize)]
pub struct ReverseJournalRequest {
    /// Date the reversing entry posts on.
    pub reversal_date: NaiveDate,
    /// Optional reason appended to the reversal description.
    pub reason: Option<String>,
}

/// POST `/companies/{company_id}/journals/{journal_id}/reverse` - Post a
/// reversing entry against a posted journal.
async fn reverse_journal(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((company_id, journal_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<ReverseJournalRequest>,
) -> impl IntoResponse {
    let result = state
        .orchestrator
        .reverse_journal(
            CompanyId::from_uuid(company_id),
            JournalEntryId::from_uuid(journal_id),
            body.reversal_date,
            body.reason.as_deref(),
            ctx.actor,
        )
        .await;

    posting_response(result)
}
