//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use serde_json::json;

use keel_core::posting::PostingResult;
use keel_core::posting::orchestrator::failure;
use keel_shared::AppError;

use crate::AppState;

pub mod audit;
pub mod health;
pub mod journals;
pub mod postings;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(postings::routes())
        .merge(journals::routes())
        .merge(audit::routes())
}

/// Maps a posting outcome onto an HTTP response. The body is always the
/// serialized outcome; only the status code varies.
pub(crate) fn posting_response(result: PostingResult) -> Response {
    let status = match &result {
        PostingResult::Posted { .. } => StatusCode::OK,
        PostingResult::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PostingResult::RequiresApproval { .. } => StatusCode::ACCEPTED,
        PostingResult::Failed { code } if code == failure::STORE_UNAVAILABLE => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        PostingResult::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(result)).into_response()
}

/// Maps an application error onto a JSON error response.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "error": err.error_code(), "message": err.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    use http_body_util::BodyExt;
    use rstest::rstest;
    use rust_decimal::Decimal;

    use keel_core::approval::UserRole;
    use keel_core::ledger::JournalTotals;
    use keel_shared::types::JournalEntryId;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn posted() -> PostingResult {
        PostingResult::Posted {
            journal_id: JournalEntryId::new(),
            journal_number: "JRN-2026-000001".to_string(),
            totals: JournalTotals {
                debit: Decimal::new(12000, 2),
                credit: Decimal::new(12000, 2),
            },
        }
    }

    #[rstest]
    #[case::posted(posted(), StatusCode::OK, "posted")]
    #[case::rejected(
        PostingResult::Rejected { code: "PERIOD_CLOSED".to_string(), errors: vec![] },
        StatusCode::UNPROCESSABLE_ENTITY,
        "rejected"
    )]
    #[case::requires_approval(
        PostingResult::RequiresApproval { approver_roles: vec![UserRole::Approver] },
        StatusCode::ACCEPTED,
        "requires_approval"
    )]
    #[case::store_unavailable(
        PostingResult::Failed { code: failure::STORE_UNAVAILABLE.to_string() },
        StatusCode::SERVICE_UNAVAILABLE,
        "failed"
    )]
    #[case::internal(
        PostingResult::Failed { code: failure::INTERNAL.to_string() },
        StatusCode::INTERNAL_SERVER_ERROR,
        "failed"
    )]
    #[tokio::test]
    async fn test_posting_response_status_mapping(
        #[case] result: PostingResult,
        #[case] expected: StatusCode,
        #[case] tag: &str,
    ) {
        let response = posting_response(result);
        assert_eq!(response.status(), expected);
        let body = body_json(response).await;
        assert_eq!(body["status"], tag);
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let response = error_response(&AppError::Database("pool exhausted".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "Database error: pool exhausted");
    }

    #[tokio::test]
    async fn test_error_response_not_found() {
        let response = error_response(&AppError::NotFound("journal".to_string()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "NOT_FOUND");
    }
}
