//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for posting, reversal, and audit queries
//! - Identity extraction from gateway-injected headers
//! - Response types

pub mod extractors;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use keel_core::posting::PostingOrchestrator;
use keel_db::AuditRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// The posting orchestrator wired over the repositories.
    pub orchestrator: Arc<PostingOrchestrator>,
    /// Audit trail read access.
    pub audit: Arc<AuditRepository>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
