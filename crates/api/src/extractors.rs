//! Request extractors for gateway-injected identity headers.
//!
//! Authentication happens upstream; the gateway forwards the verified
//! identity in `x-tenant-id`, `x-user-id`, and `x-user-role` headers.

use std::str::FromStr;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use serde_json::json;
use uuid::Uuid;

use keel_core::approval::UserRole;
use keel_core::posting::Actor;
use keel_shared::types::{TenantId, UserId};

/// The verified identity behind a request.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    /// Tenant the request acts within.
    pub tenant_id: TenantId,
    /// The acting user and role.
    pub actor: Actor,
}

fn unauthorized(error: &str, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": error, "message": message })),
    )
}

fn header_uuid(parts: &Parts, name: &str) -> Option<Uuid> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::from_str(v).ok())
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = header_uuid(parts, "x-tenant-id").ok_or_else(|| {
            unauthorized("missing_identity", "x-tenant-id header is required")
        })?;
        let user_id = header_uuid(parts, "x-user-id").ok_or_else(|| {
            unauthorized("missing_identity", "x-user-id header is required")
        })?;
        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|v| v.to_str().ok())
            .and_then(UserRole::parse)
            .ok_or_else(|| {
                unauthorized("invalid_role", "x-user-role header must name a known role")
            })?;

        Ok(Self {
            tenant_id: TenantId::from_uuid(tenant_id),
            actor: Actor {
                user_id: UserId::from_uuid(user_id),
                role,
            },
        })
    }
}
