//! Bearer token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, verifies it with the token
//! service, checks the role, and injects `PatientContext` or `StaffContext`
//! into request extensions for downstream handlers. No handler parses
//! tokens itself.

use axum::http::{header, HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{Actor, ApiContext, PatientContext, StaffContext};
use crate::models::Role;

/// Require a valid patient token.
pub async fn require_patient(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_role(req, next, Role::Patient).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

/// Require a valid staff token.
pub async fn require_staff(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_role(req, next, Role::Staff).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

/// Token after `Bearer `, or `None` when the header is absent or malformed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn require_role(
    mut req: Request<axum::body::Body>,
    next: Next,
    role: Role,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = bearer_token(req.headers()).ok_or(ApiError::MissingToken)?;
    let claims = ctx.core.tokens().verify(token)?;

    if claims.role != role {
        tracing::debug!(expected = %role, got = %claims.role, "Token role mismatch");
        return Err(ApiError::InvalidToken);
    }

    let actor = match role {
        Role::Patient => {
            req.extensions_mut().insert(PatientContext { patient_id: claims.id });
            Actor::Patient(claims.id)
        }
        Role::Staff => {
            let username = claims.username.unwrap_or_default();
            req.extensions_mut().insert(StaffContext { username: username.clone() });
            Actor::Staff(username)
        }
    };

    let mut response = next.run(req).await;

    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response.extensions_mut().insert(actor);

    Ok(response)
}
