//! `POST /api/doctor-login`: staff console login.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{non_blank, ApiContext, JsonBody, TokenResponse};
use crate::crypto::{self, TokenSubject};
use crate::db;

const INVALID_STAFF_CREDENTIALS: &str = "Invalid username or password.";

#[derive(Debug, Deserialize)]
pub struct StaffLoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Verify staff credentials and issue a signed staff token.
pub async fn doctor_login(
    State(ctx): State<ApiContext>,
    JsonBody(req): JsonBody<StaffLoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let username = non_blank(req.username);
    let password = req.password.filter(|p| !p.is_empty());
    let (Some(username), Some(password)) = (username, password) else {
        return Err(ApiError::BadRequest(
            "Username and password are required.".into(),
        ));
    };

    let user = {
        let conn = ctx.core.db().acquire().await?;
        db::find_staff_by_username(&conn, &username)?
    };

    let Some(user) = user else {
        return Err(ApiError::InvalidCredentials(INVALID_STAFF_CREDENTIALS.into()));
    };

    if !crypto::verify_password_blocking(password, user.password_hash).await? {
        tracing::info!(username = %user.username, "Staff login rejected");
        return Err(ApiError::InvalidCredentials(INVALID_STAFF_CREDENTIALS.into()));
    }

    let token = ctx.core.tokens().issue(TokenSubject::Staff {
        id: user.id,
        username: user.username.clone(),
    })?;

    tracing::info!(username = %user.username, "Staff logged in");

    Ok(Json(TokenResponse {
        message: "Login successful!".into(),
        token,
    }))
}
