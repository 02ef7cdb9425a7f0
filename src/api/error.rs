//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::crypto::CryptoError;
use crate::db::DatabaseError;

pub const NO_TOKEN_MESSAGE: &str = "Not authorized, no token";
pub const TOKEN_FAILED_MESSAGE: &str = "Not authorized, token failed";
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error response body. `message` is what browser clients display.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: &'static str,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("No bearer token")]
    MissingToken,
    #[error("Token rejected")]
    InvalidToken,
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken | ApiError::InvalidToken | ApiError::InvalidCredentials(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            ApiError::BadRequest(detail) => ("BAD_REQUEST", detail),
            ApiError::MissingToken => ("NO_TOKEN", NO_TOKEN_MESSAGE.to_string()),
            ApiError::InvalidToken => ("TOKEN_FAILED", TOKEN_FAILED_MESSAGE.to_string()),
            ApiError::InvalidCredentials(detail) => ("INVALID_CREDENTIALS", detail),
            ApiError::NotFound(detail) => ("NOT_FOUND", detail),
            ApiError::Conflict(detail) => ("CONFLICT", detail),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                ("INTERNAL", INTERNAL_MESSAGE.to_string())
            }
        };

        (status, Json(ErrorBody { message, code })).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation { table, column } => {
                ApiError::Conflict(format!("Duplicate value for {table}.{column}."))
            }
            DatabaseError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{entity_type} {id} not found."))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CryptoError> for ApiError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidToken(reason) => {
                tracing::debug!(reason, "Bearer token rejected");
                ApiError::InvalidToken
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Database(e) => e.into(),
            CoreError::Crypto(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn missing_token_returns_401_with_message() {
        let response = ApiError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Not authorized, no token");
        assert_eq!(json["code"], "NO_TOKEN");
    }

    #[tokio::test]
    async fn invalid_token_returns_401_with_message() {
        let response = ApiError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Not authorized, token failed");
    }

    #[tokio::test]
    async fn bad_request_keeps_message() {
        let response = ApiError::BadRequest("No fields to update.".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "No fields to update.");
        assert_eq!(json["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn conflict_returns_409() {
        let response = ApiError::Conflict("dup".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let response = ApiError::Internal("disk on fire at /var/db".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["message"], "An internal error occurred");
        assert!(!json.to_string().contains("/var/db"));
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err: ApiError = DatabaseError::UniqueViolation {
            table: "billing".into(),
            column: "appointment_id".into(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err: ApiError = DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: "9".into(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_database_errors_are_internal() {
        let err: ApiError = DatabaseError::PoolClosed.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn expired_token_is_invalid_token() {
        let err: ApiError = CryptoError::InvalidToken("expired").into();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[test]
    fn hash_failure_is_internal() {
        let err: ApiError = CryptoError::HashFailed("boom".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn verify_failure_is_internal_not_credentials() {
        let err: ApiError = CryptoError::VerifyFailed("task panicked".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
