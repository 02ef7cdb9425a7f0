//! Shared types for the HTTP API layer.

use std::fmt;
use std::sync::Arc;

use axum::extract::{FromRequest, Request};
use axum::{Extension, Json};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::error::ApiError;
use crate::core_state::CoreState;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

// ═══════════════════════════════════════════════════════════
// Identity contexts: injected by auth middleware
// ═══════════════════════════════════════════════════════════

/// Authenticated patient, taken from a verified token.
#[derive(Debug, Clone)]
pub struct PatientContext {
    pub patient_id: i64,
}

/// Authenticated staff member, taken from a verified token.
#[derive(Debug, Clone)]
pub struct StaffContext {
    pub username: String,
}

/// Username for audit logging. Absent when admin routes run unauthenticated.
pub fn staff_name(staff: &Option<Extension<StaffContext>>) -> &str {
    staff.as_ref().map_or("-", |Extension(s)| s.username.as_str())
}

/// Who made a request. Placed in response extensions for the access log.
#[derive(Debug, Clone)]
pub enum Actor {
    Patient(i64),
    Staff(String),
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Patient(id) => write!(f, "patient:{id}"),
            Actor::Staff(username) => write!(f, "staff:{username}"),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Request and response bodies
// ═══════════════════════════════════════════════════════════

/// JSON body extractor whose rejection is an `ApiError` (400 with a JSON body)
/// instead of axum's plain-text rejection.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::BadRequest(format!(
                "Invalid request body: {}",
                rejection.body_text()
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub message: String,
    pub token: String,
}

/// Treat absent, `null` and blank strings alike.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// A JSON number that browser forms may also send as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberField {
    Number(serde_json::Number),
    Text(String),
}

impl NumberField {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumberField::Number(n) => n.as_i64(),
            NumberField::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumberField::Number(n) => n.as_f64(),
            NumberField::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}

/// Distinguish an absent key (`None`) from an explicit `null` (`Some(None)`).
/// Use with `#[serde(default, deserialize_with = "present_or_null")]`.
pub fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_name_falls_back_without_context() {
        assert_eq!(staff_name(&None), "-");
        let staff = Some(Extension(StaffContext { username: "drwho".into() }));
        assert_eq!(staff_name(&staff), "drwho");
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "present_or_null")]
        notes: Option<Option<String>>,
    }

    #[test]
    fn absent_key_is_none() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(p.notes, None);
    }

    #[test]
    fn null_is_some_none() {
        let p: Patch = serde_json::from_str(r#"{"notes":null}"#).unwrap();
        assert_eq!(p.notes, Some(None));
    }

    #[test]
    fn value_is_some_some() {
        let p: Patch = serde_json::from_str(r#"{"notes":"ok"}"#).unwrap();
        assert_eq!(p.notes, Some(Some("ok".into())));
    }

    #[test]
    fn number_field_accepts_numeric_strings() {
        let n: NumberField = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(n.as_i64(), Some(42));
        let n: NumberField = serde_json::from_str("12.5").unwrap();
        assert_eq!(n.as_f64(), Some(12.5));
        assert_eq!(n.as_i64(), None);
        let n: NumberField = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(n.as_f64(), None);
    }

    #[test]
    fn non_blank_filters_whitespace() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("a".into())), Some("a".into()));
    }

    #[test]
    fn actor_display() {
        assert_eq!(Actor::Patient(3).to_string(), "patient:3");
        assert_eq!(Actor::Staff("doc".into()).to_string(), "staff:doc");
    }
}
