//! Patient account endpoints.
//!
//! - `POST /api/patients/register`: create an account (no token issued)
//! - `POST /api/patients/login`: exchange email/phone + password for a token
//! - `GET /api/patients/my-appointments`: the caller's own appointments

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{
    non_blank, ApiContext, JsonBody, MessageResponse, PatientContext, TokenResponse,
};
use crate::crypto::{self, TokenSubject};
use crate::db;
use crate::models::{NewPatient, PatientAppointment};

const INVALID_CREDENTIALS: &str = "Invalid credentials.";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/patients/register`
pub async fn register(
    State(ctx): State<ApiContext>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let full_name = non_blank(req.full_name);
    let password = req.password.filter(|p| !p.is_empty());
    let (Some(full_name), Some(password)) = (full_name, password) else {
        return Err(ApiError::BadRequest(
            "Full name and password are required.".into(),
        ));
    };

    let email = non_blank(req.email);
    let phone = non_blank(req.phone);
    if email.is_none() && phone.is_none() {
        return Err(ApiError::BadRequest(
            "Please provide either an email or a phone number.".into(),
        ));
    }

    let password_hash = crypto::hash_password_blocking(password).await?;

    let conn = ctx.core.db().acquire().await?;
    let new_patient = NewPatient {
        full_name,
        email,
        phone,
        password_hash,
    };

    match db::insert_patient(&conn, &new_patient) {
        Ok(patient_id) => {
            tracing::info!(patient_id, "Patient registered");
            Ok((
                StatusCode::CREATED,
                MessageResponse::new("Registration Successful! You can now log in."),
            ))
        }
        Err(e) => match e.unique_column() {
            Some("email") => Err(ApiError::Conflict(
                "This email address is already registered.".into(),
            )),
            Some("phone") => Err(ApiError::Conflict(
                "This phone number is already registered.".into(),
            )),
            _ => Err(e.into()),
        },
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "loginIdentifier")]
    pub login_identifier: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/patients/login`
///
/// Unknown identifier and wrong password return the same 401.
pub async fn login(
    State(ctx): State<ApiContext>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let identifier = non_blank(req.login_identifier);
    let password = req.password.filter(|p| !p.is_empty());
    let (Some(identifier), Some(password)) = (identifier, password) else {
        return Err(ApiError::BadRequest(
            "Login identifier and password are required.".into(),
        ));
    };

    let credentials = {
        let conn = ctx.core.db().acquire().await?;
        db::find_patient_credentials(&conn, &identifier)?
    };

    let Some(credentials) = credentials else {
        return Err(ApiError::InvalidCredentials(INVALID_CREDENTIALS.into()));
    };

    if !crypto::verify_password_blocking(password, credentials.password_hash).await? {
        tracing::info!(patient_id = credentials.id, "Patient login rejected");
        return Err(ApiError::InvalidCredentials(INVALID_CREDENTIALS.into()));
    }

    let token = ctx.core.tokens().issue(TokenSubject::Patient {
        id: credentials.id,
        email: credentials.email,
        phone: credentials.phone,
    })?;

    tracing::info!(patient_id = credentials.id, "Patient logged in");

    Ok(Json(TokenResponse {
        message: "Login successful!".into(),
        token,
    }))
}

/// `GET /api/patients/my-appointments`: only rows owned by the token's patient.
pub async fn my_appointments(
    State(ctx): State<ApiContext>,
    Extension(patient): Extension<PatientContext>,
) -> Result<Json<Vec<PatientAppointment>>, ApiError> {
    let conn = ctx.core.db().acquire().await?;
    let appointments = db::list_patient_appointments(&conn, patient.patient_id)?;
    Ok(Json(appointments))
}
