//! `POST /api/book-appointment`: patient books a visit.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{non_blank, ApiContext, JsonBody, MessageResponse, PatientContext};
use crate::db;
use crate::models::NewAppointment;

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub message: Option<String>,
}

/// Book an appointment for the authenticated patient.
///
/// The date must be a calendar date but may lie in the past; only the
/// browser restricts it to today or later.
pub async fn book(
    State(ctx): State<ApiContext>,
    Extension(patient): Extension<PatientContext>,
    JsonBody(req): JsonBody<BookingRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let (Some(date), Some(time)) = (non_blank(req.date), non_blank(req.time)) else {
        return Err(ApiError::BadRequest("Date and Time are required.".into()));
    };
    // Stored zero-padded so date range queries can compare strings.
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("Date must be in YYYY-MM-DD format.".into()))?
        .format("%Y-%m-%d")
        .to_string();

    let conn = ctx.core.db().acquire().await?;

    // Copied onto the appointment as it is now; later profile edits do not follow.
    let snapshot = db::get_patient_snapshot(&conn, patient.patient_id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found.".into()))?;

    let appointment_id = db::insert_appointment(
        &conn,
        &NewAppointment {
            patient_id: patient.patient_id,
            snapshot,
            date,
            time,
            message: req.message,
        },
    )?;

    tracing::info!(appointment_id, patient_id = patient.patient_id, "Appointment booked");

    Ok((
        StatusCode::CREATED,
        MessageResponse::new("Appointment booked successfully!"),
    ))
}
