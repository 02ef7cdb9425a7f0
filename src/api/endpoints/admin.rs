//! Staff console endpoints.
//!
//! - `GET /api/admin/appointments`: every appointment, newest booking first
//! - `PATCH /api/admin/appointments/:id`: status and doctor annotations
//! - `GET /api/admin/patients`: patient directory
//! - `GET /api/admin/analytics`: dashboard counters and 7-day chart

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{
    present_or_null, staff_name, ApiContext, JsonBody, MessageResponse, StaffContext,
};
use crate::db::{self, DatabaseError};
use crate::models::{Analytics, Appointment, AppointmentUpdate, PatientSummary};

pub async fn list_appointments(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let conn = ctx.core.db().acquire().await?;
    Ok(Json(db::list_all_appointments(&conn)?))
}

/// Body of `PATCH /api/admin/appointments/:id`.
///
/// `status` counts only when non-empty. The note fields count whenever the
/// key is present; `null` and `""` clear them.
#[derive(Debug, Deserialize)]
pub struct AppointmentPatch {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub doctor_notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub medical_description: Option<Option<String>>,
}

impl From<AppointmentPatch> for AppointmentUpdate {
    fn from(patch: AppointmentPatch) -> Self {
        AppointmentUpdate {
            status: patch.status.filter(|s| !s.is_empty()),
            doctor_notes: patch.doctor_notes,
            medical_description: patch.medical_description,
        }
    }
}

pub async fn update_appointment(
    State(ctx): State<ApiContext>,
    staff: Option<Extension<StaffContext>>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<AppointmentPatch>,
) -> Result<Json<MessageResponse>, ApiError> {
    let update = AppointmentUpdate::from(patch);
    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields to update.".into()));
    }

    let not_found = || ApiError::NotFound("Appointment not found.".into());
    let appointment_id: i64 = id.parse().map_err(|_| not_found())?;

    let conn = ctx.core.db().acquire().await?;
    match db::update_appointment(&conn, appointment_id, &update) {
        Ok(()) => {
            tracing::info!(
                appointment_id,
                status = ?update.status,
                staff = staff_name(&staff),
                "Appointment updated"
            );
            Ok(MessageResponse::new(format!(
                "Appointment {appointment_id} updated successfully."
            )))
        }
        Err(DatabaseError::NotFound { .. }) => Err(not_found()),
        Err(e) => Err(e.into()),
    }
}

pub async fn list_patients(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<PatientSummary>>, ApiError> {
    let conn = ctx.core.db().acquire().await?;
    Ok(Json(db::list_patient_summaries(&conn)?))
}

/// Counters are recomputed on every call; "today" is the server's local date.
pub async fn analytics(State(ctx): State<ApiContext>) -> Result<Json<Analytics>, ApiError> {
    let today = chrono::Local::now().date_naive();
    let conn = ctx.core.db().acquire().await?;
    Ok(Json(db::compute_analytics(&conn, today)?))
}
