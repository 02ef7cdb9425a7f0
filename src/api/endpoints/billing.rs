//! Billing endpoints (staff console).
//!
//! - `POST /api/admin/billing`: one bill per appointment
//! - `GET /api/admin/billing`: bills joined with patient name and date
//! - `PATCH /api/admin/billing/:id`: change a bill's status

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{
    non_blank, staff_name, ApiContext, JsonBody, MessageResponse, NumberField, StaffContext,
};
use crate::db::{self, DatabaseError};
use crate::models::{BillingWithAppointment, NewBilling};

#[derive(Debug, Deserialize)]
pub struct CreateBillingRequest {
    pub appointment_id: Option<NumberField>,
    pub amount: Option<NumberField>,
    pub notes: Option<String>,
}

pub async fn create(
    State(ctx): State<ApiContext>,
    JsonBody(req): JsonBody<CreateBillingRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let appointment_id = req.appointment_id.as_ref().and_then(NumberField::as_i64);
    let amount = req.amount.as_ref().and_then(NumberField::as_f64);

    let (Some(appointment_id), Some(amount)) = (appointment_id, amount) else {
        return Err(ApiError::BadRequest(
            "Appointment ID and amount are required.".into(),
        ));
    };
    if appointment_id == 0 || amount == 0.0 {
        return Err(ApiError::BadRequest(
            "Appointment ID and amount are required.".into(),
        ));
    }
    if amount < 0.0 {
        return Err(ApiError::BadRequest("Amount must be positive.".into()));
    }

    let conn = ctx.core.db().acquire().await?;
    let bill = NewBilling {
        appointment_id,
        amount,
        notes: non_blank(req.notes),
    };

    match db::insert_billing(&conn, &bill) {
        Ok(billing_id) => {
            tracing::info!(billing_id, appointment_id, "Billing record created");
            Ok((
                StatusCode::CREATED,
                MessageResponse::new("Billing record created successfully."),
            ))
        }
        Err(DatabaseError::UniqueViolation { .. }) => Err(ApiError::Conflict(
            "A bill for this appointment already exists.".into(),
        )),
        Err(DatabaseError::ForeignKeyViolation(_)) => {
            Err(ApiError::NotFound("Appointment not found.".into()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<BillingWithAppointment>>, ApiError> {
    let conn = ctx.core.db().acquire().await?;
    Ok(Json(db::list_billing(&conn)?))
}

#[derive(Debug, Deserialize)]
pub struct BillingStatusRequest {
    pub status: Option<String>,
}

pub async fn update_status(
    State(ctx): State<ApiContext>,
    staff: Option<Extension<StaffContext>>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<BillingStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(status) = req.status.filter(|s| !s.is_empty()) else {
        return Err(ApiError::BadRequest("Status is required.".into()));
    };

    let not_found = || ApiError::NotFound("Billing record not found.".into());
    let billing_id: i64 = id.parse().map_err(|_| not_found())?;

    let conn = ctx.core.db().acquire().await?;
    match db::update_billing_status(&conn, billing_id, &status) {
        Ok(()) => {
            tracing::info!(
                billing_id,
                status = %status,
                staff = staff_name(&staff),
                "Billing status updated"
            );
            Ok(MessageResponse::new("Billing status updated."))
        }
        Err(DatabaseError::NotFound { .. }) => Err(not_found()),
        Err(e) => Err(e.into()),
    }
}
