use serde::Serialize;

/// Patient identity copied onto an appointment at booking time.
///
/// Later changes to the patient record do not flow back into existing
/// appointments.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientSnapshot {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub snapshot: PatientSnapshot,
    pub date: String,
    pub time: String,
    pub message: Option<String>,
}

/// Full appointment row as the staff console sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub message: String,
    pub status: String,
    pub doctor_notes: Option<String>,
    pub medical_description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Projection returned to the owning patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientAppointment {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub status: String,
    pub doctor_notes: Option<String>,
    pub medical_description: Option<String>,
}

/// Partial staff update. `None` leaves a column untouched; for the note
/// columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentUpdate {
    pub status: Option<String>,
    pub doctor_notes: Option<Option<String>>,
    pub medical_description: Option<Option<String>>,
}

impl AppointmentUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.doctor_notes.is_none() && self.medical_description.is_none()
    }
}
