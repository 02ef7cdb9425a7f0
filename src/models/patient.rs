use serde::Serialize;

/// A registered patient. The password hash never leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patient {
    pub id: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Registration input after validation and hashing.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: String,
}

/// Row used to check a login attempt.
#[derive(Debug, Clone)]
pub struct PatientCredentials {
    pub id: i64,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: String,
}

/// Staff-facing patient listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientSummary {
    pub id: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}
