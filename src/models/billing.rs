use serde::Serialize;

#[derive(Debug, Clone)]
pub struct NewBilling {
    pub appointment_id: i64,
    pub amount: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Billing {
    pub id: i64,
    pub appointment_id: i64,
    pub amount: f64,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: String,
}

/// Billing row joined with the appointment it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingWithAppointment {
    #[serde(flatten)]
    pub billing: Billing,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub date: String,
}
