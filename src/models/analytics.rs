use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCount {
    #[serde(rename = "appointmentDate")]
    pub appointment_date: String,
    pub count: i64,
}

/// Dashboard counters, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub pending_count: i64,
    pub today_count: i64,
    pub total_patients: i64,
    pub chart_data: Vec<DailyCount>,
}
