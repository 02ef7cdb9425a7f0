/// Doctor / admin console account. Seeded, never created through the API.
#[derive(Debug, Clone)]
pub struct StaffUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}
