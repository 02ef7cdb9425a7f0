//! API endpoint handlers, one module per audience.

pub mod admin;
pub mod appointments;
pub mod billing;
pub mod patients;
pub mod staff;
