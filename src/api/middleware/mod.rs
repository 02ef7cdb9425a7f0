//! API middleware.
//!
//! Execution order (outermost → innermost):
//! 1. Access log: every request, including rejected ones
//! 2. Auth validator: per route group, patient or staff token

pub mod audit;
pub mod auth;
