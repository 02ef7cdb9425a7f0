//! HTTP/JSON API.
//!
//! Public routes (registration, logins), patient routes behind a bearer
//! token, and the staff console under `/api/admin/`. `clinic_router()`
//! returns a `Router` that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::clinic_router;
pub use server::{start_server_on, ClinicServer, ServerSession};
pub use types::ApiContext;
