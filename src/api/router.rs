//! Clinic HTTP router.
//!
//! Route groups, all under `/api/`:
//! - public: registration and both logins
//! - patient: booking and own appointments, behind `require_patient`
//! - admin: staff console under `/api/admin/`, behind `require_staff` unless
//!   admin auth is configured `open`
//!
//! Outer layers (outermost first): access log → CORS. Non-API paths fall
//! through to the static front-end directory when one is configured.

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config::AdminAuth;
use crate::core_state::CoreState;

/// Build the full application router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer of
/// each protected group). Endpoint handlers use `State<ApiContext>`.
pub fn clinic_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    let public = Router::new()
        .route("/patients/register", post(endpoints::patients::register))
        .route("/patients/login", post(endpoints::patients::login))
        .route("/doctor-login", post(endpoints::staff::doctor_login))
        .with_state(ctx.clone());

    let patient = Router::new()
        .route("/book-appointment", post(endpoints::appointments::book))
        .route(
            "/patients/my-appointments",
            get(endpoints::patients::my_appointments),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_patient))
        .layer(axum::Extension(ctx.clone()));

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let mut admin = Router::new()
        .route("/appointments", get(endpoints::admin::list_appointments))
        .route(
            "/appointments/:id",
            patch(endpoints::admin::update_appointment),
        )
        .route("/patients", get(endpoints::admin::list_patients))
        .route("/analytics", get(endpoints::admin::analytics))
        .route(
            "/billing",
            post(endpoints::billing::create).get(endpoints::billing::list),
        )
        .route("/billing/:id", patch(endpoints::billing::update_status))
        .with_state(ctx.clone());

    if ctx.core.admin_auth() == AdminAuth::Required {
        admin = admin.layer(axum::middleware::from_fn(middleware::auth::require_staff));
    }
    let admin = admin.layer(axum::Extension(ctx.clone()));

    let mut app = Router::new()
        .nest("/api", public)
        .nest("/api", patient)
        .nest("/api/admin", admin);

    if let Some(dir) = &ctx.core.config.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
}
