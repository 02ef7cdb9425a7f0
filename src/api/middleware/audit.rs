//! Access logging middleware.
//!
//! One `info` event per request with method, path, status and latency.
//! Runs outermost, so rejected requests are logged too; the actor is read
//! from response extensions where the auth middleware leaves it.

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::Actor;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;

    match response.extensions().get::<Actor>() {
        Some(actor) => tracing::info!(%method, path, status, latency_ms, %actor, "request"),
        None => tracing::info!(%method, path, status, latency_ms, "request"),
    }

    response
}
