// src/routes/health.rs
//! Liveness endpoint for the soilsense service.
//!
//! `GET /health` answers without touching the reading source or the session
//! store, so it stays green while the upstream source is down. The gateway
//! (`mod.rs`) merges this subrouter into the top-level router.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Subrouter with the `/health` route, generic over the gateway's state.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
