use axum::{http::StatusCode, response::IntoResponse, response::Response, Json, Router};
use serde_json::json;

use crate::{Config, ReadingSource, SessionStore};

mod get_readings;
mod health;
mod views;

/// Shared state handed to every route.
pub type AppState = (ReadingSource, SessionStore, Config);

// ---

pub fn router(source: ReadingSource, store: SessionStore, config: Config) -> Router {
    // ---
    Router::new()
        .merge(get_readings::router())
        .merge(views::router())
        .merge(health::router())
        .with_state((source, store, config))
}

/// JSON error body `{ "error": message }` with the given status.
fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}
