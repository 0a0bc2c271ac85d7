//! Read-only views over the current session: table, charts, CSV download.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::{error, info};

use super::{error_response, AppState};
use crate::{chart_view, export_filename, table_view, to_csv};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/readings/table", get(table))
        .route("/readings/charts", get(charts))
        .route("/readings/export.csv", get(export))
}

const NO_SESSION: &str = "No readings fetched yet";

async fn table(State((_, store, _)): State<AppState>) -> Response {
    // ---
    match store.current().await {
        Some(session) => Json(table_view(&session.readings)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, NO_SESSION),
    }
}

async fn charts(State((_, store, _)): State<AppState>) -> Response {
    // ---
    match store.current().await {
        Some(session) => Json(chart_view(&session.readings)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, NO_SESSION),
    }
}

async fn export(State((_, store, _)): State<AppState>) -> Response {
    // ---
    let Some(session) = store.current().await else {
        return error_response(StatusCode::NOT_FOUND, NO_SESSION);
    };
    if session.readings.is_empty() {
        return error_response(StatusCode::NOT_FOUND, "No readings to export");
    }

    let body = match to_csv(&session.readings) {
        Ok(body) => body,
        Err(e) => {
            error!("CSV export failed: {:#}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "CSV export failed");
        }
    };

    let filename = export_filename(Utc::now().date_naive());
    info!("Exporting {} readings as {}", session.readings.len(), filename);

    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}
