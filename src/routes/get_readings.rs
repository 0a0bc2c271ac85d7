use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{error_response, AppState};
use crate::{
    process_positioned, table_view, BatchPolicy, ReadingSource, Rejected, Session, SessionStore,
    TableView,
};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/readings", get(handler))
        .route("/readings/refresh", post(refresh))
}

/// Query parameters for a fetch.
#[derive(Debug, Deserialize)]
pub struct ReadingsQuery {
    api_key: Option<String>,
    /// Single day filter, `YYYY-MM-DD`. Empty means no filter.
    date: Option<String>,
}

/// Body returned after a successful fetch.
#[derive(Debug, Serialize)]
struct FetchResponse {
    fetched_at: DateTime<Utc>,
    rejected: Vec<Rejected>,
    #[serde(flatten)]
    table: TableView,
}

impl FetchResponse {
    fn from_session(session: &Session) -> Self {
        FetchResponse {
            fetched_at: session.fetched_at,
            rejected: session.rejected.clone(),
            table: table_view(&session.readings),
        }
    }
}

async fn handler(
    Query(params): Query<ReadingsQuery>,
    State((source, store, config)): State<AppState>,
) -> Response {
    // ---
    info!("GET /readings - Starting pipeline");

    let api_key = params.api_key.unwrap_or_default().trim().to_string();
    if api_key.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "API Key is required");
    }

    let date = match parse_date_filter(params.date.as_deref()) {
        Ok(date) => date,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    match run_pipeline(&source, &store, config.malformed_policy, api_key, date).await {
        Ok(session) => (StatusCode::OK, Json(FetchResponse::from_session(&session))).into_response(),
        Err(response) => response,
    }
}

async fn refresh(State((source, store, config)): State<AppState>) -> Response {
    // ---
    info!("POST /readings/refresh");

    let Some(current) = store.current().await else {
        return error_response(StatusCode::CONFLICT, "No readings fetched yet");
    };

    match run_pipeline(
        &source,
        &store,
        config.malformed_policy,
        current.api_key.clone(),
        current.date_filter,
    )
    .await
    {
        Ok(session) => (StatusCode::OK, Json(FetchResponse::from_session(&session))).into_response(),
        Err(response) => response,
    }
}

/// Fetch, normalize, order and install a new session.
///
/// On any failure the previous session stays in place and the error is
/// returned as a ready-made response. A fetch that finishes after a fetch
/// started later has already been installed is answered with 409.
async fn run_pipeline(
    source: &ReadingSource,
    store: &SessionStore,
    policy: BatchPolicy,
    api_key: String,
    date: Option<NaiveDate>,
) -> Result<Arc<Session>, Response> {
    // ---
    let ticket = store.next_ticket();

    debug!("Pipeline step 1 - fetch (ticket {})", ticket);
    let fetched = source.fetch(&api_key, date).await.map_err(|e| {
        error!("Failed to fetch sensor data: {}", e);
        error_response(StatusCode::BAD_GATEWAY, e.to_string())
    })?;

    if policy == BatchPolicy::Abort {
        if let Some(first) = fetched.undecodable.first() {
            error!("Rejected batch: item {} {}", first.index, first.error);
            return Err(error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                first.error.clone(),
            ));
        }
    }

    debug!("Pipeline step 2 - normalize and order {} readings", fetched.len());
    let positioned = fetched.readings.iter().map(|(index, raw)| (*index, raw));
    let mut batch = process_positioned(positioned, policy).map_err(|e| {
        error!("Rejected batch: {}", e);
        error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })?;

    batch.rejected.extend(fetched.undecodable);
    batch.rejected.sort_by_key(|r| r.index);
    for rejected in &batch.rejected {
        warn!("Dropped reading {}: {}", rejected.index, rejected.error);
    }

    debug!("Pipeline step 3 - install session");
    let Some(session) = store
        .install(ticket, Session::new(api_key, date, batch, Utc::now()))
        .await
    else {
        warn!("Discarding fetch {}, a newer fetch is already on display", ticket);
        return Err(error_response(
            StatusCode::CONFLICT,
            "Superseded by a newer fetch",
        ));
    };

    info!(
        "Pipeline complete, {} readings on display ({} dropped)",
        session.readings.len(),
        session.rejected.len()
    );
    Ok(session)
}

fn parse_date_filter(raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    // ---
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("Invalid date filter: {} (expected YYYY-MM-DD)", value)),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_parse_date_filter() {
        // ---
        assert_eq!(parse_date_filter(None).unwrap(), None);
        assert_eq!(parse_date_filter(Some("")).unwrap(), None);
        assert_eq!(
            parse_date_filter(Some("2025-01-31")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31)
        );
        assert!(parse_date_filter(Some("31/01/2025")).is_err());
    }
}
