//! HTTP client for the external reading source.
//!
//! The source serves `GET /api/sensors/data?apiKey=…[&date=YYYY-MM-DD]` and
//! answers with a JSON array of raw readings. Failures are folded into
//! [`FetchError`], whose `Display` text is meant to be shown to the user.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;
use crate::models::RawReading;
use crate::timeline::Rejected;

// ---

#[derive(Debug, Error)]
pub enum FetchError {
    // ---
    #[error("Request timeout - server is not responding")]
    Timeout,

    #[error("{}", status_message(.status, .message))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("No response from server - is it running?")]
    NoResponse,

    #[error("Malformed response from server: {0}")]
    MalformedBody(String),

    #[error("{0}")]
    Other(String),
}

fn status_message(status: &StatusCode, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("Server responded with {}", status.as_u16()),
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // ---
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::NoResponse
        } else if e.is_decode() {
            FetchError::MalformedBody(e.to_string())
        } else {
            FetchError::Other(e.to_string())
        }
    }
}

/// Items of one response, each tagged with its position in the array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceBatch {
    pub readings: Vec<(usize, RawReading)>,
    /// Items that are not a reading object at all.
    pub undecodable: Vec<Rejected>,
}

impl SourceBatch {
    // ---
    /// Split a decoded response body into readings and undecodable items.
    pub fn from_items(items: &[serde_json::Value]) -> Self {
        // ---
        let mut batch = SourceBatch::default();
        for (index, item) in items.iter().enumerate() {
            match RawReading::deserialize(item) {
                Ok(reading) => batch.readings.push((index, reading)),
                Err(e) => {
                    tracing::debug!("Failed to parse item {}: {} - Raw item: {}", index, e, item);
                    batch.undecodable.push(Rejected {
                        index,
                        error: format!("undecodable reading: {}", e),
                    });
                }
            }
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.readings.len() + self.undecodable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Client for the reading source. Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ReadingSource {
    client: reqwest::Client,
    base_url: String,
}

impl ReadingSource {
    // ---
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        // ---
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(|e| FetchError::Other(e.to_string()))?;

        Ok(ReadingSource {
            client,
            base_url: config.api_url.clone(),
        })
    }

    /// Fetch every reading for `api_key`, optionally limited to one day.
    ///
    /// Items that do not decode as a reading are reported in
    /// `SourceBatch::undecodable`; a body that is not a JSON array fails the
    /// whole fetch.
    pub async fn fetch(
        &self,
        api_key: &str,
        date: Option<NaiveDate>,
    ) -> Result<SourceBatch, FetchError> {
        // ---
        let url = format!("{}/api/sensors/data", self.base_url);
        let mut query = vec![("apiKey", api_key.to_string())];
        if let Some(date) = date {
            query.push(("date", date.format("%Y-%m-%d").to_string()));
        }

        tracing::debug!("Fetching readings from: {} (date filter: {:?})", url, date);

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from));
            return Err(FetchError::Status { status, message });
        }

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| FetchError::MalformedBody(e.to_string()))?;
        let Some(items) = value.as_array() else {
            return Err(FetchError::MalformedBody(
                "expected a JSON array of readings".to_string(),
            ));
        };

        let batch = SourceBatch::from_items(items);

        tracing::info!(
            "Fetched {} readings ({} items in response)",
            batch.readings.len(),
            items.len()
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_status_message_prefers_body() {
        // ---
        let err = FetchError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: Some("Invalid API key".to_string()),
        };
        assert_eq!(err.to_string(), "Invalid API key");

        let err = FetchError::Status {
            status: StatusCode::BAD_GATEWAY,
            message: None,
        };
        assert_eq!(err.to_string(), "Server responded with 502");
    }

    #[test]
    fn test_from_items_keeps_response_positions() {
        // ---
        let items = serde_json::json!([
            {"date":"2025-01-01","time":7},
            {"date":"2025-01-01"},
            "not a reading",
            {"date":"2025-01-01","time":"06:00","k":80}
        ]);
        let batch = SourceBatch::from_items(items.as_array().unwrap());

        let positions: Vec<usize> = batch.readings.iter().map(|(i, _)| *i).collect();
        assert_eq!(positions, [1, 3]);
        assert_eq!(batch.readings[0].1.time, "");

        let undecodable: Vec<usize> = batch.undecodable.iter().map(|r| r.index).collect();
        assert_eq!(undecodable, [0, 2]);
        assert!(batch.undecodable[0].error.starts_with("undecodable reading"));
        assert_eq!(batch.len(), 4);
    }

    #[test]
    fn test_user_facing_messages() {
        // ---
        assert_eq!(
            FetchError::Timeout.to_string(),
            "Request timeout - server is not responding"
        );
        assert_eq!(
            FetchError::NoResponse.to_string(),
            "No response from server - is it running?"
        );
    }
}
