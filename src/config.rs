//! Configuration loader for the `soilsense` service.
//!
//! Runtime settings and their defaults are read from environment variables
//! (with optional `.env` support provided by the caller) into one immutable
//! [`Config`], so `env::var` calls stay out of the rest of the codebase.
//!
use std::env;

use anyhow::{anyhow, Result};

use crate::timeline::BatchPolicy;

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u64 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Reading source base URL.
    pub api_url: String,

    /// Reading source request timeout in seconds.
    pub fetch_timeout_secs: u64,

    /// Port the HTTP server binds to.
    pub bind_port: u16,

    /// What to do with readings whose date/time cannot be parsed.
    pub malformed_policy: BatchPolicy,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `SENSOR_API_URL` – reading source base URL
///
/// Optional:
/// - `FETCH_TIMEOUT_SECS` – reading source timeout (default: 10)
/// - `BIND_PORT` – HTTP port (default: 8080)
/// - `MALFORMED_POLICY` – `skip` or `abort` (default: `skip`)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let api_url = require_env!("SENSOR_API_URL");
    let fetch_timeout_secs = parse_env_u64!("FETCH_TIMEOUT_SECS", 10);
    let bind_port = parse_env_u64!("BIND_PORT", 8080);
    let bind_port =
        u16::try_from(bind_port).map_err(|_| anyhow!("Invalid BIND_PORT: {}", bind_port))?;
    let malformed_policy = match env::var("MALFORMED_POLICY").ok().as_deref() {
        Some(value) => parse_policy(value)?,
        None => BatchPolicy::default(),
    };

    Ok(Config {
        api_url: api_url.trim_end_matches('/').to_string(),
        fetch_timeout_secs,
        bind_port,
        malformed_policy,
    })
}

fn parse_policy(value: &str) -> Result<BatchPolicy> {
    // ---
    match value.to_ascii_lowercase().as_str() {
        "skip" => Ok(BatchPolicy::SkipMalformed),
        "abort" => Ok(BatchPolicy::Abort),
        other => Err(anyhow!(
            "Invalid MALFORMED_POLICY: {} (expected skip or abort)",
            other
        )),
    }
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  SENSOR_API_URL     : {}", self.api_url);
        tracing::info!("  FETCH_TIMEOUT_SECS : {}", self.fetch_timeout_secs);
        tracing::info!("  BIND_PORT          : {}", self.bind_port);
        tracing::info!("  MALFORMED_POLICY   : {:?}", self.malformed_policy);
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_parse_policy() {
        // ---
        assert_eq!(parse_policy("skip").unwrap(), BatchPolicy::SkipMalformed);
        assert_eq!(parse_policy("ABORT").unwrap(), BatchPolicy::Abort);
        assert!(parse_policy("retry").is_err());
    }
}
