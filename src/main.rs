//! Entry point for the `soilsense` service.
//!
//! Startup sequence:
//! - Loading `.env` so it can feed both logging and configuration
//! - Initializing structured logging
//! - Loading configuration from environment variables
//! - Building the reading source client and the empty session store
//! - Binding the Axum HTTP server and serving requests
//!
//! # Environment Variables
//! - `SENSOR_API_URL` (**required**) – reading source base URL
//! - `FETCH_TIMEOUT_SECS` (optional) – reading source timeout (default: 10)
//! - `BIND_PORT` (optional) – HTTP port (default: 8080)
//! - `MALFORMED_POLICY` (optional) – `skip` or `abort` (default: `skip`)
//! - `RUST_LOG` (optional) – full filter directive, wins over `AXUM_LOG_LEVEL`
//! - `AXUM_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `AXUM_SPAN_EVENTS` (optional) – `full`, `enter_exit`, or close only
//! - `FORCE_COLOR` (optional) – force ANSI output on or off
use std::{env, io::IsTerminal, net::SocketAddr};

use axum::Router;
use dotenvy::dotenv;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use anyhow::{Context, Result};

use soilsense::{config, routes, ReadingSource, SessionStore};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let source = ReadingSource::new(&cfg).context("Failed to build reading source client")?;
    let store = SessionStore::new();

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.bind_port));
    let app: Router = routes::router(source, store, cfg);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---

/// Install the global tracing subscriber. Call once, after `.env` is loaded.
fn init_tracing() {
    // ---
    let var = |name: &str| env::var(name).ok();

    let env_filter = match var("RUST_LOG") {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(filter_directive(var("AXUM_LOG_LEVEL").as_deref())),
    };
    let use_color =
        color_choice(var("FORCE_COLOR").as_deref()).unwrap_or_else(|| std::io::stdout().is_terminal());

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events(var("AXUM_SPAN_EVENTS").as_deref()))
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}

/// Filter used when `RUST_LOG` is unset. HTTP plumbing is kept at `warn`.
fn filter_directive(level: Option<&str>) -> String {
    // ---
    let level = match level.map(str::trim) {
        Some(l @ ("trace" | "debug" | "info" | "warn" | "error")) => l,
        _ => "debug",
    };
    format!("{level},hyper=warn,reqwest=warn")
}

/// `Some` when `FORCE_COLOR` decides; `None` defers to TTY detection.
fn color_choice(force: Option<&str>) -> Option<bool> {
    match force {
        Some("1" | "true" | "yes") => Some(true),
        Some("0" | "false" | "no") => Some(false),
        _ => None,
    }
}

fn span_events(mode: Option<&str>) -> FmtSpan {
    match mode {
        Some("full") => FmtSpan::FULL,
        Some("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_filter_directive() {
        // ---
        assert_eq!(filter_directive(Some("info")), "info,hyper=warn,reqwest=warn");
        assert_eq!(filter_directive(Some(" warn ")), "warn,hyper=warn,reqwest=warn");
        assert_eq!(filter_directive(Some("loud")), "debug,hyper=warn,reqwest=warn");
        assert_eq!(filter_directive(None), "debug,hyper=warn,reqwest=warn");
    }

    #[test]
    fn test_color_choice() {
        // ---
        assert_eq!(color_choice(Some("yes")), Some(true));
        assert_eq!(color_choice(Some("0")), Some(false));
        assert_eq!(color_choice(Some("maybe")), None);
        assert_eq!(color_choice(None), None);
    }

    #[test]
    fn test_span_events() {
        // ---
        assert_eq!(span_events(Some("full")), FmtSpan::FULL);
        assert_eq!(span_events(Some("enter_exit")), FmtSpan::ENTER | FmtSpan::EXIT);
        assert_eq!(span_events(None), FmtSpan::CLOSE);
    }
}
