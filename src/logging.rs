//! Simple tracing subscriber setup used by the application.

use std::env;

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber. `RUST_LOG` drives filtering (default `info`)
/// and `LOG_FORMAT=json` switches to one JSON object per line.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true);

    let json = env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        builder.json().init();
    } else {
        builder.with_ansi(true).init();
    }

    tracing::info!(json, "logger initialized");
}
