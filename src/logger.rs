//! `tracing` subscriber setup for the `macs_io` binary and benches.

use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
};

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber, reading the filter from `RUST_LOG`.
///
/// Span close events (with their durations) are printed when the filter
/// enables `debug`.
pub fn try_init() -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let is_debug = {
        let directives = env_filter.to_string();
        directives.contains("debug") || directives.contains("trace")
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(if is_debug {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
}

/// Like [`try_init`], keeping an already installed subscriber.
pub fn init() {
    if let Err(e) = try_init() {
        tracing::debug!("Keeping existing tracing subscriber: {}", e);
    }
}
