//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the default diagnostic sink.
///
/// Users can install their own subscriber; this helper installs an env-based
/// one only if none is set. When `RUST_LOG` is absent the filter falls back
/// to `error`, the level the default sink reports lock failures at.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
