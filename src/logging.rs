//! Logging setup.
//!
//! Diagnostics go through `tracing`; user-facing output stays on plain
//! stdout. Logging is off unless `--verbose` is passed, and the `LUMIO_LOG`
//! environment variable takes precedence over both for ad-hoc filtering.

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "LUMIO_LOG";

/// Initialize the global subscriber. Call once, early, from the binary.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "info" } else { "off" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
