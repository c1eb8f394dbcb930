//! Logging and tracing setup.
//!
//! Logs go to **stderr** so stdout stays free for the host runtime, which
//! owns it for its own handshake.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls log levels (e.g., `info`, `bamboo_provider=debug`)
//!
//! ```bash
//! # Trace every request the client sends
//! RUST_LOG=bamboo_provider::client=debug terraform plan
//! ```
//!
//! The API key never reaches the logs: the authorization header is marked
//! sensitive and [`ClientConfig`](crate::config::ClientConfig) redacts it in
//! its `Debug` output.

use tracing_subscriber::{fmt, prelude::*, registry::Registry, EnvFilter, Layer};

/// Filter from `RUST_LOG`, or `default_level` when unset or unparsable.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Compact stderr formatter shared by every initializer.
fn stderr_layer() -> impl Layer<Registry> + Send + Sync {
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

/// Initialize logging at `info` unless `RUST_LOG` says otherwise.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Initialize logging with a custom default level.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(stderr_layer().with_filter(env_filter(default_level)))
        .init();
}

/// Try to initialize logging, returning false if already initialized.
///
/// Safe to call from tests, where several cases may race to install the
/// subscriber.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(stderr_layer().with_filter(env_filter("info")))
        .try_init()
        .is_ok()
}
