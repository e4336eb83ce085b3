//! Tracing/logging initialization.
//!
//! JSON lines on stderr with timestamps; level filtering via `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber with `default_filter` as the fallback.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stdout is reserved for command output.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
