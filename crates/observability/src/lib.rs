//! Process-wide logging setup shared by the stockcast binaries.

/// Initialize tracing for the process.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER);
}

/// Tracing subscriber configuration (filters, output format).
pub mod tracing;
