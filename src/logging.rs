//! Logging initialization.
//!
//! Thin wrapper over `tracing-subscriber`. Embedders that already own a
//! subscriber should skip this and the engine's spans will flow into
//! theirs.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global subscriber.
///
/// Reads the filter from `RUST_LOG` (default: `info`), e.g.
/// `RUST_LOG=shop_schedule=debug` to trace individual placements.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Initializes a test-friendly subscriber at debug level.
///
/// Safe to call from multiple tests; later calls are no-ops.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
