//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber for the host process.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every applied discount
/// - `RUST_LOG=discount_core=trace` - Also show skipped lookups
/// - Otherwise `default_filter` (from `[logging] filter`) is used
///
/// Returns false when a global subscriber was already installed, which
/// happens when the host or a test harness set one up first.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
