//! Tracing subscriber setup for embedding apps and tools.

use tracing_subscriber::EnvFilter;

/// Install a formatted tracing subscriber. `RUST_LOG` wins over
/// `default_directive` (e.g. `"info"` or `"birthday_reminder_backend=debug"`).
///
/// Returns false if a global subscriber was already installed.
pub fn init_logging(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
