//! Subscriber setup for hosts that don't install their own.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static LOG_INIT_ONCE: Once = Once::new();

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "RAYMARCH_LOG";

/// Install a `fmt` subscriber filtered by `RAYMARCH_LOG` (default `info`).
///
/// Safe to call repeatedly; an already installed global subscriber wins.
pub fn init_logging() {
    LOG_INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
