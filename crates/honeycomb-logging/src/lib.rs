//! Honeycomb Logging
//!
//! One place to install the `tracing` subscriber: an `EnvFilter` read from
//! `RUST_LOG` (falling back to [`DEFAULT_DIRECTIVES`]) feeding a fmt layer.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVES: &str = "honeycomb=info";

/// The filter that [`init`] and [`try_init`] install.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_DIRECTIVES.into())
}

/// Install the global subscriber.
///
/// # Panics
///
/// If a global subscriber is already set. Use [`try_init`] from tests.
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the global subscriber unless one is already set.
pub fn try_init() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init()
}
