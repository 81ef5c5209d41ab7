//! Telemetry (tracing) bootstrap.
//!
//! This core ships no binary of its own, so subscriber initialization is
//! packaged as a helper for embedding applications and integration tests.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from the supplied
/// default (typically `EngineConfig::telemetry.filter`). Calling this twice
/// is a no-op: the second registration fails quietly instead of panicking.
pub fn init(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
