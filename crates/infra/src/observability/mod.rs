//! Tracing subscriber setup
//!
//! Installs a global `tracing` subscriber: an [`EnvFilter`] built from
//! `RUST_LOG` when set, otherwise from [`LoggingConfig::level`], with either
//! human-readable or JSON output.

use agencydesk_domain::{AgencyError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed, e.g. by a
/// test harness or an embedding application.
///
/// # Errors
/// Returns `AgencyError::Config` if the level directive cannot be parsed.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(true)).try_init().is_ok()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "Tracing initialised");
    }
    Ok(installed)
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| AgencyError::Config(format!("Invalid log level '{}': {e}", config.level)))
}
