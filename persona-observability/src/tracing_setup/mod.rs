//! Tracing setup: env-filtered, plain or JSON formatted output.

pub mod events;

use persona_core::config::ObservabilityConfig;
use persona_core::errors::{PersonaError, PersonaResult};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV_VAR: &str = "PERSONA_LOG";

/// Initialize the global subscriber with defaults: `PERSONA_LOG` filter,
/// falling back to `info`, plain text output.
///
/// # Panics
/// Panics if a global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Initialize from configuration. `PERSONA_LOG` still wins over
/// `log_level` when set.
pub fn init_tracing_from_config(config: &ObservabilityConfig) -> PersonaResult<()> {
    try_init_tracing(config, false)
}

/// Like [`init_tracing_from_config`], but when `test_writer` is set output
/// goes through the test harness capture. Fails if a global subscriber is
/// already installed.
pub fn try_init_tracing(config: &ObservabilityConfig, test_writer: bool) -> PersonaResult<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| PersonaError::ConfigError(format!("invalid log filter: {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let result = match (config.json, test_writer) {
        (true, true) => builder.json().with_test_writer().try_init(),
        (true, false) => builder.json().try_init(),
        (false, true) => builder.with_test_writer().try_init(),
        (false, false) => builder.try_init(),
    };
    result.map_err(|e| PersonaError::ConfigError(format!("tracing already initialized: {e}")))
}
