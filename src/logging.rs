use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;
use crate::error::BlameError;

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &LogLevel) -> Result<(), BlameError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| BlameError::Logging(e.to_string()))
}
