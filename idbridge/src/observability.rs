//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::{BridgeConfig, LogFormat};
use crate::errors::BridgeError;

/// Builds the filter: `RUST_LOG` if set and valid, otherwise `default_directive`.
pub fn env_filter(default_directive: &str) -> Result<EnvFilter, BridgeError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| BridgeError::Logging(format!("invalid filter '{default_directive}': {e}"))),
    }
}

/// Installs a global fmt subscriber writing to stderr.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &BridgeConfig) -> Result<(), BridgeError> {
    let filter = env_filter(&config.log_filter)?;
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    let installed = match config.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| BridgeError::Logging(e.to_string()))
}
