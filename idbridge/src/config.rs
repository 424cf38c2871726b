//! Configuration for mounting a bridge.

use crate::errors::BridgeError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Configuration for the bridge and its ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Name of the inbound port that carries identifier requests.
    #[serde(default = "default_request_port")]
    pub request_port: String,
    /// Name of the outbound port that carries generated identifiers.
    #[serde(default = "default_response_port")]
    pub response_port: String,
    /// Bound of the request queue.
    #[serde(default = "default_capacity")]
    pub request_capacity: usize,
    /// Bound of the response queue.
    #[serde(default = "default_capacity")]
    pub response_capacity: usize,
    /// Whether emitted identifiers are checked for repeats.
    #[serde(default)]
    pub collision_tracking: bool,
    /// How long an emitted identifier stays in the collision window.
    #[serde(default = "default_collision_ttl")]
    pub collision_ttl_seconds: u64,
    /// Maximum identifiers held in the collision window.
    #[serde(default = "default_collision_max_entries")]
    pub collision_max_entries: usize,
    /// Default `tracing` filter directive; `RUST_LOG` overrides it.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_request_port() -> String {
    "requestIdentifier".to_string()
}

fn default_response_port() -> String {
    "identifierGenerated".to_string()
}

const fn default_capacity() -> usize {
    64
}

const fn default_collision_ttl() -> u64 {
    300
}

const fn default_collision_max_entries() -> usize {
    50_000
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            request_port: default_request_port(),
            response_port: default_response_port(),
            request_capacity: default_capacity(),
            response_capacity: default_capacity(),
            collision_tracking: false,
            collision_ttl_seconds: default_collision_ttl(),
            collision_max_entries: default_collision_max_entries(),
            log_filter: default_log_filter(),
            log_format: LogFormat::default(),
        }
    }
}

impl BridgeConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, BridgeError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON config file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, BridgeError> {
        match path {
            Some(path) => Self::from_json_str(&std::fs::read_to_string(path)?),
            None => Ok(Self::default()),
        }
    }

    /// Sets both port names.
    #[must_use]
    pub fn with_ports(mut self, request: impl Into<String>, response: impl Into<String>) -> Self {
        self.request_port = request.into();
        self.response_port = response.into();
        self
    }

    /// Sets both queue bounds.
    #[must_use]
    pub fn with_capacity(mut self, request: usize, response: usize) -> Self {
        self.request_capacity = request;
        self.response_capacity = response;
        self
    }

    /// Enables collision tracking with the given window.
    #[must_use]
    pub fn with_collision_tracking(mut self, ttl_seconds: u64, max_entries: usize) -> Self {
        self.collision_tracking = true;
        self.collision_ttl_seconds = ttl_seconds;
        self.collision_max_entries = max_entries;
        self
    }

    /// Sets the log filter and format.
    #[must_use]
    pub fn with_logging(mut self, filter: impl Into<String>, format: LogFormat) -> Self {
        self.log_filter = filter.into();
        self.log_format = format;
        self
    }

    /// Rejects values the bridge cannot run with.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.request_port.trim().is_empty() || self.response_port.trim().is_empty() {
            return Err(BridgeError::config("port names must not be empty"));
        }
        if self.request_port == self.response_port {
            return Err(BridgeError::config(format!(
                "request and response ports must differ, both are '{}'",
                self.request_port
            )));
        }
        if self.request_capacity == 0 || self.response_capacity == 0 {
            return Err(BridgeError::config("queue capacities must be at least 1"));
        }
        if self.collision_tracking
            && (self.collision_ttl_seconds == 0 || self.collision_max_entries == 0)
        {
            return Err(BridgeError::config(
                "collision window needs a positive ttl and entry cap",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::new();
        assert_eq!(config.request_port, "requestIdentifier");
        assert_eq!(config.response_port, "identifierGenerated");
        assert_eq!(config.request_capacity, 64);
        assert!(!config.collision_tracking);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = BridgeConfig::from_json_str(
            r#"{"request_capacity": 8, "collision_tracking": true, "log_format": "json"}"#,
        )
        .unwrap();

        assert_eq!(config.request_capacity, 8);
        assert_eq!(config.response_capacity, 64);
        assert!(config.collision_tracking);
        assert_eq!(config.collision_ttl_seconds, 300);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = BridgeConfig::new().with_capacity(0, 4).validate().unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn test_same_port_names_rejected() {
        let err = BridgeConfig::new()
            .with_ports("uuid", "uuid")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_load_without_path_gives_defaults() {
        assert_eq!(BridgeConfig::load(None).unwrap(), BridgeConfig::default());
    }

    #[test]
    fn test_load_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "idbridge-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"response_port": "uuidReady"}"#).unwrap();

        let loaded = BridgeConfig::load(Some(&path));
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.unwrap().response_port, "uuidReady");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("idbridge-config-does-not-exist.json");
        let err = BridgeConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = BridgeConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, BridgeError::Serialization(_)));
    }
}
