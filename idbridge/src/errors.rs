//! Error types for the identifier bridge.
//!
//! The generator itself has a single failure mode (the secure random source is
//! unavailable). Everything else here belongs to the plumbing around it:
//! ports, configuration and the consumer task.

use std::collections::HashMap;
use thiserror::Error;

/// The main error type for bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The secure random source could not produce bytes.
    #[error("{0}")]
    Entropy(#[from] EntropyError),

    /// A port was closed by the other side.
    #[error("Port '{port}' is closed")]
    PortClosed {
        /// The port name.
        port: String,
    },

    /// A string did not have the identifier layout.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierParseError),

    /// The configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The bridge task panicked or was aborted.
    #[error("Bridge task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl BridgeError {
    /// Creates a port closed error.
    #[must_use]
    pub fn port_closed(port: impl Into<String>) -> Self {
        Self::PortClosed { port: port.into() }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns true if the error comes from the random source.
    #[must_use]
    pub const fn is_entropy(&self) -> bool {
        matches!(self, Self::Entropy(_))
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let kind = match self {
            Self::Entropy(_) => "EntropyUnavailable",
            Self::PortClosed { .. } => "PortClosed",
            Self::InvalidIdentifier(_) => "InvalidIdentifier",
            Self::Config(_) => "ConfigError",
            Self::Logging(_) => "LoggingError",
            Self::Serialization(_) => "SerializationError",
            Self::Io(_) => "IoError",
            Self::Join(_) => "TaskFailed",
        };

        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(kind));
        if let Self::PortClosed { port } = self {
            map.insert("port".to_string(), serde_json::json!(port));
        }
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Error raised when the random source cannot fill a buffer.
#[derive(Debug, Clone, Error)]
#[error("Secure random source unavailable: {message}")]
pub struct EntropyError {
    /// What the source reported.
    pub message: String,
}

impl EntropyError {
    /// Creates a new entropy error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<rand::Error> for EntropyError {
    fn from(err: rand::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Reasons a string is not a well-formed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierParseError {
    /// The string is not 36 characters long.
    #[error("expected 36 characters, found {length}")]
    InvalidLength {
        /// The actual length in bytes.
        length: usize,
    },

    /// A hyphen is missing from one of the separator positions.
    #[error("expected '-' at position {position}, found {found:?}")]
    MissingHyphen {
        /// Zero-based position.
        position: usize,
        /// The character found there.
        found: char,
    },

    /// A digit position holds something other than a lowercase hex digit.
    #[error("expected a lowercase hex digit at position {position}, found {found:?}")]
    InvalidDigit {
        /// Zero-based position.
        position: usize,
        /// The character found there.
        found: char,
    },
}
