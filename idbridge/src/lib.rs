//! # idbridge
//!
//! Hands out random identifiers to a host application over a pair of named
//! ports.
//!
//! The crate has two moving parts:
//!
//! - **Identifier generator**: renders a 36-character, version-4 style
//!   identifier from 31 bytes of cryptographically secure randomness
//! - **Bridge**: waits for request signals on an inbound port and answers
//!   each with exactly one identifier on an outbound port, in order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use idbridge::prelude::*;
//!
//! let mut app = mount(&BridgeConfig::default())?;
//! let id = app.host.round_trip().await?;
//! println!("{id}");
//! app.unmount().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod bootstrap;
pub mod bridge;
pub mod config;
pub mod errors;
pub mod identifier;
pub mod observability;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bootstrap::{mount, mount_with_generator, serve_lines, MountedApplication};
    pub use crate::bridge::{
        port_pair, Bridge, BridgeHandle, BridgeMetrics, ChannelPorts, HostHandle, HostPorts,
    };
    pub use crate::config::{BridgeConfig, LogFormat};
    pub use crate::errors::{BridgeError, EntropyError, IdentifierParseError};
    pub use crate::identifier::{
        generate_identifier, CollisionMonitor, EntropySource, Identifier, IdentifierGenerator,
        IdentifierRequest, OsEntropy, SequenceEntropy,
    };
    pub use crate::observability::init_tracing;
}
