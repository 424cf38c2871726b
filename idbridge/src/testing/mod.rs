//! Testing utilities for hosts and bridges.
//!
//! This module provides:
//! - `RecordingPorts`, a scripted host that records every emission
//! - Layout assertions for identifiers

mod assertions;
mod ports;

pub use assertions::{assert_distinct, assert_identifier_layout};
pub use ports::RecordingPorts;
