//! In-memory host ports for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::bridge::HostPorts;
use crate::errors::BridgeError;
use crate::identifier::{Identifier, IdentifierRequest};

/// Host ports that replay a fixed number of requests and record emissions.
///
/// Clones share the same recording, so a test can keep one clone while the
/// bridge consumes the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingPorts {
    pending: Arc<Mutex<usize>>,
    emitted: Arc<Mutex<Vec<Identifier>>>,
    accept_limit: Option<usize>,
}

impl RecordingPorts {
    /// Creates ports that will deliver `requests` request signals.
    #[must_use]
    pub fn with_requests(requests: usize) -> Self {
        Self {
            pending: Arc::new(Mutex::new(requests)),
            ..Self::default()
        }
    }

    /// Closes the response port after `limit` identifiers were accepted.
    #[must_use]
    pub fn accept_at_most(mut self, limit: usize) -> Self {
        self.accept_limit = Some(limit);
        self
    }

    /// Queues more request signals.
    pub fn push_requests(&self, count: usize) {
        *self.pending.lock() += count;
    }

    /// Returns every identifier emitted so far, in order.
    #[must_use]
    pub fn emitted(&self) -> Vec<Identifier> {
        self.emitted.lock().clone()
    }

    /// Returns the number of requests not yet delivered.
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.pending.lock()
    }
}

#[async_trait]
impl HostPorts for RecordingPorts {
    async fn next_request(&mut self) -> Option<IdentifierRequest> {
        let mut pending = self.pending.lock();
        if *pending == 0 {
            return None;
        }
        *pending -= 1;
        Some(IdentifierRequest)
    }

    async fn emit(&mut self, identifier: Identifier) -> Result<(), BridgeError> {
        let mut emitted = self.emitted.lock();
        if self.accept_limit.is_some_and(|limit| emitted.len() >= limit) {
            return Err(BridgeError::port_closed(self.response_port()));
        }
        emitted.push(identifier);
        Ok(())
    }
}
