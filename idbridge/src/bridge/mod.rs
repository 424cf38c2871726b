//! The request/response bridge.
//!
//! A [`Bridge`] owns the ports to its host and an identifier generator. It
//! takes one request at a time off the inbound port, generates exactly one
//! identifier for it, and publishes that identifier on the outbound port
//! before looking at the next request. Requests are never coalesced, retried
//! or deduplicated.

mod metrics;
mod ports;


pub use metrics::BridgeMetrics;
pub use ports::{port_pair, ChannelPorts, HostHandle, HostPorts};

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::errors::BridgeError;
use crate::identifier::{
    CollisionMonitor, EntropySource, Identifier, IdentifierGenerator, IdentifierRequest,
    OsEntropy,
};

/// Answers identifier requests from a host.
pub struct Bridge<P, S = OsEntropy> {
    ports: P,
    generator: IdentifierGenerator<S>,
    metrics: Arc<BridgeMetrics>,
    monitor: Option<Arc<CollisionMonitor>>,
}

impl<P: HostPorts, S: EntropySource> Bridge<P, S> {
    /// Creates a bridge over the host's ports.
    #[must_use]
    pub fn new(ports: P, generator: IdentifierGenerator<S>) -> Self {
        Self {
            ports,
            generator,
            metrics: Arc::new(BridgeMetrics::default()),
            monitor: None,
        }
    }

    /// Checks every emitted identifier against `monitor`.
    #[must_use]
    pub fn with_collision_monitor(mut self, monitor: Arc<CollisionMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Returns the bridge's metrics.
    #[must_use]
    pub fn metrics(&self) -> Arc<BridgeMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Handles one request: generate an identifier and emit it.
    pub async fn on_request(
        &mut self,
        _request: IdentifierRequest,
    ) -> Result<Identifier, BridgeError> {
        self.metrics.record_request();

        let identifier = self.generator.generate()?;

        if let Some(monitor) = &self.monitor {
            if monitor.observe(&identifier) {
                self.metrics.record_collision();
                warn!(
                    port = %self.ports.response_port(),
                    identifier = %identifier,
                    "Identifier collision within monitor window"
                );
            }
        }

        self.ports.emit(identifier.clone()).await?;
        self.metrics.record_emit();

        debug!(
            port = %self.ports.response_port(),
            identifier = %identifier,
            "Identifier emitted"
        );
        Ok(identifier)
    }

    /// Serves requests until the host closes the request port.
    ///
    /// Returns the number of identifiers emitted. The first error ends the
    /// loop; nothing is retried.
    pub async fn run(mut self) -> Result<u64, BridgeError> {
        info!(
            request_port = %self.ports.request_port(),
            response_port = %self.ports.response_port(),
            "Bridge subscribed"
        );

        while let Some(request) = self.ports.next_request().await {
            if let Err(err) = self.on_request(request).await {
                self.metrics.record_failure();
                error!(
                    error = %err,
                    served = self.metrics.emitted(),
                    "Bridge stopped on error"
                );
                return Err(err);
            }
        }

        let served = self.metrics.emitted();
        info!(
            request_port = %self.ports.request_port(),
            served,
            "Request port closed, bridge stopping"
        );
        Ok(served)
    }
}

impl<P, S> Bridge<P, S>
where
    P: HostPorts + 'static,
    S: EntropySource + 'static,
{
    /// Runs the bridge as a tokio task.
    #[must_use]
    pub fn spawn(self) -> BridgeHandle {
        let metrics = self.metrics();
        let handle = tokio::spawn(self.run());
        BridgeHandle { handle, metrics }
    }
}

impl<P, S> std::fmt::Debug for Bridge<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("metrics", &self.metrics)
            .field("has_monitor", &self.monitor.is_some())
            .finish_non_exhaustive()
    }
}

/// Handle to a spawned bridge task.
#[derive(Debug)]
pub struct BridgeHandle {
    handle: JoinHandle<Result<u64, BridgeError>>,
    metrics: Arc<BridgeMetrics>,
}

impl BridgeHandle {
    /// Waits for the bridge to stop and returns how many identifiers it emitted.
    pub async fn join(self) -> Result<u64, BridgeError> {
        self.handle.await?
    }

    /// Stops the bridge without waiting for the host to close its port.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Returns true once the bridge task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Returns the bridge's metrics.
    #[must_use]
    pub fn metrics(&self) -> &BridgeMetrics {
        &self.metrics
    }
}
