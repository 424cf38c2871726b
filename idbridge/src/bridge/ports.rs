//! Ports between the host application and the bridge.
//!
//! The host sees a [`HostHandle`]; the bridge sees something implementing
//! [`HostPorts`]. [`port_pair`] wires the two together with bounded queues.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::config::BridgeConfig;
use crate::errors::BridgeError;
use crate::identifier::{Identifier, IdentifierRequest};

/// The two named channels the bridge needs from its host.
#[async_trait]
pub trait HostPorts: Send {
    /// Waits for the next request signal.
    ///
    /// Returns `None` once the host has gone away; the bridge then stops.
    async fn next_request(&mut self) -> Option<IdentifierRequest>;

    /// Publishes a generated identifier back to the host.
    async fn emit(&mut self, identifier: Identifier) -> Result<(), BridgeError>;

    /// Name of the inbound port, for logs.
    fn request_port(&self) -> &str {
        "requestIdentifier"
    }

    /// Name of the outbound port, for logs.
    fn response_port(&self) -> &str {
        "identifierGenerated"
    }
}

/// Bridge side of a channel-backed port pair.
#[derive(Debug)]
pub struct ChannelPorts {
    requests: mpsc::Receiver<IdentifierRequest>,
    responses: mpsc::Sender<Identifier>,
    request_port: String,
    response_port: String,
}

#[async_trait]
impl HostPorts for ChannelPorts {
    async fn next_request(&mut self) -> Option<IdentifierRequest> {
        self.requests.recv().await
    }

    async fn emit(&mut self, identifier: Identifier) -> Result<(), BridgeError> {
        self.responses
            .send(identifier)
            .await
            .map_err(|_| BridgeError::port_closed(&self.response_port))
    }

    fn request_port(&self) -> &str {
        &self.request_port
    }

    fn response_port(&self) -> &str {
        &self.response_port
    }
}

/// Host application side of a channel-backed port pair.
///
/// Dropping the handle closes both ports, so the bridge fails on its next
/// emission. Use [`HostHandle::close`] to stop while answers are pending.
#[derive(Debug)]
pub struct HostHandle {
    requests: mpsc::Sender<IdentifierRequest>,
    responses: mpsc::Receiver<Identifier>,
    request_port: String,
    response_port: String,
}

impl HostHandle {
    /// Sends one request signal, waiting for queue space.
    pub async fn request_identifier(&self) -> Result<(), BridgeError> {
        self.requests
            .send(IdentifierRequest)
            .await
            .map_err(|_| BridgeError::port_closed(&self.request_port))
    }

    /// Sends one request signal without waiting.
    ///
    /// Fails with `PortClosed` if the bridge is gone and returns `Ok(false)`
    /// if the queue is full.
    pub fn try_request_identifier(&self) -> Result<bool, BridgeError> {
        match self.requests.try_send(IdentifierRequest) {
            Ok(()) => Ok(true),
            Err(mpsc::error::TrySendError::Full(_)) => Ok(false),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(BridgeError::port_closed(&self.request_port))
            }
        }
    }

    /// Receives the next generated identifier.
    ///
    /// Returns `None` once the bridge has stopped and every emitted
    /// identifier has been received.
    pub async fn recv_identifier(&mut self) -> Option<Identifier> {
        self.responses.recv().await
    }

    /// Requests one identifier and waits for it.
    pub async fn round_trip(&mut self) -> Result<Identifier, BridgeError> {
        self.request_identifier().await?;
        self.recv_identifier()
            .await
            .ok_or_else(|| BridgeError::port_closed(&self.response_port))
    }

    /// Closes the request port and receives whatever the bridge still emits.
    ///
    /// Requests already queued are answered; the answers are returned in
    /// order once the bridge has dropped its end of the response port.
    pub async fn close(self) -> Vec<Identifier> {
        let Self {
            requests,
            mut responses,
            ..
        } = self;
        drop(requests);

        let mut drained = Vec::new();
        while let Some(identifier) = responses.recv().await {
            drained.push(identifier);
        }
        drained
    }

    /// Returns true once the bridge has dropped its end of the request port.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }
}

/// Creates a connected host handle and bridge ports from `config`.
pub fn port_pair(config: &BridgeConfig) -> Result<(HostHandle, ChannelPorts), BridgeError> {
    config.validate()?;

    let (request_tx, request_rx) = mpsc::channel(config.request_capacity);
    let (response_tx, response_rx) = mpsc::channel(config.response_capacity);

    let host = HostHandle {
        requests: request_tx,
        responses: response_rx,
        request_port: config.request_port.clone(),
        response_port: config.response_port.clone(),
    };
    let ports = ChannelPorts {
        requests: request_rx,
        responses: response_tx,
        request_port: config.request_port.clone(),
        response_port: config.response_port.clone(),
    };

    Ok((host, ports))
}
