//! Mounting a bridge for a host application.
//!
//! Mounting builds the port pair from configuration and establishes the
//! bridge subscription right away. Unmounting closes the request port and
//! lets the bridge answer whatever was already queued before it finishes.

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::bridge::{port_pair, Bridge, BridgeHandle, HostHandle};
use crate::config::BridgeConfig;
use crate::errors::BridgeError;
use crate::identifier::{CollisionMonitor, EntropySource, IdentifierGenerator, OsEntropy};

/// A host handle together with the bridge serving it.
#[derive(Debug)]
pub struct MountedApplication {
    /// The host application's end of the ports.
    pub host: HostHandle,
    /// The running bridge.
    pub bridge: BridgeHandle,
}

impl MountedApplication {
    /// Closes the request port and waits for the bridge to drain.
    ///
    /// Queued requests are still answered; those answers are received and
    /// discarded. Returns the number of identifiers the bridge emitted.
    pub async fn unmount(self) -> Result<u64, BridgeError> {
        let discarded = self.host.close().await;
        if !discarded.is_empty() {
            debug!(discarded = discarded.len(), "Discarded unread identifiers on unmount");
        }
        self.bridge.join().await
    }
}

/// Answers each line of `input` with one identifier written to `output`.
///
/// Line content is ignored; every line, empty or not, is one request.
/// Returns the number of lines answered once `input` is exhausted.
pub async fn serve_lines<R, W>(
    host: &mut HostHandle,
    input: R,
    mut output: W,
) -> Result<u64, BridgeError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut answered = 0;

    while lines.next_line().await?.is_some() {
        let id = host.round_trip().await?;
        output.write_all(format!("{id}\n").as_bytes()).await?;
        output.flush().await?;
        answered += 1;
    }

    Ok(answered)
}

/// Mounts a bridge backed by the operating system's secure random source.
///
/// Must be called from within a tokio runtime.
pub fn mount(config: &BridgeConfig) -> Result<MountedApplication, BridgeError> {
    mount_with_generator(config, IdentifierGenerator::<OsEntropy>::new())
}

/// Mounts a bridge that draws identifiers from `generator`.
pub fn mount_with_generator<S>(
    config: &BridgeConfig,
    generator: IdentifierGenerator<S>,
) -> Result<MountedApplication, BridgeError>
where
    S: EntropySource + 'static,
{
    let (host, ports) = port_pair(config)?;

    let mut bridge = Bridge::new(ports, generator);
    if config.collision_tracking {
        let monitor = CollisionMonitor::new(
            config.collision_ttl_seconds,
            config.collision_max_entries,
            config.response_port.clone(),
        );
        bridge = bridge.with_collision_monitor(Arc::new(monitor));
    }

    info!(
        request_port = %config.request_port,
        response_port = %config.response_port,
        collision_tracking = config.collision_tracking,
        "Mounting identifier bridge"
    );

    Ok(MountedApplication {
        host,
        bridge: bridge.spawn(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::SequenceEntropy;
    use crate::testing::assert_identifier_layout;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_mount_round_trip() {
        let mut app = mount(&BridgeConfig::default()).unwrap();

        let id = app.host.round_trip().await.unwrap();
        assert_identifier_layout(id.as_str());

        assert_eq!(app.unmount().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mount_with_injected_generator() {
        let generator = IdentifierGenerator::with_source(SequenceEntropy::counting());
        let mut app = mount_with_generator(&BridgeConfig::default(), generator).unwrap();

        let id = app.host.round_trip().await.unwrap();
        assert_eq!(id, "11234567-99ab-4cde-b012-2456789abcde");
        app.unmount().await.unwrap();
    }

    #[tokio::test]
    async fn test_collision_tracking_flags_repeats() {
        let config = BridgeConfig::default().with_collision_tracking(60, 16);
        let generator =
            IdentifierGenerator::with_source(SequenceEntropy::new(vec![7; 31]));
        let mut app = mount_with_generator(&config, generator).unwrap();

        app.host.round_trip().await.unwrap();
        app.host.round_trip().await.unwrap();

        assert_eq!(app.bridge.metrics().collisions(), 1);
        app.unmount().await.unwrap();
    }

    #[tokio::test]
    async fn test_unmount_answers_unread_requests() {
        let app = mount(&BridgeConfig::default()).unwrap();
        for _ in 0..3 {
            app.host.request_identifier().await.unwrap();
        }

        assert_eq!(app.unmount().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unmount_with_more_queued_than_response_capacity() {
        let config = BridgeConfig::default().with_capacity(16, 2);
        let app = mount(&config).unwrap();
        for _ in 0..10 {
            app.host.request_identifier().await.unwrap();
        }

        assert_eq!(app.unmount().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_serve_lines_answers_every_line() {
        let mut app = mount(&BridgeConfig::default()).unwrap();
        let input: &[u8] = b"first\nsecond\n\nlast\n";
        let mut output = Vec::new();

        let answered = serve_lines(&mut app.host, input, &mut output).await.unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(answered, 4);
        assert_eq!(lines.len(), 4);
        for line in &lines {
            assert_identifier_layout(line);
        }
        assert_eq!(app.unmount().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_serve_lines_with_empty_input() {
        let mut app = mount(&BridgeConfig::default()).unwrap();
        let mut output = Vec::new();

        let answered = serve_lines(&mut app.host, &b""[..], &mut output).await.unwrap();

        assert_eq!(answered, 0);
        assert!(output.is_empty());
        assert_eq!(app.unmount().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mount_rejects_invalid_config() {
        let config = BridgeConfig::default().with_capacity(0, 1);
        assert!(mount(&config).is_err());
    }
}
