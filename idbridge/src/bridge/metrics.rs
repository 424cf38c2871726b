//! Counters describing a running bridge.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for one bridge.
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    /// Request signals taken off the inbound port.
    requests: AtomicU64,
    /// Identifiers published on the outbound port.
    emitted: AtomicU64,
    /// Requests that ended in an error.
    failures: AtomicU64,
    /// Emitted identifiers already seen by the collision monitor.
    collisions: AtomicU64,
    /// Time of the last successful emission.
    last_emit_at: RwLock<Option<DateTime<Utc>>>,
}

impl BridgeMetrics {
    /// Records an inbound request.
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a successful emission.
    pub fn record_emit(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
        *self.last_emit_at.write() = Some(Utc::now());
    }

    /// Records a failed request.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a collision.
    pub fn record_collision(&self) {
        self.collisions.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of requests received.
    #[must_use]
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Returns the number of identifiers emitted.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Returns the number of failed requests.
    #[must_use]
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Returns the number of collisions.
    #[must_use]
    pub fn collisions(&self) -> u64 {
        self.collisions.load(Ordering::Relaxed)
    }

    /// Returns the time of the last emission.
    #[must_use]
    pub fn last_emit_at(&self) -> Option<DateTime<Utc>> {
        *self.last_emit_at.read()
    }

    /// Converts metrics to a dictionary.
    #[must_use]
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "requests": self.requests(),
            "emitted": self.emitted(),
            "failures": self.failures(),
            "collisions": self.collisions(),
            "last_emit_at": self.last_emit_at().map(|t| t.to_rfc3339()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_default() {
        let metrics = BridgeMetrics::default();
        assert_eq!(metrics.requests(), 0);
        assert_eq!(metrics.emitted(), 0);
        assert!(metrics.last_emit_at().is_none());
    }

    #[test]
    fn test_metrics_recording() {
        let metrics = BridgeMetrics::default();

        metrics.record_request();
        metrics.record_request();
        metrics.record_emit();
        metrics.record_failure();

        assert_eq!(metrics.requests(), 2);
        assert_eq!(metrics.emitted(), 1);
        assert_eq!(metrics.failures(), 1);
        assert!(metrics.last_emit_at().is_some());
    }

    #[test]
    fn test_metrics_to_dict() {
        let metrics = BridgeMetrics::default();
        metrics.record_request();

        let dict = metrics.to_dict();
        assert_eq!(dict["requests"], 1);
        assert_eq!(dict["emitted"], 0);
        assert!(dict["last_emit_at"].is_null());
    }
}
