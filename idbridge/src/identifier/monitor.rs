//! Sliding-window collision detection for emitted identifiers.

use super::Identifier;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Telemetry for one observed identifier.
#[derive(Debug, Clone)]
pub struct IdentifierEvent {
    /// The identifier observed.
    pub value: Identifier,
    /// Whether it was already in the window.
    pub collision: bool,
    /// Port the identifier was emitted on.
    pub port: String,
    /// When it was observed.
    pub observed_at: DateTime<Utc>,
}

/// Listener callback type for identifier events.
pub type IdentifierEventListener = Arc<dyn Fn(&IdentifierEvent) + Send + Sync>;

#[derive(Default)]
struct Window {
    entries: VecDeque<(DateTime<Utc>, Identifier)>,
    counts: HashMap<Identifier, usize>,
}

impl Window {
    fn push(&mut self, at: DateTime<Utc>, value: Identifier) {
        *self.counts.entry(value.clone()).or_insert(0) += 1;
        self.entries.push_back((at, value));
    }

    fn pop_front(&mut self) {
        if let Some((_, old)) = self.entries.pop_front() {
            if let Some(count) = self.counts.get_mut(&old) {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(&old);
                }
            }
        }
    }
}

/// Remembers recently emitted identifiers and flags repeats.
///
/// Entries expire after `ttl` and the window never holds more than
/// `max_entries` identifiers; the oldest go first.
pub struct CollisionMonitor {
    ttl: Duration,
    max_entries: usize,
    port: String,
    window: RwLock<Window>,
    listeners: RwLock<Vec<IdentifierEventListener>>,
}

impl CollisionMonitor {
    /// Creates a new collision monitor.
    ///
    /// # Arguments
    ///
    /// * `ttl_seconds` - How long to keep entries (minimum 1 second)
    /// * `max_entries` - Maximum entries to track (minimum 1)
    /// * `port` - Port name attached to emitted events
    #[must_use]
    pub fn new(ttl_seconds: u64, max_entries: usize, port: impl Into<String>) -> Self {
        let ttl_seconds = i64::try_from(ttl_seconds.max(1)).unwrap_or(i64::MAX);
        Self {
            ttl: Duration::try_seconds(ttl_seconds).unwrap_or(Duration::MAX),
            max_entries: max_entries.max(1),
            port: port.into(),
            window: RwLock::new(Window::default()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Creates a monitor with a five minute window of up to 50 000 entries.
    #[must_use]
    pub fn default_for_port(port: impl Into<String>) -> Self {
        Self::new(300, 50_000, port)
    }

    /// Returns the port name.
    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Register a listener that receives identifier events.
    ///
    /// Listeners run outside the monitor's locks and may register others;
    /// those take effect from the next observation.
    pub fn add_listener<F>(&self, listener: F)
    where
        F: Fn(&IdentifierEvent) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    /// Records an identifier and returns true if it is a collision within the window.
    pub fn observe(&self, value: &Identifier) -> bool {
        self.observe_at(value, Utc::now())
    }

    fn observe_at(&self, value: &Identifier, now: DateTime<Utc>) -> bool {
        let collision = {
            let mut window = self.window.write();
            if let Some(cutoff) = now.checked_sub_signed(self.ttl) {
                while window.entries.front().is_some_and(|(ts, _)| *ts < cutoff) {
                    window.pop_front();
                }
            }

            let collision = window.counts.contains_key(value);
            window.push(now, value.clone());
            while window.entries.len() > self.max_entries {
                window.pop_front();
            }
            collision
        };

        let event = IdentifierEvent {
            value: value.clone(),
            collision,
            port: self.port.clone(),
            observed_at: now,
        };

        let listeners = self.listeners.read().clone();
        for listener in &listeners {
            listener(&event);
        }

        collision
    }

    /// Returns the number of identifiers currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.window.read().entries.len()
    }

    /// Returns true if no identifiers are being tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.read().entries.is_empty()
    }

    /// Forgets every tracked identifier.
    pub fn clear(&self) {
        let mut window = self.window.write();
        window.entries.clear();
        window.counts.clear();
    }
}

impl std::fmt::Debug for CollisionMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionMonitor")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .field("port", &self.port)
            .field("tracked", &self.len())
            .finish_non_exhaustive()
    }
}
