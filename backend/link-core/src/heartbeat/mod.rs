//! Liveness inference from frame freshness.
//!
//! The transport can look open while the controller has stopped talking,
//! so liveness is judged from how long ago the last liveness frame arrived.
//! Two signals are raised, each latched until the other one fires:
//!
//! - **ConnectionDown** when the silence exceeds the down threshold
//! - **ConnectionRestored** when the last frame is fresher than the up threshold
//!
//! Both comparisons run against the same elapsed time on every evaluation.
//! They are independent, not one threshold with two names.

use crate::config::LivenessConfig;

use common::Timestamp;

use log::{info, warn};
use serde::Serialize;
use tokio::sync::broadcast;

const SIGNAL_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LivenessSignal {
    /// No liveness frame since `last_seen` (or since monitoring began).
    ConnectionDown { last_seen: Timestamp },
    /// A liveness frame arrived at `last_seen`.
    ConnectionRestored { last_seen: Timestamp },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatThresholds {
    pub down_ms: u64,
    pub up_ms: u64,
}

impl From<&LivenessConfig> for HeartbeatThresholds {
    fn from(config: &LivenessConfig) -> Self {
        Self {
            down_ms: config.down_threshold_ms,
            up_ms: config.up_threshold_ms,
        }
    }
}

impl Default for HeartbeatThresholds {
    fn default() -> Self {
        HeartbeatThresholds::from(&LivenessConfig::default())
    }
}

/// Evaluates liveness and broadcasts latched signals to any number of listeners.
///
/// Dropping a receiver unsubscribes it.
pub struct HeartbeatMonitor {
    thresholds: HeartbeatThresholds,
    started_at: Timestamp,
    down_latched: bool,
    up_latched: bool,
    signals: broadcast::Sender<LivenessSignal>,
}

impl HeartbeatMonitor {
    /// `started_at` stands in for the last-seen time until the first liveness frame.
    pub fn new(thresholds: HeartbeatThresholds, started_at: Timestamp) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        Self {
            thresholds,
            started_at,
            down_latched: false,
            up_latched: false,
            signals,
        }
    }

    pub fn thresholds(&self) -> HeartbeatThresholds {
        self.thresholds
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LivenessSignal> {
        self.signals.subscribe()
    }

    /// Sending half of the signal channel, for handing out subscriptions
    /// from outside the task that owns the monitor.
    pub(crate) fn signal_sender(&self) -> broadcast::Sender<LivenessSignal> {
        self.signals.clone()
    }

    /// Latched state: true between a ConnectionDown and the next ConnectionRestored.
    pub fn is_down(&self) -> bool {
        self.down_latched
    }

    /// Derived liveness: the last liveness frame is younger than the down threshold.
    pub fn is_live(&self, now: Timestamp, last_seen: Option<Timestamp>) -> bool {
        last_seen.is_some_and(|seen| now.abs_diff(seen) < self.thresholds.down_ms)
    }

    /// Run both threshold checks once.
    ///
    /// `fault_logged` suppresses ConnectionDown while a lost-link entry is
    /// already active in the event log. Returns the signals raised by this
    /// pass, which have also been broadcast.
    pub fn evaluate(
        &mut self,
        now: Timestamp,
        last_seen: Option<Timestamp>,
        fault_logged: bool,
    ) -> Vec<LivenessSignal> {
        let reference = last_seen.unwrap_or(self.started_at);
        let elapsed = now.abs_diff(reference);
        let mut raised = Vec::new();

        if elapsed > self.thresholds.down_ms && !self.down_latched && !fault_logged {
            warn!("No controller liveness frame for {elapsed} ms");
            self.down_latched = true;
            self.up_latched = false;
            raised.push(LivenessSignal::ConnectionDown {
                last_seen: reference,
            });
        }

        if let Some(seen) = last_seen
            && elapsed < self.thresholds.up_ms
            && !self.up_latched
        {
            info!("Controller liveness restored ({elapsed} ms since last frame)");
            self.up_latched = true;
            self.down_latched = false;
            raised.push(LivenessSignal::ConnectionRestored { last_seen: seen });
        }

        for signal in &raised {
            // No subscribers is fine.
            let _ = self.signals.send(*signal);
        }

        raised
    }
}
