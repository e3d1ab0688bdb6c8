//! Tracker notifications
//!
//! Process-wide, payload-free signals that third-party integrations listen
//! to in order to switch their own pixels on or off.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackerSignal {
    EnableTracker,
    DisableTracker,
}

impl TrackerSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerSignal::EnableTracker => "enableTracker",
            TrackerSignal::DisableTracker => "disableTracker",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignalBus {
    sender: broadcast::Sender<TrackerSignal>,
}

impl SignalBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackerSignal> {
        self.sender.subscribe()
    }

    pub fn emit(&self, signal: TrackerSignal) {
        // Having no listener is normal
        let listeners = self.sender.send(signal).unwrap_or(0);
        tracing::debug!(signal = signal.as_str(), listeners, "Tracker signal");
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}
