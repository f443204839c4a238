//! Background engine state. Owned by the single engine task.

use serde::Serialize;

use super::events::Timestamp;
use crate::alert::AlertThrottle;
use crate::feed::Reading;

#[derive(Debug, Clone, Default)]
pub struct EngineState {
    /// Current logical time (max event timestamp seen)
    pub now: Timestamp,
    pub seq: u64,
    pub connected: bool,
    pub last_reading: Option<Reading>,
    pub throttle: AlertThrottle,
    pub stats: EngineStats,
}

/// Counters since startup, reported on each summary tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub readings: u64,
    pub rejected_frames: u64,
    pub alerts_fired: u64,
    pub alerts_suppressed: u64,
    pub opens: u64,
    pub closes: u64,
}

/// Snapshot emitted on each summary tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub now: Timestamp,
    /// Events reduced since startup
    pub events: u64,
    pub connected: bool,
    pub last_reading: Option<Reading>,
    pub stats: EngineStats,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            now: self.now,
            events: self.seq,
            connected: self.connected,
            last_reading: self.last_reading,
            stats: self.stats.clone(),
        }
    }
}
