//! Burnout alerts with a single global cooldown.

use serde::{Deserialize, Serialize};

use crate::feed::Reading;

pub const ALERT_TITLE: &str = "🛑 SYSTEM OVERHEATING!";
pub const ALERT_MESSAGE: &str = "Stress level critical or focus at zero. Go touch grass!";

/// User-facing notification, in the shape the extension host expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "iconUrl")]
    pub icon: String,
    pub title: String,
    pub message: String,
    pub priority: u8,
}

impl Notification {
    pub fn burnout() -> Self {
        Self {
            kind: "basic".to_string(),
            icon: "icon.png".to_string(),
            title: ALERT_TITLE.to_string(),
            message: ALERT_MESSAGE.to_string(),
            priority: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub focus_low: f64,
    pub stress_high: f64,
    pub cooldown_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            focus_low: 20.0,
            stress_high: 85.0,
            cooldown_ms: 60_000,
        }
    }
}

impl AlertConfig {
    /// Burnout condition: focus below the floor OR stress above the ceiling.
    pub fn is_burnout(&self, reading: &Reading) -> bool {
        reading.focus < self.focus_low || reading.stress > self.stress_high
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Reading is fine; nothing to do.
    Clear,
    Fire,
    /// Burnout, but still inside the cooldown window.
    Suppressed { remaining_ms: u64 },
}

/// Owns the last-fired timestamp. `None` means no alert has fired yet.
#[derive(Debug, Clone, Default)]
pub struct AlertThrottle {
    last_alert_ms: Option<u64>,
}

impl AlertThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_alert_ms(&self) -> Option<u64> {
        self.last_alert_ms
    }

    pub fn reset(&mut self) {
        self.last_alert_ms = None;
    }

    pub fn is_ready(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_alert_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= cooldown_ms,
        }
    }

    /// Suppressed decisions leave the timer untouched.
    pub fn evaluate(&mut self, reading: &Reading, now_ms: u64, cfg: &AlertConfig) -> Decision {
        if !cfg.is_burnout(reading) {
            return Decision::Clear;
        }
        if self.is_ready(now_ms, cfg.cooldown_ms) {
            self.last_alert_ms = Some(now_ms);
            return Decision::Fire;
        }
        let elapsed = self.last_alert_ms.map(|l| now_ms.saturating_sub(l)).unwrap_or(0);
        Decision::Suppressed {
            remaining_ms: cfg.cooldown_ms.saturating_sub(elapsed),
        }
    }
}
