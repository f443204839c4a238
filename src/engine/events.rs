//! Engine inputs and outputs.

use serde::Serialize;

use super::state::Summary;
use crate::badge::BadgeColor;
use crate::alert::Notification;
use crate::feed::LinkEvent;

pub type Timestamp = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Link(LinkEvent),
    /// Periodic housekeeping tick.
    Timer { ts: Timestamp },
}

impl Event {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Event::Link(e) => e.timestamp(),
            Event::Timer { ts } => *ts,
        }
    }
}

impl From<LinkEvent> for Event {
    fn from(e: LinkEvent) -> Self {
        Event::Link(e)
    }
}

/// Side effects the host must perform, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    SetBadgeText { text: String },
    SetBadgeColor { color: BadgeColor },
    Notify { notification: Notification },
    Summary { summary: Summary },
}
