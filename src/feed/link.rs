//! Connection state machine for the telemetry link.
//!
//! ```text
//! Disconnected --Connect--> Connecting --Opened--> Connected
//!      ^                        |                      |
//!      +---------Closed---------+----------Closed------+
//! ```
//!
//! The machine is pure; the socket driver in [`super::ws`] feeds it.

use std::fmt;
use tokio::time::Duration;

use super::reading::Reading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTransition {
    Connect,
    Opened,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: ConnectionState,
    pub transition: LinkTransition,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid link transition {:?} from {}", self.transition, self.from.as_str())
    }
}

impl std::error::Error for TransitionError {}

#[derive(Debug, Clone)]
pub struct LinkMachine {
    pub state: ConnectionState,
    pub attempts: u64,
    pub opens: u64,
}

impl Default for LinkMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkMachine {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            attempts: 0,
            opens: 0,
        }
    }

    pub fn apply(
        &mut self,
        transition: LinkTransition,
    ) -> Result<ConnectionState, TransitionError> {
        use ConnectionState::*;
        match (self.state, transition) {
            (Disconnected, LinkTransition::Connect) => {
                self.attempts += 1;
                self.state = Connecting;
            }
            // A second connect while a socket exists or is being dialed is a no-op.
            (Connecting, LinkTransition::Connect) | (Connected, LinkTransition::Connect) => {}
            (Connecting, LinkTransition::Opened) => {
                self.opens += 1;
                self.state = Connected;
            }
            (Connecting, LinkTransition::Closed) | (Connected, LinkTransition::Closed) => {
                self.state = Disconnected;
            }
            (Disconnected, LinkTransition::Closed) => {}
            (from, transition) => return Err(TransitionError { from, transition }),
        }
        Ok(self.state)
    }

    /// Returns true only when this call moved the link to `Connecting`,
    /// i.e. the caller is the one that should dial.
    pub fn begin_connect(&mut self) -> bool {
        self.state == ConnectionState::Disconnected && self.apply(LinkTransition::Connect).is_ok()
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}

/// Reconnect schedule. The delay is fixed: no backoff, no attempt cap.
#[derive(Clone, Debug)]
pub struct ReconnectPolicy {
    pub delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { delay_ms: 3_000 }
    }
}

impl ReconnectPolicy {
    pub fn new(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    pub fn delay_for_attempt(&self, _attempt: u64) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// What the link reports to its subscribers, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    Opened { ts: u64 },
    Reading { ts: u64, reading: Reading },
    Rejected { ts: u64, reason: String },
    Closed { ts: u64, reason: String },
}

impl LinkEvent {
    pub fn timestamp(&self) -> u64 {
        match self {
            LinkEvent::Opened { ts }
            | LinkEvent::Reading { ts, .. }
            | LinkEvent::Rejected { ts, .. }
            | LinkEvent::Closed { ts, .. } => *ts,
        }
    }
}

/// Failure to push a command upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    NotConnected,
    ChannelClosed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::NotConnected => write!(f, "telemetry link is not connected"),
            LinkError::ChannelClosed => write!(f, "telemetry link driver has stopped"),
        }
    }
}

impl std::error::Error for LinkError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut m = LinkMachine::new();
        assert!(m.begin_connect());
        assert_eq!(m.state, ConnectionState::Connecting);
        assert_eq!(m.apply(LinkTransition::Opened), Ok(ConnectionState::Connected));
        assert!(m.is_open());
        assert_eq!(m.apply(LinkTransition::Closed), Ok(ConnectionState::Disconnected));
        assert_eq!(m.attempts, 1);
        assert_eq!(m.opens, 1);
    }

    #[test]
    fn test_connect_is_idempotent() {
        let mut m = LinkMachine::new();
        assert!(m.begin_connect());
        assert!(!m.begin_connect());
        m.apply(LinkTransition::Opened).unwrap();
        assert!(!m.begin_connect());
        assert_eq!(m.state, ConnectionState::Connected);
        assert_eq!(m.attempts, 1);
    }

    #[test]
    fn test_failed_dial_returns_to_disconnected() {
        let mut m = LinkMachine::new();
        m.begin_connect();
        m.apply(LinkTransition::Closed).unwrap();
        assert_eq!(m.state, ConnectionState::Disconnected);
        assert!(m.begin_connect());
        assert_eq!(m.attempts, 2);
    }

    #[test]
    fn test_open_without_connect_is_rejected() {
        let mut m = LinkMachine::new();
        let err = m.apply(LinkTransition::Opened).unwrap_err();
        assert_eq!(err.from, ConnectionState::Disconnected);
        assert_eq!(m.state, ConnectionState::Disconnected);
    }

    #[test]
    fn test_reconnect_delay_is_fixed() {
        let p = ReconnectPolicy::default();
        assert_eq!(p.delay_for_attempt(0), Duration::from_millis(3_000));
        assert_eq!(p.delay_for_attempt(50), Duration::from_millis(3_000));
    }
}
