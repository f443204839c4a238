//! Telemetry link: one WebSocket to the local biometric feed.

pub mod link;
pub mod reading;
pub mod ws;

pub use link::{ConnectionState, LinkError, LinkEvent, ReconnectPolicy};
pub use reading::{decode_frame, CalibrationCommand, FrameError, Reading};
pub use ws::{Connector, LinkHandle, TelemetryLink, TungsteniteConnector};
