//! touchgrass: focus/stress telemetry monitor.
//!
//! Listens to a local biometric feed over WebSocket, mirrors the latest
//! focus level on a toolbar badge and raises a throttled burnout alert.

pub mod alert;
pub mod badge;
pub mod engine;
pub mod feed;
pub mod highlight;
pub mod logging;
pub mod popup;
pub mod state;
