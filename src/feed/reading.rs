//! Wire types for the telemetry socket.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One telemetry snapshot. Superseded by the next one; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub focus: f64,
    pub stress: f64,
}

impl Reading {
    pub fn new(focus: f64, stress: f64) -> Self {
        Self { focus, stress }
    }
}

/// Why an inbound frame was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    NotJson(String),
    NotObject,
    MissingField(&'static str),
    NotNumeric(&'static str),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::NotJson(e) => write!(f, "payload is not json: {}", e),
            FrameError::NotObject => write!(f, "payload is not a json object"),
            FrameError::MissingField(name) => write!(f, "missing field `{}`", name),
            FrameError::NotNumeric(name) => write!(f, "field `{}` is not a number", name),
        }
    }
}

impl std::error::Error for FrameError {}

fn numeric_field(
    map: &serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<f64, FrameError> {
    match map.get(name) {
        None => Err(FrameError::MissingField(name)),
        Some(v) => v.as_f64().ok_or(FrameError::NotNumeric(name)),
    }
}

/// Decode one server frame. Unknown fields are ignored.
pub fn decode_frame(text: &str) -> Result<Reading, FrameError> {
    let value: Value = serde_json::from_str(text).map_err(|e| FrameError::NotJson(e.to_string()))?;
    let map = value.as_object().ok_or(FrameError::NotObject)?;
    Ok(Reading {
        focus: numeric_field(map, "focus")?,
        stress: numeric_field(map, "stress")?,
    })
}

pub const START_CALIBRATION: &str = "start_calibration";

/// Client → server command. Sent once per click, never acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationCommand {
    pub command: String,
    pub timestamp: u64,
}

impl CalibrationCommand {
    pub fn start(timestamp: u64) -> Self {
        Self {
            command: START_CALIBRATION.to_string(),
            timestamp,
        }
    }

    pub fn to_frame(&self) -> String {
        serde_json::json!({
            "command": self.command,
            "timestamp": self.timestamp,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_frame() {
        let r = decode_frame(r#"{"focus": 72, "stress": 12.5}"#).unwrap();
        assert_eq!(r, Reading::new(72.0, 12.5));
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let r = decode_frame(r#"{"focus": 55, "stress": 91, "alert": true}"#).unwrap();
        assert_eq!(r, Reading::new(55.0, 91.0));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_frame("not json"), Err(FrameError::NotJson(_))));
        assert_eq!(decode_frame("[1,2]"), Err(FrameError::NotObject));
    }

    #[test]
    fn test_decode_rejects_missing_or_string_fields() {
        assert_eq!(
            decode_frame(r#"{"focus": 50}"#),
            Err(FrameError::MissingField("stress"))
        );
        assert_eq!(
            decode_frame(r#"{"focus": "50", "stress": 3}"#),
            Err(FrameError::NotNumeric("focus"))
        );
    }

    #[test]
    fn test_calibration_frame_shape() {
        let frame = CalibrationCommand::start(1_700_000_000_123).to_frame();
        let v: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(v["command"], "start_calibration");
        assert_eq!(v["timestamp"], 1_700_000_000_123u64);
    }
}
