//! Toolbar badge: a pure mapping from the latest reading to text and color.

use serde::{Deserialize, Serialize};

use crate::feed::Reading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Green,
    Amber,
    Red,
    Gray,
}

impl BadgeColor {
    pub fn hex(&self) -> &'static str {
        match self {
            BadgeColor::Green => "#4CAF50",
            BadgeColor::Amber => "#FFC107",
            BadgeColor::Red => "#F44336",
            BadgeColor::Gray => "#888",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub color: BadgeColor,
}

/// First match wins: above 60 green, above 30 amber, otherwise red.
pub fn color_for(focus: f64) -> BadgeColor {
    if focus > 60.0 {
        BadgeColor::Green
    } else if focus > 30.0 {
        BadgeColor::Amber
    } else {
        BadgeColor::Red
    }
}

/// Decimal rendering of a number the way the badge shows it: `72`, `72.5`.
pub fn decimal_text(value: f64) -> String {
    format!("{}", value)
}

pub fn badge_for(reading: &Reading) -> Badge {
    Badge {
        text: decimal_text(reading.focus),
        color: color_for(reading.focus),
    }
}

/// Shown as soon as the socket opens, until the first reading arrives.
pub fn connected_badge() -> Badge {
    Badge {
        text: "ON".to_string(),
        color: BadgeColor::Gray,
    }
}
