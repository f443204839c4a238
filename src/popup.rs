//! Popup view model: text and bar widths for the latest reading, plus the
//! calibration button.

use crate::badge::decimal_text;
use crate::feed::{CalibrationCommand, LinkError, LinkHandle, Reading};
use crate::logging::{log, obj, v_str, Domain, Level};

pub const STRESS_BAR_HOT: &str = "#b71c1c";
pub const STRESS_BAR_NORMAL: &str = "#F44336";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub focus_text: String,
    pub focus_bar_width: String,
    pub stress_text: String,
    pub stress_bar_width: String,
    pub stress_bar_color: &'static str,
}

fn percent(value: f64) -> String {
    format!("{}%", decimal_text(value))
}

impl PopupView {
    pub fn render(reading: &Reading) -> Self {
        Self {
            focus_text: percent(reading.focus),
            focus_bar_width: percent(reading.focus),
            stress_text: percent(reading.stress),
            stress_bar_width: percent(reading.stress),
            stress_bar_color: if reading.stress > 80.0 {
                STRESS_BAR_HOT
            } else {
                STRESS_BAR_NORMAL
            },
        }
    }
}

/// Anything that can push a calibration command upstream.
pub trait CommandChannel {
    fn send_command(&self, cmd: &CalibrationCommand) -> Result<(), LinkError>;
}

impl CommandChannel for LinkHandle {
    fn send_command(&self, cmd: &CalibrationCommand) -> Result<(), LinkError> {
        LinkHandle::send_command(self, cmd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    /// Disabled until `until_ms`.
    Calibrating { until_ms: u64 },
    ConnectionError,
}

#[derive(Debug, Clone)]
pub struct CalibrationButton {
    pub state: ButtonState,
    pub calibration_ms: u64,
}

impl CalibrationButton {
    pub fn new(calibration_ms: u64) -> Self {
        Self {
            state: ButtonState::Idle,
            calibration_ms,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            ButtonState::Idle => "Start calibration",
            ButtonState::Calibrating { .. } => "Calibrating...",
            ButtonState::ConnectionError => "Connection error",
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.state, ButtonState::Calibrating { .. })
    }

    /// Send one calibration command if the link is open. On failure the
    /// button shows the error and nothing is sent; there is no retry.
    pub fn click<C: CommandChannel>(&mut self, now_ms: u64, channel: &C) -> Result<(), LinkError> {
        if !self.is_enabled() {
            return Ok(());
        }
        match channel.send_command(&CalibrationCommand::start(now_ms)) {
            Ok(()) => {
                self.state = ButtonState::Calibrating {
                    until_ms: now_ms.saturating_add(self.calibration_ms),
                };
                log(Level::Info, Domain::Popup, "calibration_sent", obj(&[]));
                Ok(())
            }
            Err(err) => {
                self.state = ButtonState::ConnectionError;
                log(
                    Level::Error,
                    Domain::Popup,
                    "calibration_failed",
                    obj(&[("msg", v_str(&err.to_string()))]),
                );
                Err(err)
            }
        }
    }

    /// Re-enable the button once the calibration window has passed.
    pub fn tick(&mut self, now_ms: u64) {
        if let ButtonState::Calibrating { until_ms } = self.state {
            if now_ms >= until_ms {
                self.state = ButtonState::Idle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeChannel {
        open: bool,
        sent: RefCell<Vec<CalibrationCommand>>,
    }

    impl FakeChannel {
        fn new(open: bool) -> Self {
            Self {
                open,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandChannel for FakeChannel {
        fn send_command(&self, cmd: &CalibrationCommand) -> Result<(), LinkError> {
            if !self.open {
                return Err(LinkError::NotConnected);
            }
            self.sent.borrow_mut().push(cmd.clone());
            Ok(())
        }
    }

    #[test]
    fn test_render_percentages() {
        let view = PopupView::render(&Reading::new(64.0, 12.5));
        assert_eq!(view.focus_text, "64%");
        assert_eq!(view.focus_bar_width, "64%");
        assert_eq!(view.stress_text, "12.5%");
        assert_eq!(view.stress_bar_color, STRESS_BAR_NORMAL);
    }

    #[test]
    fn test_hot_stress_bar() {
        let bar = |stress| PopupView::render(&Reading::new(50.0, stress)).stress_bar_color;
        assert_eq!(bar(80.0), STRESS_BAR_NORMAL);
        assert_eq!(bar(81.0), STRESS_BAR_HOT);
    }

    #[test]
    fn test_click_when_open_sends_once_and_disables() {
        let ch = FakeChannel::new(true);
        let mut btn = CalibrationButton::new(5_000);
        btn.click(1_000, &ch).unwrap();
        assert_eq!(btn.label(), "Calibrating...");
        assert!(!btn.is_enabled());

        // disabled: a second click sends nothing
        btn.click(2_000, &ch).unwrap();
        assert_eq!(ch.sent.borrow().len(), 1);
        assert_eq!(ch.sent.borrow()[0], CalibrationCommand::start(1_000));

        btn.tick(5_999);
        assert!(!btn.is_enabled());
        btn.tick(6_000);
        assert_eq!(btn.state, ButtonState::Idle);
        assert_eq!(btn.label(), "Start calibration");
    }

    #[test]
    fn test_click_when_closed_shows_error() {
        let ch = FakeChannel::new(false);
        let mut btn = CalibrationButton::new(5_000);
        assert_eq!(btn.click(1_000, &ch), Err(LinkError::NotConnected));
        assert_eq!(btn.label(), "Connection error");
        assert!(ch.sent.borrow().is_empty());
        // the error state stays clickable
        assert!(btn.is_enabled());
    }

    #[test]
    fn test_calibration_window_saturates_at_clock_max() {
        let ch = FakeChannel::new(true);
        let mut btn = CalibrationButton::new(5_000);
        btn.click(u64::MAX - 1, &ch).unwrap();
        assert_eq!(btn.state, ButtonState::Calibrating { until_ms: u64::MAX });
        btn.tick(u64::MAX);
        assert!(btn.is_enabled());
    }
}
