//! Extension host seam: where badge and notification commands land.

use anyhow::Result;
use serde_json::json;

use super::events::Command;
use crate::alert::Notification;
use crate::badge::BadgeColor;
use crate::logging::{log, obj, v_str, Domain, Level};

/// The browser-side capabilities the background engine drives.
pub trait ExtensionHost {
    fn set_badge_text(&mut self, text: &str) -> Result<()>;
    fn set_badge_color(&mut self, color: BadgeColor) -> Result<()>;
    fn notify(&mut self, notification: &Notification) -> Result<()>;
}

/// Host that renders everything as structured log lines.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    pub badge_text: String,
    pub badge_color: Option<BadgeColor>,
}

impl ExtensionHost for ConsoleHost {
    fn set_badge_text(&mut self, text: &str) -> Result<()> {
        self.badge_text = text.to_string();
        log(Level::Info, Domain::Badge, "badge_text", obj(&[("text", v_str(text))]));
        Ok(())
    }

    fn set_badge_color(&mut self, color: BadgeColor) -> Result<()> {
        self.badge_color = Some(color);
        log(
            Level::Info,
            Domain::Badge,
            "badge_color",
            obj(&[("color", v_str(color.hex())), ("text", v_str(&self.badge_text))]),
        );
        Ok(())
    }

    fn notify(&mut self, notification: &Notification) -> Result<()> {
        let mut fields = obj(&[("msg", v_str(&notification.message))]);
        fields.insert("notification".to_string(), json!(notification));
        log(Level::Warn, Domain::Alert, "notification", fields);
        Ok(())
    }
}

/// Apply one command. Host failures are logged and dropped: nothing is
/// retried or queued.
pub fn apply_command<H: ExtensionHost>(host: &mut H, cmd: &Command) {
    let result = match cmd {
        Command::SetBadgeText { text } => host.set_badge_text(text),
        Command::SetBadgeColor { color } => host.set_badge_color(*color),
        Command::Notify { notification } => host.notify(notification),
        Command::Summary { summary } => {
            log(
                Level::Info,
                Domain::System,
                "summary",
                obj(&[
                    ("connected", json!(summary.connected)),
                    ("events", json!(summary.events)),
                    ("last_reading", json!(summary.last_reading)),
                    ("stats", json!(summary.stats)),
                ]),
            );
            Ok(())
        }
    };
    if let Err(err) = result {
        log(
            Level::Error,
            Domain::System,
            "host_error",
            obj(&[("msg", v_str(&err.to_string())), ("command", json!(cmd))]),
        );
    }
}
