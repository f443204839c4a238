//! Popup companion: opens its own link, shows live readings and sends one
//! calibration command.
//!
//! Usage:
//!   calibrate [--watch-secs=N]
//!
//! The popup socket is independent of the background daemon's socket.

use anyhow::{anyhow, Result};
use tokio::time::{timeout, Duration, Instant};

use touchgrass::feed::{
    ConnectionState, LinkEvent, ReconnectPolicy, TelemetryLink, TungsteniteConnector,
};
use touchgrass::logging::ts_epoch_ms;
use touchgrass::popup::{CalibrationButton, PopupView};
use touchgrass::state::Config;

const CONNECT_WAIT: Duration = Duration::from_secs(5);

fn watch_secs() -> u64 {
    std::env::args()
        .skip(1)
        .find_map(|a| a.strip_prefix("--watch-secs=").and_then(|v| v.parse().ok()))
        .unwrap_or(10)
}

fn print_view(view: &PopupView, button: &CalibrationButton) {
    println!(
        "focus {:>6} | stress {:>6} ({}) | [{}]",
        view.focus_text, view.stress_text, view.stress_bar_color, button.label()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    cfg.validate()?;

    let (mut link, mut events) = TelemetryLink::new(
        TungsteniteConnector,
        &cfg.endpoint,
        ReconnectPolicy::new(cfg.reconnect_ms),
    );
    link.connect();
    let mut handle = link.handle();
    let mut button = CalibrationButton::new(cfg.calibration_ms);

    // A missed deadline just leaves the link closed; the click reports it.
    let _ = timeout(CONNECT_WAIT, handle.wait_for(ConnectionState::Connected)).await;
    if let Err(err) = button.click(ts_epoch_ms(), &handle) {
        println!("[{}]", button.label());
        return Err(anyhow!(err));
    }
    println!("[{}]", button.label());

    let deadline = Instant::now() + Duration::from_secs(watch_secs());
    while let Ok(Some(event)) = tokio::time::timeout_at(deadline, events.recv()).await {
        button.tick(ts_epoch_ms());
        match event {
            LinkEvent::Reading { reading, .. } => print_view(&PopupView::render(&reading), &button),
            LinkEvent::Closed { reason, .. } => println!("link closed: {}", reason),
            _ => {}
        }
    }
    Ok(())
}
