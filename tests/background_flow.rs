//! Integration test: link events through the background engine into a host.

use anyhow::{bail, Result};
use tokio::sync::mpsc;
use tokio::time::Duration;

use touchgrass::alert::Notification;
use touchgrass::badge::BadgeColor;
use touchgrass::engine::events::Event;
use touchgrass::engine::host::ExtensionHost;
use touchgrass::engine::reducer::ReducerConfig;
use touchgrass::engine::Engine;
use touchgrass::feed::{LinkEvent, Reading};

#[derive(Debug, Default)]
struct RecordingHost {
    badge: Vec<(String, Option<BadgeColor>)>,
    notifications: Vec<Notification>,
    fail_notify: bool,
}

impl ExtensionHost for RecordingHost {
    fn set_badge_text(&mut self, text: &str) -> Result<()> {
        self.badge.push((text.to_string(), None));
        Ok(())
    }

    fn set_badge_color(&mut self, color: BadgeColor) -> Result<()> {
        if let Some(last) = self.badge.last_mut() {
            last.1 = Some(color);
        }
        Ok(())
    }

    fn notify(&mut self, notification: &Notification) -> Result<()> {
        if self.fail_notify {
            bail!("notifications disabled");
        }
        self.notifications.push(notification.clone());
        Ok(())
    }
}

fn reading(ts: u64, focus: f64, stress: f64) -> LinkEvent {
    LinkEvent::Reading {
        ts,
        reading: Reading::new(focus, stress),
    }
}

#[tokio::test(start_paused = true)]
async fn test_session_drives_badge_and_alerts() {
    let (tx, rx) = mpsc::channel(16);
    let engine = Engine::new(RecordingHost::default(), ReducerConfig::default());
    let run = tokio::spawn(engine.run(rx, Duration::from_secs(3600)));

    let script = vec![
        LinkEvent::Opened { ts: 0 },
        reading(1_000, 72.0, 10.0),
        reading(2_000, 15.0, 10.0),  // fires
        LinkEvent::Rejected { ts: 2_500, reason: "not json".to_string() },
        reading(30_000, 50.0, 95.0), // suppressed, cooldown shared
        LinkEvent::Closed { ts: 31_000, reason: "peer closed".to_string() },
        LinkEvent::Opened { ts: 34_000 },
        reading(62_000, 45.0, 90.0), // fires again
    ];
    for ev in script {
        tx.send(ev).await.unwrap();
    }
    drop(tx);

    let engine = run.await.unwrap();
    let host = engine.host();
    assert_eq!(
        host.badge,
        vec![
            ("ON".to_string(), Some(BadgeColor::Gray)),
            ("72".to_string(), Some(BadgeColor::Green)),
            ("15".to_string(), Some(BadgeColor::Red)),
            ("50".to_string(), Some(BadgeColor::Amber)),
            ("ON".to_string(), Some(BadgeColor::Gray)),
            ("45".to_string(), Some(BadgeColor::Amber)),
        ]
    );
    assert_eq!(host.notifications.len(), 2);
    assert_eq!(host.notifications[0].priority, 2);

    let stats = &engine.state().stats;
    assert_eq!(stats.readings, 4);
    assert_eq!(stats.rejected_frames, 1);
    assert_eq!(stats.alerts_fired, 2);
    assert_eq!(stats.alerts_suppressed, 1);
    assert_eq!(stats.opens, 2);
    assert_eq!(stats.closes, 1);
}

#[test]
fn test_notification_failure_is_not_fatal() {
    let host = RecordingHost {
        fail_notify: true,
        ..Default::default()
    };
    let mut engine = Engine::new(host, ReducerConfig::default());
    engine.dispatch(Event::Link(reading(0, 10.0, 10.0)));
    engine.dispatch(Event::Link(reading(1_000, 80.0, 10.0)));

    // the lost alert still started the cooldown; the badge kept updating
    assert_eq!(engine.state().throttle.last_alert_ms(), Some(0));
    assert_eq!(engine.host().badge.last().unwrap().0, "80");
    assert!(engine.host().notifications.is_empty());
}
