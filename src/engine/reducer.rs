//! Pure reducer: (State, Event) -> Vec<Command>
//!
//! All badge and alert decisions for the background context happen here.
//! Logical time is taken from the event, so replaying the same events
//! yields the same commands.

use super::events::*;
use super::state::*;
use crate::alert::{AlertConfig, Decision, Notification};
use crate::badge::{badge_for, connected_badge, Badge};
use crate::feed::LinkEvent;

#[derive(Debug, Clone, Default)]
pub struct ReducerConfig {
    pub alert: AlertConfig,
}

/// Result of processing an event
#[derive(Debug)]
pub struct ReducerOutput {
    pub commands: Vec<Command>,
    /// Alert decision, present only for readings
    pub decision: Option<Decision>,
}

fn push_badge(commands: &mut Vec<Command>, badge: Badge) {
    commands.push(Command::SetBadgeText { text: badge.text });
    commands.push(Command::SetBadgeColor { color: badge.color });
}

pub fn reduce(state: &mut EngineState, event: Event, cfg: &ReducerConfig) -> ReducerOutput {
    let mut commands = Vec::new();
    let mut decision = None;

    state.now = state.now.max(event.timestamp());
    state.seq += 1;

    match event {
        Event::Link(LinkEvent::Opened { .. }) => {
            state.connected = true;
            state.stats.opens += 1;
            push_badge(&mut commands, connected_badge());
        }
        Event::Link(LinkEvent::Reading { ts, reading }) => {
            state.stats.readings += 1;
            state.last_reading = Some(reading);
            push_badge(&mut commands, badge_for(&reading));

            let d = state.throttle.evaluate(&reading, ts, &cfg.alert);
            match d {
                Decision::Fire => {
                    state.stats.alerts_fired += 1;
                    commands.push(Command::Notify {
                        notification: Notification::burnout(),
                    });
                }
                Decision::Suppressed { .. } => state.stats.alerts_suppressed += 1,
                Decision::Clear => {}
            }
            decision = Some(d);
        }
        // Malformed frames never reach the badge or the throttle.
        Event::Link(LinkEvent::Rejected { .. }) => {
            state.stats.rejected_frames += 1;
        }
        // The badge is left as it was; the link retries on its own.
        Event::Link(LinkEvent::Closed { .. }) => {
            state.connected = false;
            state.stats.closes += 1;
        }
        Event::Timer { .. } => {
            commands.push(Command::Summary {
                summary: state.summary(),
            });
        }
    }

    ReducerOutput { commands, decision }
}
