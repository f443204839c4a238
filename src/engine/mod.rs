//! Background engine: the single event-handling context.
//!
//! Architecture:
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ TelemetryLink│────►│  Event Bus   │────►│   Reducer    │
//! │  (WS task)   │     │  (ordered)   │     │  (pure fn)   │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                                                  │
//!                                                  ▼
//!                      ┌──────────────┐     ┌──────────────┐
//!                      │ExtensionHost │◄────│   Commands   │
//!                      │ (badge/notif)│     │              │
//!                      └──────────────┘     └──────────────┘
//! ```

pub mod bus;
pub mod events;
pub mod host;
pub mod reducer;
pub mod state;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

use crate::alert::Decision;
use crate::feed::LinkEvent;
use crate::logging::{log, obj, ts_epoch_ms, Domain, Level};
use bus::EventBus;
use events::Event;
use host::{apply_command, ExtensionHost};
use reducer::{reduce, ReducerConfig};
use state::EngineState;

pub struct Engine<H: ExtensionHost> {
    state: EngineState,
    cfg: ReducerConfig,
    bus: EventBus,
    host: H,
}

impl<H: ExtensionHost> Engine<H> {
    pub fn new(host: H, cfg: ReducerConfig) -> Self {
        Self {
            state: EngineState::new(),
            cfg,
            bus: EventBus::new(),
            host,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Queue an event and process everything queued, in order.
    pub fn dispatch(&mut self, event: Event) {
        self.bus.push(event);
        while let Some(event) = self.bus.pop() {
            let out = reduce(&mut self.state, event, &self.cfg);
            match out.decision {
                Some(Decision::Fire) => log(Level::Info, Domain::Alert, "alert_fired", obj(&[])),
                Some(Decision::Suppressed { remaining_ms }) => log(
                    Level::Debug,
                    Domain::Alert,
                    "alert_suppressed",
                    obj(&[("remaining_ms", json!(remaining_ms))]),
                ),
                _ => {}
            }
            for cmd in &out.commands {
                apply_command(&mut self.host, cmd);
            }
        }
    }

    /// Consume link events until the link side goes away.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<LinkEvent>,
        summary_every: Duration,
    ) -> Self {
        let mut ticker = interval(summary_every);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            tokio::select! {
                ev = events.recv() => match ev {
                    Some(ev) => self.dispatch(Event::Link(ev)),
                    None => break,
                },
                _ = ticker.tick() => self.dispatch(Event::Timer { ts: ts_epoch_ms() }),
            }
        }
        log(
            Level::Info,
            Domain::System,
            "engine_stopped",
            obj(&[("summary", json!(self.state.summary()))]),
        );
        self
    }
}
