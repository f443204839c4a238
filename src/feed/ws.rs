//! WebSocket driver for the telemetry link.
//!
//! A single task owns the socket for the life of the process. It dials,
//! pumps frames until the socket drops, reports `Closed`, waits the fixed
//! reconnect delay and dials again. There is no retry cap.

use anyhow::Result;
use async_trait::async_trait;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde_json::json;
use std::pin::Pin;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::Message;

use super::link::{
    ConnectionState, LinkError, LinkEvent, LinkMachine, LinkTransition, ReconnectPolicy,
};
use super::reading::{decode_frame, CalibrationCommand};
use crate::logging::{log, obj, ts_epoch_ms, v_str, Domain, Level};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    Close,
    Other,
}

pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Inbound>> + Send>>;
pub type FrameSink = Pin<Box<dyn Sink<String, Error = anyhow::Error> + Send>>;

/// Dials the endpoint. Split out so tests can drive the link without a socket.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, endpoint: &str) -> Result<(FrameSink, FrameStream)>;
}

pub struct TungsteniteConnector;

#[async_trait]
impl Connector for TungsteniteConnector {
    async fn connect(&self, endpoint: &str) -> Result<(FrameSink, FrameStream)> {
        let (ws, _) = tokio_tungstenite::connect_async(endpoint).await?;
        let (write, read) = ws.split();
        let sink: FrameSink = Box::pin(
            write
                .with(|text: String| async move {
                    Ok::<_, tokio_tungstenite::tungstenite::Error>(Message::Text(text))
                })
                .sink_map_err(anyhow::Error::from),
        );
        let stream: FrameStream = Box::pin(read.map(|msg| match msg {
            Ok(Message::Text(text)) => Ok(Inbound::Text(text)),
            Ok(Message::Close(_)) => Ok(Inbound::Close),
            Ok(_) => Ok(Inbound::Other),
            Err(e) => Err(anyhow::Error::from(e)),
        }));
        Ok((sink, stream))
    }
}

/// Cheap, cloneable view of the link for senders and observers.
#[derive(Debug, Clone)]
pub struct LinkHandle {
    state: watch::Receiver<ConnectionState>,
    outbound: mpsc::UnboundedSender<String>,
}

impl LinkHandle {
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Queue a command on the live socket. Fails without sending when the
    /// link is not connected.
    pub fn send_command(&self, cmd: &CalibrationCommand) -> Result<(), LinkError> {
        if !self.is_open() {
            return Err(LinkError::NotConnected);
        }
        self.outbound
            .send(cmd.to_frame())
            .map_err(|_| LinkError::ChannelClosed)
    }

    /// Wait until the link reports `target`.
    pub async fn wait_for(&mut self, target: ConnectionState) -> Result<(), LinkError> {
        self.state
            .wait_for(|s| *s == target)
            .await
            .map(|_| ())
            .map_err(|_| LinkError::ChannelClosed)
    }
}

struct Driver<C> {
    connector: C,
    endpoint: String,
    policy: ReconnectPolicy,
    machine: LinkMachine,
    events: mpsc::Sender<LinkEvent>,
    outbound: mpsc::UnboundedReceiver<String>,
    state: watch::Sender<ConnectionState>,
}

/// Owner of the single telemetry socket.
pub struct TelemetryLink<C: Connector> {
    driver: Option<Driver<C>>,
    handle: LinkHandle,
    task: Option<JoinHandle<()>>,
}

impl<C: Connector> TelemetryLink<C> {
    pub fn new(
        connector: C,
        endpoint: &str,
        policy: ReconnectPolicy,
    ) -> (Self, mpsc::Receiver<LinkEvent>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CAPACITY);
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let link = Self {
            driver: Some(Driver {
                connector,
                endpoint: endpoint.to_string(),
                policy,
                machine: LinkMachine::new(),
                events: events_tx,
                outbound: out_rx,
                state: state_tx,
            }),
            handle: LinkHandle {
                state: state_rx,
                outbound: out_tx,
            },
            task: None,
        };
        (link, events_rx)
    }

    /// Start the driver task. Only the first call has any effect, so there
    /// is never more than one socket per link.
    pub fn connect(&mut self) -> bool {
        match self.driver.take() {
            Some(driver) => {
                self.task = Some(tokio::spawn(driver.run()));
                true
            }
            None => {
                log(
                    Level::Debug,
                    Domain::Link,
                    "connect_ignored",
                    obj(&[("state", v_str(self.handle.state().as_str()))]),
                );
                false
            }
        }
    }

    pub fn handle(&self) -> LinkHandle {
        self.handle.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }
}

impl<C: Connector> Driver<C> {
    fn transition(&mut self, t: LinkTransition) {
        match self.machine.apply(t) {
            Ok(state) => {
                self.state.send_replace(state);
            }
            Err(err) => log(
                Level::Error,
                Domain::Link,
                "transition_error",
                obj(&[("msg", v_str(&err.to_string()))]),
            ),
        }
    }

    async fn run(mut self) {
        loop {
            if self.machine.begin_connect() {
                self.state.send_replace(ConnectionState::Connecting);
            }
            log(
                Level::Debug,
                Domain::Link,
                "connect_attempt",
                obj(&[
                    ("endpoint", v_str(&self.endpoint)),
                    ("attempt", json!(self.machine.attempts)),
                ]),
            );

            let reason = match self.connector.connect(&self.endpoint).await {
                Ok((mut sink, mut stream)) => {
                    self.transition(LinkTransition::Opened);
                    log(
                        Level::Info,
                        Domain::Link,
                        "opened",
                        obj(&[("endpoint", v_str(&self.endpoint))]),
                    );
                    if self.events.send(LinkEvent::Opened { ts: ts_epoch_ms() }).await.is_err() {
                        return;
                    }
                    self.pump(&mut sink, &mut stream).await
                }
                Err(err) => err.to_string(),
            };

            self.transition(LinkTransition::Closed);
            let stale = self.drain_outbound();
            log(
                Level::Warn,
                Domain::Link,
                "closed",
                obj(&[
                    ("reason", v_str(&reason)),
                    ("dropped_commands", json!(stale)),
                    ("retry_ms", json!(self.policy.delay_ms)),
                ]),
            );
            let closed = LinkEvent::Closed {
                ts: ts_epoch_ms(),
                reason,
            };
            if self.events.send(closed).await.is_err() {
                // Nobody is listening any more; the process is shutting down.
                return;
            }
            sleep(self.policy.delay_for_attempt(self.machine.attempts)).await;
        }
    }

    async fn pump(&mut self, sink: &mut FrameSink, stream: &mut FrameStream) -> String {
        loop {
            tokio::select! {
                frame = stream.next() => match frame {
                    None => return "peer closed".to_string(),
                    Some(Err(err)) => return err.to_string(),
                    Some(Ok(Inbound::Close)) => return "close frame".to_string(),
                    Some(Ok(Inbound::Other)) => {}
                    Some(Ok(Inbound::Text(text))) => {
                        let ts = ts_epoch_ms();
                        let event = match decode_frame(&text) {
                            Ok(reading) => LinkEvent::Reading { ts, reading },
                            Err(err) => {
                                log(
                                    Level::Warn,
                                    Domain::Link,
                                    "frame_rejected",
                                    obj(&[("reason", v_str(&err.to_string()))]),
                                );
                                LinkEvent::Rejected { ts, reason: err.to_string() }
                            }
                        };
                        if self.events.send(event).await.is_err() {
                            return "subscriber gone".to_string();
                        }
                    }
                },
                Some(text) = self.outbound.recv() => {
                    if let Err(err) = sink.send(text).await {
                        return err.to_string();
                    }
                    log(Level::Info, Domain::Link, "command_sent", obj(&[]));
                }
            }
        }
    }

    fn drain_outbound(&mut self) -> usize {
        let mut dropped = 0;
        while self.outbound.try_recv().is_ok() {
            dropped += 1;
        }
        dropped
    }
}
