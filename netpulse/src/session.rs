//! Stream session: owns the connection lifecycle and feeds the model.
//!
//! One session drives one endpoint. Frames are handled strictly in arrival
//! order inside a single task, so the window never sees overlapping updates.

use std::sync::Arc;

use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, SessionConfig};
use crate::decode::{decode, DecodeError};
use crate::model::{self, ModelHandle, ModelPublisher, PresentationModel};
use crate::rate::{time_label, to_kilobytes};
use crate::types::Snapshot;
use crate::window::WindowBuffer;
use crate::ws::{self, WsStream};

const RATE_IN_CHANNEL: &str = "Transfer Rate In (KB/s)";
const RATE_OUT_CHANNEL: &str = "Transfer Rate Out (KB/s)";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Transport(#[from] tungstenite::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Open,
    Errored,
    Closing,
}

/// Cloneable control surface for a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    shutdown: Arc<watch::Sender<bool>>,
    model: ModelHandle,
}

impl SessionHandle {
    /// Idempotent; safe from any state. The in-flight frame (if any) still
    /// completes, then the session tears down.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    pub fn model(&self) -> ModelHandle {
        self.model.clone()
    }
}

enum DriveOutcome {
    Stopped,
    ClosedClean,
    Failed(tungstenite::Error),
}

pub struct StreamSession {
    config: SessionConfig,
    state: SessionState,
    interface: String,
    current: Option<Snapshot>,
    window: WindowBuffer,
    dropped_frames: u64,
    publisher: ModelPublisher,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl StreamSession {
    /// Fails fast on invalid configuration, before any connection attempt.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let window = WindowBuffer::new(config.capacity, &[RATE_IN_CHANNEL, RATE_OUT_CHANNEL])?;
        let initial = PresentationModel {
            interface: "N/A".to_string(),
            current: None,
            series: window.snapshot(),
        };
        let (publisher, _) = model::channel(initial);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            config,
            state: SessionState::Idle,
            interface: "N/A".to_string(),
            current: None,
            window,
            dropped_frames: 0,
            publisher,
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Frames dropped on decode failure since the session was built.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    pub fn model(&self) -> ModelHandle {
        self.publisher.subscribe()
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            shutdown: Arc::clone(&self.shutdown_tx),
            model: self.publisher.subscribe(),
        }
    }

    /// See [`SessionHandle::stop`].
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Feed one raw transport message through decode → derive → window →
    /// publish. Called by the transport loop; public so the pipeline can be
    /// exercised without a live connection.
    pub fn ingest(&mut self, raw: &str) -> Result<(), DecodeError> {
        let frame = decode(raw)?;
        if let Some(prev) = &self.current {
            if frame.current.bytes_received < prev.bytes_received
                || frame.current.bytes_sent < prev.bytes_sent
            {
                debug!(interface = %frame.interface, "cumulative counters decreased (interface reset)");
            }
        }
        let label = time_label(frame.current.timestamp);
        let rx_kb = to_kilobytes(frame.current.bytes_per_second_in);
        let tx_kb = to_kilobytes(frame.current.bytes_per_second_out);
        self.window.append(label, &[rx_kb, tx_kb]);
        self.interface = frame.interface;
        self.current = Some(frame.current);
        self.publish();
        Ok(())
    }

    fn on_frame(&mut self, raw: &str) {
        if let Err(err) = self.ingest(raw) {
            self.dropped_frames += 1;
            warn!(error = %err, dropped = self.dropped_frames, "dropping undecodable frame");
        }
    }

    fn publish(&self) {
        self.publisher.publish(PresentationModel {
            interface: self.interface.clone(),
            current: self.current.clone(),
            series: self.window.snapshot(),
        });
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "session state");
            self.state = next;
        }
    }

    /// Connect and pump frames until `stop()`, a clean server close, or an
    /// unrecoverable transport error. Consumes the session: teardown discards
    /// the buffered state and a fresh session must be built to resume.
    pub async fn run(mut self) -> Result<(), SessionError> {
        let mut shutdown = self.shutdown_rx.clone();
        let mut attempt: u32 = 0;
        let result = loop {
            if *shutdown.borrow() {
                break Ok(());
            }
            self.transition(SessionState::Connecting);
            let connected = tokio::select! {
                _ = async { let _ = shutdown.wait_for(|&stop| stop).await; } => break Ok(()),
                conn = ws::connect(&self.config.endpoint) => conn,
            };
            let error = match connected {
                Ok(stream) => {
                    attempt = 0;
                    match self.drive(stream).await {
                        DriveOutcome::Stopped | DriveOutcome::ClosedClean => break Ok(()),
                        DriveOutcome::Failed(e) => e,
                    }
                }
                Err(e) => e,
            };
            self.transition(SessionState::Errored);
            warn!(error = %error, endpoint = %self.config.endpoint, "transport failure");

            let Some(policy) = self.config.reconnect.clone() else {
                break Err(SessionError::Transport(error));
            };
            if attempt >= policy.max_attempts {
                break Err(SessionError::Transport(error));
            }
            attempt += 1;
            let delay = policy.delay_for(attempt);
            info!(attempt, delay_ms = delay.as_millis() as u64, "reconnecting");
            tokio::select! {
                _ = async { let _ = shutdown.wait_for(|&stop| stop).await; } => break Ok(()),
                _ = tokio::time::sleep(delay) => {}
            }
        };
        if self.state != SessionState::Errored {
            self.transition(SessionState::Closing);
        }
        self.transition(SessionState::Idle);
        result
    }

    async fn drive(&mut self, mut ws: WsStream) -> DriveOutcome {
        self.transition(SessionState::Open);
        let mut shutdown = self.shutdown_rx.clone();
        loop {
            tokio::select! {
                _ = async { let _ = shutdown.wait_for(|&stop| stop).await; } => {
                    let _ = ws.close(None).await;
                    return DriveOutcome::Stopped;
                }
                msg = ws.next() => match msg {
                    Some(Ok(Message::Text(text))) => self.on_frame(&text),
                    Some(Ok(Message::Close(_))) | None => return DriveOutcome::ClosedClean,
                    Some(Ok(_)) => {} // ping/pong/binary: nothing to do
                    Some(Err(e)) => return DriveOutcome::Failed(e),
                }
            }
        }
    }
}
