//! Connection manager.
//!
//! Owns the socket lifecycle (`Disconnected -> Connecting -> Open ->
//! Disconnected`), turns inbound text frames into [`ServerEvent`]s for the
//! single [`EventConsumer`], and schedules reconnection according to the
//! session phase at the moment the connection drops:
//!
//! - completed run: stay disconnected, say nothing
//! - run in progress: warn and retry after the mid-run delay
//! - idle: inform and retry after the idle delay

pub mod error;
pub mod scheduler;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use rmon_protocol::{ClientRequest, ReconnectConfig, ServerEvent};
use tracing::{debug, info, warn};

use crate::session::SessionPhase;
use crate::view::LogLevel;

pub use error::{ConnectionError, ConnectionResult};
pub use scheduler::{ManualScheduler, ScheduledAction, Scheduler, TokioScheduler};
pub use transport::{Endpoint, Transport, TransportFrame, TransportLink, WebSocketTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Open,
}

/// Connection-level facts delivered to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Opened,
    Closed,
    /// Something the user should see in the live log.
    Notice { level: LogLevel, message: String },
}

impl ConnectionEvent {
    fn notice(level: LogLevel, message: impl Into<String>) -> Self {
        ConnectionEvent::Notice {
            level,
            message: message.into(),
        }
    }
}

/// The one component that receives everything the connection produces.
pub trait EventConsumer {
    /// Current session phase; read when deciding whether to reconnect.
    fn session_phase(&self) -> SessionPhase;

    fn on_pipeline_event(&mut self, event: ServerEvent);

    fn on_connection_event(&mut self, event: ConnectionEvent);
}

/// Anything that can deliver a request to the server.
pub trait RequestSender {
    fn send_request(&self, request: &ClientRequest) -> ConnectionResult<()>;
}

/// When and how to announce the next connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPlan {
    pub delay: Duration,
    pub level: LogLevel,
    pub message: String,
}

impl ReconnectPlan {
    /// The plan for a connection that dropped in `phase`, if any.
    pub fn for_phase(phase: SessionPhase, config: &ReconnectConfig) -> Option<Self> {
        match phase {
            SessionPhase::Completed => None,
            SessionPhase::Running => {
                let delay = config.mid_run_delay();
                Some(Self {
                    delay,
                    level: LogLevel::Warning,
                    message: format!(
                        "⚠️ Connection lost unexpectedly; reconnecting in {delay:?}"
                    ),
                })
            }
            SessionPhase::Idle => {
                let delay = config.idle_delay();
                Some(Self {
                    delay,
                    level: LogLevel::Info,
                    message: format!("Disconnected; reconnecting in {delay:?}"),
                })
            }
        }
    }
}

pub struct ConnectionManager {
    endpoint: Endpoint,
    transport: Arc<dyn Transport>,
    scheduler: Arc<dyn Scheduler>,
    config: ReconnectConfig,
    state: ConnectionState,
    link: Option<TransportLink>,
    /// Reconnections scheduled since the last successful open.
    reconnect_attempts: u32,
    /// Consecutive frames that failed to parse.
    malformed_streak: u32,
}

impl ConnectionManager {
    pub fn new(
        endpoint: Endpoint,
        transport: Arc<dyn Transport>,
        scheduler: Arc<dyn Scheduler>,
        config: ReconnectConfig,
    ) -> Self {
        Self {
            endpoint,
            transport,
            scheduler,
            config,
            state: ConnectionState::Disconnected,
            link: None,
            reconnect_attempts: 0,
            malformed_streak: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Open the connection. A no-op while connecting or open.
    ///
    /// A failed attempt goes through the same disconnect handling as a
    /// dropped connection, so it schedules the next attempt itself.
    pub async fn connect<C>(&mut self, consumer: &mut C)
    where
        C: EventConsumer + ?Sized,
    {
        if self.state != ConnectionState::Disconnected {
            debug!(state = ?self.state, "connect ignored");
            return;
        }

        self.state = ConnectionState::Connecting;
        info!(endpoint = %self.endpoint, "connecting");

        match self.transport.connect(self.endpoint.url()).await {
            Ok(link) => {
                info!(endpoint = %self.endpoint, "connection open");
                self.link = Some(link);
                self.state = ConnectionState::Open;
                self.reconnect_attempts = 0;
                self.malformed_streak = 0;
                consumer.on_connection_event(ConnectionEvent::Opened);
            }
            Err(err) => {
                warn!(error = %err, "connection attempt failed");
                if consumer.session_phase().is_active() {
                    consumer.on_connection_event(ConnectionEvent::notice(
                        LogLevel::Warning,
                        "⚠️ Connection error",
                    ));
                }
                self.enter_disconnected(consumer);
            }
        }
    }

    /// Connect now on user request, forgetting earlier failed attempts.
    pub async fn reconnect<C>(&mut self, consumer: &mut C)
    where
        C: EventConsumer + ?Sized,
    {
        self.reconnect_attempts = 0;
        self.connect(consumer).await;
    }

    /// Run an action handed back by the scheduler.
    pub async fn handle_scheduled<C>(&mut self, action: ScheduledAction, consumer: &mut C)
    where
        C: EventConsumer + ?Sized,
    {
        match action {
            ScheduledAction::Reconnect => self.connect(consumer).await,
        }
    }

    /// Wait for the next frame of the open link.
    ///
    /// Pends forever while there is no link, so it can sit in a `select!`.
    pub async fn next_frame(&mut self) -> TransportFrame {
        match self.link.as_mut() {
            Some(link) => link
                .inbound
                .recv()
                .await
                .unwrap_or(TransportFrame::Closed),
            None => std::future::pending().await,
        }
    }

    /// Process one frame from the transport, in receipt order.
    pub fn handle_frame<C>(&mut self, frame: TransportFrame, consumer: &mut C)
    where
        C: EventConsumer + ?Sized,
    {
        match frame {
            TransportFrame::Text(payload) => self.handle_text(&payload, consumer),
            TransportFrame::Error(reason) => {
                warn!(%reason, "transport error");
                if consumer.session_phase().is_active() {
                    consumer.on_connection_event(ConnectionEvent::notice(
                        LogLevel::Warning,
                        "⚠️ Connection error",
                    ));
                }
            }
            TransportFrame::Closed => {
                if self.state == ConnectionState::Disconnected {
                    return;
                }
                info!(endpoint = %self.endpoint, "connection closed");
                self.enter_disconnected(consumer);
            }
        }
    }

    fn handle_text<C>(&mut self, payload: &str, consumer: &mut C)
    where
        C: EventConsumer + ?Sized,
    {
        match ServerEvent::from_json(payload) {
            Ok(event) => {
                self.malformed_streak = 0;
                consumer.on_pipeline_event(event);
            }
            Err(err) => {
                self.malformed_streak += 1;
                warn!(error = %err, streak = self.malformed_streak, "dropped malformed frame");
                consumer.on_connection_event(ConnectionEvent::notice(
                    LogLevel::Warning,
                    format!("Dropped malformed message: {err}"),
                ));

                let limit_reached = self
                    .config
                    .malformed_frame_limit
                    .is_some_and(|limit| self.malformed_streak >= limit);
                if limit_reached {
                    warn!(
                        streak = self.malformed_streak,
                        "too many malformed frames, dropping connection"
                    );
                    self.enter_disconnected(consumer);
                }
            }
        }
    }

    fn enter_disconnected<C>(&mut self, consumer: &mut C)
    where
        C: EventConsumer + ?Sized,
    {
        // Dropping the link closes the socket if it is still up.
        self.link = None;
        self.state = ConnectionState::Disconnected;
        self.malformed_streak = 0;
        consumer.on_connection_event(ConnectionEvent::Closed);

        let phase = consumer.session_phase();
        let Some(plan) = ReconnectPlan::for_phase(phase, &self.config) else {
            debug!("run completed, staying disconnected");
            return;
        };

        if let Some(max) = self.config.max_attempts {
            if self.reconnect_attempts >= max {
                warn!(attempts = self.reconnect_attempts, "reconnection attempts exhausted");
                consumer.on_connection_event(ConnectionEvent::notice(
                    LogLevel::Error,
                    format!("Giving up after {max} reconnection attempts"),
                ));
                return;
            }
        }

        self.reconnect_attempts += 1;
        debug!(delay = ?plan.delay, attempt = self.reconnect_attempts, "reconnect scheduled");
        consumer.on_connection_event(ConnectionEvent::notice(plan.level, plan.message));
        self.scheduler
            .schedule_after(plan.delay, ScheduledAction::Reconnect);
    }

    /// Send a request over the open connection.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::NotOpen`] unless the connection is open.
    pub fn send(&self, request: &ClientRequest) -> ConnectionResult<()> {
        let link = match (&self.state, &self.link) {
            (ConnectionState::Open, Some(link)) => link,
            _ => return Err(ConnectionError::NotOpen),
        };
        let payload = serde_json::to_string(request)?;
        link.outbound
            .send(payload)
            .map_err(|_| ConnectionError::NotOpen)
    }
}

impl RequestSender for ConnectionManager {
    fn send_request(&self, request: &ClientRequest) -> ConnectionResult<()> {
        self.send(request)
    }
}
