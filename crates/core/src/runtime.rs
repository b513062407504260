//! Runtime loop glue shared by the terminal UI and the headless runner.
//!
//! [`Monitor`] owns the connection manager, the coordinator and the
//! scheduler channel. Front ends call [`Monitor::next_signal`] inside their
//! own `tokio::select!` (next to user input) and feed the result back into
//! [`Monitor::handle_signal`]. Everything runs on one task.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::config::AppConfig;
use crate::connection::{
    ConnectionManager, Endpoint, ScheduledAction, Scheduler, TokioScheduler, Transport,
    TransportFrame, WebSocketTransport,
};
use crate::coordinator::{Coordinator, SubmitOutcome};
use crate::report::MarkdownRenderer;
use crate::view::ViewPort;

/// Period of the elapsed-time clock.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One wake-up of the monitor.
#[derive(Debug)]
pub enum MonitorSignal {
    Frame(TransportFrame),
    Scheduled(ScheduledAction),
    Tick,
}

pub struct Monitor<V: ViewPort> {
    connection: ConnectionManager,
    coordinator: Coordinator<V>,
    scheduled_rx: UnboundedReceiver<ScheduledAction>,
    ticker: Interval,
}

impl<V: ViewPort> Monitor<V> {
    /// Build a monitor talking WebSocket to the configured server.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        config: &AppConfig,
        view: V,
        renderer: Box<dyn MarkdownRenderer>,
    ) -> anyhow::Result<Self> {
        let endpoint = Endpoint::from_base(&config.monitor.server)
            .with_context(|| format!("invalid server address '{}'", config.monitor.server))?;
        let (scheduler, scheduled_rx) = TokioScheduler::new();

        Ok(Self::with_parts(
            config,
            endpoint,
            Arc::new(WebSocketTransport),
            Arc::new(scheduler),
            scheduled_rx,
            view,
            renderer,
        ))
    }

    /// Build a monitor from explicit parts, e.g. a fake transport.
    pub fn with_parts(
        config: &AppConfig,
        endpoint: Endpoint,
        transport: Arc<dyn Transport>,
        scheduler: Arc<dyn Scheduler>,
        scheduled_rx: UnboundedReceiver<ScheduledAction>,
        view: V,
        renderer: Box<dyn MarkdownRenderer>,
    ) -> Self {
        let connection = ConnectionManager::new(
            endpoint,
            transport,
            scheduler,
            config.monitor.reconnect.clone(),
        );
        let coordinator = Coordinator::new(Arc::new(config.layout.clone()), view, renderer);

        let mut ticker = interval(TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            connection,
            coordinator,
            scheduled_rx,
            ticker,
        }
    }

    pub fn coordinator(&self) -> &Coordinator<V> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut Coordinator<V> {
        &mut self.coordinator
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Open the first connection.
    pub async fn start(&mut self) {
        self.connection.connect(&mut self.coordinator).await;
    }

    /// Manually reconnect, e.g. after the retry budget ran out.
    pub async fn reconnect(&mut self) {
        self.connection.reconnect(&mut self.coordinator).await;
    }

    /// Wait for the next frame, scheduled action or clock tick.
    ///
    /// Cancel-safe, so it can be one branch of a caller's `select!`.
    pub async fn next_signal(&mut self) -> MonitorSignal {
        tokio::select! {
            frame = self.connection.next_frame() => MonitorSignal::Frame(frame),
            Some(action) = self.scheduled_rx.recv() => MonitorSignal::Scheduled(action),
            _ = self.ticker.tick() => MonitorSignal::Tick,
        }
    }

    pub async fn handle_signal(&mut self, signal: MonitorSignal) {
        match signal {
            MonitorSignal::Frame(frame) => {
                self.connection.handle_frame(frame, &mut self.coordinator);
            }
            MonitorSignal::Scheduled(action) => {
                self.connection
                    .handle_scheduled(action, &mut self.coordinator)
                    .await;
            }
            MonitorSignal::Tick => self.coordinator.tick(Utc::now()),
        }
    }

    /// Submit a research query typed by the user.
    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        self.coordinator.submit(input, &self.connection)
    }
}
