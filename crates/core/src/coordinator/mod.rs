//! Execution coordinator.
//!
//! Dispatches every [`ServerEvent`] into the run state (session, graph and
//! report) and pushes the result to the [`ViewPort`]. Handlers run one at a
//! time, in delivery order, each finishing its mutation before returning.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rmon_protocol::{
    ClientRequest, CompletionSummary, PipelineLayout, ServerEvent, StageStatus,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::connection::{ConnectionEvent, EventConsumer, RequestSender};
use crate::graph::{GraphState, StatusChange};
use crate::report::{MarkdownRenderer, ReportAccumulator};
use crate::session::{format_elapsed, RunSession, SessionPhase};
use crate::view::{ConnectionStatus, LogEntry, LogLevel, ViewPort};

/// Everything a run mutates, owned in one place.
#[derive(Debug, Clone)]
pub struct RunState {
    pub session: RunSession,
    pub graph: GraphState,
    pub report: ReportAccumulator,
}

impl RunState {
    pub fn new(layout: Arc<PipelineLayout>) -> Self {
        let report = ReportAccumulator::new(layout.report_stage.clone());
        Self {
            session: RunSession::default(),
            graph: GraphState::new(layout),
            report,
        }
    }
}

/// Result of a user submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Refused locally; nothing was sent.
    Rejected,
    Sent,
    /// The connection refused the request; the input is kept.
    Failed,
}

pub struct Coordinator<V: ViewPort> {
    layout: Arc<PipelineLayout>,
    state: RunState,
    view: V,
    renderer: Box<dyn MarkdownRenderer>,
}

impl<V: ViewPort> Coordinator<V> {
    pub fn new(layout: Arc<PipelineLayout>, view: V, renderer: Box<dyn MarkdownRenderer>) -> Self {
        let state = RunState::new(Arc::clone(&layout));
        let mut coordinator = Self {
            layout,
            state,
            view,
            renderer,
        };
        coordinator.refresh_graph();
        coordinator.view.set_elapsed(&format_elapsed(0));
        coordinator.view.set_submission_enabled(true);
        coordinator
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn layout(&self) -> &PipelineLayout {
        &self.layout
    }

    /// Single entry point for pipeline events.
    pub fn handle_event(&mut self, event: ServerEvent) {
        debug!(kind = ?event.kind(), stage_id = event.stage_id(), "dispatching event");
        match event {
            ServerEvent::RunStarted => self.on_run_start(),
            ServerEvent::StageStarted { stage_id } => self.on_stage_start(&stage_id),
            ServerEvent::StageCompleted {
                stage_id,
                auxiliary,
            } => self.on_stage_complete(&stage_id, auxiliary.as_ref()),
            ServerEvent::StreamChunk { stage_id, chunk } => self.on_stream_chunk(&stage_id, &chunk),
            ServerEvent::StageFailed { stage_id, message } => {
                self.on_stage_error(stage_id.as_deref(), &message)
            }
            ServerEvent::RunCompleted => self.on_run_complete(),
        }
    }

    /// Periodic clock update; only renders while a run is ticking.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if !self.state.session.is_ticking() {
            return;
        }
        if let Some(secs) = self.state.session.elapsed_secs(now) {
            self.view.set_elapsed(&format_elapsed(secs));
        }
    }

    /// Validate a query and hand it to the connection.
    pub fn submit(&mut self, input: &str, sender: &dyn RequestSender) -> SubmitOutcome {
        let query = input.trim();
        if query.is_empty() {
            self.view.notify("Enter a topic to research");
            return SubmitOutcome::Rejected;
        }
        if self.state.session.is_active() {
            self.view.notify("A research run is already in progress");
            return SubmitOutcome::Rejected;
        }

        let request = ClientRequest::Research {
            query: query.to_string(),
        };
        match sender.send_request(&request) {
            Ok(()) => {
                info!(query, "research request sent");
                self.view.clear_input();
                SubmitOutcome::Sent
            }
            Err(err) => {
                debug!(error = %err, "research request not sent");
                self.log(LogLevel::Error, "❌ No connection to the server");
                SubmitOutcome::Failed
            }
        }
    }

    fn on_run_start(&mut self) {
        self.state.session.start(Utc::now());
        self.state.graph.reset();
        self.state.report.clear();

        self.view.set_elapsed(&format_elapsed(0));
        self.view.set_submission_enabled(false);
        self.view.set_report_visible(false);
        self.view.set_report_content("");
        self.refresh_graph();
        self.log(LogLevel::Info, "🚀 Research started");
    }

    fn on_stage_start(&mut self, stage_id: &str) {
        let name = self.layout.display_name(stage_id);

        if self.layout.is_branch(stage_id) {
            self.state.graph.ensure_dynamic_stage(stage_id);
            self.log(LogLevel::Info, format!("{name}: parallel branch started"));
        } else {
            self.log(LogLevel::Info, format!("{name}: started"));
        }

        // a repeated start must not wipe a report that already finished
        let change = self.set_status(stage_id, StageStatus::Active);
        if change == StatusChange::Applied && self.state.report.begin_stage(stage_id) {
            self.view.set_report_visible(true);
            self.render_report();
        }
    }

    fn on_stage_complete(&mut self, stage_id: &str, auxiliary: Option<&Map<String, Value>>) {
        self.set_status(stage_id, StageStatus::Completed);

        let summary = self.completion_message(stage_id, auxiliary);
        self.log(LogLevel::Success, summary);

        if self.state.report.finalize(stage_id) {
            self.render_report();
        }
    }

    fn on_stream_chunk(&mut self, stage_id: &str, chunk: &str) {
        if self.state.report.append_chunk(stage_id, chunk) {
            self.render_report();
            return;
        }

        if !chunk.trim().is_empty() {
            let name = self.layout.display_name(stage_id);
            self.log(LogLevel::Stream, format!("{name}: {chunk}"));
        }
    }

    fn on_stage_error(&mut self, stage_id: Option<&str>, message: &str) {
        let name = match stage_id {
            Some(id) => {
                self.set_status(id, StageStatus::Failed);
                if self.state.report.finalize(id) {
                    self.render_report();
                }
                self.layout.display_name(id)
            }
            None => "pipeline".to_string(),
        };

        self.state.session.abort();
        self.view.set_submission_enabled(true);

        let message = if message.is_empty() {
            "unknown error"
        } else {
            message
        };
        self.log(LogLevel::Error, format!("❌ {name}: {message}"));
    }

    fn on_run_complete(&mut self) {
        if let Some(secs) = self.state.session.elapsed_secs(Utc::now()) {
            self.view.set_elapsed(&format_elapsed(secs));
        }
        self.state.session.complete();
        self.view.set_submission_enabled(true);
        self.log(LogLevel::Success, "🎉 Research complete");
    }

    fn completion_message(
        &self,
        stage_id: &str,
        auxiliary: Option<&Map<String, Value>>,
    ) -> String {
        let name = self.layout.display_name(stage_id);

        if self.layout.is_branch(stage_id) {
            return format!("✅ {name}: branch complete");
        }

        let completion = self
            .layout
            .definition(stage_id)
            .map(|definition| &definition.completion);

        match completion {
            Some(CompletionSummary::AuxiliaryCount { key, label }) => {
                let count = auxiliary
                    .and_then(|data| data.get(key))
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                format!("✅ {name}: {count} {label}")
            }
            Some(CompletionSummary::BranchCount { label }) => {
                let count = self.state.graph.branch_count();
                format!("✅ {name}: {count} {label}")
            }
            Some(CompletionSummary::Generic) | None => format!("✅ {name}: done"),
        }
    }

    fn set_status(&mut self, stage_id: &str, status: StageStatus) -> StatusChange {
        let change = self
            .state
            .graph
            .set_status(stage_id, status, status.default_label());
        if change == StatusChange::Applied {
            self.refresh_graph();
        }
        change
    }

    fn refresh_graph(&mut self) {
        let snapshot = self.state.graph.snapshot();
        self.view.render_graph(&snapshot);
        self.view.set_progress(self.state.graph.progress_summary());
    }

    fn render_report(&mut self) {
        let rendered = self.state.report.render(self.renderer.as_ref());
        self.view.set_report_content(&rendered.markup);
    }

    fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.view.append_log(LogEntry::new(level, message));
    }
}

impl<V: ViewPort> EventConsumer for Coordinator<V> {
    fn session_phase(&self) -> SessionPhase {
        self.state.session.phase()
    }

    fn on_pipeline_event(&mut self, event: ServerEvent) {
        self.handle_event(event);
    }

    fn on_connection_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Opened => {
                self.view.set_connection_status(ConnectionStatus::Connected);
                self.log(LogLevel::Success, "Connection established");
            }
            ConnectionEvent::Closed => {
                self.view
                    .set_connection_status(ConnectionStatus::Disconnected);
            }
            ConnectionEvent::Notice { level, message } => self.log(level, message),
        }
    }
}
