//! A view port that keeps every update for assertions.

use rmon_core::graph::{GraphView, ProgressSummary};
use rmon_core::{ConnectionStatus, LogEntry, LogLevel, ViewPort};

#[derive(Debug, Default)]
pub struct RecordingView {
    pub submission_enabled: Option<bool>,
    pub input_cleared: usize,
    pub logs: Vec<LogEntry>,
    pub connection: ConnectionStatus,
    pub elapsed: String,
    pub progress: Option<ProgressSummary>,
    pub report_visible: bool,
    pub report: String,
    pub graph: Option<GraphView>,
    pub graph_renders: usize,
    pub notices: Vec<String>,
}

#[allow(dead_code)]
impl RecordingView {
    pub fn progress_text(&self) -> String {
        self.progress.map(|p| p.to_string()).unwrap_or_default()
    }

    pub fn messages(&self, level: LogLevel) -> Vec<&str> {
        self.logs
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.as_str())
            .collect()
    }
}

impl ViewPort for RecordingView {
    fn set_submission_enabled(&mut self, enabled: bool) {
        self.submission_enabled = Some(enabled);
    }

    fn clear_input(&mut self) {
        self.input_cleared += 1;
    }

    fn append_log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
    }

    fn set_connection_status(&mut self, status: ConnectionStatus) {
        self.connection = status;
    }

    fn set_elapsed(&mut self, elapsed: &str) {
        self.elapsed = elapsed.to_string();
    }

    fn set_progress(&mut self, progress: ProgressSummary) {
        self.progress = Some(progress);
    }

    fn set_report_visible(&mut self, visible: bool) {
        self.report_visible = visible;
    }

    fn set_report_content(&mut self, markup: &str) {
        self.report = markup.to_string();
    }

    fn render_graph(&mut self, graph: &GraphView) {
        self.graph = Some(graph.clone());
        self.graph_renders += 1;
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
