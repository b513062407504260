//! View port: the presentation surface driven by the coordinator.
//!
//! The engine never touches a concrete UI. Each named element of the
//! monitor (submission control, live log, graph, report...) is a setter on
//! [`ViewPort`], so the terminal UI, the headless console and tests can all
//! plug in their own implementation.

use chrono::{DateTime, Local};

use crate::graph::{GraphView, ProgressSummary};

/// Severity of a live-log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    /// Intermediate output streamed by a non-report stage.
    Stream,
}

/// One line of the live log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            level,
            message: message.into(),
        }
    }
}

/// Connection indicator shown in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected,
}

/// Named setters for every view element the engine updates.
pub trait ViewPort {
    /// Enable or disable the query submission control.
    fn set_submission_enabled(&mut self, enabled: bool);

    /// Clear the query input after a successful submission.
    fn clear_input(&mut self);

    fn append_log(&mut self, entry: LogEntry);

    fn set_connection_status(&mut self, status: ConnectionStatus);

    /// Elapsed run time, already formatted as `mm:ss`.
    fn set_elapsed(&mut self, elapsed: &str);

    fn set_progress(&mut self, progress: ProgressSummary);

    fn set_report_visible(&mut self, visible: bool);

    /// Replace the report region with freshly rendered markup.
    fn set_report_content(&mut self, markup: &str);

    /// Replace the whole graph. Called after every topology or status change.
    fn render_graph(&mut self, graph: &GraphView);

    /// Show a blocking notice to the user (e.g. validation failures).
    fn notify(&mut self, message: &str);
}
