//! Terminal implementation of the engine's [`ViewPort`].
//!
//! [`TuiView`] only stores what the coordinator hands it; drawing happens
//! in [`TuiView::render`] whenever the app asks for a frame.

use std::collections::VecDeque;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use rmon_core::graph::{GraphView, ProgressSummary};
use rmon_core::{ConnectionStatus, LogEntry, ViewPort};

use crate::widgets::graph_view::render_graph;
use crate::widgets::report_view::render_report;
use crate::widgets::status_bar::StatusBar;
use crate::widgets::{LogView, QueryInput};

/// Oldest log lines are dropped past this count.
pub const MAX_LOG_LINES: usize = 1000;

#[derive(Debug)]
pub struct TuiView {
    pub input: QueryInput,
    submission_enabled: bool,
    logs: VecDeque<LogEntry>,
    pub log_view: LogView,
    connection: ConnectionStatus,
    elapsed: String,
    progress: ProgressSummary,
    report_visible: bool,
    report: String,
    report_scroll: u16,
    graph: Option<GraphView>,
    notice: Option<String>,
}

impl Default for TuiView {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiView {
    pub fn new() -> Self {
        Self {
            input: QueryInput::new(),
            submission_enabled: true,
            logs: VecDeque::new(),
            log_view: LogView::new(),
            connection: ConnectionStatus::Disconnected,
            elapsed: "00:00".to_string(),
            progress: ProgressSummary::default(),
            report_visible: false,
            report: String::new(),
            report_scroll: 0,
            graph: None,
            notice: None,
        }
    }

    pub fn submission_enabled(&self) -> bool {
        self.submission_enabled
    }

    pub fn logs(&self) -> &VecDeque<LogEntry> {
        &self.logs
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn elapsed(&self) -> &str {
        &self.elapsed
    }

    pub fn progress(&self) -> ProgressSummary {
        self.progress
    }

    pub fn is_report_visible(&self) -> bool {
        self.report_visible
    }

    pub fn report(&self) -> &str {
        &self.report
    }

    pub fn graph(&self) -> Option<&GraphView> {
        self.graph.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn scroll_log_up(&mut self, lines: usize) {
        self.log_view.scroll_up(lines, self.logs.len());
    }

    pub fn scroll_log_down(&mut self, lines: usize) {
        self.log_view.scroll_down(lines);
    }

    pub fn scroll_report_up(&mut self, lines: u16) {
        self.report_scroll = self.report_scroll.saturating_sub(lines);
    }

    pub fn scroll_report_down(&mut self, lines: u16) {
        let max = u16::try_from(self.report.lines().count()).unwrap_or(u16::MAX);
        self.report_scroll = self.report_scroll.saturating_add(lines).min(max);
    }

    /// Draw the whole monitor into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(frame.area());

        StatusBar {
            connection: self.connection,
            elapsed: &self.elapsed,
            progress: self.progress,
            notice: self.notice.as_deref(),
        }
        .render(frame, rows[0]);

        self.render_body(frame, rows[1]);
        self.input.render(frame, rows[2], self.submission_enabled);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        if self.report_visible {
            let left = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(columns[0]);
            render_graph(frame, left[0], self.graph.as_ref());
            self.log_view.render(frame, left[1], &self.logs);
            render_report(frame, columns[1], &self.report, self.report_scroll);
        } else {
            render_graph(frame, columns[0], self.graph.as_ref());
            self.log_view.render(frame, columns[1], &self.logs);
        }
    }
}

impl ViewPort for TuiView {
    fn set_submission_enabled(&mut self, enabled: bool) {
        self.submission_enabled = enabled;
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn append_log(&mut self, entry: LogEntry) {
        self.logs.push_back(entry);
        if self.logs.len() > MAX_LOG_LINES {
            self.logs.pop_front();
        }
        if !self.log_view.is_following() {
            // keep a scrolled view pinned to the same lines
            self.log_view.scroll_up(1, self.logs.len());
        }
    }

    fn set_connection_status(&mut self, status: ConnectionStatus) {
        self.connection = status;
    }

    fn set_elapsed(&mut self, elapsed: &str) {
        self.elapsed = elapsed.to_string();
    }

    fn set_progress(&mut self, progress: ProgressSummary) {
        self.progress = progress;
    }

    fn set_report_visible(&mut self, visible: bool) {
        self.report_visible = visible;
    }

    fn set_report_content(&mut self, markup: &str) {
        if markup.is_empty() {
            self.report_scroll = 0;
        }
        self.report = markup.to_string();
    }

    fn render_graph(&mut self, graph: &GraphView) {
        self.graph = Some(graph.clone());
    }

    fn notify(&mut self, message: &str) {
        self.notice = Some(message.to_string());
    }
}
