//! Plain console output for headless runs.
//!
//! [`ConsoleView`] prints log lines as they arrive and keeps the rest of
//! the view state so the caller can print the report at the end.

use colored::Colorize;
use rmon_core::graph::{GraphView, ProgressSummary};
use rmon_core::{ConnectionStatus, LogEntry, LogLevel, ViewPort};

#[derive(Debug, Default)]
pub struct ConsoleView {
    elapsed: String,
    progress: ProgressSummary,
    report: String,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> &str {
        &self.report
    }

    pub fn print_report(&self) {
        let report = self.report();
        if report.trim().is_empty() {
            return;
        }
        println!();
        println!("{}", "═══ Report ═══".bright_cyan().bold());
        println!("{report}");
    }

    pub fn print_summary(&self) {
        println!(
            "{} {} stages in {}",
            "Finished:".bold(),
            self.progress,
            self.elapsed
        );
    }
}

fn format_entry(entry: &LogEntry) -> String {
    let stamp = format!("[{}]", entry.at.format("%H:%M:%S")).dimmed();
    let message = match entry.level {
        LogLevel::Info => entry.message.normal(),
        LogLevel::Success => entry.message.green(),
        LogLevel::Warning => entry.message.yellow(),
        LogLevel::Error => entry.message.red().bold(),
        LogLevel::Stream => entry.message.dimmed(),
    };
    format!("{stamp} {message}")
}

impl ViewPort for ConsoleView {
    fn set_submission_enabled(&mut self, _enabled: bool) {}

    fn clear_input(&mut self) {}

    fn append_log(&mut self, entry: LogEntry) {
        println!("{}", format_entry(&entry));
    }

    fn set_connection_status(&mut self, _status: ConnectionStatus) {}

    fn set_elapsed(&mut self, elapsed: &str) {
        self.elapsed = elapsed.to_string();
    }

    fn set_progress(&mut self, progress: ProgressSummary) {
        if progress.completed > self.progress.completed {
            println!("{}", format!("  progress {progress}").dimmed());
        }
        self.progress = progress;
    }

    fn set_report_visible(&mut self, _visible: bool) {}

    fn set_report_content(&mut self, markup: &str) {
        self.report = markup.to_string();
    }

    fn render_graph(&mut self, _graph: &GraphView) {}

    fn notify(&mut self, message: &str) {
        eprintln!("{}", message.yellow().bold());
    }
}
