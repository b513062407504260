//! `research-monitor run`: one query, no terminal UI.

use color_eyre::eyre::{bail, eyre, Result};
use colored::Colorize;
use rmon_core::config::AppConfig;
use rmon_core::report::{HtmlRenderer, MarkdownRenderer};
use rmon_core::{Monitor, SubmitOutcome};
use rmon_tui::TerminalRenderer;

use crate::console::ConsoleView;

/// What the headless loop should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Submit,
    Wait,
    Finished,
}

/// Tracks one query from submission to the end of its run.
#[derive(Debug, Default)]
struct RunTracker {
    submitted: bool,
    started: bool,
}

impl RunTracker {
    fn step(&mut self, connected: bool, run_active: bool) -> Step {
        if run_active {
            self.started = true;
            return Step::Wait;
        }
        if self.started {
            return Step::Finished;
        }
        if self.submitted && !connected {
            // the request was lost with the socket before the run began
            tracing::info!("connection lost before the run started, will resubmit");
            self.submitted = false;
        }
        if connected && !self.submitted {
            Step::Submit
        } else {
            Step::Wait
        }
    }

    fn mark_submitted(&mut self) {
        self.submitted = true;
    }
}

/// Submit `query` once the connection is open and follow the run to its end.
pub async fn run_headless(config: &AppConfig, query: &str, html: bool) -> Result<()> {
    let renderer: Box<dyn MarkdownRenderer> = if html {
        Box::new(HtmlRenderer)
    } else {
        Box::new(TerminalRenderer)
    };
    let mut monitor = Monitor::new(config, ConsoleView::new(), renderer).map_err(|e| eyre!(e))?;
    monitor.start().await;

    let mut tracker = RunTracker::default();
    loop {
        let connected = monitor.connection().is_open();
        let run_active = monitor.coordinator().state().session.is_active();
        match tracker.step(connected, run_active) {
            Step::Finished => break,
            Step::Submit => match monitor.submit(query) {
                SubmitOutcome::Sent => tracker.mark_submitted(),
                SubmitOutcome::Rejected => bail!("query was not submitted"),
                // retried once the connection comes back
                SubmitOutcome::Failed => {}
            },
            Step::Wait => {}
        }

        tokio::select! {
            signal = monitor.next_signal() => monitor.handle_signal(signal).await,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("{}", "Interrupted".yellow());
                return Ok(());
            }
        }
    }

    let view = monitor.coordinator().view();
    view.print_report();
    view.print_summary();

    if monitor.coordinator().state().session.is_completed() {
        Ok(())
    } else {
        bail!("research run failed")
    }
}
