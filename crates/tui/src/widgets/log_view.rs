//! Live log panel with scrolling support.
//!
//! The panel follows the newest entry until the user scrolls up. Scrolling
//! is counted from the bottom so new entries do not move a scrolled view
//! out from under the reader.

use std::collections::VecDeque;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use rmon_core::{LogEntry, LogLevel};

/// Scroll state of the live log.
#[derive(Debug, Default)]
pub struct LogView {
    /// Lines scrolled up from the newest entry; 0 follows the tail.
    from_bottom: usize,
}

impl LogView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_following(&self) -> bool {
        self.from_bottom == 0
    }

    pub fn scroll_up(&mut self, lines: usize, total: usize) {
        self.from_bottom = (self.from_bottom + lines).min(total.saturating_sub(1));
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.from_bottom = self.from_bottom.saturating_sub(lines);
    }

    pub fn follow(&mut self) {
        self.from_bottom = 0;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, entries: &VecDeque<LogEntry>) {
        let title = if self.is_following() {
            "Live log".to_string()
        } else {
            format!("Live log (scrolled, {} newer)", self.from_bottom)
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        let visible = area.height.saturating_sub(2) as usize;
        let total = entries.len();
        let end = total.saturating_sub(self.from_bottom);
        let start = end.saturating_sub(visible);

        let lines: Vec<Line> = entries
            .iter()
            .skip(start)
            .take(end - start)
            .map(log_line)
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);

        if total > visible {
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(total.saturating_sub(visible))
                .viewport_content_length(visible)
                .position(start);
            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));
            frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
        }
    }
}

fn level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Info => Style::default().fg(Color::White),
        LogLevel::Success => Style::default().fg(Color::Green),
        LogLevel::Warning => Style::default().fg(Color::Yellow),
        LogLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        LogLevel::Stream => Style::default().fg(Color::DarkGray),
    }
}

fn log_line(entry: &LogEntry) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("[{}] ", entry.at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(entry.message.clone(), level_style(entry.level)),
    ])
}
