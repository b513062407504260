//! Header line: connection indicator, elapsed time and progress.
//!
//! A pending notice replaces the key hints until the next key press.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rmon_core::graph::ProgressSummary;
use rmon_core::ConnectionStatus;

pub struct StatusBar<'a> {
    pub connection: ConnectionStatus,
    pub elapsed: &'a str,
    pub progress: ProgressSummary,
    pub notice: Option<&'a str>,
}

impl StatusBar<'_> {
    fn connection_span(&self) -> Span<'static> {
        match self.connection {
            ConnectionStatus::Connected => {
                Span::styled("● Connected", Style::default().fg(Color::Green))
            }
            ConnectionStatus::Disconnected => {
                Span::styled("○ Disconnected", Style::default().fg(Color::Red))
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let separator = Span::styled("  │  ", Style::default().fg(Color::DarkGray));

        let mut spans = vec![
            self.connection_span(),
            separator.clone(),
            Span::raw(format!("⏱ {}", self.elapsed)),
            separator.clone(),
            Span::raw(format!("Progress {}", self.progress)),
            separator,
        ];

        match self.notice {
            Some(notice) => spans.push(Span::styled(
                notice.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            None => spans.push(Span::styled(
                "Ctrl+R reconnect · ↑/↓ log · Esc quit",
                Style::default().fg(Color::DarkGray),
            )),
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
