//! Final report panel.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::markdown::{HEADING_MARKER, PROGRESS_ANNOTATION};

fn styled_line(line: &str) -> Line<'static> {
    if line.starts_with(HEADING_MARKER) {
        Line::from(Span::styled(
            line.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
    } else if line == PROGRESS_ANNOTATION {
        Line::from(Span::styled(
            line.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(line.to_string())
    }
}

/// Render the report text, scrolled down by `scroll` lines.
pub fn render_report(frame: &mut Frame, area: Rect, report: &str, scroll: u16) {
    let lines: Vec<Line> = report.lines().map(styled_line).collect();

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Report (PgUp/PgDn to scroll)"),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}
