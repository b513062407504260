//! Pipeline graph rendered as a table of stages.
//!
//! Stages are listed in graph order; in the branching layout the branch
//! stages are indented where the placeholder stage they replace was.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;
use rmon_core::graph::{GraphView, Topology};
use rmon_protocol::{Stage, StageKind, StageStatus};

pub fn status_style(status: StageStatus) -> Style {
    match status {
        StageStatus::Pending => Style::default().fg(Color::DarkGray),
        StageStatus::Active => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        StageStatus::Completed => Style::default().fg(Color::Green),
        StageStatus::Failed => Style::default().fg(Color::Red),
    }
}

fn title(graph: &GraphView) -> String {
    match graph.topology {
        Topology::Linear => "Pipeline".to_string(),
        Topology::Branching => format!("Pipeline - {} parallel branches", graph.branch_count),
    }
}

fn stage_row(stage: &Stage) -> Row<'_> {
    let name = match stage.kind {
        StageKind::Static => stage.display_name.clone(),
        StageKind::Dynamic => format!("  ↳ {}", stage.display_name),
    };

    Row::new(vec![
        Cell::from(stage.icon.clone().unwrap_or_default()),
        Cell::from(name),
        Cell::from(stage.status_label.clone()).style(status_style(stage.status)),
    ])
}

/// Render the graph, or an empty table before the first snapshot.
pub fn render_graph(frame: &mut Frame, area: Rect, graph: Option<&GraphView>) {
    let rows: Vec<Row> = graph
        .map(|graph| graph.stages.iter().map(stage_row).collect())
        .unwrap_or_default();

    let header = Row::new(vec![Cell::from(""), Cell::from("Stage"), Cell::from("Status")]).style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Cyan),
    );

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(graph.map(title).unwrap_or_else(|| "Pipeline".to_string())),
    );

    frame.render_widget(table, area);
}
