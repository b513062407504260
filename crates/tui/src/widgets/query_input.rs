//! Single-line input for the research topic.
//!
//! The cursor is tracked in characters, not bytes, so topics with
//! non-ASCII text edit correctly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::event::EventStatus;

#[derive(Debug, Clone, Default)]
pub struct QueryInput {
    input: String,
    /// Cursor position in characters.
    cursor: usize,
}

impl QueryInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map_or(self.input.len(), |(index, _)| index)
    }

    fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let index = self.byte_index();
        self.input.insert(index, c);
        self.cursor += 1;
    }

    /// Insert pasted text; line breaks become spaces.
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(if c == '\n' || c == '\r' { ' ' } else { c });
        }
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let index = self.byte_index();
            self.input.remove(index);
        }
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let index = self.byte_index();
            self.input.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    /// Apply an editing key. Keys with Control or Alt are left alone.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> EventStatus {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return EventStatus::NotConsumed;
        }

        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_count(),
            _ => return EventStatus::NotConsumed,
        }
        EventStatus::Consumed
    }

    /// Render the field; the cursor is only shown while input is accepted.
    pub fn render(&self, frame: &mut Frame, area: Rect, enabled: bool) {
        let (title, style) = if enabled {
            (
                "Research topic (Enter to start, Esc to quit)",
                Style::default().fg(Color::Yellow),
            )
        } else {
            (
                "Research topic (run in progress)",
                Style::default().fg(Color::DarkGray),
            )
        };

        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        let paragraph = Paragraph::new(format!("> {}", self.input))
            .style(style)
            .block(block);
        frame.render_widget(paragraph, area);

        if enabled && inner.width > 0 {
            let offset = u16::try_from(self.cursor + 2).unwrap_or(u16::MAX);
            let x = inner.x.saturating_add(offset).min(inner.right().saturating_sub(1));
            frame.set_cursor_position(Position::new(x, inner.y));
        }
    }
}
