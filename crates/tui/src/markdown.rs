//! Markdown to plain terminal text.
//!
//! The report panel cannot show HTML, so the TUI plugs this renderer into
//! the report accumulator instead. Headings are marked with
//! [`HEADING_MARKER`] so the report widget can style them.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use rmon_core::report::render::markdown_options;
use rmon_core::report::{MarkdownRenderer, RenderError};

/// Prefix of every heading line in the rendered text.
pub const HEADING_MARKER: &str = "▌ ";

/// Text appended while the report is still streaming.
pub const PROGRESS_ANNOTATION: &str = "✍️ Generating...";

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer;

impl MarkdownRenderer for TerminalRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let mut out = String::new();
        // one entry per open list: next number, or None for bullets
        let mut lists: Vec<Option<u64>> = Vec::new();
        let mut in_code_block = false;

        for event in Parser::new_ext(markdown, markdown_options()) {
            match event {
                Event::Start(Tag::Heading { .. }) => {
                    start_block(&mut out);
                    out.push_str(HEADING_MARKER);
                }
                Event::Start(Tag::Paragraph) => {
                    if lists.is_empty() {
                        start_block(&mut out);
                    }
                }
                Event::Start(Tag::CodeBlock(_)) => {
                    start_block(&mut out);
                    in_code_block = true;
                }
                Event::End(TagEnd::CodeBlock) => in_code_block = false,
                Event::Start(Tag::List(first)) => {
                    if lists.is_empty() {
                        start_block(&mut out);
                    }
                    lists.push(first);
                }
                Event::End(TagEnd::List(_)) => {
                    lists.pop();
                }
                Event::Start(Tag::Item) => {
                    start_line(&mut out);
                    out.push_str(&"  ".repeat(lists.len().saturating_sub(1)));
                    match lists.last_mut() {
                        Some(Some(number)) => {
                            out.push_str(&format!("{number}. "));
                            *number += 1;
                        }
                        _ => out.push_str("• "),
                    }
                }
                Event::TaskListMarker(done) => out.push_str(if done { "[x] " } else { "[ ] " }),
                Event::Start(Tag::Table(_)) => start_block(&mut out),
                Event::End(TagEnd::TableHead | TagEnd::TableRow) => out.push('\n'),
                Event::End(TagEnd::TableCell) => out.push_str(" | "),
                Event::Text(text) if in_code_block => {
                    for line in text.lines() {
                        out.push_str("    ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                Event::Text(text) => out.push_str(&text),
                Event::Code(code) => {
                    out.push('`');
                    out.push_str(&code);
                    out.push('`');
                }
                Event::SoftBreak | Event::HardBreak => out.push('\n'),
                Event::Rule => {
                    start_block(&mut out);
                    out.push_str("────────");
                }
                _ => {}
            }
        }

        Ok(out.trim_end().to_string())
    }

    fn progress_annotation(&self) -> String {
        format!("\n\n{PROGRESS_ANNOTATION}")
    }
}

/// Separate a new block from previous output by one blank line.
fn start_block(out: &mut String) {
    if out.is_empty() {
        return;
    }
    while !out.ends_with("\n\n") {
        out.push('\n');
    }
}

fn start_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}
