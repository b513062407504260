//! Markdown rendering for the streamed report.
//!
//! The accumulator hands cleaned markdown to a [`MarkdownRenderer`]. When the
//! renderer fails, [`fallback_markup`] produces a minimal HTML rendition that
//! cannot fail.

use pulldown_cmark::{html, Options, Parser};
use thiserror::Error;

/// Errors reported by a markdown renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("markdown renderer unavailable: {0}")]
    Unavailable(String),

    #[error("failed to render markdown: {0}")]
    Failed(String),
}

/// Converts markdown into the markup shown in the report region.
pub trait MarkdownRenderer: Send {
    /// Render a complete or partial markdown document.
    fn render(&self, markdown: &str) -> Result<String, RenderError>;

    /// Appended to the markup while the report is still streaming.
    fn progress_annotation(&self) -> String {
        r#"<div class="report-progress">✍️ Generating...</div>"#.to_string()
    }
}

/// HTML renderer backed by pulldown-cmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl MarkdownRenderer for HtmlRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let parser = Parser::new_ext(markdown, markdown_options());
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}

/// Extensions matching what the report generator emits.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Remove code-fence markers the generator wraps around the whole report.
///
/// Every "```markdown" and "```" marker is dropped together with one
/// directly following newline.
pub fn strip_wrapper_fences(text: &str) -> String {
    text.replace("```markdown\n", "")
        .replace("```markdown", "")
        .replace("```\n", "")
        .replace("```", "")
}

/// Minimal deterministic markdown-to-HTML substitution.
///
/// Covers `#`, `##` and `###` headings at line start and `**bold**`
/// spans; lines are joined with `<br>`.
pub fn fallback_markup(markdown: &str) -> String {
    markdown
        .split('\n')
        .map(|line| embolden(&heading(line)))
        .collect::<Vec<_>>()
        .join("<br>")
}

fn heading(line: &str) -> String {
    for (prefix, tag) in [("# ", "h1"), ("## ", "h2"), ("### ", "h3")] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return format!("<{tag}>{rest}</{tag}>");
        }
    }
    line.to_string()
}

fn embolden(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str("<strong>");
        out.push_str(&after_open[..close]);
        out.push_str("</strong>");
        rest = &after_open[close + 2..];
    }

    out.push_str(rest);
    out
}
