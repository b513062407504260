//! Report accumulator.
//!
//! Collects the chunks streamed by the report-producing stage into a single
//! append-only buffer and renders it on demand. Chunks from any other stage
//! never touch the buffer.

pub mod render;

use tracing::{debug, warn};

pub use render::{
    fallback_markup, strip_wrapper_fences, HtmlRenderer, MarkdownRenderer, RenderError,
};

/// Output of a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub markup: String,
    /// The stage is still streaming; `markup` ends with the progress annotation.
    pub in_progress: bool,
    /// The renderer failed and the fallback substitution was used.
    pub used_fallback: bool,
}

#[derive(Debug, Clone)]
pub struct ReportAccumulator {
    report_stage: String,
    active_stage: Option<String>,
    text: String,
}

impl ReportAccumulator {
    /// Create an accumulator for the given report-producing stage id.
    pub fn new(report_stage: impl Into<String>) -> Self {
        Self {
            report_stage: report_stage.into(),
            active_stage: None,
            text: String::new(),
        }
    }

    pub fn report_stage(&self) -> &str {
        &self.report_stage
    }

    /// The stage currently streaming into the buffer.
    pub fn active_stage(&self) -> Option<&str> {
        self.active_stage.as_deref()
    }

    pub fn is_streaming(&self) -> bool {
        self.active_stage.is_some()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Start accumulating for `stage_id` with an empty buffer.
    ///
    /// Only the report-producing stage can be started; returns whether the
    /// call had an effect.
    pub fn begin_stage(&mut self, stage_id: &str) -> bool {
        if stage_id != self.report_stage {
            debug!(stage_id, "begin ignored for non-report stage");
            return false;
        }
        self.active_stage = Some(stage_id.to_string());
        self.text.clear();
        true
    }

    /// Append `chunk` verbatim if `stage_id` is the active stage.
    pub fn append_chunk(&mut self, stage_id: &str, chunk: &str) -> bool {
        if self.active_stage.as_deref() != Some(stage_id) {
            return false;
        }
        self.text.push_str(chunk);
        true
    }

    /// Stop streaming. The buffer keeps the final report.
    pub fn finalize(&mut self, stage_id: &str) -> bool {
        if self.active_stage.as_deref() != Some(stage_id) {
            return false;
        }
        self.active_stage = None;
        true
    }

    /// Drop the buffer and any active stage (run start).
    pub fn clear(&mut self) {
        self.active_stage = None;
        self.text.clear();
    }

    /// Render the buffer, annotating it while still streaming.
    pub fn render(&self, renderer: &dyn MarkdownRenderer) -> RenderedReport {
        let cleaned = strip_wrapper_fences(&self.text);

        let (mut markup, used_fallback) = match renderer.render(&cleaned) {
            Ok(markup) => (markup, false),
            Err(err) => {
                warn!(error = %err, "markdown rendering failed, using fallback");
                (fallback_markup(&cleaned), true)
            }
        };

        let in_progress = self.is_streaming();
        if in_progress {
            markup.push_str(&renderer.progress_annotation());
        }

        RenderedReport {
            markup,
            in_progress,
            used_fallback,
        }
    }
}
