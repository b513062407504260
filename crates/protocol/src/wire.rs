//! Messages exchanged with the research server.
//!
//! The server pushes one JSON object per frame describing a lifecycle step
//! of the running pipeline. The client sends a single kind of request, which
//! starts a new research run.
//!
//! Inbound frames are internally tagged on `"type"`:
//! ```json
//! { "type": "node_complete", "node": "generate_search_queries",
//!   "state": { "search_queries": ["a", "b"] }, "timestamp": 1718000000000 }
//! ```
//!
//! Outbound requests use the same tagging:
//! ```json
//! { "type": "research", "query": "rust async runtimes" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One lifecycle event pushed by the server.
///
/// Events are consumed once in receipt order and never mutated. Fields the
/// server omits when empty (`chunk`, `error`, the stage id on `error`) fall
/// back to empty values instead of failing the whole frame. Extra fields such
/// as `timestamp` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// A new run began. All client-side run state is reset.
    #[serde(rename = "start")]
    RunStarted,

    /// A stage began executing.
    #[serde(rename = "node_start")]
    StageStarted {
        #[serde(rename = "node")]
        stage_id: String,
    },

    /// A stage finished successfully.
    #[serde(rename = "node_complete")]
    StageCompleted {
        #[serde(rename = "node")]
        stage_id: String,
        /// Stage-specific summary data (e.g. the generated sub-queries).
        #[serde(rename = "state", default, skip_serializing_if = "Option::is_none")]
        auxiliary: Option<Map<String, Value>>,
    },

    /// An incremental text fragment produced by a stage.
    ///
    /// The chunk is kept verbatim: whitespace and newline-only chunks are
    /// meaningful for the report.
    #[serde(rename = "streaming_chunk")]
    StreamChunk {
        #[serde(rename = "node")]
        stage_id: String,
        #[serde(default)]
        chunk: String,
    },

    /// The run finished.
    #[serde(rename = "complete")]
    RunCompleted,

    /// A stage (or the pipeline as a whole) failed.
    #[serde(rename = "error")]
    StageFailed {
        #[serde(rename = "node", default, skip_serializing_if = "Option::is_none")]
        stage_id: Option<String>,
        #[serde(rename = "error", default)]
        message: String,
    },
}

/// Discriminant of a [`ServerEvent`], used for dispatch tables and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RunStart,
    StageStart,
    StageComplete,
    StreamChunk,
    RunComplete,
    StageError,
}

impl ServerEvent {
    /// Parse a single text frame.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the payload is not JSON, carries an
    /// unknown `type`, or lacks a required field such as `node`.
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            ServerEvent::RunStarted => EventKind::RunStart,
            ServerEvent::StageStarted { .. } => EventKind::StageStart,
            ServerEvent::StageCompleted { .. } => EventKind::StageComplete,
            ServerEvent::StreamChunk { .. } => EventKind::StreamChunk,
            ServerEvent::RunCompleted => EventKind::RunComplete,
            ServerEvent::StageFailed { .. } => EventKind::StageError,
        }
    }

    /// The stage this event refers to, if any.
    pub fn stage_id(&self) -> Option<&str> {
        match self {
            ServerEvent::StageStarted { stage_id }
            | ServerEvent::StageCompleted { stage_id, .. }
            | ServerEvent::StreamChunk { stage_id, .. } => Some(stage_id),
            ServerEvent::StageFailed { stage_id, .. } => stage_id.as_deref(),
            ServerEvent::RunStarted | ServerEvent::RunCompleted => None,
        }
    }
}

/// Requests sent from the monitor to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Start a research run for the given (already trimmed) query.
    Research { query: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_id_accessor() {
        let event = ServerEvent::StageFailed {
            stage_id: None,
            message: "boom".to_string(),
        };
        assert_eq!(event.stage_id(), None);
        assert_eq!(event.kind(), EventKind::StageError);

        let event = ServerEvent::StreamChunk {
            stage_id: "synthesize_and_report".to_string(),
            chunk: "\n".to_string(),
        };
        assert_eq!(event.stage_id(), Some("synthesize_and_report"));
    }

    #[test]
    fn test_missing_chunk_defaults_to_empty() {
        let event = ServerEvent::from_json(r#"{"type":"streaming_chunk","node":"x"}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::StreamChunk {
                stage_id: "x".to_string(),
                chunk: String::new(),
            }
        );
    }
}
