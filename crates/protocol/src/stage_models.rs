//! Stage (graph node) models.
//!
//! A stage is one unit of pipeline work shown as a node in the monitor's
//! graph. Static stages come from the pipeline layout; dynamic stages are
//! created at runtime, one per parallel branch reported by the server.

use serde::{Deserialize, Serialize};

/// How a stage entered the registry. Decided once at creation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    /// Listed in the pipeline layout and present from the start of a run.
    Static,
    /// Discovered at runtime; represents one parallel branch.
    Dynamic,
}

/// Lifecycle status of a stage.
///
/// Statuses only move forward during a run:
/// Pending -> Active -> Completed | Failed
///
/// A run reset is the only way back to Pending.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// Not started yet.
    Pending,
    /// Currently executing.
    Active,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
}

impl StageStatus {
    fn rank(self) -> u8 {
        match self {
            StageStatus::Pending => 0,
            StageStatus::Active => 1,
            StageStatus::Completed | StageStatus::Failed => 2,
        }
    }

    /// Whether moving from `self` to `next` is a forward transition.
    pub fn can_advance_to(self, next: StageStatus) -> bool {
        next.rank() > self.rank()
    }

    pub fn is_terminal(self) -> bool {
        self.rank() == 2
    }

    /// Short text shown under the node when the caller gives none.
    pub fn default_label(self) -> &'static str {
        match self {
            StageStatus::Pending => "waiting",
            StageStatus::Active => "running...",
            StageStatus::Completed => "done",
            StageStatus::Failed => "error",
        }
    }
}

/// A node in the pipeline graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Unique id as used by the server (`node` field on the wire).
    pub id: String,

    pub kind: StageKind,

    /// Human readable name, resolved once when the stage is created.
    pub display_name: String,

    /// Optional icon shown before the name.
    pub icon: Option<String>,

    pub status: StageStatus,

    /// Text shown under the node (e.g. "running...").
    pub status_label: String,
}

impl Stage {
    /// Create a stage in the Pending state.
    pub fn pending(
        id: impl Into<String>,
        kind: StageKind,
        display_name: impl Into<String>,
        icon: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            display_name: display_name.into(),
            icon,
            status: StageStatus::Pending,
            status_label: StageStatus::Pending.default_label().to_string(),
        }
    }
}
