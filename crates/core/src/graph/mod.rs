//! Graph state: the registry of pipeline stages shown as nodes.
//!
//! The registry holds the static stages from the pipeline layout plus the
//! dynamic branch stages discovered during a run. The first branch switches
//! the topology from linear to branching; a reset restores the linear
//! layout exactly.

use std::fmt;
use std::sync::Arc;

use rmon_protocol::{PipelineLayout, Stage, StageDefinition, StageKind, StageStatus};
use tracing::debug;

/// Shape of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// The static stages in layout order.
    Linear,
    /// At least one branch stage exists; placeholder stages are hidden.
    Branching,
}

/// Completed vs. total stages in the current topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
}

impl fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

/// Snapshot handed to the view when the graph is redrawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphView {
    pub topology: Topology,
    /// Visible static stages in layout order, with branch stages (in
    /// discovery order) in place of the placeholder they replace.
    pub stages: Vec<Stage>,
    pub branch_count: usize,
}

/// Result of a status update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Applied,
    /// The id is neither a visible static stage nor a known branch.
    UnknownStage,
    /// The transition would move the status backwards or sideways.
    Rejected { from: StageStatus, to: StageStatus },
}

/// Registry of stages for the current run.
#[derive(Debug, Clone)]
pub struct GraphState {
    layout: Arc<PipelineLayout>,
    /// One entry per layout stage, same order as `layout.stages`.
    static_stages: Vec<Stage>,
    dynamic_stages: Vec<Stage>,
}

impl GraphState {
    pub fn new(layout: Arc<PipelineLayout>) -> Self {
        let static_stages = build_static_stages(&layout);
        Self {
            layout,
            static_stages,
            dynamic_stages: Vec::new(),
        }
    }

    pub fn layout(&self) -> &PipelineLayout {
        &self.layout
    }

    pub fn topology(&self) -> Topology {
        if self.dynamic_stages.is_empty() {
            Topology::Linear
        } else {
            Topology::Branching
        }
    }

    /// Number of branch stages created in this run.
    pub fn branch_count(&self) -> usize {
        self.dynamic_stages.len()
    }

    /// Branch ids in discovery order.
    pub fn dynamic_stage_ids(&self) -> impl Iterator<Item = &str> {
        self.dynamic_stages.iter().map(|stage| stage.id.as_str())
    }

    /// Index of the static stage the branch area is drawn in front of.
    ///
    /// That is the placeholder branches replace, else the report stage,
    /// else the end of the layout.
    fn branch_anchor(&self) -> usize {
        let stages = &self.layout.stages;
        stages
            .iter()
            .position(|def| def.replaced_by_branches)
            .or_else(|| {
                stages
                    .iter()
                    .position(|def| def.id == self.layout.report_stage)
            })
            .unwrap_or(stages.len())
    }

    /// All stages of the current topology, branches spliced in at the
    /// branch anchor.
    pub fn stages(&self) -> impl Iterator<Item = &Stage> {
        let branching = self.topology() == Topology::Branching;
        let visible =
            move |(_, def): &(&Stage, &StageDefinition)| !(branching && def.replaced_by_branches);
        let anchor = self.branch_anchor();

        let head = self.static_stages[..anchor]
            .iter()
            .zip(&self.layout.stages[..anchor]);
        let tail = self.static_stages[anchor..]
            .iter()
            .zip(&self.layout.stages[anchor..]);

        head.filter(visible)
            .map(|(stage, _)| stage)
            .chain(self.dynamic_stages.iter())
            .chain(tail.filter(visible).map(|(stage, _)| stage))
    }

    pub fn stage(&self, stage_id: &str) -> Option<&Stage> {
        self.stages().find(|stage| stage.id == stage_id)
    }

    fn stage_mut(&mut self, stage_id: &str) -> Option<&mut Stage> {
        let branching = !self.dynamic_stages.is_empty();
        let layout = &self.layout;
        let static_match = self
            .static_stages
            .iter_mut()
            .zip(layout.stages.iter())
            .find(|(stage, def)| stage.id == stage_id && !(branching && def.replaced_by_branches))
            .map(|(stage, _)| stage);

        match static_match {
            Some(stage) => Some(stage),
            None => self
                .dynamic_stages
                .iter_mut()
                .find(|stage| stage.id == stage_id),
        }
    }

    /// Move a stage to `status`, showing `label` under the node.
    ///
    /// Unknown ids and non-forward transitions leave the graph untouched.
    pub fn set_status(
        &mut self,
        stage_id: &str,
        status: StageStatus,
        label: impl Into<String>,
    ) -> StatusChange {
        let Some(stage) = self.stage_mut(stage_id) else {
            debug!(stage_id, ?status, "status update for unknown stage ignored");
            return StatusChange::UnknownStage;
        };

        if !stage.status.can_advance_to(status) {
            debug!(
                stage_id,
                from = ?stage.status,
                to = ?status,
                "non-forward status transition ignored"
            );
            return StatusChange::Rejected {
                from: stage.status,
                to: status,
            };
        }

        stage.status = status;
        stage.status_label = label.into();
        StatusChange::Applied
    }

    /// Register a branch stage unless it already exists.
    ///
    /// The first branch of a run switches the topology to branching.
    /// Returns `true` when a stage was created.
    pub fn ensure_dynamic_stage(&mut self, stage_id: &str) -> bool {
        if self.dynamic_stages.iter().any(|stage| stage.id == stage_id) {
            return false;
        }

        if self.dynamic_stages.is_empty() {
            debug!(stage_id, "switching graph to branching layout");
        }

        let stage = Stage::pending(
            stage_id,
            StageKind::Dynamic,
            self.layout.display_name(stage_id),
            self.layout.branches.icon.clone(),
        );
        self.dynamic_stages.push(stage);
        debug!(
            stage_id,
            branch_count = self.dynamic_stages.len(),
            "branch stage created"
        );
        true
    }

    /// Restore the linear layout with every static stage pending.
    pub fn reset(&mut self) {
        self.dynamic_stages.clear();
        self.static_stages = build_static_stages(&self.layout);
    }

    /// Completed and total counts over the current topology.
    pub fn progress_summary(&self) -> ProgressSummary {
        let (completed, total) = self.stages().fold((0, 0), |(done, total), stage| {
            let done = done + usize::from(stage.status == StageStatus::Completed);
            (done, total + 1)
        });
        ProgressSummary { completed, total }
    }

    pub fn snapshot(&self) -> GraphView {
        GraphView {
            topology: self.topology(),
            stages: self.stages().cloned().collect(),
            branch_count: self.branch_count(),
        }
    }
}

fn build_static_stages(layout: &PipelineLayout) -> Vec<Stage> {
    layout
        .stages
        .iter()
        .map(|def| {
            Stage::pending(
                def.id.as_str(),
                StageKind::Static,
                def.display_name.as_str(),
                def.icon.clone(),
            )
        })
        .collect()
}
