//! Pipeline layout models for `.research-monitor/pipeline.yaml`.
//!
//! The layout tells the monitor which stages exist ahead of time, how
//! runtime branch ids are recognised, and which stage streams the report.

use serde::{Deserialize, Serialize};

/// How a completed stage is summarised in the live log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CompletionSummary {
    /// "<name>: done"
    #[default]
    Generic,

    /// Counts the array stored under `key` in the event's auxiliary data.
    ///
    /// Logged as "<name>: <count> <label>". A missing or non-array value
    /// counts as zero.
    AuxiliaryCount { key: String, label: String },

    /// Counts the parallel branches discovered so far in this run.
    BranchCount { label: String },
}

/// A stage known before the run starts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct StageDefinition {
    /// Stage id as sent by the server.
    pub id: String,

    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Placeholder stage that the branching layout replaces with the real
    /// branch nodes. Hidden while branches exist, restored on reset.
    #[serde(default)]
    pub replaced_by_branches: bool,

    #[serde(default)]
    pub completion: CompletionSummary,
}

impl StageDefinition {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            icon: None,
            replaced_by_branches: false,
            completion: CompletionSummary::Generic,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_completion(mut self, completion: CompletionSummary) -> Self {
        self.completion = completion;
        self
    }

    pub fn replaced_by_branches(mut self) -> Self {
        self.replaced_by_branches = true;
        self
    }
}

/// Naming convention for parallel branch stages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct BranchConvention {
    /// Id prefix that marks a stage as a parallel branch, e.g. `search_query_`.
    pub prefix: String,

    /// Display label; the id suffix is appended (`Search 3`).
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Full description of the monitored pipeline.
///
/// # Example
///
/// ```yaml
/// name: research
/// report-stage: synthesize_and_report
/// branches:
///   prefix: search_query_
///   label: Search
/// stages:
///   - id: classify_intent_and_topic
///     display-name: Intent classification
///   - id: generate_search_queries
///     display-name: Query generation
///     completion:
///       kind: auxiliary-count
///       key: search_queries
///       label: queries generated
///   - id: synthesize_and_report
///     display-name: Report generation
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct PipelineLayout {
    pub name: String,

    /// Static stages in display order.
    pub stages: Vec<StageDefinition>,

    pub branches: BranchConvention,

    /// The single stage whose streamed chunks form the report.
    pub report_stage: String,
}

impl PipelineLayout {
    pub fn definition(&self, stage_id: &str) -> Option<&StageDefinition> {
        self.stages.iter().find(|def| def.id == stage_id)
    }

    /// Whether the id follows the parallel-branch naming convention.
    pub fn is_branch(&self, stage_id: &str) -> bool {
        self.branch_suffix(stage_id).is_some()
    }

    fn branch_suffix<'a>(&self, stage_id: &'a str) -> Option<&'a str> {
        stage_id
            .strip_prefix(self.branches.prefix.as_str())
            .filter(|suffix| !suffix.is_empty())
    }

    pub fn is_report_stage(&self, stage_id: &str) -> bool {
        self.report_stage == stage_id
    }

    /// Resolve the label shown for a stage id.
    ///
    /// Pure: works for ids that have not been registered yet. Static ids use
    /// the layout table, branch ids become `"<label> <suffix>"`, anything
    /// else is shown as-is.
    pub fn display_name(&self, stage_id: &str) -> String {
        if let Some(def) = self.definition(stage_id) {
            return def.display_name.clone();
        }
        match self.branch_suffix(stage_id) {
            Some(suffix) => format!("{} {suffix}", self.branches.label),
            None => stage_id.to_string(),
        }
    }
}

impl Default for PipelineLayout {
    /// The five-stage research pipeline served by the reference server.
    fn default() -> Self {
        Self {
            name: "research".to_string(),
            stages: vec![
                StageDefinition::new("classify_intent_and_topic", "Intent classification")
                    .with_icon("🎯"),
                StageDefinition::new("generate_search_queries", "Query generation")
                    .with_icon("🔍")
                    .with_completion(CompletionSummary::AuxiliaryCount {
                        key: "search_queries".to_string(),
                        label: "queries generated".to_string(),
                    }),
                StageDefinition::new("execute_parallel_search", "Parallel search")
                    .with_icon("⚡")
                    .replaced_by_branches(),
                StageDefinition::new("merge_search_results", "Result merge")
                    .with_icon("🔗")
                    .with_completion(CompletionSummary::BranchCount {
                        label: "search results merged".to_string(),
                    }),
                StageDefinition::new("synthesize_and_report", "Report generation")
                    .with_icon("📝"),
            ],
            branches: BranchConvention {
                prefix: "search_query_".to_string(),
                label: "Search".to_string(),
                icon: Some("🔍".to_string()),
            },
            report_stage: "synthesize_and_report".to_string(),
        }
    }
}
