//! Layouts and helpers for building engine parts.

use std::sync::Arc;

use rmon_core::connection::{ConnectionManager, Endpoint, ManualScheduler};
use rmon_core::report::HtmlRenderer;
use rmon_core::Coordinator;
use rmon_protocol::{
    BranchConvention, PipelineLayout, ReconnectConfig, ServerEvent, StageDefinition,
};

use super::fake_transport::FakeTransport;
use super::recording_view::RecordingView;

/// One static stage, `classify`.
#[allow(dead_code)]
pub fn single_stage_layout() -> PipelineLayout {
    PipelineLayout {
        name: "single".to_string(),
        stages: vec![StageDefinition::new("classify", "Classify")],
        branches: BranchConvention {
            prefix: "branch_".to_string(),
            label: "Branch".to_string(),
            icon: None,
        },
        report_stage: "report".to_string(),
    }
}

/// Classify, fan out into `branch_*` stages, then write the report.
#[allow(dead_code)]
pub fn branching_layout() -> PipelineLayout {
    PipelineLayout {
        name: "branching".to_string(),
        stages: vec![
            StageDefinition::new("classify", "Classify"),
            StageDefinition::new("fan_out", "Fan out").replaced_by_branches(),
            StageDefinition::new("report", "Report"),
        ],
        branches: BranchConvention {
            prefix: "branch_".to_string(),
            label: "Branch".to_string(),
            icon: None,
        },
        report_stage: "report".to_string(),
    }
}

#[allow(dead_code)]
pub fn coordinator_for(layout: PipelineLayout) -> Coordinator<RecordingView> {
    Coordinator::new(
        Arc::new(layout),
        RecordingView::default(),
        Box::new(HtmlRenderer),
    )
}

/// A connection manager wired to fakes, plus handles to both fakes.
#[allow(dead_code)]
pub fn manager_with(
    config: ReconnectConfig,
) -> (ConnectionManager, Arc<FakeTransport>, Arc<ManualScheduler>) {
    let transport = Arc::new(FakeTransport::new());
    let scheduler = Arc::new(ManualScheduler::new());
    let endpoint = match Endpoint::from_base("http://localhost:8080") {
        Ok(endpoint) => endpoint,
        Err(err) => panic!("test endpoint should parse: {err}"),
    };
    let manager = ConnectionManager::new(
        endpoint,
        transport.clone(),
        scheduler.clone(),
        config,
    );
    (manager, transport, scheduler)
}

#[allow(dead_code)]
pub fn start(id: &str) -> ServerEvent {
    ServerEvent::StageStarted {
        stage_id: id.to_string(),
    }
}

#[allow(dead_code)]
pub fn complete(id: &str) -> ServerEvent {
    ServerEvent::StageCompleted {
        stage_id: id.to_string(),
        auxiliary: None,
    }
}

#[allow(dead_code)]
pub fn chunk(id: &str, text: &str) -> ServerEvent {
    ServerEvent::StreamChunk {
        stage_id: id.to_string(),
        chunk: text.to_string(),
    }
}
