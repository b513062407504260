//! Integration tests for the coordinator's dispatch table.
//!
//! These tests drive the coordinator with event sequences and check the
//! resulting run state and view updates.

mod common;

use common::*;
use rmon_core::connection::{ConnectionState, TransportFrame};
use rmon_core::graph::Topology;
use rmon_core::session::SessionPhase;
use rmon_core::{LogLevel, SubmitOutcome};
use rmon_protocol::{ReconnectConfig, ServerEvent, StageKind, StageStatus};

#[test]
fn test_single_static_stage_run() {
    let mut coordinator = coordinator_for(single_stage_layout());

    for event in [
        ServerEvent::RunStarted,
        start("classify"),
        complete("classify"),
        ServerEvent::RunCompleted,
    ] {
        coordinator.handle_event(event);
    }

    assert_eq!(coordinator.view().progress_text(), "1/1");
    assert!(coordinator.state().session.is_completed());
    assert!(!coordinator.state().session.is_active());
    assert_eq!(coordinator.view().submission_enabled, Some(true));
    assert_eq!(
        coordinator.view().messages(LogLevel::Success).last(),
        Some(&"🎉 Research complete")
    );
}

#[test]
fn test_parallel_branches_switch_topology() {
    let mut coordinator = coordinator_for(branching_layout());

    for event in [
        ServerEvent::RunStarted,
        start("branch_1"),
        start("branch_2"),
        complete("branch_1"),
        complete("branch_2"),
    ] {
        coordinator.handle_event(event);
    }

    let graph = &coordinator.state().graph;
    assert_eq!(graph.topology(), Topology::Branching);
    let dynamic: Vec<_> = graph
        .stages()
        .filter(|stage| stage.kind == StageKind::Dynamic)
        .collect();
    assert_eq!(dynamic.len(), 2);
    assert!(dynamic
        .iter()
        .all(|stage| stage.status == StageStatus::Completed));
    assert_eq!(dynamic[0].display_name, "Branch 1");

    let rendered = coordinator.view().graph.as_ref().unwrap();
    assert_eq!(rendered.topology, Topology::Branching);
    assert_eq!(rendered.branch_count, 2);
    // classify + report + two branches; the fan-out placeholder is replaced
    assert_eq!(coordinator.view().progress_text(), "2/4");
}

#[test]
fn test_report_stream_accumulates_and_finalizes() {
    let mut coordinator = coordinator_for(branching_layout());

    for event in [
        start("report"),
        chunk("report", "# Title\n"),
        chunk("report", "body"),
    ] {
        coordinator.handle_event(event);
    }
    assert!(coordinator.view().report.contains("Generating"));
    assert_eq!(coordinator.state().report.active_stage(), Some("report"));

    coordinator.handle_event(complete("report"));

    let report = &coordinator.state().report;
    assert_eq!(report.text(), "# Title\nbody");
    assert_eq!(report.active_stage(), None);
    assert!(coordinator.view().report_visible);
    assert!(coordinator.view().report.contains("<h1>Title</h1>"));
    assert!(!coordinator.view().report.contains("Generating"));
}

#[test]
fn test_repeated_report_start_keeps_finished_report() {
    let mut coordinator = coordinator_for(branching_layout());

    for event in [
        ServerEvent::RunStarted,
        start("report"),
        chunk("report", "# Final\n"),
        complete("report"),
        start("report"),
    ] {
        coordinator.handle_event(event);
    }

    let report = &coordinator.state().report;
    assert_eq!(report.text(), "# Final\n");
    assert_eq!(report.active_stage(), None);
    assert!(coordinator.view().report.contains("<h1>Final</h1>"));
    assert!(!coordinator.view().report.contains("Generating"));
}

#[test]
fn test_report_keeps_whitespace_only_chunks() {
    let mut coordinator = coordinator_for(branching_layout());

    for event in [
        start("report"),
        chunk("report", "Line one"),
        chunk("report", "\n\n"),
        chunk("report", "Line two"),
    ] {
        coordinator.handle_event(event);
    }

    assert_eq!(
        coordinator.state().report.text(),
        "Line one\n\nLine two"
    );
    assert!(coordinator.view().messages(LogLevel::Stream).is_empty());
}

#[test]
fn test_chunks_for_other_stages_never_touch_report() {
    let mut coordinator = coordinator_for(branching_layout());

    for event in [
        start("report"),
        chunk("report", "kept"),
        chunk("classify", "ignored"),
        chunk("branch_1", "also ignored"),
    ] {
        coordinator.handle_event(event);
    }

    assert_eq!(coordinator.state().report.text(), "kept");
    assert_eq!(
        coordinator.view().messages(LogLevel::Stream),
        vec!["Classify: ignored", "Branch 1: also ignored"]
    );
}

#[tokio::test]
async fn test_malformed_frame_changes_nothing() {
    let (mut manager, transport, _scheduler) = manager_with(ReconnectConfig::default());
    let mut coordinator = coordinator_for(single_stage_layout());

    manager.connect(&mut coordinator).await;
    let _server = transport.take_server();
    coordinator.handle_event(ServerEvent::RunStarted);
    coordinator.handle_event(start("classify"));

    let graph_before = coordinator.state().graph.snapshot();
    let report_before = coordinator.state().report.text().to_string();
    let phase_before = coordinator.state().session.phase();
    let logs_before = coordinator.view().logs.len();

    manager.handle_frame(
        TransportFrame::Text("{not json".to_string()),
        &mut coordinator,
    );

    assert_eq!(coordinator.state().graph.snapshot(), graph_before);
    assert_eq!(coordinator.state().report.text(), report_before);
    assert_eq!(coordinator.state().session.phase(), phase_before);
    assert_eq!(manager.state(), ConnectionState::Open);

    let new_logs = &coordinator.view().logs[logs_before..];
    assert_eq!(new_logs.len(), 1);
    assert_eq!(new_logs[0].level, LogLevel::Warning);
    assert!(new_logs[0].message.starts_with("Dropped malformed message"));
}

#[tokio::test]
async fn test_empty_submission_sends_nothing() {
    let (mut manager, transport, _scheduler) = manager_with(ReconnectConfig::default());
    let mut coordinator = coordinator_for(single_stage_layout());
    manager.connect(&mut coordinator).await;
    let mut server = transport.take_server();
    let logs_before = coordinator.view().logs.len();

    let outcome = coordinator.submit("   ", &manager);

    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert!(server.received().is_empty());
    assert_eq!(coordinator.state().session.phase(), SessionPhase::Idle);
    assert_eq!(coordinator.view().logs.len(), logs_before);
    assert_eq!(coordinator.view().input_cleared, 0);
    assert_eq!(coordinator.view().notices, vec!["Enter a topic to research"]);
}

#[tokio::test]
async fn test_submission_reaches_server() {
    let (mut manager, transport, _scheduler) = manager_with(ReconnectConfig::default());
    let mut coordinator = coordinator_for(single_stage_layout());
    manager.connect(&mut coordinator).await;
    let mut server = transport.take_server();

    let outcome = coordinator.submit("  solid state batteries ", &manager);

    assert_eq!(outcome, SubmitOutcome::Sent);
    assert_eq!(
        server.received(),
        vec![r#"{"type":"research","query":"solid state batteries"}"#.to_string()]
    );
    assert_eq!(coordinator.view().input_cleared, 1);
}

#[test]
fn test_submission_without_connection_keeps_input() {
    let (manager, _transport, _scheduler) = manager_with(ReconnectConfig::default());
    let mut coordinator = coordinator_for(single_stage_layout());

    let outcome = coordinator.submit("topic", &manager);

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(coordinator.view().input_cleared, 0);
    assert_eq!(
        coordinator.view().messages(LogLevel::Error),
        vec!["❌ No connection to the server"]
    );
}

#[test]
fn test_progress_never_exceeds_total() {
    let mut coordinator = coordinator_for(branching_layout());
    let sequence = [
        ServerEvent::RunStarted,
        start("classify"),
        complete("classify"),
        complete("classify"),
        start("branch_1"),
        start("branch_1"),
        start("branch_2"),
        complete("branch_2"),
        complete("fan_out"),
        complete("unknown_stage"),
        start("report"),
        complete("report"),
        complete("branch_1"),
    ];

    for event in sequence {
        coordinator.handle_event(event);

        let graph = &coordinator.state().graph;
        let summary = graph.progress_summary();
        let completed = graph
            .stages()
            .filter(|stage| stage.status == StageStatus::Completed)
            .count();
        assert_eq!(summary.completed, completed);
        assert!(summary.completed <= summary.total);
        assert_eq!(coordinator.view().progress, Some(summary));
    }

    assert_eq!(coordinator.view().progress_text(), "4/4");
}

#[test]
fn test_new_run_resets_everything() {
    let mut coordinator = coordinator_for(branching_layout());
    for event in [
        ServerEvent::RunStarted,
        start("branch_1"),
        start("report"),
        chunk("report", "old report"),
        ServerEvent::StageFailed {
            stage_id: Some("report".to_string()),
            message: "boom".to_string(),
        },
    ] {
        coordinator.handle_event(event);
    }
    assert_eq!(coordinator.state().session.phase(), SessionPhase::Idle);

    coordinator.handle_event(ServerEvent::RunStarted);

    let state = coordinator.state();
    assert_eq!(state.graph.topology(), Topology::Linear);
    assert_eq!(state.graph.branch_count(), 0);
    assert!(state
        .graph
        .stages()
        .all(|stage| stage.status == StageStatus::Pending));
    assert_eq!(state.report.text(), "");
    assert!(!coordinator.view().report_visible);
    assert_eq!(coordinator.view().progress_text(), "0/3");
    assert_eq!(coordinator.view().submission_enabled, Some(false));
}

#[tokio::test]
async fn test_connection_events_update_indicator() {
    let (mut manager, transport, _scheduler) = manager_with(ReconnectConfig::default());
    let mut coordinator = coordinator_for(single_stage_layout());

    manager.connect(&mut coordinator).await;
    assert_eq!(
        coordinator.view().connection,
        rmon_core::ConnectionStatus::Connected
    );

    transport.take_server().close();
    let frame = manager.next_frame().await;
    manager.handle_frame(frame, &mut coordinator);
    assert_eq!(
        coordinator.view().connection,
        rmon_core::ConnectionStatus::Disconnected
    );
}
