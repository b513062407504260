//! # rmon-core
//!
//! Headless engine of research-monitor.
//!
//! This crate provides:
//! - Configuration loading from the `.research-monitor/` directory
//! - The connection manager and its reconnection policy
//! - Graph, report and session state for one research run
//! - The coordinator that applies server events to that state
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and management
//! - [`connection`]: Socket lifecycle, transport and scheduler seams
//! - [`coordinator`]: Event dispatch and submission
//! - [`graph`]: Stage registry and topology
//! - [`init`]: `.research-monitor/` templates
//! - [`report`]: Report buffer and markdown rendering
//! - [`runtime`]: The loop shared by every front end
//! - [`session`]: Run phase and elapsed time
//! - [`view`]: The view port the engine draws through

pub mod config;
pub mod connection;
pub mod coordinator;
pub mod graph;
pub mod init;
pub mod report;
pub mod runtime;
pub mod session;
pub mod view;

pub use coordinator::{Coordinator, RunState, SubmitOutcome};
pub use runtime::{Monitor, MonitorSignal};
pub use view::{ConnectionStatus, LogEntry, LogLevel, ViewPort};
