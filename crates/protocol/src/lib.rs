//! # rmon-protocol
//!
//! Wire protocol and shared data models for research-monitor.
//!
//! This crate defines all shared data structures used for:
//! - Messages exchanged with the research server over the `/ws` socket
//! - Stage (graph node) state shown by the monitor
//! - Pipeline layout files (`pipeline.yaml`) and client settings (`config.toml`)
//!
//! ## Modules
//!
//! - [`wire`]: Inbound `ServerEvent`s and outbound `ClientRequest`s
//! - [`stage_models`]: Stage kinds, statuses and the monotonic status order
//! - [`pipeline_models`]: Static stage table and branch/report conventions
//! - [`config_models`]: Connection, reconnection and logging settings
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde and serde_json
//! - No I/O: parsing and serialization only
//! - Independent compilation: no dependencies on other research-monitor crates

pub mod config_models;
pub mod pipeline_models;
pub mod stage_models;
pub mod wire;

// Re-export all public types for convenience
pub use config_models::*;
pub use pipeline_models::*;
pub use stage_models::*;
pub use wire::*;
