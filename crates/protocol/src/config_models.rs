//! Client settings for `.research-monitor/config.toml`.
//!
//! This module defines the connection, reconnection and logging options
//! of the monitor. Every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Represents the settings from `.research-monitor/config.toml`.
///
/// # Example
///
/// ```toml
/// # .research-monitor/config.toml
/// server = "https://research.example.com"
///
/// [reconnect]
/// mid-run-delay-ms = 3000
/// idle-delay-ms = 5000
/// max-attempts = 10
///
/// [logging]
/// level = "debug"
/// file = "research-monitor.log"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct MonitorConfig {
    /// Base URL of the research server. The socket endpoint is derived from
    /// it: `https` selects `wss`, `http` selects `ws`, and the path is `/ws`.
    #[serde(default = "default_server")]
    pub server: String,

    #[serde(default)]
    pub reconnect: ReconnectConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            reconnect: ReconnectConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_server() -> String {
    "http://localhost:8080".to_string()
}

/// Reconnection policy.
///
/// The delay depends only on why the connection dropped: a drop during a
/// run retries sooner than a drop while idle. A drop after a completed run
/// never reconnects.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ReconnectConfig {
    #[serde(default = "default_mid_run_delay_ms")]
    pub mid_run_delay_ms: u64,

    #[serde(default = "default_idle_delay_ms")]
    pub idle_delay_ms: u64,

    /// Reconnection attempts allowed between two successful connections.
    /// Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    /// Consecutive malformed frames tolerated before the connection is
    /// dropped and re-established. Never when absent.
    #[serde(
        default = "default_malformed_frame_limit",
        skip_serializing_if = "Option::is_none"
    )]
    pub malformed_frame_limit: Option<u32>,
}

impl ReconnectConfig {
    pub fn mid_run_delay(&self) -> Duration {
        Duration::from_millis(self.mid_run_delay_ms)
    }

    pub fn idle_delay(&self) -> Duration {
        Duration::from_millis(self.idle_delay_ms)
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            mid_run_delay_ms: default_mid_run_delay_ms(),
            idle_delay_ms: default_idle_delay_ms(),
            max_attempts: None,
            malformed_frame_limit: default_malformed_frame_limit(),
        }
    }
}

fn default_mid_run_delay_ms() -> u64 {
    3000
}

fn default_idle_delay_ms() -> u64 {
    5000
}

fn default_malformed_frame_limit() -> Option<u32> {
    Some(20)
}

/// Diagnostic logging settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// File receiving diagnostics while the terminal UI is running.
    /// Diagnostics are discarded in the UI when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
