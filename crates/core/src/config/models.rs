//! Aggregated configuration.

use rmon_protocol::config_models::MonitorConfig;
use rmon_protocol::pipeline_models::PipelineLayout;

/// Everything loaded from `.research-monitor/`.
///
/// - `config.toml`: server address, reconnection policy, logging
/// - `pipeline.yaml`: the stage table and branch/report conventions
///
/// Missing files leave the corresponding half at its default.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub layout: PipelineLayout,
}

impl AppConfig {
    /// Replace the server base URL, e.g. from `--server` or `RMON_SERVER`.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.monitor.server = server.into();
        self
    }
}
