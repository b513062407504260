//! Configuration file loader for the `.research-monitor/` directory.
//!
//! This module loads and validates:
//! - `config.toml`: server address, reconnection policy, logging
//! - `pipeline.yaml`: the pipeline layout

use std::collections::HashSet;
use std::path::Path;

use rmon_protocol::config_models::MonitorConfig;
use rmon_protocol::pipeline_models::PipelineLayout;
use tracing::debug;

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::AppConfig;

/// Name of the configuration directory looked up under the project root.
pub const CONFIG_DIR_NAME: &str = ".research-monitor";

/// Loads all configuration from `<root>/.research-monitor/`.
///
/// If the directory or any of its files is missing, the corresponding
/// settings fall back to their defaults rather than failing.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid TOML or YAML syntax
/// - The pipeline layout is inconsistent (see [`validate_layout`])
///
/// # Example
///
/// ```rust,no_run
/// use rmon_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Monitoring {}", config.monitor.server);
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    load_config_dir(&root.join(CONFIG_DIR_NAME)).await
}

/// Loads configuration from an explicit directory (`--config-dir`).
pub async fn load_config_dir(dir: &Path) -> ConfigResult<AppConfig> {
    if !dir.exists() {
        debug!(dir = %dir.display(), "config directory missing, using defaults");
        return Ok(AppConfig::default());
    }

    let monitor = load_monitor_config(dir)?;
    let layout = load_layout(dir)?;

    Ok(AppConfig { monitor, layout })
}

/// Loads client settings from `config.toml`.
fn load_monitor_config(dir: &Path) -> ConfigResult<MonitorConfig> {
    let config_path = dir.join("config.toml");

    if !config_path.exists() {
        return Ok(MonitorConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: MonitorConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path,
            source,
        })?;

    Ok(config)
}

/// Loads the pipeline layout from `pipeline.yaml` (or `pipeline.yml`).
fn load_layout(dir: &Path) -> ConfigResult<PipelineLayout> {
    let Some(layout_path) = ["pipeline.yaml", "pipeline.yml"]
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
    else {
        return Ok(PipelineLayout::default());
    };

    let content =
        std::fs::read_to_string(&layout_path).map_err(|source| ConfigError::FileRead {
            path: layout_path.clone(),
            source,
        })?;

    let layout: PipelineLayout =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
            path: layout_path.clone(),
            source,
        })?;

    validate_layout(&layout).map_err(|reason| ConfigError::InvalidConfig {
        path: layout_path,
        reason,
    })?;

    Ok(layout)
}

/// Checks the invariants the graph relies on.
///
/// - stage ids are unique
/// - the branch prefix is not empty
/// - no static stage id looks like a branch id
/// - the report stage is a static stage
pub fn validate_layout(layout: &PipelineLayout) -> Result<(), String> {
    if layout.branches.prefix.is_empty() {
        return Err("branches.prefix must not be empty".to_string());
    }

    let mut seen = HashSet::new();
    for definition in &layout.stages {
        if !seen.insert(definition.id.as_str()) {
            return Err(format!("duplicate stage id '{}'", definition.id));
        }
        if layout.is_branch(&definition.id) {
            return Err(format!(
                "stage id '{}' collides with branch prefix '{}'",
                definition.id, layout.branches.prefix
            ));
        }
    }

    if layout.definition(&layout.report_stage).is_none() {
        return Err(format!(
            "report-stage '{}' is not one of the listed stages",
            layout.report_stage
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SINGLE_STAGE_LAYOUT: &str = r#"name: single
report-stage: classify
branches:
  prefix: branch_
  label: Branch
stages:
  - id: classify
    display-name: Classify
"#;

    #[tokio::test]
    async fn test_load_config_acceptance() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let config_dir = root.join(CONFIG_DIR_NAME);
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        fs::write(
            config_dir.join("config.toml"),
            r#"server = "https://research.example.com"

[reconnect]
mid-run-delay-ms = 1000
max-attempts = 3
malformed-frame-limit = 5

[logging]
level = "debug"
file = "monitor.log"
"#,
        )
        .expect("Failed to write config.toml");
        fs::write(config_dir.join("pipeline.yaml"), SINGLE_STAGE_LAYOUT)
            .expect("Failed to write pipeline.yaml");

        let config = load_config(root).await.expect("Failed to load config");

        assert_eq!(config.monitor.server, "https://research.example.com");
        assert_eq!(config.monitor.reconnect.mid_run_delay_ms, 1000);
        assert_eq!(config.monitor.reconnect.idle_delay_ms, 5000);
        assert_eq!(config.monitor.reconnect.max_attempts, Some(3));
        assert_eq!(config.monitor.reconnect.malformed_frame_limit, Some(5));
        assert_eq!(config.monitor.logging.level, "debug");
        assert_eq!(config.layout.name, "single");
        assert_eq!(config.layout.stages.len(), 1);
        assert_eq!(config.layout.report_stage, "classify");
    }

    #[tokio::test]
    async fn test_load_config_empty_directory() {
        let dir = tempdir().expect("Failed to create temp dir");

        let config = load_config(dir.path())
            .await
            .expect("Should handle missing .research-monitor");

        assert_eq!(config.monitor, MonitorConfig::default());
        assert_eq!(config.layout, PipelineLayout::default());
    }

    #[tokio::test]
    async fn test_load_config_partial() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config_dir = dir.path().join(CONFIG_DIR_NAME);
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");
        fs::write(config_dir.join("config.toml"), "server = \"http://10.0.0.2:9000\"")
            .expect("Failed to write config.toml");

        let config = load_config(dir.path())
            .await
            .expect("Should handle partial config");

        assert_eq!(config.monitor.server, "http://10.0.0.2:9000");
        assert_eq!(config.layout, PipelineLayout::default());
    }

    #[tokio::test]
    async fn test_load_config_yml_extension() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("pipeline.yml"), SINGLE_STAGE_LAYOUT)
            .expect("Failed to write pipeline.yml");

        let config = load_config_dir(dir.path())
            .await
            .expect("Should load .yml layout");

        assert_eq!(config.layout.name, "single");
    }

    #[tokio::test]
    async fn test_load_config_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("config.toml"), "server = [invalid toml")
            .expect("Failed to write config.toml");

        let result = load_config_dir(dir.path()).await;

        if let Err(ConfigError::TomlParse { path, .. }) = result {
            assert!(path.ends_with("config.toml"));
        } else {
            panic!("Expected TomlParse error");
        }
    }

    #[tokio::test]
    async fn test_load_config_invalid_yaml() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("pipeline.yaml"), "name: test\n  invalid: [yaml")
            .expect("Failed to write pipeline.yaml");

        let result = load_config_dir(dir.path()).await;

        if let Err(ConfigError::YamlParse { path, .. }) = result {
            assert!(path.ends_with("pipeline.yaml"));
        } else {
            panic!("Expected YamlParse error");
        }
    }

    #[tokio::test]
    async fn test_load_config_rejects_unknown_report_stage() {
        let dir = tempdir().expect("Failed to create temp dir");
        let layout = SINGLE_STAGE_LAYOUT.replace("report-stage: classify", "report-stage: report");
        fs::write(dir.path().join("pipeline.yaml"), layout).expect("Failed to write pipeline.yaml");

        let result = load_config_dir(dir.path()).await;

        if let Err(ConfigError::InvalidConfig { path, reason }) = result {
            assert!(path.ends_with("pipeline.yaml"));
            assert!(reason.contains("report-stage 'report'"));
        } else {
            panic!("Expected InvalidConfig error");
        }
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(&PipelineLayout::default()).is_ok());

        let mut duplicate = PipelineLayout::default();
        duplicate.stages.push(duplicate.stages[0].clone());
        assert!(validate_layout(&duplicate)
            .unwrap_err()
            .contains("duplicate stage id"));

        let mut colliding = PipelineLayout::default();
        colliding.branches.prefix = "merge_".to_string();
        assert!(validate_layout(&colliding)
            .unwrap_err()
            .contains("collides with branch prefix"));

        let mut no_prefix = PipelineLayout::default();
        no_prefix.branches.prefix.clear();
        assert!(validate_layout(&no_prefix).is_err());
    }
}
