//! File generation for `.research-monitor/` initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::CONFIG_DIR_NAME;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options for initializing a `.research-monitor` directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory in which `.research-monitor` will be created.
    pub target_dir: PathBuf,

    /// Overwrite an existing `.research-monitor` directory.
    pub force: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
        }
    }
}

/// Generate the `.research-monitor` directory from the embedded templates.
///
/// ```text
/// .research-monitor/
/// ├── config.toml
/// └── pipeline.yaml
/// ```
///
/// Returns the path of the created directory.
///
/// # Errors
///
/// - [`InitError::DirectoryExists`] if the directory exists and `force` is off
/// - [`InitError::TemplateNotFound`] if no templates are embedded
/// - I/O failures while creating the directory or writing files
pub async fn generate_monitor_structure(options: InitOptions) -> InitResult<PathBuf> {
    let config_dir = options.target_dir.join(CONFIG_DIR_NAME);

    if config_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(config_dir));
    }

    fs::create_dir_all(&config_dir).map_err(|source| InitError::DirectoryCreate {
        path: config_dir.clone(),
        source,
    })?;

    let templates = list_templates("");
    if templates.is_empty() {
        return Err(InitError::TemplateNotFound("config.toml".to_string()));
    }
    for template_path in &templates {
        write_template_file(&config_dir, template_path)?;
    }

    Ok(config_dir)
}

fn write_template_file(config_dir: &Path, template_path: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = config_dir.join(template_path);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;
    debug!(path = %target_path.display(), "template written");

    Ok(())
}
