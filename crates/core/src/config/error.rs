//! Errors raised while loading `.research-monitor/`.

use std::path::PathBuf;
use thiserror::Error;

/// Every variant names the file at fault so the message is actionable.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `config.toml` is not valid TOML or has a mistyped key.
    #[error("invalid monitor settings in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// `pipeline.yaml` is not a valid pipeline layout.
    #[error("invalid pipeline layout in {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Parsed, but rejected by layout validation.
    #[error("pipeline layout {path} rejected: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
