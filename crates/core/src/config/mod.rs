//! Configuration loading and management.
//!
//! This module loads the client settings and the pipeline layout from the
//! `.research-monitor/` directory.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_dir, CONFIG_DIR_NAME};
pub use models::AppConfig;
