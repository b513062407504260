//! Initialization of a `.research-monitor/` directory.
//!
//! Writes the embedded `config.toml` and `pipeline.yaml` templates so a
//! user has a documented starting point to edit.
//!
//! # Example
//!
//! ```no_run
//! use rmon_core::init::{generate_monitor_structure, InitOptions};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//! };
//!
//! let created = generate_monitor_structure(options).await?;
//! println!("Initialized {}", created.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_monitor_structure, InitOptions};
pub use templates::{get_template, list_templates};
