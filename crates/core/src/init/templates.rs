//! Embedded template files for `.research-monitor/` initialization.
//!
//! This module uses `rust-embed` to embed the repository `templates/`
//! directory into the binary at compile time, so `init` needs no files
//! next to the executable.

use rust_embed::RustEmbed;

/// Embedded template files from the `templates/` directory.
///
/// The path is relative to the crate root:
/// - `CARGO_MANIFEST_DIR` = `crates/core`
/// - `../../templates` = repository `templates/`
///
/// With the `debug-embed` feature, debug builds embed the files as well
/// instead of reading them from disk.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path, e.g. `"config.toml"`.
///
/// # Example
/// ```
/// use rmon_core::init::templates::get_template;
///
/// let config = get_template("config.toml").expect("config.toml should exist");
/// assert!(config.contains("server ="));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List all template files whose path starts with `prefix`.
pub fn list_templates(prefix: &str) -> Vec<String> {
    let mut paths: Vec<String> = TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect();
    paths.sort();
    paths
}
