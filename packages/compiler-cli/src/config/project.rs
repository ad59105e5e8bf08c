use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use flavour_compiler::config::ParserConfig;

/// Project file passed with `--config`, e.g.
///
/// ```json
/// {
///   "className": "app.Page",
///   "metadata": ["classes.json"],
///   "resources": "resources",
///   "parser": { "resourceErrors": "report" }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
    pub class_name: Option<String>,
    pub metadata: Vec<PathBuf>,
    pub resources: Option<PathBuf>,
    pub parser: ParserConfig,
}

impl ProjectConfig {
    /// Load a project file. Relative paths are resolved against its directory.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: ProjectConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for metadata in &mut config.metadata {
            *metadata = base.join(&*metadata);
        }
        if let Some(resources) = config.resources.as_mut() {
            *resources = base.join(&*resources);
        }
        Ok(config)
    }
}
