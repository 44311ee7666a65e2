//! Config file: `[paths]` layout plus `[[experiment]]` declarations.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tb_core::paths::PathLayout;
use tb_runner::Experiment;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub paths: PathLayout,
    #[serde(default, rename = "experiment")]
    pub experiments: Vec<Experiment>,
}

impl Config {
    /// Load and parse the config, resolving relative layout paths
    /// against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Config = toml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;

        let base = path
            .canonicalize()
            .with_context(|| format!("resolving config path {}", path.display()))?;
        if let Some(dir) = base.parent() {
            config.paths.resolve_against(dir);
        }
        Ok(config)
    }
}
