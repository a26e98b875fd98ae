use crate::ingestion::FailurePolicy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Paths (override CLI)
    pub db_path: Option<String>,
    pub song_data: Option<String>,
    pub log_data: Option<String>,

    // Run behaviour
    pub failure_policy: Option<FailurePolicy>,
    pub duration_tolerance: Option<f64>,
    pub progress_bar: Option<bool>,
    pub file_extension: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
