mod file_config;

pub use file_config::FileConfig;

use crate::ingestion::FailurePolicy;
use crate::source::DEFAULT_EXTENSION;
use anyhow::{anyhow, bail, Result};
use std::path::{Path, PathBuf};

/// CLI arguments of the `run` command that the TOML config can override.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub song_data: Option<PathBuf>,
    pub log_data: Option<PathBuf>,
    pub failure_policy: FailurePolicy,
    pub duration_tolerance: f64,
    pub progress_bar: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub failure_policy: FailurePolicy,
    /// Seconds of slack when matching a play's length against song durations.
    pub duration_tolerance: f64,
    pub progress_bar: bool,
    pub file_extension: String,
}

fn existing_dir(path: PathBuf, what: &str) -> Result<PathBuf> {
    if !path.exists() {
        bail!("{} directory does not exist: {:?}", what, path);
    }
    if !path.is_dir() {
        bail!("{} is not a directory: {:?}", what, path);
    }
    Ok(path)
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| anyhow!("db_path must be specified via --db or in config file"))?;

        let song_data = file
            .song_data
            .map(PathBuf::from)
            .or_else(|| cli.song_data.clone())
            .ok_or_else(|| {
                anyhow!("song_data must be specified via --song-data or in config file")
            })?;
        let song_data = existing_dir(song_data, "Song data")?;

        let log_data = file
            .log_data
            .map(PathBuf::from)
            .or_else(|| cli.log_data.clone())
            .ok_or_else(|| anyhow!("log_data must be specified via --log-data or in config file"))?;
        let log_data = existing_dir(log_data, "Log data")?;

        let failure_policy = file.failure_policy.unwrap_or(cli.failure_policy);

        let duration_tolerance = file.duration_tolerance.unwrap_or(cli.duration_tolerance);
        if !duration_tolerance.is_finite() || duration_tolerance < 0.0 {
            bail!(
                "duration_tolerance must be a non-negative number of seconds, got {}",
                duration_tolerance
            );
        }

        let progress_bar = file.progress_bar.unwrap_or(cli.progress_bar);

        let file_extension = file
            .file_extension
            .map(|ext| ext.trim_start_matches('.').to_string())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        if file_extension.is_empty() {
            bail!("file_extension must not be empty");
        }

        Ok(Self {
            db_path,
            song_data,
            log_data,
            failure_policy,
            duration_tolerance,
            progress_bar,
            file_extension,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
