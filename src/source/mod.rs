//! Record source: finds the data files under a root directory and reads each
//! one into a [`SourceUnit`] of newline-delimited JSON records.

mod discovery;
mod file_source;

pub use discovery::{discover_files, DEFAULT_EXTENSION};
pub use file_source::FileSource;

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to walk {root:?}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl SourceError {
    pub fn path(&self) -> &Path {
        match self {
            SourceError::Io { path, .. } | SourceError::Json { path, .. } => path,
            SourceError::Walk { root, .. } => root,
        }
    }
}

/// One data file and the raw records it holds, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub records: Vec<Value>,
}

impl SourceUnit {
    /// Parses a stream of JSON values, conventionally one object per line.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self, SourceError> {
        let path = path.into();
        let records = serde_json::Deserializer::from_str(text)
            .into_iter::<Value>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| SourceError::Json {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, records })
    }

    pub fn read(path: &Path) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Human readable name used in logs and error reports.
    pub fn label(&self) -> String {
        self.path.display().to_string()
    }
}
