//! Ingestion orchestrator: walks a sequence of source units, maps each one
//! into warehouse rows and commits once per unit.

mod orchestrator;
mod progress;

pub use orchestrator::IngestionOrchestrator;
pub use progress::{BarProgress, LogProgress, ProgressSink};

use crate::records::MappingError;
use crate::source::SourceError;
use crate::warehouse::StorageError;
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Which family of source units a pass reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformMode {
    /// Song metadata files, feeding the songs and artists tables.
    Song,
    /// Activity log files, feeding time, users and songplays.
    Log,
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformMode::Song => write!(f, "song"),
            TransformMode::Log => write!(f, "log"),
        }
    }
}

/// What happens to the rest of a pass once a unit fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Roll back the failing unit and stop the run.
    #[default]
    Abort,
    /// Roll back the failing unit, record it and carry on with the next one.
    SkipUnit,
}

/// Why a single unit could not be loaded.
#[derive(Debug, Error)]
pub enum UnitError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Failed to ingest {unit}: {source}")]
    UnitFailed { unit: String, source: UnitError },

    #[error("Failed to roll back {unit}: {source}")]
    Rollback { unit: String, source: StorageError },
}

/// Rows submitted to the warehouse and committed, per table.
///
/// Dimension rows that the warehouse ignored as duplicates are still counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowTally {
    pub songs: usize,
    pub artists: usize,
    pub users: usize,
    pub time: usize,
    pub songplays: usize,
    /// Songplays whose song and artist ids were found.
    pub songplays_resolved: usize,
}

impl RowTally {
    fn add(&mut self, other: &RowTally) {
        self.songs += other.songs;
        self.artists += other.artists;
        self.users += other.users;
        self.time += other.time;
        self.songplays += other.songplays;
        self.songplays_resolved += other.songplays_resolved;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedUnit {
    pub unit: String,
    pub reason: String,
}

/// Outcome of one orchestrator pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestionReport {
    pub mode: TransformMode,
    pub units_total: usize,
    pub units_committed: usize,
    pub failed_units: Vec<FailedUnit>,
    pub rows: RowTally,
}

impl IngestionReport {
    pub fn new(mode: TransformMode, units_total: usize) -> Self {
        Self {
            mode,
            units_total,
            units_committed: 0,
            failed_units: Vec::new(),
            rows: RowTally::default(),
        }
    }

    pub fn units_processed(&self) -> usize {
        self.units_committed + self.failed_units.len()
    }
}
