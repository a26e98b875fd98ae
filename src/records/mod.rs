//! Source records as they appear in the song and log files, decoded from raw
//! JSON objects.

mod lenient;
mod log_event;
mod song_record;

pub use log_event::{LogEvent, NEXT_SONG_PAGE};
pub use song_record::SongRecord;

use std::fmt;
use thiserror::Error;

/// Locates a record inside its source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    pub unit: String,
    /// Zero-based position of the record in the unit.
    pub index: usize,
}

impl RecordRef {
    pub fn new(unit: impl Into<String>, index: usize) -> Self {
        Self {
            unit: unit.into(),
            index,
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [record {}]", self.unit, self.index)
    }
}

/// Why a single record could not be read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// A field is missing or holds a value of the wrong type.
    #[error("{0}")]
    Decode(String),

    #[error("timestamp {0} is not a valid epoch milliseconds value")]
    InvalidTimestamp(i64),

    #[error("record is not a JSON object")]
    NotAnObject,
}

impl From<serde_json::Error> for FieldError {
    fn from(err: serde_json::Error) -> Self {
        FieldError::Decode(err.to_string())
    }
}

/// Raised when a source record cannot be projected into warehouse rows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    #[error("{record}: {kind}")]
    Field {
        record: RecordRef,
        #[source]
        kind: FieldError,
    },

    #[error("{unit}: source unit holds no records")]
    EmptyUnit { unit: String },
}

impl MappingError {
    pub fn field(record: RecordRef, kind: FieldError) -> Self {
        MappingError::Field { record, kind }
    }
}
