//! Star-schema warehouse: table contracts, typed rows and the SQLite session
//! the ingestion orchestrator writes through.

mod models;
mod schema;
mod store;

pub use models::*;
pub use schema::{
    ARTISTS_TABLE_NAME, SONGPLAYS_TABLE_NAME, SONGS_TABLE_NAME, TIME_TABLE_NAME,
    USERS_TABLE_NAME, WAREHOUSE_VERSIONED_SCHEMAS,
};
pub use store::{SqliteWarehouse, TableCounts};

use thiserror::Error;

/// Errors raised by the storage session.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Table {table} expects {expected} values, got {actual}")]
    ColumnContract {
        table: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Storage session owned by the orchestrator for the length of a run.
///
/// Inserts accumulate until `commit` makes them durable or `rollback`
/// discards them.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait Warehouse {
    /// Inserts one row. Dimension tables silently ignore primary key conflicts.
    fn insert(&mut self, row: &WarehouseRow) -> Result<(), StorageError>;

    /// Finds the song whose title, artist name and duration match, the
    /// duration within `tolerance` seconds. Ties resolve to the lowest song_id.
    fn lookup_song_artist(
        &mut self,
        title: &str,
        artist_name: &str,
        duration: f64,
        tolerance: f64,
    ) -> Result<Option<SongArtistIds>, StorageError>;

    /// Makes every insert since the last commit or rollback durable.
    fn commit(&mut self) -> Result<(), StorageError>;

    /// Discards every insert since the last commit or rollback.
    fn rollback(&mut self) -> Result<(), StorageError>;
}
