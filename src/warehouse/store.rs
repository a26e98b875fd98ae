//! SQLite-backed warehouse session.

use super::models::{SongArtistIds, WarehouseRow};
use super::schema::WAREHOUSE_VERSIONED_SCHEMAS;
use super::{StorageError, Warehouse};
use crate::sqlite_persistence::{VersionedSchema, BASE_DB_VERSION};
use anyhow::{bail, Context, Result};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

/// Row counts per warehouse table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub songs: usize,
    pub artists: usize,
    pub users: usize,
    pub time: usize,
    pub songplays: usize,
}

/// A single connection to the warehouse database.
///
/// The first insert after a commit opens a transaction, so everything staged
/// for one source unit lands or vanishes together.
pub struct SqliteWarehouse {
    conn: Connection,
}

fn latest_schema() -> &'static VersionedSchema {
    &WAREHOUSE_VERSIONED_SCHEMAS[WAREHOUSE_VERSIONED_SCHEMAS.len() - 1]
}

impl SqliteWarehouse {
    /// Opens (or creates) the warehouse at `db_path`, validating the schema of
    /// an existing database.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open warehouse database {:?}", path))?;
        info!("Opened warehouse database at {:?}", path);
        Self::from_connection(conn)
    }

    /// Drops whatever warehouse tables exist at `db_path` and creates the
    /// latest schema, without validating what was there before.
    pub fn recreate<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open warehouse database {:?}", path))?;
        Self::rebuild(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON;", [])?;

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )?;

        if table_count == 0 {
            info!(
                "Creating warehouse schema at version {}",
                latest_schema().version
            );
            latest_schema().create(&conn)?;
            return Ok(Self { conn });
        }

        let raw_version: i64 = conn.query_row("PRAGMA user_version;", [], |r| r.get(0))?;
        let db_version = raw_version - BASE_DB_VERSION as i64;
        let latest = latest_schema();
        if db_version != latest.version as i64 {
            bail!(
                "Unknown warehouse database version {} (expected {}), run create-tables to rebuild it",
                db_version,
                latest.version
            );
        }
        latest.validate(&conn).with_context(|| {
            format!(
                "Warehouse schema validation failed for version {}",
                db_version
            )
        })?;

        Ok(Self { conn })
    }

    fn rebuild(conn: &Connection) -> Result<()> {
        latest_schema().drop_all(conn)?;
        latest_schema().create(conn)?;
        info!("Recreated warehouse tables");
        Ok(())
    }

    /// Drops every warehouse table and recreates the latest schema.
    pub fn reset(&mut self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Self::rebuild(&self.conn)
    }

    pub fn counts(&self) -> Result<TableCounts> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
            Ok(n as usize)
        };
        Ok(TableCounts {
            songs: count("songs")?,
            artists: count("artists")?,
            users: count("users")?,
            time: count("time")?,
            songplays: count("songplays")?,
        })
    }

    /// Read access for callers that inspect the warehouse directly.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn begin_if_needed(&mut self) -> Result<(), StorageError> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }
}

impl Warehouse for SqliteWarehouse {
    fn insert(&mut self, row: &WarehouseRow) -> Result<(), StorageError> {
        let table = latest_schema()
            .table(row.table_name())
            .ok_or_else(|| StorageError::UnknownTable(row.table_name().to_string()))?;

        let values = row.values();
        let expected = table.insert_columns().count();
        if values.len() != expected {
            return Err(StorageError::ColumnContract {
                table: table.name,
                expected,
                actual: values.len(),
            });
        }

        self.begin_if_needed()?;
        let mut stmt = self.conn.prepare_cached(&table.insert_sql())?;
        let changed = stmt.execute(params_from_iter(values))?;
        if changed == 0 {
            debug!("Ignored duplicate row for {}", table.name);
        }
        Ok(())
    }

    fn lookup_song_artist(
        &mut self,
        title: &str,
        artist_name: &str,
        duration: f64,
        tolerance: f64,
    ) -> Result<Option<SongArtistIds>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT s.song_id, a.artist_id
             FROM songs s
             JOIN artists a ON a.artist_id = s.artist_id
             WHERE s.title = ?1 AND a.name = ?2 AND ABS(s.duration - ?3) <= ?4
             ORDER BY s.song_id ASC
             LIMIT 1",
        )?;
        let ids = stmt
            .query_row(params![title, artist_name, duration, tolerance], |row| {
                Ok(SongArtistIds {
                    song_id: row.get(0)?,
                    artist_id: row.get(1)?,
                })
            })
            .optional()?;
        Ok(ids)
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StorageError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }
}
