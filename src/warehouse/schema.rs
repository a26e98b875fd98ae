//! SQLite schema definitions for the star-schema warehouse.
//!
//! Four dimension tables (songs, artists, users, time) and one fact table
//! (songplays). Column order here is the insert contract used by
//! [`super::WarehouseRow`].

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ConflictPolicy, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

// =============================================================================
// Dimension Tables
// =============================================================================

pub const SONGS_TABLE_NAME: &str = "songs";
pub const ARTISTS_TABLE_NAME: &str = "artists";
pub const USERS_TABLE_NAME: &str = "users";
pub const TIME_TABLE_NAME: &str = "time";
pub const SONGPLAYS_TABLE_NAME: &str = "songplays";

const SONGS_TABLE: Table = Table {
    name: SONGS_TABLE_NAME,
    columns: &[
        sqlite_column!("song_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true), // 0 when unknown
        sqlite_column!("duration", &SqlType::Real, non_null = true), // seconds
    ],
    indices: &[("idx_songs_title", "title")],
    on_conflict: ConflictPolicy::Ignore,
};

const ARTISTS_TABLE: Table = Table {
    name: ARTISTS_TABLE_NAME,
    columns: &[
        sqlite_column!("artist_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
    ],
    indices: &[("idx_artists_name", "name")],
    on_conflict: ConflictPolicy::Ignore,
};

const USERS_TABLE: Table = Table {
    name: USERS_TABLE_NAME,
    columns: &[
        sqlite_column!("user_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("first_name", &SqlType::Text),
        sqlite_column!("last_name", &SqlType::Text),
        sqlite_column!("gender", &SqlType::Text),
        sqlite_column!("level", &SqlType::Text, non_null = true), // 'free', 'paid'
    ],
    indices: &[],
    on_conflict: ConflictPolicy::Ignore,
};

const TIME_TABLE: Table = Table {
    name: TIME_TABLE_NAME,
    columns: &[
        sqlite_column!("start_time", &SqlType::Text, is_primary_key = true), // 'YYYY-MM-DD HH:MM:SS.mmm' UTC
        sqlite_column!("hour", &SqlType::Integer, non_null = true),
        sqlite_column!("day", &SqlType::Integer, non_null = true),
        sqlite_column!("week", &SqlType::Integer, non_null = true), // ISO week
        sqlite_column!("month", &SqlType::Integer, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("weekday", &SqlType::Integer, non_null = true), // Monday = 0
    ],
    indices: &[],
    on_conflict: ConflictPolicy::Ignore,
};

// =============================================================================
// Fact Table
// =============================================================================

const SONG_FK: ForeignKey = ForeignKey {
    foreign_table: SONGS_TABLE_NAME,
    foreign_column: "song_id",
    on_delete: ForeignKeyOnChange::SetNull,
};

const ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: ARTISTS_TABLE_NAME,
    foreign_column: "artist_id",
    on_delete: ForeignKeyOnChange::SetNull,
};

const SONGPLAYS_TABLE: Table = Table {
    name: SONGPLAYS_TABLE_NAME,
    columns: &[
        sqlite_column!(
            "songplay_id",
            &SqlType::Integer,
            is_primary_key = true,
            is_generated = true
        ),
        sqlite_column!("start_time", &SqlType::Text, non_null = true),
        sqlite_column!("user_id", &SqlType::Integer, non_null = true),
        sqlite_column!("level", &SqlType::Text, non_null = true),
        sqlite_column!("song_id", &SqlType::Text, foreign_key = Some(&SONG_FK)),
        sqlite_column!("artist_id", &SqlType::Text, foreign_key = Some(&ARTIST_FK)),
        sqlite_column!("session_id", &SqlType::Integer, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("user_agent", &SqlType::Text),
    ],
    indices: &[
        ("idx_songplays_start_time", "start_time"),
        ("idx_songplays_user", "user_id"),
    ],
    on_conflict: ConflictPolicy::Abort,
};

// =============================================================================
// Versioned Schema Definition
// =============================================================================

/// Warehouse schemas, oldest first. Dimension tables precede the fact table
/// so creation order satisfies the foreign keys.
pub const WAREHOUSE_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[
        SONGS_TABLE,
        ARTISTS_TABLE,
        USERS_TABLE,
        TIME_TABLE,
        SONGPLAYS_TABLE,
    ],
}];

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::{params, Connection};

    fn latest() -> &'static VersionedSchema {
        WAREHOUSE_VERSIONED_SCHEMAS.last().unwrap()
    }

    #[test]
    fn test_schema_creates_successfully() {
        let conn = Connection::open_in_memory().unwrap();
        latest().create(&conn).unwrap();
        latest().validate(&conn).unwrap();
    }

    #[test]
    fn test_songplay_insert_generates_id() {
        let conn = Connection::open_in_memory().unwrap();
        latest().create(&conn).unwrap();

        let sql = latest().table(SONGPLAYS_TABLE_NAME).unwrap().insert_sql();
        conn.execute(
            &sql,
            params![
                "2018-11-12 02:37:38.796",
                39,
                "free",
                None::<String>,
                None::<String>,
                38,
                "San Francisco, CA",
                "Mozilla/5.0"
            ],
        )
        .unwrap();

        let id: i64 = conn
            .query_row("SELECT songplay_id FROM songplays", [], |r| r.get(0))
            .unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn test_songplay_rejects_unknown_song() {
        let conn = Connection::open_in_memory().unwrap();
        latest().create(&conn).unwrap();

        let sql = latest().table(SONGPLAYS_TABLE_NAME).unwrap().insert_sql();
        let result = conn.execute(
            &sql,
            params![
                "2018-11-12 02:37:38.796",
                39,
                "free",
                "SO_MISSING",
                "AR_MISSING",
                38,
                None::<String>,
                None::<String>
            ],
        );
        assert!(result.is_err());
    }
}
