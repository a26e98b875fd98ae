//! Typed rows for the warehouse tables.
//!
//! Each struct mirrors one table of [`super::schema`]; `values()` yields the
//! column values in the table's insert order.

use super::schema::{
    ARTISTS_TABLE_NAME, SONGPLAYS_TABLE_NAME, SONGS_TABLE_NAME, TIME_TABLE_NAME, USERS_TABLE_NAME,
};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;

/// Storage format of `start_time`, shared by the time and songplays tables.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub fn format_start_time(start_time: &DateTime<Utc>) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

fn opt_text(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::Text(s.clone()),
        None => Value::Null,
    }
}

fn opt_real(value: Option<f64>) -> Value {
    match value {
        Some(v) => Value::Real(v),
        None => Value::Null,
    }
}

// =============================================================================
// Dimension Rows
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i64,
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    /// Subscription level at the time of the event ('free' or 'paid').
    pub level: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeRow {
    pub start_time: DateTime<Utc>,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

// =============================================================================
// Fact Row
// =============================================================================

/// Identifiers resolved from the song and artist dimensions.
///
/// Both ids always travel together, a songplay either has both or neither.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongArtistIds {
    pub song_id: String,
    pub artist_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongplayRow {
    pub start_time: DateTime<Utc>,
    pub user_id: i64,
    pub level: String,
    pub song_artist: Option<SongArtistIds>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl SongplayRow {
    pub fn song_id(&self) -> Option<&str> {
        self.song_artist.as_ref().map(|ids| ids.song_id.as_str())
    }

    pub fn artist_id(&self) -> Option<&str> {
        self.song_artist.as_ref().map(|ids| ids.artist_id.as_str())
    }
}

// =============================================================================
// Row dispatch
// =============================================================================

/// Any row the warehouse accepts, tagged with its destination table.
#[derive(Clone, Debug, PartialEq)]
pub enum WarehouseRow {
    Song(SongRow),
    Artist(ArtistRow),
    User(UserRow),
    Time(TimeRow),
    Songplay(SongplayRow),
}

impl WarehouseRow {
    pub fn table_name(&self) -> &'static str {
        match self {
            WarehouseRow::Song(_) => SONGS_TABLE_NAME,
            WarehouseRow::Artist(_) => ARTISTS_TABLE_NAME,
            WarehouseRow::User(_) => USERS_TABLE_NAME,
            WarehouseRow::Time(_) => TIME_TABLE_NAME,
            WarehouseRow::Songplay(_) => SONGPLAYS_TABLE_NAME,
        }
    }

    /// Column values in the table's insert order.
    pub fn values(&self) -> Vec<Value> {
        match self {
            WarehouseRow::Song(r) => vec![
                Value::Text(r.song_id.clone()),
                Value::Text(r.title.clone()),
                Value::Text(r.artist_id.clone()),
                Value::Integer(r.year),
                Value::Real(r.duration),
            ],
            WarehouseRow::Artist(r) => vec![
                Value::Text(r.artist_id.clone()),
                opt_text(&r.name),
                opt_text(&r.location),
                opt_real(r.latitude),
                opt_real(r.longitude),
            ],
            WarehouseRow::User(r) => vec![
                Value::Integer(r.user_id),
                opt_text(&r.first_name),
                opt_text(&r.last_name),
                opt_text(&r.gender),
                Value::Text(r.level.clone()),
            ],
            WarehouseRow::Time(r) => vec![
                Value::Text(format_start_time(&r.start_time)),
                Value::Integer(r.hour.into()),
                Value::Integer(r.day.into()),
                Value::Integer(r.week.into()),
                Value::Integer(r.month.into()),
                Value::Integer(r.year.into()),
                Value::Integer(r.weekday.into()),
            ],
            WarehouseRow::Songplay(r) => vec![
                Value::Text(format_start_time(&r.start_time)),
                Value::Integer(r.user_id),
                Value::Text(r.level.clone()),
                opt_text(&r.song_id().map(str::to_string)),
                opt_text(&r.artist_id().map(str::to_string)),
                Value::Integer(r.session_id),
                opt_text(&r.location),
                opt_text(&r.user_agent),
            ],
        }
    }
}
