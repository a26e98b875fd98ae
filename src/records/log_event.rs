use super::{lenient, FieldError};
use serde::Deserialize;
use serde_json::Value;

/// Page value of a song being played; every other page is UI navigation.
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// A play event read from the application logs.
///
/// Only `NextSong` events are decoded into this shape, the other pages carry
/// no song and often no user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    /// Epoch milliseconds, UTC.
    #[serde(deserialize_with = "lenient::ts")]
    pub ts: i64,
    #[serde(deserialize_with = "lenient::user_id")]
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: String,
    pub song: String,
    pub artist: String,
    /// Seconds.
    #[serde(deserialize_with = "lenient::length")]
    pub length: f64,
    #[serde(deserialize_with = "lenient::session_id")]
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl LogEvent {
    /// Whether the raw record is a song play. A missing or non-string page is
    /// not one.
    pub fn is_next_song(record: &Value) -> bool {
        record.get("page").and_then(Value::as_str) == Some(NEXT_SONG_PAGE)
    }

    pub fn from_json(record: &Value) -> Result<Self, FieldError> {
        Ok(Self::deserialize(record)?)
    }
}
