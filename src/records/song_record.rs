use super::{lenient, FieldError};
use serde::Deserialize;
use serde_json::Value;

/// One song metadata record: the song itself plus its artist, side by side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    #[serde(deserialize_with = "lenient::year")]
    pub year: i64,
    #[serde(deserialize_with = "lenient::duration")]
    pub duration: f64,
    pub artist_name: Option<String>,
    pub artist_location: Option<String>,
    #[serde(default, deserialize_with = "lenient::artist_latitude")]
    pub artist_latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::artist_longitude")]
    pub artist_longitude: Option<f64>,
}

impl SongRecord {
    pub fn from_json(record: &Value) -> Result<Self, FieldError> {
        Ok(Self::deserialize(record)?)
    }
}
