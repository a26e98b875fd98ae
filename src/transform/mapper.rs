use super::time_dimension::derive_time_row;
use crate::records::{FieldError, LogEvent, MappingError, RecordRef, SongRecord};
use crate::source::SourceUnit;
use crate::warehouse::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
use serde_json::Value;
use tracing::warn;

/// The (title, artist name, duration) triple a play event carries instead of
/// dimension ids.
#[derive(Clone, Debug, PartialEq)]
pub struct SongLookupKey {
    pub title: String,
    pub artist_name: String,
    pub duration: f64,
}

/// Rows derived from one `NextSong` event.
///
/// `songplay` leaves its song and artist ids unset until the resolver fills
/// them in from `lookup`.
#[derive(Clone, Debug, PartialEq)]
pub struct MappedPlay {
    pub record: RecordRef,
    pub time: TimeRow,
    pub user: UserRow,
    pub songplay: SongplayRow,
    pub lookup: SongLookupKey,
}

fn require_object(value: &Value, record: &RecordRef) -> Result<(), MappingError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(MappingError::field(record.clone(), FieldError::NotAnObject))
    }
}

/// Projects a song unit into its song and artist rows.
///
/// Song files hold a single record. Extra records are ignored with a warning.
pub fn map_song_unit(unit: &SourceUnit) -> Result<(SongRow, ArtistRow), MappingError> {
    let label = unit.label();
    let first = unit.records.first().ok_or_else(|| MappingError::EmptyUnit {
        unit: label.clone(),
    })?;
    if unit.records.len() > 1 {
        warn!(
            "{} holds {} song records, only the first is loaded",
            label,
            unit.records.len()
        );
    }

    let record = RecordRef::new(label, 0);
    require_object(first, &record)?;
    let song = SongRecord::from_json(first).map_err(|kind| MappingError::field(record, kind))?;

    let song_row = SongRow {
        song_id: song.song_id,
        title: song.title,
        artist_id: song.artist_id.clone(),
        year: song.year,
        duration: song.duration,
    };
    let artist_row = ArtistRow {
        artist_id: song.artist_id,
        name: song.artist_name,
        location: song.artist_location,
        latitude: song.artist_latitude,
        longitude: song.artist_longitude,
    };
    Ok((song_row, artist_row))
}

fn map_event(event: LogEvent, record: RecordRef) -> Result<MappedPlay, MappingError> {
    let time =
        derive_time_row(event.ts).map_err(|kind| MappingError::field(record.clone(), kind))?;

    let user = UserRow {
        user_id: event.user_id,
        first_name: event.first_name,
        last_name: event.last_name,
        gender: event.gender,
        level: event.level.clone(),
    };
    let songplay = SongplayRow {
        start_time: time.start_time,
        user_id: event.user_id,
        level: event.level,
        song_artist: None,
        session_id: event.session_id,
        location: event.location,
        user_agent: event.user_agent,
    };
    let lookup = SongLookupKey {
        title: event.song,
        artist_name: event.artist,
        duration: event.length,
    };

    Ok(MappedPlay {
        record,
        time,
        user,
        songplay,
        lookup,
    })
}

/// Projects every `NextSong` event of a log unit, in file order.
///
/// Any other page is dropped before its fields are read. The first record
/// that fails to map fails the whole unit.
pub fn map_log_unit(unit: &SourceUnit) -> Result<Vec<MappedPlay>, MappingError> {
    let label = unit.label();
    let mut plays = Vec::new();
    for (index, value) in unit.records.iter().enumerate() {
        let record = RecordRef::new(label.clone(), index);
        require_object(value, &record)?;
        if !LogEvent::is_next_song(value) {
            continue;
        }
        let event =
            LogEvent::from_json(value).map_err(|kind| MappingError::field(record.clone(), kind))?;
        plays.push(map_event(event, record)?);
    }
    Ok(plays)
}
