use super::mapper::SongLookupKey;
use crate::warehouse::{SongArtistIds, StorageError, Warehouse};

/// Resolves the song and artist ids of a play through the warehouse's
/// dimension tables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForeignKeyResolver {
    /// Largest accepted difference in seconds between the event length and
    /// the song duration. Zero means exact equality.
    pub tolerance: f64,
}

impl Default for ForeignKeyResolver {
    fn default() -> Self {
        Self { tolerance: 0.0 }
    }
}

impl ForeignKeyResolver {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Both ids or neither. A miss is `Ok(None)`, not an error.
    pub fn resolve<W: Warehouse + ?Sized>(
        &self,
        warehouse: &mut W,
        key: &SongLookupKey,
    ) -> Result<Option<SongArtistIds>, StorageError> {
        warehouse.lookup_song_artist(&key.title, &key.artist_name, key.duration, self.tolerance)
    }
}
