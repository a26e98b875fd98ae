//! Pure projections from source records to warehouse rows, plus the lookup
//! that completes a songplay with its dimension ids.

mod mapper;
mod resolver;
mod time_dimension;

pub use mapper::{map_log_unit, map_song_unit, MappedPlay, SongLookupKey};
pub use resolver::ForeignKeyResolver;
pub use time_dimension::derive_time_row;
