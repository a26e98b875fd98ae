//! Shared constants for end-to-end tests

// ============================================================================
// Songs
// ============================================================================

pub const SONG_1_ID: &str = "SOA";
pub const SONG_1_TITLE: &str = "T1";
pub const SONG_1_DURATION: f64 = 180.5;

pub const SONG_2_ID: &str = "SOB";
pub const SONG_2_TITLE: &str = "T2";
pub const SONG_2_DURATION: f64 = 240.0;

/// Second song by artist 1
pub const SONG_3_ID: &str = "SOC";
pub const SONG_3_TITLE: &str = "T3";
pub const SONG_3_DURATION: f64 = 99.0;

// ============================================================================
// Artists
// ============================================================================

pub const ARTIST_1_ID: &str = "ARA";
pub const ARTIST_1_NAME: &str = "Artist1";

pub const ARTIST_2_ID: &str = "ARB";
pub const ARTIST_2_NAME: &str = "Artist2";

// ============================================================================
// Users
// ============================================================================

/// Starts on the free tier and upgrades the next day
pub const USER_1_ID: i64 = 8;

pub const USER_2_ID: i64 = 15;

// ============================================================================
// Timestamps (epoch millis, UTC)
// ============================================================================

/// 2018-11-12 02:37:38.796
pub const TS_1: i64 = 1541990258796;
pub const TS_2: i64 = 1541990300796;
pub const TS_3: i64 = 1541990400796;
/// 2018-11-13
pub const TS_4: i64 = 1542076658796;
