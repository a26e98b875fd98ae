//! End-to-end tests for the ETL run
//!
//! Builds a small data tree on disk, runs both passes and inspects the
//! resulting warehouse.

mod common;

use common::{
    log_event, TestDataTree, ARTIST_1_ID, ARTIST_1_NAME, ARTIST_2_ID, SONG_1_DURATION, SONG_1_ID,
    SONG_1_TITLE, SONG_2_ID, SONG_3_ID, TS_1, USER_1_ID,
};
use sparkify_etl::pipeline::run_pipeline_with;
use sparkify_etl::warehouse::TableCounts;
use sparkify_etl::{run_pipeline, FailurePolicy, SqliteWarehouse};

fn songplays(warehouse: &SqliteWarehouse) -> Vec<(String, Option<String>, Option<String>)> {
    let mut stmt = warehouse
        .connection()
        .prepare("SELECT start_time, song_id, artist_id FROM songplays ORDER BY start_time")
        .unwrap();
    let rows = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    rows
}

// =============================================================================
// Full run
// =============================================================================

#[test]
fn test_full_run_populates_star_schema() {
    let tree = TestDataTree::create();
    let summary = run_pipeline(&tree.config(FailurePolicy::Abort, 0.0)).unwrap();

    assert_eq!(
        summary.counts,
        TableCounts {
            songs: 3,
            artists: 2,
            users: 2,
            time: 4,
            songplays: 4,
        }
    );
    assert_eq!(summary.songs.units_total, 3);
    assert_eq!(summary.songs.units_committed, 3);
    assert_eq!(summary.logs.units_total, 2);
    assert_eq!(summary.logs.units_committed, 2);
    assert_eq!(summary.logs.rows.songplays_resolved, 3);
}

#[test]
fn test_songplays_resolve_against_song_dimension() {
    let tree = TestDataTree::create();
    run_pipeline(&tree.config(FailurePolicy::Abort, 0.0)).unwrap();

    let warehouse = SqliteWarehouse::open(&tree.db_path).unwrap();
    let plays = songplays(&warehouse);
    let ids: Vec<(Option<&str>, Option<&str>)> = plays
        .iter()
        .map(|(_, song, artist)| (song.as_deref(), artist.as_deref()))
        .collect();

    assert_eq!(
        ids,
        vec![
            (Some(SONG_1_ID), Some(ARTIST_1_ID)),
            (Some(SONG_2_ID), Some(ARTIST_2_ID)),
            (None, None),
            (Some(SONG_3_ID), Some(ARTIST_1_ID)),
        ]
    );
    assert_eq!(plays[0].0, "2018-11-12 02:37:38.796");
}

#[test]
fn test_time_rows_carry_calendar_fields() {
    let tree = TestDataTree::create();
    run_pipeline(&tree.config(FailurePolicy::Abort, 0.0)).unwrap();

    let warehouse = SqliteWarehouse::open(&tree.db_path).unwrap();
    let fields: (i64, i64, i64, i64, i64, i64) = warehouse
        .connection()
        .query_row(
            "SELECT hour, day, week, month, year, weekday FROM time
             WHERE start_time = '2018-11-12 02:37:38.796'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?)),
        )
        .unwrap();
    assert_eq!(fields, (2, 12, 46, 11, 2018, 0));
}

#[test]
fn test_user_keeps_first_level_seen() {
    let tree = TestDataTree::create();
    run_pipeline(&tree.config(FailurePolicy::Abort, 0.0)).unwrap();

    let warehouse = SqliteWarehouse::open(&tree.db_path).unwrap();
    let level: String = warehouse
        .connection()
        .query_row(
            "SELECT level FROM users WHERE user_id = ?1",
            [USER_1_ID],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(level, "free");

    // The fact table records the level at the time of each play.
    let levels: Vec<String> = {
        let mut stmt = warehouse
            .connection()
            .prepare("SELECT level FROM songplays WHERE user_id = ?1 ORDER BY start_time")
            .unwrap();
        let rows = stmt
            .query_map([USER_1_ID], |r| r.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        rows
    };
    assert_eq!(levels, vec!["free", "free", "paid"]);
}

#[test]
fn test_rerun_ignores_duplicate_dimensions() {
    let tree = TestDataTree::create();
    let config = tree.config(FailurePolicy::Abort, 0.0);
    run_pipeline(&config).unwrap();
    let summary = run_pipeline(&config).unwrap();

    assert_eq!(summary.counts.songs, 3);
    assert_eq!(summary.counts.artists, 2);
    assert_eq!(summary.counts.users, 2);
    assert_eq!(summary.counts.time, 4);
    // Play events are facts, a second load appends them again.
    assert_eq!(summary.counts.songplays, 8);
}

// =============================================================================
// Matching tolerance
// =============================================================================

#[test]
fn test_tolerance_controls_match_rate() {
    let tree = TestDataTree::create();
    tree.write_log(
        "2018/11/2018-11-14-events.json",
        &[log_event(
            "NextSong",
            TS_1 + 172_800_000,
            USER_1_ID,
            "paid",
            SONG_1_TITLE,
            ARTIST_1_NAME,
            SONG_1_DURATION + 0.1,
        )],
    );

    let exact = run_pipeline(&tree.config(FailurePolicy::Abort, 0.0)).unwrap();
    assert_eq!(exact.logs.rows.songplays, 5);
    assert_eq!(exact.logs.rows.songplays_resolved, 3);

    let mut warehouse = SqliteWarehouse::open(&tree.db_path).unwrap();
    warehouse.reset().unwrap();
    let loose = run_pipeline_with(&mut warehouse, &tree.config(FailurePolicy::Abort, 0.2)).unwrap();
    assert_eq!(loose.logs.rows.songplays_resolved, 4);
}

// =============================================================================
// Failure policies
// =============================================================================

#[test]
fn test_abort_policy_stops_on_broken_file() {
    let tree = TestDataTree::create();
    tree.write_raw_log("2018/11/2018-11-12-aaa-broken.json", "{\"page\": \"NextSong\", ");

    let err = run_pipeline(&tree.config(FailurePolicy::Abort, 0.0)).unwrap_err();
    assert!(format!("{:#}", err).contains("2018-11-12-aaa-broken.json"));

    // The song pass committed and the log pass stopped at the broken file,
    // which sorts before the valid logs.
    let counts = SqliteWarehouse::open(&tree.db_path).unwrap().counts().unwrap();
    assert_eq!(counts.songs, 3);
    assert_eq!(counts.songplays, 0);
}

#[test]
fn test_skip_unit_policy_loads_remaining_files() {
    let tree = TestDataTree::create();
    tree.write_raw_log("2018/11/2018-11-12-aaa-broken.json", "{\"page\": \"NextSong\", ");

    let summary = run_pipeline(&tree.config(FailurePolicy::SkipUnit, 0.0)).unwrap();

    assert_eq!(summary.logs.units_total, 3);
    assert_eq!(summary.logs.units_committed, 2);
    assert_eq!(summary.logs.failed_units.len(), 1);
    assert!(summary.logs.failed_units[0]
        .unit
        .ends_with("2018-11-12-aaa-broken.json"));
    assert_eq!(summary.counts.songplays, 4);
}

#[test]
fn test_bad_record_discards_its_whole_file() {
    let tree = TestDataTree::empty();
    tree.write_song(
        "A/A/A/TRAAAAW128F429D538.json",
        &common::song_record(SONG_1_ID, SONG_1_TITLE, ARTIST_1_ID, ARTIST_1_NAME, SONG_1_DURATION),
    );
    let mut bad = log_event("NextSong", TS_1 + 5000, USER_1_ID, "free", "x", "y", 1.0);
    bad["sessionId"] = serde_json::json!("not-a-number");
    tree.write_log(
        "2018/11/2018-11-12-events.json",
        &[
            log_event("NextSong", TS_1, USER_1_ID, "free", SONG_1_TITLE, ARTIST_1_NAME, SONG_1_DURATION),
            bad,
        ],
    );

    let summary = run_pipeline(&tree.config(FailurePolicy::SkipUnit, 0.0)).unwrap();
    assert_eq!(summary.logs.failed_units.len(), 1);
    assert!(summary.logs.failed_units[0].reason.contains("sessionId"));
    assert_eq!(summary.counts.users, 0);
    assert_eq!(summary.counts.time, 0);
    assert_eq!(summary.counts.songplays, 0);
}

#[test]
fn test_empty_directories_load_nothing() {
    let tree = TestDataTree::empty();
    let summary = run_pipeline(&tree.config(FailurePolicy::Abort, 0.0)).unwrap();
    assert_eq!(summary.songs.units_total, 0);
    assert_eq!(summary.logs.units_total, 0);
    assert_eq!(summary.counts, TableCounts::default());
}
