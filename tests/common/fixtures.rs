use super::constants::*;
use serde_json::{json, Value};
use sparkify_etl::config::{AppConfig, CliConfig};
use sparkify_etl::FailurePolicy;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn song_record(
    song_id: &str,
    title: &str,
    artist_id: &str,
    artist_name: &str,
    duration: f64,
) -> Value {
    json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": artist_name,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": 2004
    })
}

pub fn log_event(
    page: &str,
    ts: i64,
    user_id: i64,
    level: &str,
    song: &str,
    artist: &str,
    length: f64,
) -> Value {
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": "Kaylee",
        "gender": "F",
        "itemInSession": 1,
        "lastName": "Summers",
        "length": length,
        "level": level,
        "location": "Phoenix-Mesa-Scottsdale, AZ",
        "method": "PUT",
        "page": page,
        "registration": 1540344794796.0,
        "sessionId": 139,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (Windows NT 6.1; WOW64)",
        "userId": user_id.to_string()
    })
}

/// A song tree, a log tree and a warehouse path inside one temp directory.
pub struct TestDataTree {
    _root: TempDir,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub db_path: PathBuf,
}

impl TestDataTree {
    /// Three songs by two artists, and two days of logs with four plays.
    pub fn create() -> Self {
        let tree = Self::empty();

        tree.write_song(
            "A/A/A/TRAAAAW128F429D538.json",
            &song_record(SONG_1_ID, SONG_1_TITLE, ARTIST_1_ID, ARTIST_1_NAME, SONG_1_DURATION),
        );
        tree.write_song(
            "A/A/B/TRAABJL12903CDCF1A.json",
            &song_record(SONG_2_ID, SONG_2_TITLE, ARTIST_2_ID, ARTIST_2_NAME, SONG_2_DURATION),
        );
        tree.write_song(
            "A/B/C/TRABCEI128F424C983.json",
            &song_record(SONG_3_ID, SONG_3_TITLE, ARTIST_1_ID, ARTIST_1_NAME, SONG_3_DURATION),
        );

        tree.write_log(
            "2018/11/2018-11-12-events.json",
            &[
                log_event("NextSong", TS_1, USER_1_ID, "free", SONG_1_TITLE, ARTIST_1_NAME, SONG_1_DURATION),
                log_event("Home", TS_1 + 1000, USER_1_ID, "free", "", "", 0.0),
                log_event("NextSong", TS_2, USER_2_ID, "paid", SONG_2_TITLE, ARTIST_2_NAME, SONG_2_DURATION),
                log_event("NextSong", TS_3, USER_1_ID, "free", "Unknown Song", "Nobody", 123.4),
            ],
        );
        tree.write_log(
            "2018/11/2018-11-13-events.json",
            &[
                log_event("NextSong", TS_4, USER_1_ID, "paid", SONG_3_TITLE, ARTIST_1_NAME, SONG_3_DURATION),
                log_event("Logout", TS_4 + 1000, USER_1_ID, "paid", "", "", 0.0),
            ],
        );
        tree
    }

    pub fn empty() -> Self {
        let root = TempDir::new().unwrap();
        let song_data = root.path().join("song_data");
        let log_data = root.path().join("log_data");
        fs::create_dir_all(&song_data).unwrap();
        fs::create_dir_all(&log_data).unwrap();
        let db_path = root.path().join("sparkify.db");
        Self {
            _root: root,
            song_data,
            log_data,
            db_path,
        }
    }

    pub fn write_song(&self, relative: &str, record: &Value) {
        write_lines(&self.song_data.join(relative), &[record.to_string()]);
    }

    pub fn write_log(&self, relative: &str, events: &[Value]) {
        let lines: Vec<String> = events.iter().map(|e| e.to_string()).collect();
        write_lines(&self.log_data.join(relative), &lines);
    }

    pub fn write_raw_log(&self, relative: &str, text: &str) {
        let path = self.log_data.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    pub fn config(&self, failure_policy: FailurePolicy, duration_tolerance: f64) -> AppConfig {
        let cli = CliConfig {
            db_path: Some(self.db_path.clone()),
            song_data: Some(self.song_data.clone()),
            log_data: Some(self.log_data.clone()),
            failure_policy,
            duration_tolerance,
            progress_bar: false,
        };
        AppConfig::resolve(&cli, None).unwrap()
    }
}

fn write_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, lines.join("\n") + "\n").unwrap();
}
