//! Common test infrastructure
//!
//! Builds a throwaway data tree (song files, log files and a warehouse path)
//! shaped like the real dataset. Tests should only import from this module.

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{log_event, song_record, TestDataTree};
