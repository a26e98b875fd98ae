use super::SourceError;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

pub const DEFAULT_EXTENSION: &str = "json";

/// Recursively collects the files under `root` whose extension matches,
/// as absolute paths in lexicographic order.
pub fn discover_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>, SourceError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| SourceError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if matches {
            let path = entry.path();
            let absolute = path.canonicalize().map_err(|source| SourceError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            files.push(absolute);
        }
    }
    files.sort();

    info!("{} files found in {}", files.len(), root.display());
    Ok(files)
}
