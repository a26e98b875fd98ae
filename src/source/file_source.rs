use super::{SourceError, SourceUnit};
use std::path::PathBuf;

/// Lazily reads a fixed list of files, one [`SourceUnit`] per file.
///
/// Each file is opened only when the iterator reaches it; the sequence can be
/// consumed once.
pub struct FileSource {
    paths: std::vec::IntoIter<PathBuf>,
}

impl FileSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths: paths.into_iter(),
        }
    }
}

impl Iterator for FileSource {
    type Item = Result<SourceUnit, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.paths.next().map(|path| SourceUnit::read(&path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

impl ExactSizeIterator for FileSource {}
