//! File resolution against host search directories.

use std::path::PathBuf;

/// Resolves a logical filename to a full path.
///
/// Resolution is a pure function of host state with no side effects; a
/// miss is an ordinary outcome, not an error.
pub trait FileResolver: Send + Sync {
    /// Returns the full path of `filename`, or `None` if not found.
    fn search_file(&self, filename: &str) -> Option<PathBuf>;
}

/// Resolves filenames against an ordered list of search directories.
///
/// The first directory containing the file wins.
#[derive(Debug, Clone, Default)]
pub struct SearchPathResolver {
    directories: Vec<PathBuf>,
}

impl SearchPathResolver {
    /// Creates a resolver over the given directories.
    #[must_use]
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self { directories }
    }

    /// Appends a search directory.
    pub fn push_directory(&mut self, directory: impl Into<PathBuf>) {
        self.directories.push(directory.into());
    }

    /// Returns the search directories in lookup order.
    #[must_use]
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }
}

impl FileResolver for SearchPathResolver {
    fn search_file(&self, filename: &str) -> Option<PathBuf> {
        for directory in &self.directories {
            let candidate = directory.join(filename);
            if candidate.is_file() {
                return Some(candidate.canonicalize().unwrap_or(candidate));
            }
        }
        None
    }
}
