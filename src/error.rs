use std::path::PathBuf;

use thiserror::Error;

/// Failure to bring up the dashboard's input tables.
///
/// There is one kind: an expected file is absent, unreadable or does not
/// parse. Every pane needs all three tables, so callers treat it as fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing input file `{file}` ({}): {reason}", path.display())]
    MissingInputFile {
        /// File name as expected in the data directory.
        file: &'static str,
        /// Full path that was tried.
        path: PathBuf,
        reason: String,
    },
}

impl LoadError {
    /// Name of the file that caused the failure.
    pub fn file(&self) -> &'static str {
        match self {
            LoadError::MissingInputFile { file, .. } => file,
        }
    }
}
