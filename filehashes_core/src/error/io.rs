//! I/O related error types

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// I/O error with additional context
#[derive(Error, Debug, Clone)]
#[error("{}", format_io_error(self))]
pub struct IoError {
    /// The kind of I/O error
    pub kind: IoErrorKind,
    /// Path associated with the error (if any)
    pub path: Option<PathBuf>,
    /// Underlying I/O error (if any)
    #[source]
    pub source: Option<Arc<std::io::Error>>,
}

/// Kind of I/O error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoErrorKind {
    /// The path names a directory
    FileIsDirectory,
    /// The file could not be opened or stat'ed
    OpenFailure,
    /// A read failed mid-file
    ReadFailure,
    /// Seeking to the resume offset failed
    SeekFailure,
}

impl IoError {
    fn new(kind: IoErrorKind, path: &Path, source: Option<std::io::Error>) -> Self {
        Self {
            kind,
            path: Some(path.to_path_buf()),
            source: source.map(Arc::new),
        }
    }

    /// Create a file-is-directory error
    pub fn file_is_directory(path: &Path) -> Self {
        Self::new(IoErrorKind::FileIsDirectory, path, None)
    }

    /// Create an open failure error
    pub fn open_failure(path: &Path, source: std::io::Error) -> Self {
        Self::new(IoErrorKind::OpenFailure, path, Some(source))
    }

    /// Create a read failure error
    pub fn read_failure(path: &Path, source: std::io::Error) -> Self {
        Self::new(IoErrorKind::ReadFailure, path, Some(source))
    }

    /// Create a seek failure error
    pub fn seek_failure(path: &Path, source: std::io::Error) -> Self {
        Self::new(IoErrorKind::SeekFailure, path, Some(source))
    }

    /// Kind of the underlying OS error, if there is one
    pub fn os_kind(&self) -> Option<std::io::ErrorKind> {
        self.source.as_ref().map(|source| source.kind())
    }
}

fn format_io_error(error: &IoError) -> String {
    let path = error
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let detail = error
        .source
        .as_ref()
        .map(|source| format!(": {source}"))
        .unwrap_or_default();

    match error.kind {
        IoErrorKind::FileIsDirectory => format!("file is a directory: {path}"),
        IoErrorKind::OpenFailure => format!("failed to open {path}{detail}"),
        IoErrorKind::ReadFailure => format!("failed to read {path}{detail}"),
        IoErrorKind::SeekFailure => format!("failed to seek {path}{detail}"),
    }
}
