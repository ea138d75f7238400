//! Error types for the filehashes engine
//!
//! Errors are organized into three categories. Every failure a hashing task
//! can hit is one of these, and is reported as an `Error` message scoped to
//! the offending request rather than aborting the manager.

use thiserror::Error;

pub mod internal;
pub mod io;
pub mod validation;

pub use self::io::{IoError, IoErrorKind};
pub use self::validation::ValidationError;
pub use internal::InternalError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the filehashes engine
///
/// - I/O errors: opening, reading and seeking the file being hashed
/// - Validation errors: malformed requests, resume state and configuration
/// - Internal errors: accumulator faults and task panics
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Internal library errors
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Error {
    /// Short stable identifier of the error kind, suitable for front ends
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(err) => match err.kind {
                IoErrorKind::FileIsDirectory => "file-is-directory",
                IoErrorKind::OpenFailure => "open-failure",
                IoErrorKind::ReadFailure => "read-failure",
                IoErrorKind::SeekFailure => "seek-failure",
            },
            Self::Validation(err) => match err {
                ValidationError::NoFileToHash => "no-file-to-hash",
                ValidationError::NoHashAlgorithms => "no-hash-algorithms",
                ValidationError::AlgorithmUnavailable { .. } => "algorithm-unavailable",
                ValidationError::ResumeUnsupported { .. } => "resume-unsupported",
                ValidationError::InvalidResumeState { .. } => "state-mismatch",
                ValidationError::InvalidConfiguration { .. } => "invalid-configuration",
            },
            Self::Internal(err) => match err {
                InternalError::Accumulator { .. } => "accumulator-fault",
                InternalError::TaskPanicked { .. } => "task-panicked",
            },
        }
    }
}
