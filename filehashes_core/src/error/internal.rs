//! Internal library error types

use crate::hashing::AlgorithmId;
use thiserror::Error;

/// Internal library errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    /// An accumulator rejected input; the task cannot continue
    #[error("Hash calculation failed for algorithm '{algorithm}': {message}")]
    Accumulator {
        algorithm: AlgorithmId,
        message: String,
    },

    /// The blocking hashing loop panicked
    #[error("Hashing task panicked: {message}")]
    TaskPanicked { message: String },
}

impl InternalError {
    /// Create an accumulator fault error
    pub fn accumulator(algorithm: &AlgorithmId, message: impl Into<String>) -> Self {
        Self::Accumulator {
            algorithm: algorithm.clone(),
            message: message.into(),
        }
    }

    /// Create a task panicked error
    pub fn task_panicked(message: impl Into<String>) -> Self {
        Self::TaskPanicked {
            message: message.into(),
        }
    }
}
