//! Validation related error types

use crate::hashing::AlgorithmId;
use thiserror::Error;

/// Request, resume state and configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A batch submission contained no requests
    #[error("no file to hash")]
    NoFileToHash,

    /// A request named no hash algorithm
    #[error("no hash algorithms")]
    NoHashAlgorithms,

    /// A request named an algorithm that is not registered
    #[error("hash algorithm '{algorithm}' is not available")]
    AlgorithmUnavailable { algorithm: AlgorithmId },

    /// A resume was requested for an algorithm that cannot export its state
    #[error("hash algorithm '{algorithm}' does not support resuming")]
    ResumeUnsupported { algorithm: AlgorithmId },

    /// The resume state does not match the request or the file
    #[error("invalid hash state: {reason}")]
    InvalidResumeState { reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ValidationError {
    /// Create an algorithm unavailable error
    pub fn algorithm_unavailable(algorithm: &AlgorithmId) -> Self {
        Self::AlgorithmUnavailable {
            algorithm: algorithm.clone(),
        }
    }

    /// Create a resume unsupported error
    pub fn resume_unsupported(algorithm: &AlgorithmId) -> Self {
        Self::ResumeUnsupported {
            algorithm: algorithm.clone(),
        }
    }

    /// Create an invalid resume state error
    pub fn invalid_resume_state(reason: impl Into<String>) -> Self {
        Self::InvalidResumeState {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: &str) -> Self {
        Self::InvalidConfiguration {
            message: message.to_string(),
        }
    }
}
