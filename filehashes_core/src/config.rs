//! Engine configuration

use crate::Result;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Default number of tasks hashing at the same time
pub const DEFAULT_CONCURRENCY: usize = 4;
/// Default read buffer size per task
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024 * 1024;
/// Default capacity of the message channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

const MAX_BUFFER_SIZE: usize = 1024 * 1024 * 1024;

/// Tuning knobs of the hashing manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tasks allowed past the limiter at once
    pub concurrency: usize,
    /// Bytes read from the file per loop iteration
    pub buffer_size: usize,
    /// Messages buffered before hashing tasks block on send
    pub channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            buffer_size: DEFAULT_BUFFER_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            concurrency: 2,
            buffer_size: 4 * 1024, // 4KB reads give many progress steps
            channel_capacity: 4,
        }
    }

    /// Replace zero values with their defaults
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            concurrency: nonzero_or(self.concurrency, defaults.concurrency),
            buffer_size: nonzero_or(self.buffer_size, defaults.buffer_size),
            channel_capacity: nonzero_or(self.channel_capacity, defaults.channel_capacity),
        }
    }

    /// Reject values the manager cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(ValidationError::invalid_configuration("concurrency must be at least 1").into());
        }
        if self.buffer_size == 0 || self.buffer_size > MAX_BUFFER_SIZE {
            return Err(ValidationError::invalid_configuration(&format!(
                "buffer_size must be between 1 and {MAX_BUFFER_SIZE} bytes"
            ))
            .into());
        }
        if self.channel_capacity == 0 {
            return Err(
                ValidationError::invalid_configuration("channel_capacity must be at least 1").into(),
            );
        }
        Ok(())
    }
}

fn nonzero_or(value: usize, default: usize) -> usize {
    if value == 0 { default } else { value }
}
