//! Core traits for the hash algorithm extensibility system

use super::{AlgorithmId, Checksum};
use crate::Result;

/// Core trait that all hash algorithms must implement
pub trait HashAlgorithmImpl: Send + Sync {
    /// Unique identifier for this algorithm
    fn id(&self) -> AlgorithmId;

    /// Display name for user interfaces
    fn display_name(&self) -> &'static str;

    /// Whether accumulators of this algorithm can export and import their state
    fn supports_resume(&self) -> bool;

    /// Create a new zero-state accumulator
    fn create_accumulator(&self) -> Box<dyn Accumulator>;

    /// Calculate the checksum of in-memory data
    fn hash_bytes(&self, data: &[u8]) -> Result<Checksum> {
        let mut accumulator = self.create_accumulator();
        accumulator.write(data)?;
        Ok(accumulator.final_checksum())
    }
}

/// Running state of one digest computation
///
/// For resumable algorithms, importing an exported state into a fresh
/// accumulator yields one that behaves exactly like the original for every
/// later `write` and `final_checksum`.
pub trait Accumulator: Send {
    /// Feed more data. Fails only on an unrecoverable internal fault.
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Number of input bytes the state covers, including imported ones
    fn bytes_written(&self) -> u64;

    /// Digest of everything written so far; does not consume the state
    fn final_checksum(&self) -> Checksum;

    /// Serialize the internal state
    fn export_state(&self) -> Result<Vec<u8>>;

    /// Replace the internal state with a previously exported one
    fn import_state(&mut self, state: &[u8]) -> Result<()>;
}
