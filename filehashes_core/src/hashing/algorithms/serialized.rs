//! Accumulator over any RustCrypto digest with a serializable state
//!
//! Exported state layout:
//!
//! ```text
//! magic | bytes written (u64 BE) | digest state as produced by `SerializableState`
//! ```

use crate::Result;
use crate::error::ValidationError;
use crate::hashing::traits::Accumulator;
use crate::hashing::{AlgorithmId, Checksum};
use digest::Digest;
use digest::common::hazmat::{SerializableState, SerializedState};

const HEADER_LEN: usize = 4 + 8;

pub(super) struct DigestAccumulator<D> {
    id: AlgorithmId,
    magic: &'static [u8; 4],
    hasher: D,
    len: u64,
}

impl<D> DigestAccumulator<D>
where
    D: Digest + SerializableState + Clone + Send + 'static,
{
    pub(super) fn new(id: AlgorithmId, magic: &'static [u8; 4]) -> Self {
        Self {
            id,
            magic,
            hasher: D::new(),
            len: 0,
        }
    }

    fn malformed(&self, reason: &str) -> crate::Error {
        ValidationError::invalid_resume_state(format!("malformed {} state: {reason}", self.id))
            .into()
    }
}

impl<D> Accumulator for DigestAccumulator<D>
where
    D: Digest + SerializableState + Clone + Send + 'static,
{
    fn write(&mut self, data: &[u8]) -> Result<()> {
        Digest::update(&mut self.hasher, data);
        self.len = self.len.wrapping_add(data.len() as u64);
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.len
    }

    fn final_checksum(&self) -> Checksum {
        Checksum::new(Digest::finalize(self.hasher.clone()).to_vec())
    }

    fn export_state(&self) -> Result<Vec<u8>> {
        let state = self.hasher.serialize();
        let mut out = Vec::with_capacity(HEADER_LEN + state.len());
        out.extend_from_slice(self.magic);
        out.extend_from_slice(&self.len.to_be_bytes());
        out.extend_from_slice(state.as_slice());
        Ok(out)
    }

    fn import_state(&mut self, state: &[u8]) -> Result<()> {
        if state.len() < HEADER_LEN || &state[..4] != self.magic {
            return Err(self.malformed("unknown tag"));
        }
        let (header, body) = state.split_at(HEADER_LEN);
        let mut len = [0u8; 8];
        len.copy_from_slice(&header[4..]);

        let serialized: &SerializedState<D> = body
            .try_into()
            .map_err(|_| self.malformed("wrong length"))?;
        let hasher = D::deserialize(serialized).map_err(|_| self.malformed("corrupt digest state"))?;

        self.hasher = hasher;
        self.len = u64::from_be_bytes(len);
        Ok(())
    }
}
