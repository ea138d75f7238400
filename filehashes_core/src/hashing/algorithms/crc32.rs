//! CRC32 hash algorithm implementation

use crate::Result;
use crate::error::ValidationError;
use crate::hashing::traits::{Accumulator, HashAlgorithmImpl};
use crate::hashing::{AlgorithmId, Checksum};
use crc32fast::Hasher as Crc32Hasher;

const MAGIC: &[u8; 4] = b"crc\x01";
const STATE_LEN: usize = 4 + 4 + 8;

pub struct Crc32Algorithm;

/// CRC32 accumulator; the running checksum and byte count are its whole state
struct Crc32Accumulator {
    hasher: Crc32Hasher,
    len: u64,
}

impl Crc32Accumulator {
    fn new() -> Self {
        Self {
            hasher: Crc32Hasher::new(),
            len: 0,
        }
    }

    fn current(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

impl Accumulator for Crc32Accumulator {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.hasher.update(data);
        self.len = self.len.wrapping_add(data.len() as u64);
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.len
    }

    fn final_checksum(&self) -> Checksum {
        Checksum::new(self.current().to_be_bytes())
    }

    fn export_state(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(STATE_LEN);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.current().to_be_bytes());
        out.extend_from_slice(&self.len.to_be_bytes());
        Ok(out)
    }

    fn import_state(&mut self, state: &[u8]) -> Result<()> {
        if state.len() != STATE_LEN || &state[..4] != MAGIC {
            return Err(ValidationError::invalid_resume_state("malformed crc32 state").into());
        }
        let mut crc = [0u8; 4];
        crc.copy_from_slice(&state[4..8]);
        let mut len = [0u8; 8];
        len.copy_from_slice(&state[8..16]);

        self.len = u64::from_be_bytes(len);
        self.hasher = Crc32Hasher::new_with_initial_len(u32::from_be_bytes(crc), self.len);
        Ok(())
    }
}

impl HashAlgorithmImpl for Crc32Algorithm {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::CRC32
    }

    fn display_name(&self) -> &'static str {
        "CRC32"
    }

    fn supports_resume(&self) -> bool {
        true
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(Crc32Accumulator::new())
    }
}
