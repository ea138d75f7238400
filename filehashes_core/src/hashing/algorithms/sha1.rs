//! SHA1 hash algorithm implementation

use super::serialized::DigestAccumulator;
use crate::hashing::AlgorithmId;
use crate::hashing::traits::{Accumulator, HashAlgorithmImpl};
use sha1::Sha1;

pub struct Sha1Algorithm;

impl HashAlgorithmImpl for Sha1Algorithm {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::SHA1
    }

    fn display_name(&self) -> &'static str {
        "SHA1"
    }

    fn supports_resume(&self) -> bool {
        true
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(DigestAccumulator::<Sha1>::new(AlgorithmId::SHA1, b"sha\x01"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha1::Digest;

    #[test]
    fn test_known_vectors() {
        let algorithm = Sha1Algorithm;
        assert_eq!(
            algorithm.hash_bytes(b"").unwrap().to_hex(),
            "DA39A3EE5E6B4B0D3255BFEF95601890AFD80709"
        );
        assert_eq!(
            algorithm.hash_bytes(b"abc").unwrap().to_hex(),
            "A9993E364706816ABA3E25717850C26C9CD0D89D"
        );
    }

    #[test]
    fn test_resume_across_block_boundaries() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 7 % 251) as u8).collect();
        for split in [55, 56, 63, 64, 65, 119, 120, 128, 1000] {
            let mut first = Sha1Algorithm.create_accumulator();
            first.write(&data[..split]).unwrap();
            let mut second = Sha1Algorithm.create_accumulator();
            second.import_state(&first.export_state().unwrap()).unwrap();
            second.write(&data[split..]).unwrap();

            assert_eq!(
                second.final_checksum().as_bytes(),
                Sha1::digest(&data).as_slice(),
                "split at {split}"
            );
        }
    }
}
