//! SHA-256 and SHA-512 hash algorithm implementations

use super::serialized::DigestAccumulator;
use crate::hashing::AlgorithmId;
use crate::hashing::traits::{Accumulator, HashAlgorithmImpl};
use sha2::{Sha256, Sha512};

pub struct Sha256Algorithm;

pub struct Sha512Algorithm;

impl HashAlgorithmImpl for Sha256Algorithm {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::SHA256
    }

    fn display_name(&self) -> &'static str {
        "SHA256"
    }

    fn supports_resume(&self) -> bool {
        true
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(DigestAccumulator::<Sha256>::new(AlgorithmId::SHA256, b"sha\x03"))
    }
}

impl HashAlgorithmImpl for Sha512Algorithm {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::SHA512
    }

    fn display_name(&self) -> &'static str {
        "SHA512"
    }

    fn supports_resume(&self) -> bool {
        true
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(DigestAccumulator::<Sha512>::new(AlgorithmId::SHA512, b"sha\x07"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::Digest;

    #[test]
    fn test_sha256_known_vectors() {
        assert_eq!(
            Sha256Algorithm.hash_bytes(b"").unwrap().to_hex(),
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        );
        assert_eq!(
            Sha256Algorithm.hash_bytes(b"abc").unwrap().to_hex(),
            "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"
        );
    }

    #[test]
    fn test_sha512_known_vector() {
        assert_eq!(
            Sha512Algorithm.hash_bytes(b"abc").unwrap().to_hex(),
            "DDAF35A193617ABACC417349AE20413112E6FA4E89A97EA20A9EEEE64B55D39A\
             2192992A274FC1A836BA3C23A3FEEBBD454D4423643CE80E2A9AC94FA54CA49F"
        );
    }

    #[test]
    fn test_resume_across_block_boundaries() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 13 % 253) as u8).collect();
        for split in [0, 55, 64, 111, 112, 127, 128, 129, 240, 1000] {
            let mut first = Sha256Algorithm.create_accumulator();
            first.write(&data[..split]).unwrap();
            let mut second = Sha256Algorithm.create_accumulator();
            second.import_state(&first.export_state().unwrap()).unwrap();
            second.write(&data[split..]).unwrap();
            assert_eq!(second.final_checksum().as_bytes(), Sha256::digest(&data).as_slice());

            let mut first = Sha512Algorithm.create_accumulator();
            first.write(&data[..split]).unwrap();
            let mut second = Sha512Algorithm.create_accumulator();
            second.import_state(&first.export_state().unwrap()).unwrap();
            second.write(&data[split..]).unwrap();
            assert_eq!(second.final_checksum().as_bytes(), Sha512::digest(&data).as_slice());
        }
    }
}
