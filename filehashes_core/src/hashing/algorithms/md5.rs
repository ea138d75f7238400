//! MD5 hash algorithm implementation

use super::serialized::DigestAccumulator;
use crate::hashing::AlgorithmId;
use crate::hashing::traits::{Accumulator, HashAlgorithmImpl};
use md5::Md5;

pub struct Md5Algorithm;

impl HashAlgorithmImpl for Md5Algorithm {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::MD5
    }

    fn display_name(&self) -> &'static str {
        "MD5"
    }

    fn supports_resume(&self) -> bool {
        true
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(DigestAccumulator::<Md5>::new(AlgorithmId::MD5, b"md5\x01"))
    }
}
