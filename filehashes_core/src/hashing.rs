//! Digest algorithms for the filehashes engine
//!
//! Every algorithm is reached through [`HashAlgorithmImpl`], which hands out
//! [`Accumulator`]s. Algorithms are looked up by [`AlgorithmId`] in an
//! [`AlgorithmRegistry`] that the caller builds and passes to the manager.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

mod algorithms;
mod registry;
mod traits;

pub use registry::AlgorithmRegistry;
pub use traits::{Accumulator, HashAlgorithmImpl};

/// Identifier of a hash algorithm, always lowercase
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AlgorithmId(Cow<'static, str>);

impl AlgorithmId {
    /// CRC-32 (IEEE)
    pub const CRC32: Self = Self(Cow::Borrowed("crc32"));
    /// MD5
    pub const MD5: Self = Self(Cow::Borrowed("md5"));
    /// SHA-1
    pub const SHA1: Self = Self(Cow::Borrowed("sha1"));
    /// SHA-256
    pub const SHA256: Self = Self(Cow::Borrowed("sha256"));
    /// SHA-512
    pub const SHA512: Self = Self(Cow::Borrowed("sha512"));

    /// Create an identifier from a user supplied name
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Cow::Owned(name.as_ref().trim().to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AlgorithmId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for AlgorithmId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<AlgorithmId> for String {
    fn from(id: AlgorithmId) -> Self {
        id.0.into_owned()
    }
}

/// Final digest bytes of one algorithm
///
/// The canonical text form is uppercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(Vec<u8>);

impl Checksum {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Uppercase hex representation
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }

    /// Parse a checksum from hex (either case)
    pub fn from_hex(text: &str) -> Option<Self> {
        hex::decode(text).ok().map(Self)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Checksum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Checksum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex checksum: {text}")))
    }
}
