//! Hash algorithm implementations

use super::registry::AlgorithmRegistry;

mod crc32;
mod md5;
mod serialized;
mod sha1;
mod sha2;

/// Register all built-in algorithms with the registry
pub(crate) fn register_all(registry: &mut AlgorithmRegistry) {
    registry.register(crc32::Crc32Algorithm);
    registry.register(md5::Md5Algorithm);
    registry.register(sha1::Sha1Algorithm);
    registry.register(sha2::Sha256Algorithm);
    registry.register(sha2::Sha512Algorithm);
}
