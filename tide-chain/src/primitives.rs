//! Cryptographic primitives shared by Tide data structures.

/// The personalization-free BLAKE2b-256 hash used for transaction ids,
/// addresses, and script checksums.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let hash = blake2b_simd::Params::new().hash_length(32).hash(data);

    let mut bytes = [0; 32];
    bytes.copy_from_slice(hash.as_bytes());
    bytes
}
