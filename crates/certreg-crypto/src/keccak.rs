//! # Keccak-256
//!
//! The original Keccak submission (pre-FIPS padding), as used for account
//! address derivation and packed-message hashing. This is NOT SHA3-256;
//! the two differ in their padding byte and produce different digests.

use sha3::{Digest, Keccak256};

/// Compute the Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
