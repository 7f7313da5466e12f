//! # certreg-crypto — Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for the certificate registry:
//!
//! - **Keccak-256** hashing for message digests and address derivation.
//! - **secp256k1** key pairs and 65-byte recoverable signatures.
//! - **Signer recovery**: `(message, signature) -> Address`, a pure
//!   function that fails with `CryptoError::InvalidSignature` on
//!   malformed input.
//! - **Issuance message**: the `recipient ‖ cert_hash` binding an
//!   institution signs to authorize a certificate.
//!
//! ## Crate Policy
//!
//! - Depends only on `certreg-core` internally.
//! - No mocking of cryptographic operations in tests. All tests use real
//!   Keccak-256 and real secp256k1 keys.
//! - Key pairs can only sign an [`IssuanceMessage`]; there is no API for
//!   signing arbitrary bytes.

pub mod keccak;
pub mod message;
pub mod secp256k1;

pub use keccak::keccak256;
pub use message::{personal_message_digest, IssuanceMessage};
pub use secp256k1::{address_of, recover_prehash, KeyPair, RecoverableSignature};
