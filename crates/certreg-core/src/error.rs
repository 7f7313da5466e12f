//! # Error Types
//!
//! Errors shared across the workspace. All use `thiserror` for derived
//! `Display` and `Error` implementations.
//!
//! Registry state-machine errors live in `certreg-state`; the types here
//! cover input validation and cryptographic failures that happen before
//! any registry state is consulted.

use thiserror::Error;

/// Input failed structural validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Address is not 20 bytes of hex.
    #[error("invalid address {0:?}: expected 40 hex digits with optional 0x prefix")]
    InvalidAddress(String),

    /// Certificate hash is not 32 bytes of hex.
    #[error("invalid certificate hash {0:?}: expected 64 hex digits with optional 0x prefix")]
    InvalidCertHash(String),

    /// Hex decoding failed.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Timestamp could not be parsed or is not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Error in cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature is malformed or does not recover to a public key.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Key generation or parsing failed.
    #[error("key error: {0}")]
    KeyError(String),
}
