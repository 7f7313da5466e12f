//! # certreg-cli — Operator Tooling for the Certificate Registry
//!
//! Provides the `certreg` command-line interface for the off-registry half
//! of issuance: an institution hashes the certificate document, signs the
//! `recipient ‖ cert_hash` binding with its secp256k1 key, and submits the
//! signature to the registry service.
//!
//! ## Subcommands
//!
//! - `certreg keygen` — Generate a secp256k1 key pair.
//! - `certreg address --key` — Derive the account address of a key file.
//! - `certreg hash <FILE>` — Keccak-256 of a file, as a certificate hash.
//! - `certreg sign --key --recipient --cert-hash` — Produce an issuance signature.
//! - `certreg recover --recipient --cert-hash --signature` — Recover the signer.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers; each handler returns
//!   the process exit code.
//! - Cryptography is delegated to `certreg-crypto`. No hashing or signing
//!   logic lives here.

pub mod hash;
pub mod keys;
pub mod signing;

use std::path::Path;

use anyhow::{Context, Result};
use zeroize::Zeroizing;

use certreg_crypto::KeyPair;

/// Load a key pair from a file holding a 64-digit hex secret.
pub fn load_key(path: &Path) -> Result<KeyPair> {
    let content = Zeroizing::new(
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read private key: {}", path.display()))?,
    );
    KeyPair::from_secret_hex(content.trim())
        .with_context(|| format!("invalid private key in {}", path.display()))
}
