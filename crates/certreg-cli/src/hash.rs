//! # Hash Subcommand
//!
//! Fingerprints a certificate document: the certificate hash is the
//! Keccak-256 of the file's raw bytes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use certreg_core::CertHash;
use certreg_crypto::keccak256;

/// Arguments for `certreg hash`.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// The certificate document.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute `certreg hash`.
pub fn run_hash(args: &HashArgs) -> Result<u8> {
    println!("{}", hash_file(&args.file)?);
    Ok(0)
}

/// Keccak-256 of a file's contents.
pub fn hash_file(path: &Path) -> Result<CertHash> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read document: {}", path.display()))?;
    tracing::debug!(path = %path.display(), len = bytes.len(), "hashing document");
    Ok(CertHash(keccak256(&bytes)))
}
