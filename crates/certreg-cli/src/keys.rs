//! # Key Subcommands
//!
//! secp256k1 key generation and address derivation. A key file holds the
//! 32-byte secret as 64 lowercase hex digits and nothing else.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use zeroize::Zeroizing;

use certreg_core::{hex, Address};
use certreg_crypto::KeyPair;

/// Arguments for `certreg keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output directory for the key file.
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,
    /// Key file name prefix; the key is written to `<prefix>.key`.
    #[arg(long, default_value = "certreg")]
    pub prefix: String,
    /// Overwrite an existing key file.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `certreg address`.
#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Path to the private key file.
    #[arg(long)]
    pub key: PathBuf,
}

/// Execute `certreg keygen`.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let (path, address) = generate_key_file(&args.output, &args.prefix, args.force)?;
    println!("OK: generated secp256k1 key pair");
    println!("  Private key: {}", path.display());
    println!("  Address:     {address}");
    Ok(0)
}

/// Execute `certreg address`.
pub fn run_address(args: &AddressArgs) -> Result<u8> {
    let key = crate::load_key(&args.key)?;
    println!("{}", key.address());
    Ok(0)
}

/// Generate a key pair and write its secret to `<output_dir>/<prefix>.key`.
///
/// Refuses to replace an existing key file unless `force` is set.
pub fn generate_key_file(output_dir: &Path, prefix: &str, force: bool) -> Result<(PathBuf, Address)> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let key_path = output_dir.join(format!("{prefix}.key"));
    if key_path.exists() && !force {
        anyhow::bail!(
            "key file already exists: {} (pass --force to overwrite)",
            key_path.display()
        );
    }

    if key_path.exists() {
        std::fs::remove_file(&key_path)
            .with_context(|| format!("failed to replace key file: {}", key_path.display()))?;
    }

    let key = KeyPair::generate();
    let encoded = Zeroizing::new(hex::encode(&key.secret_bytes()[..]));
    let mut file = create_key_file(&key_path)
        .with_context(|| format!("failed to create key file: {}", key_path.display()))?;
    file.write_all(encoded.as_bytes())
        .with_context(|| format!("failed to write private key: {}", key_path.display()))?;

    tracing::info!(path = %key_path.display(), address = %key.address(), "key generated");
    Ok((key_path, key.address()))
}

/// Create a new key file that only the owner can read, failing if it exists.
#[cfg(unix)]
fn create_key_file(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_key_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}
