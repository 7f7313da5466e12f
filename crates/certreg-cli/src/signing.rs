//! # Signing Subcommands
//!
//! Produces and checks issuance signatures offline. `sign` emits exactly
//! the 65-byte `r ‖ s ‖ v` hex the registry expects in an issuance
//! request; `recover` reports which identity a signature binds to, so an
//! operator can confirm it matches the issuing institution before
//! submitting.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use certreg_core::{Address, CertHash};
use certreg_crypto::{IssuanceMessage, KeyPair, RecoverableSignature};

/// Arguments for `certreg sign`.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Path to the issuing institution's private key file.
    #[arg(long)]
    pub key: PathBuf,
    /// Certificate recipient address.
    #[arg(long)]
    pub recipient: Address,
    /// Certificate hash (see `certreg hash`).
    #[arg(long)]
    pub cert_hash: CertHash,
}

/// Arguments for `certreg recover`.
#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// Certificate recipient address.
    #[arg(long)]
    pub recipient: Address,
    /// Certificate hash.
    #[arg(long)]
    pub cert_hash: CertHash,
    /// 65-byte issuance signature, hex.
    #[arg(long)]
    pub signature: String,
    /// Fail unless the signature recovers to this address.
    #[arg(long)]
    pub expect: Option<Address>,
}

/// Execute `certreg sign`.
pub fn run_sign(args: &SignArgs) -> Result<u8> {
    let key = crate::load_key(&args.key)?;
    let signature = sign_issuance(&key, args.recipient, args.cert_hash)?;
    println!("{signature}");
    Ok(0)
}

/// Execute `certreg recover`.
///
/// Exits 1 when `--expect` is given and the recovered signer differs.
pub fn run_recover(args: &RecoverArgs) -> Result<u8> {
    let signer = recover_issuer(args.recipient, args.cert_hash, &args.signature)?;
    match args.expect {
        Some(expected) if expected != signer => {
            println!("FAIL: signature recovers to {signer}, expected {expected}");
            Ok(1)
        }
        Some(_) => {
            println!("OK: signature recovers to {signer}");
            Ok(0)
        }
        None => {
            println!("{signer}");
            Ok(0)
        }
    }
}

/// Sign the issuance binding of `recipient` and `cert_hash`.
pub fn sign_issuance(
    key: &KeyPair,
    recipient: Address,
    cert_hash: CertHash,
) -> Result<RecoverableSignature> {
    let signature = key
        .sign(&IssuanceMessage::new(recipient, cert_hash))
        .context("signing failed")?;
    tracing::info!(signer = %key.address(), %recipient, %cert_hash, "issuance signed");
    Ok(signature)
}

/// Recover the identity that signed the issuance binding.
pub fn recover_issuer(recipient: Address, cert_hash: CertHash, signature_hex: &str) -> Result<Address> {
    let signature = RecoverableSignature::from_hex(signature_hex).context("invalid signature")?;
    IssuanceMessage::new(recipient, cert_hash)
        .recover_signer(&signature)
        .context("signature does not recover")
}
