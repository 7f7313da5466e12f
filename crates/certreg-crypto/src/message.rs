//! # Certificate Issuance Message
//!
//! An institution authorizes a certificate by signing the tight
//! concatenation of the recipient address and the certificate hash:
//!
//! ```text
//! message_hash   = keccak256(recipient[20] ‖ cert_hash[32])
//! signing_digest = keccak256("\x19Ethereum Signed Message:\n32" ‖ message_hash)
//! ```
//!
//! The second step is the personal-message envelope applied by wallets
//! when they sign a 32-byte payload, so signatures produced by external
//! wallet tooling recover to the same signer as signatures produced by
//! [`KeyPair::sign()`](crate::KeyPair::sign).
//!
//! Binding both fields means a signature over one recipient cannot be
//! replayed to issue the same certificate to anyone else.

use certreg_core::{Address, CertHash, CryptoError};

use crate::keccak::keccak256;
use crate::secp256k1::{recover_prehash, RecoverableSignature};

const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// The `(recipient, cert_hash)` pair an issuing institution signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuanceMessage {
    recipient: Address,
    cert_hash: CertHash,
}

impl IssuanceMessage {
    /// Bind a recipient and a certificate hash.
    pub fn new(recipient: Address, cert_hash: CertHash) -> Self {
        Self {
            recipient,
            cert_hash,
        }
    }

    /// The recipient this message binds.
    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    /// The certificate hash this message binds.
    pub fn cert_hash(&self) -> &CertHash {
        &self.cert_hash
    }

    /// Tightly packed `recipient ‖ cert_hash` (52 bytes, no padding).
    pub fn packed(&self) -> [u8; 52] {
        let mut out = [0u8; 52];
        out[..20].copy_from_slice(self.recipient.as_bytes());
        out[20..].copy_from_slice(self.cert_hash.as_bytes());
        out
    }

    /// Keccak-256 of the packed encoding.
    pub fn message_hash(&self) -> [u8; 32] {
        keccak256(&self.packed())
    }

    /// The digest actually signed: the personal-message envelope of
    /// [`message_hash()`](Self::message_hash).
    pub fn signing_digest(&self) -> [u8; 32] {
        personal_message_digest(&self.message_hash())
    }

    /// Recover the identity that signed this message.
    pub fn recover_signer(&self, signature: &RecoverableSignature) -> Result<Address, CryptoError> {
        recover_prehash(&self.signing_digest(), signature)
    }
}

/// Wrap a 32-byte payload in the personal-message envelope and hash it.
pub fn personal_message_digest(payload: &[u8; 32]) -> [u8; 32] {
    let mut buf = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + 32);
    buf.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
    buf.extend_from_slice(payload);
    keccak256(&buf)
}
