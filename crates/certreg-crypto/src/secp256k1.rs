//! # secp256k1 Recoverable Signatures
//!
//! Key generation, signing and public-key recovery over secp256k1, with
//! account identities derived the way external wallets derive them.
//!
//! ## Security Invariant
//!
//! - `KeyPair` does not implement `Serialize` and its `Debug` output never
//!   contains key material. Exported secret bytes are wrapped in
//!   `Zeroizing` so they are wiped when dropped.
//! - Recovery rejects high-S signatures. For every valid `(r, s, v)` the
//!   tuple `(r, n - s, v ^ 1)` recovers the same key; accepting both would
//!   give every signature a second, distinct encoding.
//!
//! ## Wire Format
//!
//! Signatures are 65 bytes, `r ‖ s ‖ v`. `v` is accepted as `0`/`1` or
//! `27`/`28`; signatures produced here always carry `27`/`28`.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

use certreg_core::{hex, Address, CryptoError};

use crate::keccak::keccak256;
use crate::message::IssuanceMessage;

/// Half the secp256k1 group order, big-endian. `s` above this is "high".
const HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// A 65-byte recoverable ECDSA signature (`r ‖ s ‖ v`).
///
/// Serializes as a `0x`-prefixed hex string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RecoverableSignature(pub [u8; 65]);

/// A secp256k1 key pair for signing issuance messages.
pub struct KeyPair {
    signing_key: SigningKey,
}

// ---------------------------------------------------------------------------
// RecoverableSignature impls
// ---------------------------------------------------------------------------

impl RecoverableSignature {
    /// Byte length of a recoverable signature.
    pub const LEN: usize = 65;

    /// Create a signature from raw 65 bytes.
    pub fn from_bytes(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    /// Create a signature from a slice, rejecting any length other than 65.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != Self::LEN {
            return Err(CryptoError::InvalidSignature(format!(
                "signature must be {} bytes, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        let mut arr = [0u8; 65];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Return the raw 65 bytes.
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The recovery byte as carried on the wire.
    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode_prefixed(&self.0)
    }

    /// Parse from 130 hex digits, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Normalize `v` to a recovery id (0 or 1).
    fn recovery_id(&self) -> Result<RecoveryId, CryptoError> {
        let byte = match self.v() {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            other => {
                return Err(CryptoError::InvalidSignature(format!(
                    "recovery byte must be 0, 1, 27 or 28, got {other}"
                )))
            }
        };
        RecoveryId::from_byte(byte).ok_or_else(|| {
            CryptoError::InvalidSignature(format!("invalid recovery id {byte}"))
        })
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecoverableSignature({}...)", hex::prefix(&self.0))
    }
}

impl std::fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// KeyPair impls
// ---------------------------------------------------------------------------

impl KeyPair {
    /// Generate a new random key pair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: SigningKey::random(&mut csprng),
        }
    }

    /// Create a key pair from a 32-byte secret scalar.
    ///
    /// Fails if the scalar is zero or not below the group order.
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_slice(secret)
            .map_err(|e| CryptoError::KeyError(format!("invalid secp256k1 secret key: {e}")))?;
        Ok(Self { signing_key })
    }

    /// Parse a key pair from a 64-digit hex secret.
    pub fn from_secret_hex(s: &str) -> Result<Self, CryptoError> {
        let secret = Zeroizing::new(
            hex::decode_fixed::<32>(s).map_err(|e| CryptoError::KeyError(e.to_string()))?,
        );
        Self::from_secret_bytes(&secret)
    }

    /// Export the 32-byte secret scalar. Wiped on drop.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        let mut out = Zeroizing::new([0u8; 32]);
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    /// The account identity of this key pair.
    pub fn address(&self) -> Address {
        address_of(self.signing_key.verifying_key())
    }

    /// Sign an issuance message.
    ///
    /// The signed digest is the personal-message prehash of the message
    /// hash, see [`IssuanceMessage::signing_digest()`].
    pub fn sign(&self, message: &IssuanceMessage) -> Result<RecoverableSignature, CryptoError> {
        self.sign_prehash(&message.signing_digest())
    }

    fn sign_prehash(&self, prehash: &[u8; 32]) -> Result<RecoverableSignature, CryptoError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(prehash)
            .map_err(|e| CryptoError::KeyError(format!("signing failed: {e}")))?;
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recovery_id.to_byte() + 27;
        Ok(RecoverableSignature(out))
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyPair(<private>, address={})", self.address())
    }
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

/// Derive the account identity of a public key: the last 20 bytes of the
/// Keccak-256 hash of the uncompressed point without its `0x04` tag.
pub fn address_of(verifying_key: &VerifyingKey) -> Address {
    let point = verifying_key.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[12..]);
    Address(bytes)
}

/// Recover the signer identity from a 32-byte prehash and a signature.
///
/// Fails with `CryptoError::InvalidSignature` when the recovery byte is
/// out of range, `r` or `s` is zero or out of range, `s` is high, or no
/// public key recovers.
pub fn recover_prehash(
    prehash: &[u8; 32],
    signature: &RecoverableSignature,
) -> Result<Address, CryptoError> {
    let recovery_id = signature.recovery_id()?;

    let s_bytes = &signature.0[32..64];
    if s_bytes > &HALF_ORDER[..] {
        return Err(CryptoError::InvalidSignature(
            "signature s value is in the upper half of the curve order".to_string(),
        ));
    }

    let sig = Signature::from_slice(&signature.0[..64])
        .map_err(|e| CryptoError::InvalidSignature(format!("malformed r/s: {e}")))?;

    let verifying_key = VerifyingKey::recover_from_prehash(prehash, &sig, recovery_id)
        .map_err(|e| CryptoError::InvalidSignature(format!("public key recovery failed: {e}")))?;

    Ok(address_of(&verifying_key))
}
