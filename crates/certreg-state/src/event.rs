//! # Registry Events and Journal
//!
//! Every successful state change appends exactly one event to an
//! append-only journal. Entries carry a monotonically increasing sequence
//! number (starting at 1) and a SHA-256 hash chained to the previous
//! entry, forming a tamper-evident log listeners can poll with
//! [`EventJournal::since()`].
//!
//! ```text
//! entry_hash = SHA-256(previous_hash ‖ sequence ‖ timestamp ‖ event_bytes)
//! ```
//!
//! The first entry chains to 32 zero bytes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use certreg_core::{hex, Address, CertHash, Timestamp};

const GENESIS_HASH: [u8; 32] = [0u8; 32];

/// A notification of what a successful operation changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RegistryEvent {
    /// Owner authorized an institution.
    InstitutionAuthorized {
        /// The institution.
        institution: Address,
    },
    /// Owner revoked an institution's authorization.
    InstitutionRevoked {
        /// The institution.
        institution: Address,
    },
    /// An institution issued a certificate.
    CertificateIssued {
        /// The certificate.
        cert_hash: CertHash,
        /// Its holder.
        recipient: Address,
        /// The issuing institution.
        issuer: Address,
    },
    /// An issuer revoked a certificate.
    CertificateRevoked {
        /// The certificate.
        cert_hash: CertHash,
    },
}

impl RegistryEvent {
    /// Event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InstitutionAuthorized { .. } => "InstitutionAuthorized",
            Self::InstitutionRevoked { .. } => "InstitutionRevoked",
            Self::CertificateIssued { .. } => "CertificateIssued",
            Self::CertificateRevoked { .. } => "CertificateRevoked",
        }
    }

    /// Deterministic byte encoding fed into the chain hash.
    fn hash_input(&self) -> Vec<u8> {
        let mut buf = self.name().as_bytes().to_vec();
        match self {
            Self::InstitutionAuthorized { institution } | Self::InstitutionRevoked { institution } => {
                buf.extend_from_slice(institution.as_bytes());
            }
            Self::CertificateIssued {
                cert_hash,
                recipient,
                issuer,
            } => {
                buf.extend_from_slice(cert_hash.as_bytes());
                buf.extend_from_slice(recipient.as_bytes());
                buf.extend_from_slice(issuer.as_bytes());
            }
            Self::CertificateRevoked { cert_hash } => {
                buf.extend_from_slice(cert_hash.as_bytes());
            }
        }
        buf
    }
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InstitutionAuthorized { institution } | Self::InstitutionRevoked { institution } => {
                write!(f, "{}({institution})", self.name())
            }
            Self::CertificateIssued {
                cert_hash,
                recipient,
                issuer,
            } => write!(f, "{}({cert_hash}, {recipient}, {issuer})", self.name()),
            Self::CertificateRevoked { cert_hash } => write!(f, "{}({cert_hash})", self.name()),
        }
    }
}

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal, starting at 1.
    pub sequence: u64,
    /// When the event was recorded.
    pub timestamp: Timestamp,
    /// What changed.
    pub event: RegistryEvent,
    /// Hex hash of the previous entry (zeros for the first).
    pub previous_hash: String,
    /// Hex hash of this entry.
    pub entry_hash: String,
}

/// Result of re-walking the hash chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainIntegrity {
    /// Entries checked.
    pub total_entries: usize,
    /// Entries whose link or own hash did not match.
    pub broken_links: usize,
    /// Whether the whole chain verified.
    pub chain_valid: bool,
}

/// Append-only, hash-chained event log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventJournal {
    entries: Vec<JournalEntry>,
}

impl EventJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and return the new entry.
    pub fn append(&mut self, event: RegistryEvent, timestamp: Timestamp) -> &JournalEntry {
        let sequence = self.entries.len() as u64 + 1;
        let previous_hash = self
            .entries
            .last()
            .map(|e| e.entry_hash.clone())
            .unwrap_or_else(|| hex::encode(&GENESIS_HASH));
        let entry_hash = chain_hash(&previous_hash, sequence, &timestamp, &event);

        self.entries.push(JournalEntry {
            sequence,
            timestamp,
            event,
            previous_hash,
            entry_hash,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// All entries with a sequence number greater than `sequence`.
    ///
    /// `since(0)` returns the whole journal; a sequence at or past the
    /// head returns an empty slice.
    pub fn since(&self, sequence: u64) -> &[JournalEntry] {
        let start = usize::try_from(sequence)
            .unwrap_or(usize::MAX)
            .min(self.entries.len());
        &self.entries[start..]
    }

    /// All entries in order.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Sequence number of the latest entry (0 when empty).
    pub fn head(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-compute every entry hash and check each link to its predecessor.
    pub fn verify_chain(&self) -> ChainIntegrity {
        let mut broken_links = 0;
        let mut expected_prev = hex::encode(&GENESIS_HASH);

        for entry in &self.entries {
            let recomputed =
                chain_hash(&entry.previous_hash, entry.sequence, &entry.timestamp, &entry.event);
            if entry.previous_hash != expected_prev || entry.entry_hash != recomputed {
                broken_links += 1;
            }
            expected_prev = entry.entry_hash.clone();
        }

        ChainIntegrity {
            total_entries: self.entries.len(),
            broken_links,
            chain_valid: broken_links == 0,
        }
    }
}

fn chain_hash(
    previous_hash: &str,
    sequence: u64,
    timestamp: &Timestamp,
    event: &RegistryEvent,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(previous_hash.as_bytes());
    hasher.update(sequence.to_be_bytes());
    hasher.update(timestamp.to_iso8601().as_bytes());
    hasher.update(event.hash_input());
    hex::encode(&hasher.finalize())
}
