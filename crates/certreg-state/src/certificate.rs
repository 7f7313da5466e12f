//! # Certificate Records

use serde::{Deserialize, Serialize};

use certreg_core::{Address, CertHash, Timestamp};

/// Where a certificate hash sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStatus {
    /// Never issued.
    NonExistent,
    /// Issued and valid.
    Issued,
    /// Revoked by its issuer (terminal).
    Revoked,
}

impl CertificateStatus {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revoked)
    }

    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonExistent => "NON_EXISTENT",
            Self::Issued => "ISSUED",
            Self::Revoked => "REVOKED",
        }
    }
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored certificate.
///
/// Existence is explicit: the registry holds `Option<&Certificate>`, never
/// a zero-valued placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Content fingerprint, the registry key.
    pub cert_hash: CertHash,
    /// Institution that issued it. Only this identity may revoke.
    pub issuer: Address,
    /// Credential holder.
    pub recipient: Address,
    /// Off-registry content reference.
    pub ipfs_hash: String,
    /// When it was issued.
    pub issued_at: Timestamp,
    /// Whether it has been revoked.
    pub revoked: bool,
    /// When it was revoked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<Timestamp>,
}

impl Certificate {
    /// Lifecycle status of this record.
    pub fn status(&self) -> CertificateStatus {
        if self.revoked {
            CertificateStatus::Revoked
        } else {
            CertificateStatus::Issued
        }
    }
}

/// Successful verification result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    /// Always `true`; failures are returned as errors.
    pub valid: bool,
    /// The content reference recorded at issuance.
    pub ipfs_hash: String,
}

/// Parallel certificate-hash and content-reference sequences for a range
/// of a recipient's history, in issuance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificatePage {
    /// Certificate hashes.
    pub cert_hashes: Vec<CertHash>,
    /// Content references, index-aligned with `cert_hashes`.
    pub ipfs_hashes: Vec<String>,
}

impl CertificatePage {
    /// Number of certificates in the page.
    pub fn len(&self) -> usize {
        self.cert_hashes.len()
    }

    /// Whether the page is empty.
    pub fn is_empty(&self) -> bool {
        self.cert_hashes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(revoked: bool) -> Certificate {
        Certificate {
            cert_hash: CertHash([1; 32]),
            issuer: Address([2; 20]),
            recipient: Address([3; 20]),
            ipfs_hash: "QmTestHash123".to_string(),
            issued_at: Timestamp::now(),
            revoked,
            revoked_at: None,
        }
    }

    #[test]
    fn test_status_from_flag() {
        assert_eq!(record(false).status(), CertificateStatus::Issued);
        assert_eq!(record(true).status(), CertificateStatus::Revoked);
        assert!(CertificateStatus::Revoked.is_terminal());
        assert!(!CertificateStatus::Issued.is_terminal());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CertificateStatus::NonExistent.to_string(), "NON_EXISTENT");
        assert_eq!(
            serde_json::to_string(&CertificateStatus::Revoked).unwrap(),
            "\"REVOKED\""
        );
    }

    #[test]
    fn test_revoked_at_omitted_when_absent() {
        let json = serde_json::to_value(record(false)).unwrap();
        assert!(json.get("revoked_at").is_none());
        assert_eq!(json["ipfs_hash"], "QmTestHash123");
    }
}
