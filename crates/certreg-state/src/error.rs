//! # Registry Errors
//!
//! Every rejection is a whole-operation abort. Each variant names the
//! offending identifier so the calling layer can render a specific
//! message without re-querying the registry.

use thiserror::Error;

use certreg_core::{Address, CertHash};

/// Errors returned by [`CertificateRegistry`](crate::CertificateRegistry) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller is not the registry owner.
    #[error("caller {caller} is not the registry owner")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// The null identity was supplied where a real identity is required.
    #[error("invalid address: {address}")]
    InvalidAddress {
        /// The rejected address.
        address: Address,
    },

    /// Institution is already authorized.
    #[error("institution {institution} is already authorized")]
    AlreadyAuthorized {
        /// The institution.
        institution: Address,
    },

    /// Institution is not currently authorized.
    #[error("institution {institution} is not authorized")]
    NotAuthorized {
        /// The institution.
        institution: Address,
    },

    /// Caller may not issue or revoke: it is not an authorized
    /// institution, did not sign the issuance message, or is not the
    /// certificate's issuer.
    #[error("caller {caller} is not an authorized institution for this operation")]
    NotAuthorizedInstitution {
        /// The rejected caller.
        caller: Address,
    },

    /// Recipient is the null identity.
    #[error("invalid recipient: {recipient}")]
    InvalidRecipient {
        /// The rejected recipient.
        recipient: Address,
    },

    /// A certificate with this hash was already issued.
    #[error("certificate {cert_hash} already exists")]
    CertificateExists {
        /// The duplicate hash.
        cert_hash: CertHash,
    },

    /// No certificate with this hash exists.
    #[error("certificate {cert_hash} does not exist")]
    CertificateNotFound {
        /// The unknown hash.
        cert_hash: CertHash,
    },

    /// Certificate exists but has been revoked.
    #[error("certificate {cert_hash} has been revoked")]
    CertificateRevoked {
        /// The revoked hash.
        cert_hash: CertHash,
    },

    /// Certificate was already revoked.
    #[error("certificate {cert_hash} is already revoked")]
    AlreadyRevoked {
        /// The revoked hash.
        cert_hash: CertHash,
    },

    /// Issuance signature is malformed or does not recover.
    #[error("invalid signature for certificate {cert_hash}: {reason}")]
    InvalidSignature {
        /// The certificate being issued.
        cert_hash: CertHash,
        /// Why recovery failed.
        reason: String,
    },

    /// Index or range falls outside a recipient's certificate list.
    #[error("index {index} out of range for {holder} ({count} certificates)")]
    IndexOutOfRange {
        /// Whose list was queried.
        holder: Address,
        /// The offending index.
        index: usize,
        /// Length of the list.
        count: usize,
    },
}

impl RegistryError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::InvalidAddress { .. } => "INVALID_ADDRESS",
            Self::AlreadyAuthorized { .. } => "ALREADY_AUTHORIZED",
            Self::NotAuthorized { .. } => "NOT_AUTHORIZED",
            Self::NotAuthorizedInstitution { .. } => "NOT_AUTHORIZED_INSTITUTION",
            Self::InvalidRecipient { .. } => "INVALID_RECIPIENT",
            Self::CertificateExists { .. } => "CERTIFICATE_EXISTS",
            Self::CertificateNotFound { .. } => "CERTIFICATE_NOT_FOUND",
            Self::CertificateRevoked { .. } => "CERTIFICATE_REVOKED",
            Self::AlreadyRevoked { .. } => "ALREADY_REVOKED",
            Self::InvalidSignature { .. } => "INVALID_SIGNATURE",
            Self::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_identifier() {
        let addr = Address([0xab; 20]);
        let err = RegistryError::AlreadyAuthorized { institution: addr };
        assert!(err.to_string().contains(&addr.to_hex()));

        let hash = CertHash([0x01; 32]);
        let err = RegistryError::CertificateRevoked { cert_hash: hash };
        assert!(err.to_string().contains(&hash.to_hex()));
    }

    #[test]
    fn test_codes() {
        let err = RegistryError::IndexOutOfRange {
            holder: Address::ZERO,
            index: 3,
            count: 3,
        };
        assert_eq!(err.code(), "INDEX_OUT_OF_RANGE");
        assert!(err.to_string().contains("index 3"));
        assert_eq!(
            RegistryError::Unauthorized { caller: Address::ZERO }.code(),
            "UNAUTHORIZED"
        );
    }
}
