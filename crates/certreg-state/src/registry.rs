//! # Certificate Registry
//!
//! Owns all registry state: the owner identity, the authorized-institution
//! set, the certificate map, the per-recipient and per-issuer issuance
//! indexes, and the event journal.
//!
//! ## Operation Pattern
//!
//! Each mutating operation is split into a `check_*` method taking `&self`
//! that performs every validation, and a commit step that only runs once
//! the check has passed. Rejections are logged at `warn` and returned
//! without touching state.
//!
//! ## Issuance Check Order
//!
//! 1. Caller is an authorized institution (`NotAuthorizedInstitution`).
//! 2. Recipient is not the null identity (`InvalidRecipient`).
//! 3. Hash is not already issued (`CertificateExists`).
//! 4. Signature recovers (`InvalidSignature`) to the caller
//!    (`NotAuthorizedInstitution` on signer mismatch).

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use certreg_core::{Address, CertHash, CryptoError, Timestamp};
use certreg_crypto::{IssuanceMessage, RecoverableSignature};

use crate::certificate::{Certificate, CertificatePage, CertificateStatus, Verification};
use crate::error::RegistryError;
use crate::event::{EventJournal, JournalEntry, RegistryEvent};

/// The certificate registry state machine.
#[derive(Debug, Clone)]
pub struct CertificateRegistry {
    owner: Address,
    institutions: HashSet<Address>,
    certificates: HashMap<CertHash, Certificate>,
    by_recipient: HashMap<Address, Vec<CertHash>>,
    by_issuer: HashMap<Address, Vec<CertHash>>,
    journal: EventJournal,
}

impl CertificateRegistry {
    /// Create an empty registry controlled by `owner`.
    ///
    /// The owner is fixed for the lifetime of the registry.
    pub fn new(owner: Address) -> Result<Self, RegistryError> {
        if owner.is_zero() {
            return Err(RegistryError::InvalidAddress { address: owner });
        }
        info!(%owner, "certificate registry created");
        Ok(Self {
            owner,
            institutions: HashSet::new(),
            certificates: HashMap::new(),
            by_recipient: HashMap::new(),
            by_issuer: HashMap::new(),
            journal: EventJournal::new(),
        })
    }

    // ── Access control ───────────────────────────────────────────────

    /// The registry owner.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Whether `institution` is currently authorized to issue.
    pub fn is_authorized(&self, institution: &Address) -> bool {
        self.institutions.contains(institution)
    }

    /// Authorize an institution. Owner only.
    pub fn authorize_institution(
        &mut self,
        caller: &Address,
        institution: Address,
    ) -> Result<JournalEntry, RegistryError> {
        self.check_authorize_institution(caller, &institution)
            .map_err(|e| rejected("authorize_institution", caller, e))?;

        self.institutions.insert(institution);
        Ok(self.emit(RegistryEvent::InstitutionAuthorized { institution }))
    }

    /// Revoke an institution's authorization. Owner only.
    ///
    /// Certificates the institution already issued stay valid, and the
    /// institution can still revoke them.
    pub fn revoke_institution(
        &mut self,
        caller: &Address,
        institution: Address,
    ) -> Result<JournalEntry, RegistryError> {
        self.check_revoke_institution(caller, &institution)
            .map_err(|e| rejected("revoke_institution", caller, e))?;

        self.institutions.remove(&institution);
        Ok(self.emit(RegistryEvent::InstitutionRevoked { institution }))
    }

    fn check_authorize_institution(
        &self,
        caller: &Address,
        institution: &Address,
    ) -> Result<(), RegistryError> {
        self.ensure_owner(caller)?;
        if institution.is_zero() {
            return Err(RegistryError::InvalidAddress {
                address: *institution,
            });
        }
        if self.is_authorized(institution) {
            return Err(RegistryError::AlreadyAuthorized {
                institution: *institution,
            });
        }
        Ok(())
    }

    fn check_revoke_institution(
        &self,
        caller: &Address,
        institution: &Address,
    ) -> Result<(), RegistryError> {
        self.ensure_owner(caller)?;
        if !self.is_authorized(institution) {
            return Err(RegistryError::NotAuthorized {
                institution: *institution,
            });
        }
        Ok(())
    }

    fn ensure_owner(&self, caller: &Address) -> Result<(), RegistryError> {
        if *caller != self.owner {
            return Err(RegistryError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    // ── Issuance ─────────────────────────────────────────────────────

    /// Issue a certificate to `recipient`.
    ///
    /// `signature` must be the caller's 65-byte `r ‖ s ‖ v` signature over
    /// the [`IssuanceMessage`] for `(recipient, cert_hash)`.
    pub fn issue_certificate(
        &mut self,
        caller: &Address,
        recipient: Address,
        cert_hash: CertHash,
        signature: &[u8],
        ipfs_hash: impl Into<String>,
    ) -> Result<JournalEntry, RegistryError> {
        self.check_issue(caller, &recipient, &cert_hash, signature)
            .map_err(|e| rejected("issue_certificate", caller, e))?;

        let issuer = *caller;
        self.certificates.insert(
            cert_hash,
            Certificate {
                cert_hash,
                issuer,
                recipient,
                ipfs_hash: ipfs_hash.into(),
                issued_at: Timestamp::now(),
                revoked: false,
                revoked_at: None,
            },
        );
        self.by_recipient.entry(recipient).or_default().push(cert_hash);
        self.by_issuer.entry(issuer).or_default().push(cert_hash);

        Ok(self.emit(RegistryEvent::CertificateIssued {
            cert_hash,
            recipient,
            issuer,
        }))
    }

    fn check_issue(
        &self,
        caller: &Address,
        recipient: &Address,
        cert_hash: &CertHash,
        signature: &[u8],
    ) -> Result<(), RegistryError> {
        if !self.is_authorized(caller) {
            return Err(RegistryError::NotAuthorizedInstitution { caller: *caller });
        }
        if recipient.is_zero() {
            return Err(RegistryError::InvalidRecipient {
                recipient: *recipient,
            });
        }
        if self.certificates.contains_key(cert_hash) {
            return Err(RegistryError::CertificateExists {
                cert_hash: *cert_hash,
            });
        }

        let invalid = |e: CryptoError| RegistryError::InvalidSignature {
            cert_hash: *cert_hash,
            reason: e.to_string(),
        };
        let signature = RecoverableSignature::from_slice(signature).map_err(invalid)?;
        let signer = IssuanceMessage::new(*recipient, *cert_hash)
            .recover_signer(&signature)
            .map_err(invalid)?;
        if signer != *caller {
            return Err(RegistryError::NotAuthorizedInstitution { caller: *caller });
        }
        Ok(())
    }

    // ── Verification ─────────────────────────────────────────────────

    /// Verify a certificate.
    ///
    /// `recipient` is accepted for interface symmetry and is not compared
    /// against the stored recipient.
    pub fn verify_certificate(
        &self,
        cert_hash: &CertHash,
        _recipient: &Address,
    ) -> Result<Verification, RegistryError> {
        let cert = self.require_certificate(cert_hash)?;
        if cert.revoked {
            return Err(RegistryError::CertificateRevoked {
                cert_hash: *cert_hash,
            });
        }
        Ok(Verification {
            valid: true,
            ipfs_hash: cert.ipfs_hash.clone(),
        })
    }

    /// The stored record, revoked or not.
    pub fn get_certificate(&self, cert_hash: &CertHash) -> Option<&Certificate> {
        self.certificates.get(cert_hash)
    }

    /// Lifecycle status of a hash.
    pub fn certificate_status(&self, cert_hash: &CertHash) -> CertificateStatus {
        self.certificates
            .get(cert_hash)
            .map(Certificate::status)
            .unwrap_or(CertificateStatus::NonExistent)
    }

    fn require_certificate(&self, cert_hash: &CertHash) -> Result<&Certificate, RegistryError> {
        self.certificates
            .get(cert_hash)
            .ok_or(RegistryError::CertificateNotFound {
                cert_hash: *cert_hash,
            })
    }

    // ── Revocation ───────────────────────────────────────────────────

    /// Revoke a certificate. Only its issuer may do this, and only once.
    pub fn revoke_certificate(
        &mut self,
        caller: &Address,
        cert_hash: &CertHash,
    ) -> Result<JournalEntry, RegistryError> {
        self.check_revoke_certificate(caller, cert_hash)
            .map_err(|e| rejected("revoke_certificate", caller, e))?;

        let now = Timestamp::now();
        if let Some(cert) = self.certificates.get_mut(cert_hash) {
            cert.revoked = true;
            cert.revoked_at = Some(now);
        }
        Ok(self.emit(RegistryEvent::CertificateRevoked {
            cert_hash: *cert_hash,
        }))
    }

    fn check_revoke_certificate(
        &self,
        caller: &Address,
        cert_hash: &CertHash,
    ) -> Result<(), RegistryError> {
        let cert = self.require_certificate(cert_hash)?;
        if cert.issuer != *caller {
            return Err(RegistryError::NotAuthorizedInstitution { caller: *caller });
        }
        if cert.revoked {
            return Err(RegistryError::AlreadyRevoked {
                cert_hash: *cert_hash,
            });
        }
        Ok(())
    }

    // ── Recipient lookups ────────────────────────────────────────────

    /// Number of certificates ever issued to `recipient`, revoked included.
    pub fn get_user_certificate_count(&self, recipient: &Address) -> usize {
        self.user_certificates(recipient).len()
    }

    /// The `index`-th certificate issued to `recipient`, in issuance order.
    pub fn get_user_certificate_at_index(
        &self,
        recipient: &Address,
        index: usize,
    ) -> Result<CertHash, RegistryError> {
        let list = self.user_certificates(recipient);
        list.get(index)
            .copied()
            .ok_or(RegistryError::IndexOutOfRange {
                holder: *recipient,
                index,
                count: list.len(),
            })
    }

    /// Certificates `start..=end` (inclusive) issued to `recipient`.
    ///
    /// Fails if `start > end` or `end` is not below the recipient's count.
    pub fn get_certificates_for_user(
        &self,
        recipient: &Address,
        start: usize,
        end: usize,
    ) -> Result<CertificatePage, RegistryError> {
        let list = self.user_certificates(recipient);
        let count = list.len();
        if start > end {
            return Err(RegistryError::IndexOutOfRange {
                holder: *recipient,
                index: start,
                count,
            });
        }
        if end >= count {
            return Err(RegistryError::IndexOutOfRange {
                holder: *recipient,
                index: end,
                count,
            });
        }

        let (cert_hashes, ipfs_hashes) = list[start..=end]
            .iter()
            .filter_map(|hash| {
                self.certificates
                    .get(hash)
                    .map(|cert| (*hash, cert.ipfs_hash.clone()))
            })
            .unzip();
        Ok(CertificatePage {
            cert_hashes,
            ipfs_hashes,
        })
    }

    fn user_certificates(&self, recipient: &Address) -> &[CertHash] {
        self.by_recipient
            .get(recipient)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // ── Issuer lookups ───────────────────────────────────────────────

    /// Number of certificates `issuer` has issued, revoked included.
    pub fn get_issuer_certificate_count(&self, issuer: &Address) -> usize {
        self.get_certificates_by_issuer(issuer).len()
    }

    /// Every certificate `issuer` has issued, in issuance order.
    pub fn get_certificates_by_issuer(&self, issuer: &Address) -> &[CertHash] {
        self.by_issuer
            .get(issuer)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // ── Events ───────────────────────────────────────────────────────

    /// The event journal.
    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    /// Journal entries after `sequence`.
    pub fn events_since(&self, sequence: u64) -> &[JournalEntry] {
        self.journal.since(sequence)
    }

    fn emit(&mut self, event: RegistryEvent) -> JournalEntry {
        let entry = self.journal.append(event, Timestamp::now()).clone();
        info!(
            sequence = entry.sequence,
            event = %entry.event,
            "registry event emitted"
        );
        entry
    }
}

fn rejected(operation: &'static str, caller: &Address, err: RegistryError) -> RegistryError {
    warn!(operation, %caller, code = err.code(), error = %err, "registry operation rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use certreg_crypto::KeyPair;

    struct Fixture {
        registry: CertificateRegistry,
        owner: Address,
        institution: KeyPair,
        recipient: Address,
    }

    fn fixture() -> Fixture {
        let owner = KeyPair::generate().address();
        let institution = KeyPair::generate();
        let mut registry = CertificateRegistry::new(owner).unwrap();
        registry
            .authorize_institution(&owner, institution.address())
            .unwrap();
        Fixture {
            registry,
            owner,
            institution,
            recipient: KeyPair::generate().address(),
        }
    }

    fn sign(kp: &KeyPair, recipient: Address, hash: CertHash) -> [u8; 65] {
        *kp.sign(&IssuanceMessage::new(recipient, hash)).unwrap().as_bytes()
    }

    fn hash(byte: u8) -> CertHash {
        CertHash([byte; 32])
    }

    #[test]
    fn test_zero_owner_rejected() {
        assert!(matches!(
            CertificateRegistry::new(Address::ZERO),
            Err(RegistryError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_owner_is_fixed() {
        let f = fixture();
        assert_eq!(*f.registry.owner(), f.owner);
    }

    #[test]
    fn test_authorize_zero_address_rejected() {
        let mut f = fixture();
        let err = f
            .registry
            .authorize_institution(&f.owner, Address::ZERO)
            .unwrap_err();
        assert_eq!(err, RegistryError::InvalidAddress { address: Address::ZERO });
    }

    #[test]
    fn test_owner_check_precedes_address_check() {
        let mut f = fixture();
        let stranger = Address([9; 20]);
        let err = f
            .registry
            .authorize_institution(&stranger, Address::ZERO)
            .unwrap_err();
        assert_eq!(err, RegistryError::Unauthorized { caller: stranger });
    }

    #[test]
    fn test_reauthorize_after_revoke() {
        let mut f = fixture();
        let inst = f.institution.address();
        f.registry.revoke_institution(&f.owner, inst).unwrap();
        assert!(!f.registry.is_authorized(&inst));
        f.registry.authorize_institution(&f.owner, inst).unwrap();
        assert!(f.registry.is_authorized(&inst));
    }

    #[test]
    fn test_issue_records_certificate() {
        let mut f = fixture();
        let inst = f.institution.address();
        let sig = sign(&f.institution, f.recipient, hash(1));
        let entry = f
            .registry
            .issue_certificate(&inst, f.recipient, hash(1), &sig, "QmTestHash123")
            .unwrap();

        assert_eq!(
            entry.event,
            RegistryEvent::CertificateIssued {
                cert_hash: hash(1),
                recipient: f.recipient,
                issuer: inst,
            }
        );
        let cert = f.registry.get_certificate(&hash(1)).unwrap();
        assert_eq!(cert.issuer, inst);
        assert_eq!(cert.recipient, f.recipient);
        assert!(!cert.revoked);
        assert_eq!(f.registry.certificate_status(&hash(1)), CertificateStatus::Issued);
    }

    #[test]
    fn test_signature_for_other_recipient_rejected() {
        let mut f = fixture();
        let inst = f.institution.address();
        let other = Address([0x77; 20]);
        let sig = sign(&f.institution, other, hash(1));
        let err = f
            .registry
            .issue_certificate(&inst, f.recipient, hash(1), &sig, "Qm")
            .unwrap_err();
        assert_eq!(err, RegistryError::NotAuthorizedInstitution { caller: inst });
        assert_eq!(f.registry.certificate_status(&hash(1)), CertificateStatus::NonExistent);
    }

    #[test]
    fn test_signature_by_other_authorized_institution_rejected() {
        let mut f = fixture();
        let inst = f.institution.address();
        let second = KeyPair::generate();
        f.registry
            .authorize_institution(&f.owner, second.address())
            .unwrap();

        // Second institution signs, first one submits.
        let sig = sign(&second, f.recipient, hash(1));
        let err = f
            .registry
            .issue_certificate(&inst, f.recipient, hash(1), &sig, "Qm")
            .unwrap_err();
        assert_eq!(err, RegistryError::NotAuthorizedInstitution { caller: inst });
    }

    #[test]
    fn test_malformed_signature_rejected() {
        let mut f = fixture();
        let inst = f.institution.address();
        let sig = [0u8; 65];
        let err = f
            .registry
            .issue_certificate(&inst, f.recipient, hash(1), &sig, "Qm")
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSignature { cert_hash, .. } if cert_hash == hash(1)));
    }

    #[test]
    fn test_truncated_signature_rejected() {
        let mut f = fixture();
        let inst = f.institution.address();
        let sig = sign(&f.institution, f.recipient, hash(1));
        let err = f
            .registry
            .issue_certificate(&inst, f.recipient, hash(1), &sig[..64], "Qm")
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_SIGNATURE");
    }

    #[test]
    fn test_duplicate_check_precedes_signature_check() {
        let mut f = fixture();
        let inst = f.institution.address();
        let sig = sign(&f.institution, f.recipient, hash(1));
        f.registry
            .issue_certificate(&inst, f.recipient, hash(1), &sig, "Qm")
            .unwrap();
        let err = f
            .registry
            .issue_certificate(&inst, f.recipient, hash(1), &[], "Qm")
            .unwrap_err();
        assert_eq!(err, RegistryError::CertificateExists { cert_hash: hash(1) });
    }

    #[test]
    fn test_rejection_leaves_state_untouched() {
        let mut f = fixture();
        let head = f.registry.journal().head();
        let inst = f.institution.address();
        let sig = [0u8; 65];
        let _ = f
            .registry
            .issue_certificate(&inst, f.recipient, hash(1), &sig, "Qm");
        let _ = f.registry.revoke_certificate(&inst, &hash(1));
        let _ = f.registry.authorize_institution(&inst, Address([5; 20]));

        assert_eq!(f.registry.journal().head(), head);
        assert_eq!(f.registry.get_user_certificate_count(&f.recipient), 0);
        assert_eq!(f.registry.get_issuer_certificate_count(&inst), 0);
        assert!(!f.registry.is_authorized(&Address([5; 20])));
    }

    #[test]
    fn test_deauthorized_institution_cannot_issue_but_can_revoke() {
        let mut f = fixture();
        let inst = f.institution.address();
        let sig = sign(&f.institution, f.recipient, hash(1));
        f.registry
            .issue_certificate(&inst, f.recipient, hash(1), &sig, "Qm")
            .unwrap();
        f.registry.revoke_institution(&f.owner, inst).unwrap();

        let sig2 = sign(&f.institution, f.recipient, hash(2));
        assert!(matches!(
            f.registry
                .issue_certificate(&inst, f.recipient, hash(2), &sig2, "Qm"),
            Err(RegistryError::NotAuthorizedInstitution { .. })
        ));
        f.registry.revoke_certificate(&inst, &hash(1)).unwrap();
        assert_eq!(f.registry.certificate_status(&hash(1)), CertificateStatus::Revoked);
    }

    #[test]
    fn test_revoked_certificate_remains_auditable() {
        let mut f = fixture();
        let inst = f.institution.address();
        let sig = sign(&f.institution, f.recipient, hash(1));
        f.registry
            .issue_certificate(&inst, f.recipient, hash(1), &sig, "QmAudit")
            .unwrap();
        f.registry.revoke_certificate(&inst, &hash(1)).unwrap();

        let cert = f.registry.get_certificate(&hash(1)).unwrap();
        assert!(cert.revoked);
        assert!(cert.revoked_at.is_some());
        assert_eq!(cert.ipfs_hash, "QmAudit");
        assert_eq!(f.registry.get_user_certificate_count(&f.recipient), 1);
    }

    #[test]
    fn test_verify_ignores_recipient_argument() {
        let mut f = fixture();
        let inst = f.institution.address();
        let sig = sign(&f.institution, f.recipient, hash(1));
        f.registry
            .issue_certificate(&inst, f.recipient, hash(1), &sig, "Qm1")
            .unwrap();
        let v = f
            .registry
            .verify_certificate(&hash(1), &Address([0x55; 20]))
            .unwrap();
        assert!(v.valid);
        assert_eq!(v.ipfs_hash, "Qm1");
    }

    #[test]
    fn test_range_validation() {
        let mut f = fixture();
        let inst = f.institution.address();
        for b in 1..=3 {
            let sig = sign(&f.institution, f.recipient, hash(b));
            f.registry
                .issue_certificate(&inst, f.recipient, hash(b), &sig, format!("Qm{b}"))
                .unwrap();
        }

        let page = f.registry.get_certificates_for_user(&f.recipient, 1, 1).unwrap();
        assert_eq!(page.cert_hashes, vec![hash(2)]);
        assert_eq!(page.ipfs_hashes, vec!["Qm2".to_string()]);

        assert_eq!(
            f.registry
                .get_certificates_for_user(&f.recipient, 2, 1)
                .unwrap_err(),
            RegistryError::IndexOutOfRange {
                holder: f.recipient,
                index: 2,
                count: 3
            }
        );
        assert!(f.registry.get_certificates_for_user(&f.recipient, 0, 3).is_err());
        assert!(f
            .registry
            .get_certificates_for_user(&Address([0x66; 20]), 0, 0)
            .is_err());
    }

    #[test]
    fn test_issuer_index() {
        let mut f = fixture();
        let inst = f.institution.address();
        let other_recipient = Address([0x31; 20]);
        let sig1 = sign(&f.institution, f.recipient, hash(1));
        let sig2 = sign(&f.institution, other_recipient, hash(2));
        f.registry
            .issue_certificate(&inst, f.recipient, hash(1), &sig1, "Qm")
            .unwrap();
        f.registry
            .issue_certificate(&inst, other_recipient, hash(2), &sig2, "Qm")
            .unwrap();

        assert_eq!(f.registry.get_issuer_certificate_count(&inst), 2);
        assert_eq!(f.registry.get_certificates_by_issuer(&inst), &[hash(1), hash(2)]);
        assert!(f.registry.get_certificates_by_issuer(&f.owner).is_empty());
    }

    #[test]
    fn test_journal_records_every_change() {
        let mut f = fixture();
        let inst = f.institution.address();
        let sig = sign(&f.institution, f.recipient, hash(1));
        f.registry
            .issue_certificate(&inst, f.recipient, hash(1), &sig, "Qm")
            .unwrap();
        f.registry.revoke_certificate(&inst, &hash(1)).unwrap();

        let names: Vec<_> = f
            .registry
            .events_since(0)
            .iter()
            .map(|e| e.event.name())
            .collect();
        assert_eq!(
            names,
            vec!["InstitutionAuthorized", "CertificateIssued", "CertificateRevoked"]
        );
        assert!(f.registry.journal().verify_chain().chain_valid);
    }

    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_inclusive_range_matches_index_lookup(
            n in 1usize..6,
            start in 0usize..8,
            end in 0usize..8,
        ) {
            let mut f = fixture();
            let inst = f.institution.address();
            for i in 0..n {
                let h = hash(i as u8 + 1);
                let sig = sign(&f.institution, f.recipient, h);
                f.registry
                    .issue_certificate(&inst, f.recipient, h, &sig, format!("Qm{i}"))
                    .unwrap();
            }

            let head = f.registry.journal().head();
            match f.registry.get_certificates_for_user(&f.recipient, start, end) {
                Ok(page) => {
                    prop_assert!(start <= end && end < n);
                    prop_assert_eq!(page.cert_hashes.len(), end - start + 1);
                    prop_assert_eq!(page.ipfs_hashes.len(), end - start + 1);
                    for (offset, h) in page.cert_hashes.iter().enumerate() {
                        let at = f
                            .registry
                            .get_user_certificate_at_index(&f.recipient, start + offset)
                            .unwrap();
                        prop_assert_eq!(*h, at);
                    }
                }
                Err(err) => {
                    prop_assert!(start > end || end >= n);
                    let is_range_error = matches!(err, RegistryError::IndexOutOfRange { .. });
                    prop_assert!(is_range_error);
                }
            }
            prop_assert_eq!(f.registry.journal().head(), head);
        }
    }
}
