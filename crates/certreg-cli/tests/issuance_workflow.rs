//! The full off-registry issuance workflow: generate an institution key,
//! hash a certificate document, sign it for a recipient, and check the
//! signature recovers to the institution.

use certreg_cli::hash::hash_file;
use certreg_cli::keys::{generate_key_file, run_address, AddressArgs};
use certreg_cli::signing::{recover_issuer, run_recover, sign_issuance, RecoverArgs};
use certreg_core::{Address, CertHash};
use certreg_crypto::IssuanceMessage;

#[test]
fn issuance_workflow_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let (key_path, institution) = generate_key_file(dir.path(), "university", false).unwrap();

    let doc = dir.path().join("diploma.pdf");
    std::fs::write(&doc, b"%PDF-1.7 Bachelor of Science").unwrap();
    let cert_hash = hash_file(&doc).unwrap();

    let recipient: Address = "0x00000000000000000000000000000000000000b0".parse().unwrap();
    let key = certreg_cli::load_key(&key_path).unwrap();
    let sig = sign_issuance(&key, recipient, cert_hash).unwrap();

    assert_eq!(sig.as_bytes().len(), 65);
    assert_eq!(recover_issuer(recipient, cert_hash, &sig.to_hex()).unwrap(), institution);
    assert_eq!(
        IssuanceMessage::new(recipient, cert_hash)
            .recover_signer(&sig)
            .unwrap(),
        institution
    );
}

#[test]
fn editing_the_document_changes_the_hash() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("transcript.txt");

    std::fs::write(&doc, b"grade: A").unwrap();
    let original = hash_file(&doc).unwrap();
    std::fs::write(&doc, b"grade: A+").unwrap();
    assert_ne!(hash_file(&doc).unwrap(), original);
}

#[test]
fn recover_with_expected_signer() {
    let dir = tempfile::tempdir().unwrap();
    let (key_path, institution) = generate_key_file(dir.path(), "issuer", false).unwrap();
    let key = certreg_cli::load_key(&key_path).unwrap();

    let recipient = Address([0xb0; 20]);
    let cert_hash = CertHash([0x11; 32]);
    let signature = sign_issuance(&key, recipient, cert_hash).unwrap().to_hex();

    let matching = RecoverArgs {
        recipient,
        cert_hash,
        signature: signature.clone(),
        expect: Some(institution),
    };
    assert_eq!(run_recover(&matching).unwrap(), 0);

    let mismatched = RecoverArgs {
        recipient,
        cert_hash,
        signature,
        expect: Some(Address([0xee; 20])),
    };
    assert_eq!(run_recover(&mismatched).unwrap(), 1);
}

#[test]
fn address_of_corrupt_key_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("bad.key");
    std::fs::write(&key_path, "not hex at all").unwrap();

    assert!(run_address(&AddressArgs { key: key_path }).is_err());
}

#[test]
fn zero_secret_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("zero.key");
    std::fs::write(&key_path, "0".repeat(64)).unwrap();

    assert!(certreg_cli::load_key(&key_path).is_err());
}
