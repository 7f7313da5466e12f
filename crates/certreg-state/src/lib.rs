//! # certreg-state — Certificate Registry State Machine
//!
//! The registry lets an owner authorize institutions, lets those
//! institutions issue signature-bound certificates to recipients, and
//! lets anyone verify them. Revocation is one-way.
//!
//! ## Certificate Lifecycle
//!
//! ```text
//! NonExistent ──issue──▶ Issued ──revoke──▶ Revoked (terminal)
//! ```
//!
//! There is no path back to `NonExistent` and no way to skip `Issued`.
//! A revoked certificate stays readable for audit but fails verification.
//!
//! ## Institution Authorization
//!
//! ```text
//! Unauthorized ──authorize (owner)──▶ Authorized ──revoke (owner)──▶ Unauthorized
//! ```
//!
//! ## Atomicity
//!
//! Every mutating operation runs all of its checks through a `&self`
//! method before touching state. A rejected call therefore leaves the
//! registry, its indexes, and its event journal exactly as they were.
//!
//! The registry itself is single-threaded (`&mut self` for writes). A host
//! that shares it across threads wraps it in one write lock; see
//! `certreg-api`.

pub mod certificate;
pub mod error;
pub mod event;
pub mod registry;

pub use certificate::{Certificate, CertificatePage, CertificateStatus, Verification};
pub use error::RegistryError;
pub use event::{ChainIntegrity, EventJournal, JournalEntry, RegistryEvent};
pub use registry::CertificateRegistry;
