//! # certreg-core — Foundational Types for the Certificate Registry
//!
//! Defines the type-system primitives every other crate in the workspace
//! builds on. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identities.** `Address` and `CertHash` are
//!    fixed-size byte newtypes with validated hex constructors. No bare
//!    strings or byte vectors cross crate boundaries.
//!
//! 2. **Explicit null identity.** `Address::ZERO` is a named constant and
//!    `Address::is_zero()` is the only way callers test for it.
//!
//! 3. **UTC-only timestamps.** `Timestamp` is UTC with seconds precision,
//!    so issuance times render identically everywhere.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `certreg-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod hex;
pub mod identity;
pub mod temporal;

pub use error::{CryptoError, ValidationError};
pub use identity::{Address, CertHash};
pub use temporal::Timestamp;
