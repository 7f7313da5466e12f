//! # API Route Modules
//!
//! - `institutions` — owner lookup, institution authorization and
//!   revocation, per-issuer issuance history.
//! - `certificates` — issuance, record lookup, verification, revocation.
//! - `users` — per-recipient certificate count, index, and range reads.
//! - `events` — the hash-chained event journal feed.

pub mod certificates;
pub mod events;
pub mod institutions;
pub mod users;
