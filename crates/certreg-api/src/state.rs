//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The registry sits behind a single `parking_lot::RwLock`. Mutations hold
//! the write lock for the whole operation, so concurrent issuances are
//! serialized and a check can never race its commit. The lock is never
//! held across an `.await`.

use std::sync::Arc;

use parking_lot::RwLock;

use certreg_core::Address;
use certreg_state::{CertificateRegistry, RegistryError};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The registry.
    pub registry: Arc<RwLock<CertificateRegistry>>,
    /// Configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// State for `owner` with default configuration.
    pub fn new(owner: Address) -> Result<Self, RegistryError> {
        Self::with_config(AppConfig::new(owner))
    }

    /// State from a loaded configuration.
    pub fn with_config(config: AppConfig) -> Result<Self, RegistryError> {
        let registry = CertificateRegistry::new(config.owner)?;
        Ok(Self {
            registry: Arc::new(RwLock::new(registry)),
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_owner_rejected() {
        assert!(AppState::new(Address::ZERO).is_err());
    }

    #[test]
    fn clones_share_registry() {
        let owner = Address([7; 20]);
        let a = AppState::new(owner).unwrap();
        let b = a.clone();
        a.registry
            .write()
            .authorize_institution(&owner, Address([8; 20]))
            .unwrap();
        assert!(b.registry.read().is_authorized(&Address([8; 20])));
    }
}
