//! Resource store abstraction layer
//!
//! The store is the generic persistence collaborator the core talks to:
//! entities addressed by resource name, equality filters, partial updates,
//! and a conditional-update primitive for the flows that need at-most-once
//! semantics.

pub mod memory;
pub mod rest;
pub mod traits;

use crate::config::{StoreBackend, StoreConfig};
use crate::domain::Result;
use std::sync::Arc;

pub use memory::MemoryStore;
pub use rest::RestStore;
pub use traits::{Filter, ResourceStore};

/// Create a resource store from configuration
///
/// # Arguments
///
/// * `config` - Store configuration selecting the backend
///
/// # Errors
///
/// Returns an error if the backend cannot be constructed.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn ResourceStore>> {
    let store: Arc<dyn ResourceStore> = match config.backend {
        StoreBackend::Rest => Arc::new(RestStore::new(config)?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_memory_store() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            ..Default::default()
        };
        assert!(create_store(&config).is_ok());
    }

    #[test]
    fn test_create_rest_store() {
        let config = StoreConfig::default();
        assert!(create_store(&config).is_ok());
    }
}
