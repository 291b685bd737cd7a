//! External system integrations for Glucotel.
//!
//! This module provides adapters for the platform's external collaborators:
//!
//! - [`store`] - Generic resource store (trait-based; REST and in-memory
//!   backends)
//! - [`delivery`] - Outbound email/SMS handoff for one-time codes
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies
//! and enable testing with mock implementations. The store layer uses
//! trait-based abstraction so the core never depends on a concrete backend.
//!
//! ```rust
//! use glucotel::adapters::store::{create_store, Filter};
//! use glucotel::config::{StoreBackend, StoreConfig};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoreConfig {
//!     backend: StoreBackend::Memory,
//!     ..Default::default()
//! };
//! let store = create_store(&config)?;
//!
//! store.create("patients", json!({"id": "p-1"})).await?;
//! let patients = store.list("patients", &Filter::new()).await?;
//! assert_eq!(patients.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod delivery;
pub mod store;
