//! Core business logic for Glucotel.
//!
//! This module contains the monitoring domain rules and the flows gating
//! access to them.
//!
//! # Modules
//!
//! - [`classify`] - Glycemia reading classification against threshold tables
//! - [`compliance`] - Adherence and trend aggregation over a window
//! - [`risk`] - Patient alert tier derivation and list ordering
//! - [`auth`] - Doctor login and the time-boxed MFA challenge
//! - [`linking`] - One-time tracking codes binding patients to doctors
//! - [`messaging`] - Patient/doctor message thread state
//! - [`overview`] - Coordinator producing dashboard-ready aggregates
//!
//! # Aggregation Workflow
//!
//! The typical monitoring pass:
//!
//! 1. **Fetch**: Load the patient and their reading window from the store
//!    (concurrently; aggregation waits for the full window)
//! 2. **Classify**: Tag each reading with its clinical status
//! 3. **Aggregate**: Compute compliance rate, weekly average, and trend
//! 4. **Derive risk**: Tier the patient from the classified set
//! 5. **Persist**: Write the recomputed aggregates back to the patient
//!    record
//!
//! # Example
//!
//! ```rust,no_run
//! use glucotel::adapters::store::create_store;
//! use glucotel::config::load_config;
//! use glucotel::core::auth::SystemClock;
//! use glucotel::core::overview::MonitoringCoordinator;
//! use glucotel::domain::PatientId;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("glucotel.toml")?;
//! let store = create_store(&config.store)?;
//! let coordinator = MonitoringCoordinator::new(store, Arc::new(SystemClock), &config);
//!
//! let overview = coordinator
//!     .patient_overview(&PatientId::new("patient-1")?)
//!     .await?;
//! println!("{}: {}", overview.patient_id, overview.risk.label);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod classify;
pub mod compliance;
pub mod linking;
pub mod messaging;
pub mod overview;
pub mod risk;
