//! # Glucotel - Gestational Diabetes Tele-Monitoring Core
//!
//! Glucotel is the monitoring core of a tele-monitoring platform connecting
//! pregnant patients with gestational diabetes to supervising physicians:
//! patients log glycemia readings, physicians review aggregated trends and
//! exchange secured messages, and one-time codes gate doctor login (MFA)
//! and patient/doctor linking.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Classifying** glycemia readings against meal-context threshold tables
//! - **Aggregating** reading windows into compliance, average, and trend
//!   metrics
//! - **Tiering** patients into alert levels from their classified readings
//! - **Gating** doctor login with a time-boxed one-time MFA code
//! - **Linking** patient accounts to doctors through one-time tracking codes
//!
//! ## Architecture
//!
//! Glucotel follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (classify, compliance, risk, auth, linking,
//!   messaging, overview)
//! - [`adapters`] - External collaborators (resource store, code delivery)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glucotel::adapters::store::create_store;
//! use glucotel::config::load_config;
//! use glucotel::core::auth::SystemClock;
//! use glucotel::core::overview::MonitoringCoordinator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let config = load_config("glucotel.toml")?;
//!
//!     // Create the store collaborator and coordinator
//!     let store = create_store(&config.store)?;
//!     let coordinator = MonitoringCoordinator::new(store, Arc::new(SystemClock), &config);
//!
//!     // Compute dashboard aggregates for every patient
//!     let overviews = coordinator.overview_all().await?;
//!     for overview in overviews {
//!         println!("{}: {}", overview.patient_id, overview.risk.label);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Classification
//!
//! A reading's status is a pure function of its value, meal context, and
//! the applicable thresholds:
//!
//! ```rust
//! use glucotel::config::ThresholdsConfig;
//! use glucotel::core::classify::classify;
//! use glucotel::domain::reading::{GlycemiaStatus, MomentOfDay};
//! use rust_decimal_macros::dec;
//!
//! let thresholds = ThresholdsConfig::default();
//! assert_eq!(
//!     classify(dec!(1.3), MomentOfDay::AfterLunch, &thresholds),
//!     GlycemiaStatus::Warning
//! );
//! ```
//!
//! ## Error Handling
//!
//! Glucotel uses the [`domain::GlucotelError`] type for all errors:
//!
//! ```rust,no_run
//! use glucotel::domain::GlucotelError;
//!
//! fn example() -> Result<(), GlucotelError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = glucotel::config::load_config("glucotel.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Glucotel uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn, error};
//!
//! info!("Starting overview pass");
//! warn!(patient_id = "patient-1", "No readings in window");
//! error!(error = "timeout", "Overview failed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
