//! Domain models and types for Glucotel.
//!
//! This module contains the core domain models, types, and business rules of
//! the monitoring platform.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`], [`DoctorId`],
//!   [`ReadingId`], [`MessageId`])
//! - **Domain models** ([`Reading`], [`Patient`], [`Doctor`],
//!   [`TrackingCode`], [`Message`])
//! - **Error types** ([`GlucotelError`], [`AuthError`], [`LinkError`],
//!   [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Glucotel uses the newtype pattern for identifiers to prevent mixing
//! different ID types:
//!
//! ```rust
//! use glucotel::domain::{PatientId, DoctorId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let patient_id = PatientId::new("patient-123")?;
//! let doctor_id = DoctorId::new("dr-456")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: PatientId = doctor_id;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, GlucotelError>`]:
//!
//! ```rust
//! use glucotel::domain::{GlucotelError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = glucotel::config::load_config("glucotel.toml")?;
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod doctor;
pub mod errors;
pub mod ids;
pub mod message;
pub mod patient;
pub mod reading;
pub mod result;
pub mod tracking_code;

// Re-export commonly used types for convenience
pub use doctor::Doctor;
pub use errors::{AuthError, GlucotelError, LinkError, StoreError};
pub use ids::{DoctorId, MessageId, PatientId, ReadingId};
pub use message::{Message, SenderRole};
pub use patient::{MonitoringMode, Patient, RangeBounds, TargetRange};
pub use reading::{GlycemiaStatus, MomentOfDay, Reading, ReadingBuilder};
pub use result::Result;
pub use tracking_code::{DeliveryChannel, TrackingCode};
