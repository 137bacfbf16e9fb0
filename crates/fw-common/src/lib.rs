//! Frostwatch common types, IDs, and errors.
//!
//! This crate provides foundational types shared across fw-core modules:
//! - Device wire frames (sensor readings, heartbeats)
//! - Alert and liveness event types
//! - Run and device identity types
//! - Common error types
//! - Output format specifications

pub mod alert;
pub mod error;
pub mod frame;
pub mod id;
pub mod output;
pub mod schema;

pub use alert::{AlertEvent, AlertSeverity, LivenessEvent, LivenessStatus};
pub use error::{Error, ErrorCategory, Result};
pub use frame::{Frame, HeartbeatFrame, Reading, SensorFrame};
pub use id::{DeviceId, RunId};
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
