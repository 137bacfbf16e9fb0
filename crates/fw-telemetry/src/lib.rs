//! Frostwatch telemetry storage.
//!
//! This crate provides:
//! - JSONL row schemas for the readings, alerts, and hourly tables
//! - A date-rotated, buffered JSONL writer per table
//! - Hourly temperature archiving with same-hour deduplication
//! - TTL and disk-budget retention enforcement

pub mod hourly;
pub mod retention;
pub mod schema;
pub mod store;
pub mod writer;

pub use hourly::{hour_bucket, HourlyArchiver};
pub use retention::{
    RetentionConfig, RetentionEnforcer, RetentionEvent, RetentionPreview, RetentionReason,
};
pub use schema::{AlertRow, HourlyRow, ReadingRow, TableName};
pub use store::TelemetryStore;
pub use writer::{TableWriter, WriteError};
