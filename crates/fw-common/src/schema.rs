//! Schema versioning for wire frames and telemetry rows.

/// Schema version for frames, alerts, and telemetry tables.
///
/// Bump the minor version for additive changes, the major version for
/// breaking changes to field names or semantics.
pub const SCHEMA_VERSION: &str = "1.0.0";
