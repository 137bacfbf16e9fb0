//! Telemetry retention policy enforcement.
//!
//! Enforces a TTL over the dated table files plus a global disk budget:
//! - Files older than the TTL are pruned regardless of budget.
//! - When the directory exceeds the budget, the oldest files are pruned
//!   first, in table priority order (raw readings before alert history).
//! - Every deletion is logged as a retention event; dry-run preview is
//!   supported.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::schema::TableName;

/// Errors from retention operations.
#[derive(Error, Debug)]
pub enum RetentionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for retention policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Days to keep files before TTL pruning.
    pub ttl_days: u32,
    /// Total disk budget in bytes. 0 means unlimited.
    pub disk_budget_bytes: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        RetentionConfig {
            ttl_days: 30,
            disk_budget_bytes: 512 * 1024 * 1024,
        }
    }
}

/// Why a file was pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionReason {
    TtlExpired,
    OverBudget,
}

/// Record of one pruning action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionEvent {
    pub file: PathBuf,
    pub reason: RetentionReason,
    pub bytes: u64,
}

/// Dry-run summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetentionPreview {
    pub files_to_prune: usize,
    pub bytes_to_free: u64,
}

/// A discovered table file with its parsed date.
#[derive(Debug, Clone)]
struct TableFile {
    path: PathBuf,
    table: TableName,
    date: NaiveDate,
    bytes: u64,
}

/// Enforces retention over a telemetry directory.
pub struct RetentionEnforcer {
    dir: PathBuf,
    config: RetentionConfig,
}

impl RetentionEnforcer {
    pub fn new(dir: &Path, config: RetentionConfig) -> Self {
        RetentionEnforcer {
            dir: dir.to_path_buf(),
            config,
        }
    }

    /// Preview what would be pruned, deleting nothing.
    pub fn preview(&self, now: DateTime<Utc>) -> Result<RetentionPreview, RetentionError> {
        let doomed = self.select(now)?;
        Ok(RetentionPreview {
            files_to_prune: doomed.len(),
            bytes_to_free: doomed.iter().map(|(f, _)| f.bytes).sum(),
        })
    }

    /// Enforce retention, returning one event per deleted file.
    pub fn enforce(&self, now: DateTime<Utc>) -> Result<Vec<RetentionEvent>, RetentionError> {
        let mut events = Vec::new();
        for (file, reason) in self.select(now)? {
            match fs::remove_file(&file.path) {
                Ok(()) => {
                    info!(
                        file = %file.path.display(),
                        reason = ?reason,
                        bytes = file.bytes,
                        "pruned telemetry file"
                    );
                    events.push(RetentionEvent {
                        file: file.path,
                        reason,
                        bytes: file.bytes,
                    });
                }
                Err(e) => {
                    warn!(file = %file.path.display(), error = %e, "failed to prune");
                }
            }
        }
        Ok(events)
    }

    /// Select files to prune with their reasons.
    fn select(&self, now: DateTime<Utc>) -> Result<Vec<(TableFile, RetentionReason)>, RetentionError> {
        let mut files = self.scan()?;
        let cutoff = now.date_naive() - chrono::Days::new(self.config.ttl_days as u64);

        let mut doomed = Vec::new();
        files.retain(|f| {
            if f.date < cutoff {
                doomed.push((f.clone(), RetentionReason::TtlExpired));
                false
            } else {
                true
            }
        });

        if self.config.disk_budget_bytes > 0 {
            let mut total: u64 = files.iter().map(|f| f.bytes).sum();
            // Oldest first within the lowest-priority tables.
            files.sort_by_key(|f| {
                let priority = TableName::pruning_priority()
                    .iter()
                    .position(|t| *t == f.table)
                    .unwrap_or(usize::MAX);
                (priority, f.date)
            });
            for f in files {
                if total <= self.config.disk_budget_bytes {
                    break;
                }
                total = total.saturating_sub(f.bytes);
                doomed.push((f, RetentionReason::OverBudget));
            }
        }

        Ok(doomed)
    }

    /// Discover dated table files; anything else in the directory is
    /// left alone.
    fn scan(&self) -> Result<Vec<TableFile>, RetentionError> {
        let mut files = Vec::new();
        if !self.dir.is_dir() {
            return Ok(files);
        }
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(parsed) = parse_table_file(name) else {
                continue;
            };
            let bytes = entry.metadata()?.len();
            files.push(TableFile {
                path,
                table: parsed.0,
                date: parsed.1,
                bytes,
            });
        }
        Ok(files)
    }
}

fn parse_table_file(name: &str) -> Option<(TableName, NaiveDate)> {
    let stem = name.strip_suffix(".jsonl")?;
    let (table_stem, date_str) = stem.rsplit_once('-')?;
    let table = match table_stem {
        "readings" => TableName::Readings,
        "alerts" => TableName::Alerts,
        "hourly" => TableName::Hourly,
        _ => return None,
    };
    let date = NaiveDate::parse_from_str(date_str, "%Y%m%d").ok()?;
    Some((table, date))
}
