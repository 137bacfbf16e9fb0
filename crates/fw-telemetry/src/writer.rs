//! Date-rotated JSONL writer for telemetry tables.
//!
//! One file per table per day (`readings-20260807.jsonl`), appended and
//! rotated by the row's stream timestamp so replays land in the same
//! files as the original run. Rows are buffered; callers flush at
//! checkpoints and on shutdown.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::schema::{epoch_to_datetime, TableName};

/// Errors from telemetry writer operations.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Appending writer for a single telemetry table.
pub struct TableWriter {
    table: TableName,
    dir: PathBuf,
    current: Option<(NaiveDate, BufWriter<File>)>,
    rows_written: u64,
}

impl TableWriter {
    /// Create a writer rooted at `dir`. The directory is created lazily
    /// on first append.
    pub fn new(table: TableName, dir: &Path) -> Self {
        TableWriter {
            table,
            dir: dir.to_path_buf(),
            current: None,
            rows_written: 0,
        }
    }

    /// Append one row, rotating to a new dated file when the row's
    /// timestamp crosses a day boundary.
    pub fn append<T: Serialize>(&mut self, ts: f64, row: &T) -> Result<(), WriteError> {
        let date = epoch_to_datetime(ts).date_naive();
        if self.current.as_ref().map(|(d, _)| *d) != Some(date) {
            self.rotate(date)?;
        }
        let line = serde_json::to_string(row)?;
        let (_, writer) = self
            .current
            .as_mut()
            .expect("rotate always installs a writer");
        writeln!(writer, "{}", line)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flush buffered rows to disk.
    pub fn flush(&mut self) -> Result<(), WriteError> {
        if let Some((_, writer)) = self.current.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    /// Total rows appended since construction.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Path of the file for a given date.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}-{}.jsonl", self.table.stem(), date.format("%Y%m%d")))
    }

    fn rotate(&mut self, date: NaiveDate) -> Result<(), WriteError> {
        if let Some((_, mut writer)) = self.current.take() {
            writer.flush()?;
        }
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(date);
        debug!(table = %self.table, path = %path.display(), "rotating telemetry file");
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        self.current = Some((date, BufWriter::new(file)));
        Ok(())
    }
}

impl Drop for TableWriter {
    fn drop(&mut self) {
        // Last-chance flush; errors here have nowhere to go.
        if let Some((_, writer)) = self.current.as_mut() {
            let _ = writer.flush();
        }
    }
}
