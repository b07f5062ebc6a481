//! File-backed audit log
//!
//! One CSV row per entry, appended and flushed immediately.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::{Result, StoreError};
use crate::page::{write_row, RowReader};

use super::{AuditEntry, AuditOutcome, AuditSink};

/// Append-only audit log stored as CSV
pub struct FileAuditLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileAuditLog {
    /// Open (or create) the log at `path`, creating parent directories
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every entry in the log
    pub fn entries(&self) -> Result<Vec<AuditEntry>> {
        read_entries(&self.path)
    }
}

impl AuditSink for FileAuditLog {
    fn record(&self, entry: &AuditEntry) -> Result<()> {
        // Build the row first so a single write_all carries the whole entry.
        let mut row = Vec::new();
        write_row(
            &mut row,
            &[
                entry.timestamp.to_string().as_str(),
                entry.operation.as_str(),
                entry.outcome.as_str(),
            ],
        )?;

        let mut file = self.file.lock();
        file.write_all(&row)?;
        file.flush()?;
        Ok(())
    }
}

/// Parse an audit log file
pub fn read_entries(path: &Path) -> Result<Vec<AuditEntry>> {
    let file = File::open(path)?;
    let mut rows = RowReader::new(BufReader::new(file));
    let mut entries = Vec::new();

    while let Some(row) = rows.next_row()? {
        let malformed = || StoreError::Corruption(format!("malformed audit row: {:?}", row.fields));
        if row.fields.len() != 3 {
            return Err(malformed());
        }
        let timestamp = row.fields[0].parse::<u64>().map_err(|_| malformed())?;
        let outcome = AuditOutcome::parse(&row.fields[2]).ok_or_else(malformed)?;
        entries.push(AuditEntry {
            timestamp,
            operation: row.fields[1].clone(),
            outcome,
        });
    }
    Ok(entries)
}
