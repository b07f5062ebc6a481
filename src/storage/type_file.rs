//! Type file I/O
//!
//! Whole-file reads and atomic rewrites of paged type files.

use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::page::{EncodeSummary, PageReader, PageWriter, Record};
use crate::schema::Schema;

/// How a rewrite is performed
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Records per page
    pub page_size: usize,
    /// fsync the new file before it replaces the old one
    pub sync: bool,
}

/// Replace the file at `path` with `fields` and `records`, re-paged from
/// scratch
///
/// The new content is written to a sibling temp file and renamed over the
/// target, so the old file stays intact if anything fails.
pub fn rewrite(
    path: &Path,
    fields: &[String],
    records: &[Record],
    options: WriteOptions,
) -> Result<EncodeSummary> {
    let tmp_path = temp_path(path);

    let result = write_file(&tmp_path, fields, records, options)
        .and_then(|summary| {
            fs::rename(&tmp_path, path)?;
            Ok(summary)
        });

    if result.is_err() {
        // Best effort: the temp file is garbage either way.
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_file(
    path: &Path,
    fields: &[String],
    records: &[Record],
    options: WriteOptions,
) -> Result<EncodeSummary> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let mut writer = PageWriter::new(BufWriter::new(file), fields, options.page_size)?;
    for record in records {
        writer.add(record.clone())?;
    }
    let (buffered, summary) = writer.finish()?;

    let file: File = buffered
        .into_inner()
        .map_err(|e| StoreError::Storage(e.into_error()))?;
    if options.sync {
        file.sync_all()?;
    }
    Ok(summary)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read every record of `schema` from `path`, checking each against the
/// schema's arity. A missing file yields no records.
pub fn read_records(path: &Path, schema: &Schema) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for page in PageReader::open(path)? {
        let page = page?;
        for record in page.records {
            check_arity(schema, &record, page.number)?;
            records.push(record);
        }
    }
    Ok(records)
}

pub(crate) fn check_arity(schema: &Schema, record: &Record, page: u32) -> Result<()> {
    if record.len() != schema.arity() {
        return Err(StoreError::Corruption(format!(
            "record in page {} of type '{}' has {} values, schema has {} fields",
            page,
            schema.name,
            record.len(),
            schema.arity()
        )));
    }
    Ok(())
}
