//! Page Writer
//!
//! Writes a header row followed by records partitioned into pages.

use std::io::Write;

use crate::error::{Result, StoreError};

use super::{marker_line, row::write_row, Record};

/// Totals reported by `PageWriter::finish`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Number of pages written
    pub pages: u32,
    /// Number of records written
    pub records: u64,
}

/// Streams records into page-delimited form
///
/// Writes the header immediately; call `add()` for each record in order,
/// then `finish()` to flush the trailing partial page.
pub struct PageWriter<W: Write> {
    writer: W,
    page_size: usize,
    /// Records of the page being filled
    pending: Vec<Record>,
    /// Pages already written
    pages: u32,
    records: u64,
}

impl<W: Write> PageWriter<W> {
    pub fn new<S: AsRef<str>>(mut writer: W, fields: &[S], page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(StoreError::Config("page size must be at least 1".to_string()));
        }
        write_row(&mut writer, fields)?;

        Ok(Self {
            writer,
            page_size,
            pending: Vec::with_capacity(page_size),
            pages: 0,
            records: 0,
        })
    }

    /// Add one record, writing out the page once it is full
    pub fn add(&mut self, record: Record) -> Result<()> {
        self.pending.push(record);
        self.records += 1;
        if self.pending.len() == self.page_size {
            self.flush_page()?;
        }
        Ok(())
    }

    fn flush_page(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.pages += 1;

        let marker = marker_line(self.pages, self.pending.len());
        self.writer.write_all(marker.as_bytes())?;
        self.writer.write_all(b"\n")?;
        for record in self.pending.drain(..) {
            write_row(&mut self.writer, &record)?;
        }
        Ok(())
    }

    /// Write any partial page and flush; returns the writer with totals
    pub fn finish(mut self) -> Result<(W, EncodeSummary)> {
        self.flush_page()?;
        self.writer.flush()?;

        let summary = EncodeSummary {
            pages: self.pages,
            records: self.records,
        };
        Ok((self.writer, summary))
    }
}

/// Encode a full record sequence into memory
pub fn encode_pages<S: AsRef<str>>(
    fields: &[S],
    records: &[Record],
    page_size: usize,
) -> Result<Vec<u8>> {
    let mut writer = PageWriter::new(Vec::new(), fields, page_size)?;
    for record in records {
        writer.add(record.clone())?;
    }
    let (bytes, _) = writer.finish()?;
    Ok(bytes)
}
