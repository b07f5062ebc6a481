//! Page Reader
//!
//! Lazily decodes pages from a type file, in file order.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use crate::error::{Result, StoreError};

use super::row::{Row, RowReader};
use super::{Page, PAGE_MARKER, PAGE_SIZE};

/// Iterator over the pages of one type file
///
/// Yields `Err` at most once; iteration stops after the first error.
pub struct PageReader<R> {
    /// `None` when the underlying file does not exist
    rows: Option<RowReader<R>>,
    header: Option<Vec<String>>,
    next_number: u32,
    done: bool,
}

impl<R: BufRead> PageReader<R> {
    /// Start decoding; consumes the header row
    pub fn new(reader: R) -> Result<Self> {
        let mut rows = RowReader::new(reader);
        let header = rows.next_row()?.map(Row::into_fields);

        Ok(Self {
            rows: Some(rows),
            header,
            next_number: 1,
            done: false,
        })
    }

    /// Field names from the header row, if the stream had one
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    fn next_page(&mut self) -> Result<Option<Page>> {
        let rows = match self.rows.as_mut() {
            Some(rows) => rows,
            None => return Ok(None),
        };

        let line_no = rows.line_no();
        let row = match rows.next_row()? {
            Some(row) => row,
            None => return Ok(None),
        };
        if !row.is_marker() {
            return Err(StoreError::Corruption(format!(
                "record row outside of a page at line {}",
                line_no
            )));
        }

        let (number, count) = parse_marker(&row, line_no)?;
        if number != self.next_number {
            return Err(StoreError::Corruption(format!(
                "expected page {} at line {}, found page {}",
                self.next_number, line_no, number
            )));
        }

        // `count` is untrusted; grow as rows actually arrive.
        let mut records = Vec::with_capacity(count.min(PAGE_SIZE));
        while records.len() < count {
            let row_line = rows.line_no();
            match rows.next_row()? {
                Some(row) if row.is_marker() => {
                    return Err(StoreError::Corruption(format!(
                        "page {} declares {} records but a marker follows after {} (line {})",
                        number,
                        count,
                        records.len(),
                        row_line
                    )));
                }
                Some(row) => records.push(row.into_fields()),
                None => {
                    return Err(StoreError::Corruption(format!(
                        "page {} declares {} records but only {} are present",
                        number,
                        count,
                        records.len()
                    )));
                }
            }
        }

        self.next_number += 1;
        Ok(Some(Page { number, records }))
    }
}

impl PageReader<BufReader<File>> {
    /// Open a type file; a missing file decodes as zero pages
    pub fn open(path: &Path) -> Result<Self> {
        match File::open(path) {
            Ok(file) => Self::new(BufReader::new(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::empty()),
            Err(e) => Err(e.into()),
        }
    }

    fn empty() -> Self {
        Self {
            rows: None,
            header: None,
            next_number: 1,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for PageReader<R> {
    type Item = Result<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_page() {
            Ok(Some(page)) => Some(Ok(page)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// "PAGE_HEADER 3 10" → (3, 10)
fn parse_marker(row: &Row, line_no: usize) -> Result<(u32, usize)> {
    let malformed = || {
        StoreError::Corruption(format!("malformed page marker at line {}", line_no))
    };

    if row.fields.len() != 1 {
        return Err(malformed());
    }
    let mut tokens = row.fields[0].split_whitespace();
    if tokens.next() != Some(PAGE_MARKER) {
        return Err(malformed());
    }
    let number = tokens
        .next()
        .and_then(|t| t.parse::<u32>().ok())
        .ok_or_else(malformed)?;
    let count = tokens
        .next()
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(malformed)?;
    if tokens.next().is_some() {
        return Err(malformed());
    }
    Ok((number, count))
}

/// Decode every page of an in-memory type file
pub fn decode_pages(bytes: &[u8]) -> Result<Vec<Page>> {
    PageReader::new(bytes)?.collect()
}
