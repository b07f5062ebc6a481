//! Page Module
//!
//! Page codec: maps an ordered record sequence to its page-delimited text
//! form and back.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header row                                              │
//! │   field1,field2,...,fieldN                              │
//! ├─────────────────────────────────────────────────────────┤
//! │ Page 1                                                  │
//! │   PAGE_HEADER 1 <count>                                 │
//! │   value1,value2,...,valueN      (count rows)            │
//! ├─────────────────────────────────────────────────────────┤
//! │ Page 2 ...                                              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are comma-separated with double-quote quoting. A value that begins
//! with the marker prefix is always written quoted, so only an unquoted
//! leading field can introduce a page.

mod reader;
mod row;
mod writer;

pub use reader::{decode_pages, PageReader};
pub use row::{write_row, Row, RowReader};
pub use writer::{encode_pages, EncodeSummary, PageWriter};

// =============================================================================
// Shared Constants (used by writer and reader)
// =============================================================================

/// Default maximum number of records per page
pub const PAGE_SIZE: usize = 10;

/// Reserved prefix of page marker rows
pub const PAGE_MARKER: &str = "PAGE_HEADER";

/// One stored record: text values aligned with the schema's fields
pub type Record = Vec<String>;

/// A bounded run of records as laid out on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based ordinal of this page in its file
    pub number: u32,
    /// Records in file order
    pub records: Vec<Record>,
}

impl Page {
    /// Number of records in this page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Format a page marker row
pub(crate) fn marker_line(number: u32, count: usize) -> String {
    format!("{} {} {}", PAGE_MARKER, number, count)
}
