//! Row codec
//!
//! Comma-separated rows with double-quote quoting. Quoted values may contain
//! separators, quotes (doubled) and line breaks.

use std::io::{BufRead, Write};

use crate::error::{Result, StoreError};

use super::PAGE_MARKER;

const SEPARATOR: char = ',';
const QUOTE: char = '"';

/// A decoded row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Field values, unquoted
    pub fields: Vec<String>,
    /// Whether the first field was written in quotes
    pub leading_quoted: bool,
}

impl Row {
    /// True if this row is a page marker rather than record data
    pub fn is_marker(&self) -> bool {
        !self.leading_quoted
            && self
                .fields
                .first()
                .is_some_and(|first| first.starts_with(PAGE_MARKER))
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

// =============================================================================
// Writing
// =============================================================================

/// Write one row, terminated by `\n`
pub fn write_row<W, S>(writer: &mut W, fields: &[S]) -> std::io::Result<()>
where
    W: Write + ?Sized,
    S: AsRef<str>,
{
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(SEPARATOR);
        }
        push_field(&mut line, field.as_ref());
    }
    line.push('\n');
    writer.write_all(line.as_bytes())
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value.starts_with(PAGE_MARKER)
        || value.contains([SEPARATOR, QUOTE, '\n', '\r'])
}

fn push_field(line: &mut String, value: &str) {
    if !needs_quotes(value) {
        line.push_str(value);
        return;
    }
    line.push(QUOTE);
    for c in value.chars() {
        if c == QUOTE {
            line.push(QUOTE);
        }
        line.push(c);
    }
    line.push(QUOTE);
}

// =============================================================================
// Reading
// =============================================================================

/// Pulls rows one at a time from a buffered reader
pub struct RowReader<R> {
    reader: R,
    /// Physical line number of the next unread line (for error messages)
    line_no: usize,
}

impl<R: BufRead> RowReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 1 }
    }

    /// Line number where the next row starts
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Read the next non-blank row; `Ok(None)` at end of input
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        loop {
            let mut buf = String::new();
            let start = self.line_no;

            // Keep pulling physical lines while a quoted field is still open.
            loop {
                let read = self.reader.read_line(&mut buf)?;
                if read == 0 {
                    if buf.is_empty() {
                        return Ok(None);
                    }
                    if quote_open(&buf) {
                        return Err(StoreError::Corruption(format!(
                            "unterminated quoted field starting at line {}",
                            start
                        )));
                    }
                    break;
                }
                self.line_no += 1;
                if !quote_open(&buf) {
                    break;
                }
            }

            let line = trim_line_ending(&buf);
            if line.is_empty() {
                continue;
            }
            return Ok(Some(parse_row(line)));
        }
    }
}

/// Odd number of quote characters means a quoted field is still open
fn quote_open(buf: &str) -> bool {
    buf.chars().filter(|&c| c == QUOTE).count() % 2 == 1
}

fn trim_line_ending(buf: &str) -> &str {
    let line = buf.strip_suffix('\n').unwrap_or(buf);
    line.strip_suffix('\r').unwrap_or(line)
}

fn parse_row(line: &str) -> Row {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut leading_quoted = false;
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    field.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == QUOTE && at_field_start {
            in_quotes = true;
            if fields.is_empty() {
                leading_quoted = true;
            }
        } else if c == SEPARATOR {
            fields.push(std::mem::take(&mut field));
            at_field_start = true;
            continue;
        } else {
            field.push(c);
        }
        at_field_start = false;
    }
    fields.push(field);

    Row {
        fields,
        leading_quoted,
    }
}
