//! Type file layout
//!
//! Turns a type name into a path inside the data directory.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Maps type names to their backing files
#[derive(Debug, Clone)]
pub struct TypeFileLayout {
    dir: PathBuf,
}

impl TypeFileLayout {
    const EXTENSION: &'static str = "csv";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding all type files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Backing file of `type_name`
    pub fn type_file(&self, type_name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_name(type_name), Self::EXTENSION))
    }
}

/// Keep `[A-Za-z0-9_-]`, percent-encode every other byte.
/// `%` itself is encoded, so distinct names never share a file.
fn encode_name(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            encoded.push(byte as char);
        } else {
            // Writing into a String cannot fail.
            let _ = write!(encoded, "%{:02X}", byte);
        }
    }
    encoded
}
