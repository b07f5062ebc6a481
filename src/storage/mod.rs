//! Storage Module
//!
//! Maps type names to files and rewrites those files safely.
//!
//! ## Responsibilities
//! - Derive a collision-free, traversal-free file path per type name
//! - Replace a type file atomically (temp file + rename) so readers never
//!   see a partially written page
//!
//! ## Directory Layout
//! ```text
//! {data_dir}/
//!   ├── types/
//!   │   ├── char.csv       (type "char")
//!   │   └── a%2Fb.csv      (type "a/b", percent-encoded)
//!   └── log.csv            (audit log, default location)
//! ```

mod layout;
mod type_file;

pub use layout::TypeFileLayout;
pub use type_file::{read_records, rewrite, WriteOptions};
pub(crate) use type_file::check_arity;
