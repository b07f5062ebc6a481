//! Schema Module
//!
//! Record type declarations and their validation.
//!
//! ## Responsibilities
//! - Validate type declarations (name length, field count and names,
//!   primary key position)
//! - Keep one immutable schema per type name for the life of a store

mod registry;

pub use registry::SchemaRegistry;

/// Longest accepted type name (in characters)
pub const MAX_TYPE_NAME_LEN: usize = 12;

/// Most fields a type may declare
pub const MAX_FIELDS: usize = 6;

/// Longest accepted leading token of a field name (in characters)
pub const MAX_FIELD_NAME_LEN: usize = 20;

/// A validated record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Type name
    pub name: String,
    /// Field names in record order
    pub fields: Vec<String>,
    /// Field count as declared by the caller; bookkeeping only
    pub declared_field_count: usize,
    /// Zero-based position of the primary key in `fields`
    pub primary_key_index: usize,
}

impl Schema {
    /// Number of values every record of this type carries
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Name of the primary key field
    pub fn primary_key_field(&self) -> &str {
        &self.fields[self.primary_key_index]
    }

    /// Primary key of `record`, if the record is long enough to have one
    pub fn key_of<'r>(&self, record: &'r [String]) -> Option<&'r str> {
        record.get(self.primary_key_index).map(String::as_str)
    }
}
