//! Error types for typestore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for typestore operations
///
/// Everything except `Storage` and `Corruption` is an expected outcome of a
/// well-formed request and leaves the files untouched.
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Schema Errors
    // -------------------------------------------------------------------------
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Type '{0}' already exists")]
    DuplicateType(String),

    #[error("Unknown type '{0}'")]
    UnknownType(String),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Duplicate primary key '{key}' in type '{type_name}'")]
    DuplicateKey { type_name: String, key: String },

    #[error("No record with primary key '{key}' in type '{type_name}'")]
    NotFound { type_name: String, key: String },

    #[error("Invalid record for type '{type_name}': expected {expected} values, got {actual}")]
    InvalidRecord {
        type_name: String,
        expected: usize,
        actual: usize,
    },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage failure: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Corrupted type file: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("Parse error: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// True for failures of the underlying storage medium (I/O or a damaged
    /// file), as opposed to rejected requests.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, StoreError::Storage(_) | StoreError::Corruption(_))
    }
}
