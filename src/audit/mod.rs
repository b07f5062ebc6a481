//! Audit Module
//!
//! Append-only record of every operation attempt and its outcome.
//!
//! ## File Format
//! ```text
//! <unixTimestamp>,<operation description>,<success|failure>
//! 1700000000,create type char 3 1 name house age,success
//! 1700000001,create record char Jon Stark 16,success
//! ```

mod entry;
mod log;

pub use entry::{AuditEntry, AuditOutcome};
pub use log::FileAuditLog;

use crate::error::Result;

/// Destination for audit entries
///
/// Implementations must be shareable across threads; the store records
/// through `&self`.
pub trait AuditSink: Send + Sync {
    /// Append one entry
    fn record(&self, entry: &AuditEntry) -> Result<()>;
}
