//! Audit entry definitions

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Outcome of an audited operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    Success,
    Failure,
}

impl AuditOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Failure => "failure",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(AuditOutcome::Success),
            "failure" => Some(AuditOutcome::Failure),
            _ => None,
        }
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// Unix time (seconds) when the entry was created
    pub timestamp: u64,

    /// The request, in command-script form
    pub operation: String,

    pub outcome: AuditOutcome,
}

impl AuditEntry {
    /// Create an entry stamped with the current time
    pub fn new(operation: impl Into<String>, outcome: AuditOutcome) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            timestamp,
            operation: operation.into(),
            outcome,
        }
    }
}
