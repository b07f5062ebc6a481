//! # typestore
//!
//! A typed record store with:
//! - Declared record types (fixed text fields, one primary key)
//! - One page-delimited CSV file per type, rewritten atomically on mutation
//! - Primary key uniqueness enforced on insert
//! - An append-only audit log of every operation attempt
//! - A line-oriented command script runner
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Command Script                            │
//! │              (ScriptRunner → results output)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Record Store                              │
//! │          (per-type lock, read-modify-write cycle)            │
//! └──────┬──────────────────┬───────────────────────┬───────────┘
//!        │                  │                       │
//!        ▼                  ▼                       ▼
//! ┌─────────────┐   ┌───────────────┐       ┌─────────────┐
//! │   Schema    │   │  Page Codec   │       │  Audit Log  │
//! │  Registry   │   │ (type files)  │       │  (append)   │
//! └─────────────┘   └───────────────┘       └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod schema;
pub mod page;
pub mod storage;
pub mod audit;
pub mod command;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, SearchMissPolicy};
pub use page::{Page, Record, PAGE_SIZE};
pub use schema::Schema;
pub use store::RecordStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of typestore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
