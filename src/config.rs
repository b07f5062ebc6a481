//! Configuration for typestore
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

use crate::page::PAGE_SIZE;

/// Main configuration for a typestore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── types/<type>.csv (one paged file per declared type)
    ///     └── log.csv          (audit log, unless overridden)
    pub data_dir: PathBuf,

    /// Maximum number of records per page
    pub page_size: usize,

    /// fsync type files before they replace the previous version
    pub sync_writes: bool,

    // -------------------------------------------------------------------------
    // Audit Configuration
    // -------------------------------------------------------------------------
    /// Audit log location; `None` means `{data_dir}/log.csv`
    pub audit_log: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Output Configuration
    // -------------------------------------------------------------------------
    /// What a script writes when a search finds nothing
    pub search_miss: SearchMissPolicy,
}

/// Output policy for a failed `search record`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMissPolicy {
    /// Write this line in place of the record
    Placeholder(String),

    /// Write nothing
    Silent,
}

impl Default for SearchMissPolicy {
    fn default() -> Self {
        SearchMissPolicy::Placeholder("Record not found".to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./typestore_data"),
            page_size: PAGE_SIZE,
            sync_writes: true,
            audit_log: None,
            search_miss: SearchMissPolicy::default(),
        }
    }
}

impl Config {
    const AUDIT_LOG_FILENAME: &'static str = "log.csv";

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolved audit log path
    pub fn audit_log_path(&self) -> PathBuf {
        match &self.audit_log {
            Some(path) => path.clone(),
            None => self.data_dir.join(Self::AUDIT_LOG_FILENAME),
        }
    }

    /// Data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all type files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the number of records per page
    pub fn page_size(mut self, size: usize) -> Self {
        self.config.page_size = size;
        self
    }

    /// Enable or disable fsync on type file rewrites
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.config.sync_writes = sync;
        self
    }

    /// Set an explicit audit log path
    pub fn audit_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.audit_log = Some(path.into());
        self
    }

    /// Set the failed-search output policy
    pub fn search_miss(mut self, policy: SearchMissPolicy) -> Self {
        self.config.search_miss = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
