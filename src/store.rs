//! Store Module
//!
//! The record store that coordinates all components.
//!
//! ## Responsibilities
//! - Own the schema registry, the type file layout and the audit sink
//! - Run create/delete/search as full read-modify-write cycles over pages
//! - Enforce primary key uniqueness
//! - Report every attempt to the audit log

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::audit::{AuditEntry, AuditOutcome, AuditSink};
use crate::command::Command;
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::page::{Page, PageReader, Record};
use crate::schema::{Schema, SchemaRegistry};
use crate::storage::{self, TypeFileLayout, WriteOptions};

/// The record store
///
/// ## Concurrency Model
///
/// - **Registry**: `RwLock`; a declaration holds the write lock across
///   validation, the header write and registration. Everything else reads.
/// - **Type files**: one `Mutex` per declared type, held for the whole
///   read-decode-mutate-encode-write cycle of an operation. Operations on
///   different types run in parallel; operations on one type are serialized.
///
/// The registry lock and a type lock are never held at the same time.
pub struct RecordStore {
    /// Store configuration
    config: Config,

    /// Type name → backing file
    layout: TypeFileLayout,

    /// Declared schemas
    registry: RwLock<SchemaRegistry>,

    /// Per-type locks, created on first use of a declared type
    type_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,

    /// Where every outcome is reported
    audit: Box<dyn AuditSink>,
}

impl RecordStore {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const TYPES_DIR: &'static str = "types";

    /// Open a store with the given config
    ///
    /// Creates the data directory and its `types/` subdirectory, which holds
    /// nothing but type files. The registry starts empty; types must be
    /// declared again in every process.
    pub fn open(config: Config, audit: Box<dyn AuditSink>) -> Result<Self> {
        if config.page_size == 0 {
            return Err(StoreError::Config("page_size must be at least 1".to_string()));
        }

        let types_dir = config.data_dir.join(Self::TYPES_DIR);
        fs::create_dir_all(&types_dir)?;
        let layout = TypeFileLayout::new(types_dir);

        tracing::info!(
            data_dir = %config.data_dir.display(),
            page_size = config.page_size,
            "record store opened"
        );

        Ok(Self {
            config,
            layout,
            registry: RwLock::new(SchemaRegistry::new()),
            type_locks: Mutex::new(HashMap::new()),
            audit,
        })
    }

    /// Execute a command
    ///
    /// Routes commands to the matching operation; only a successful search
    /// returns a record.
    pub fn execute(&self, command: Command) -> Result<Option<Record>> {
        let description = command.to_string();

        match command {
            Command::CreateType {
                name,
                field_count,
                primary_key_ordinal,
                fields,
            } => {
                // Ordinal 0 has no field; map it past the end so validation rejects it.
                let index = primary_key_ordinal.checked_sub(1).unwrap_or(usize::MAX);
                let result = self.declare_inner(&name, field_count, index, fields);
                self.audited(description, result).map(|_| None)
            }
            Command::CreateRecord { type_name, values } => {
                let result = self.create_inner(&type_name, values);
                self.audited(description, result).map(|_| None)
            }
            Command::DeleteRecord { type_name, key } => {
                let result = self.delete_inner(&type_name, &key);
                self.audited(description, result).map(|_| None)
            }
            Command::SearchRecord { type_name, key } => {
                let result = self.search_inner(&type_name, &key);
                self.audited(description, result).map(Some)
            }
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Declare a new record type
    ///
    /// On success the type file is created with only the header row,
    /// replacing any file already at that location.
    pub fn declare_type(
        &self,
        name: &str,
        field_count: usize,
        primary_key_index: usize,
        fields: Vec<String>,
    ) -> Result<Schema> {
        let description = Command::CreateType {
            name: name.to_string(),
            field_count,
            primary_key_ordinal: primary_key_index.saturating_add(1),
            fields: fields.clone(),
        }
        .to_string();

        let result = self.declare_inner(name, field_count, primary_key_index, fields);
        self.audited(description, result)
    }

    /// Insert a record
    ///
    /// Steps:
    /// 1. Acquire the type lock
    /// 2. Decode all pages, rejecting a duplicate primary key
    /// 3. Append and rewrite every page
    pub fn create_record(&self, type_name: &str, values: Vec<String>) -> Result<()> {
        let description = Command::CreateRecord {
            type_name: type_name.to_string(),
            values: values.clone(),
        }
        .to_string();

        let result = self.create_inner(type_name, values);
        self.audited(description, result)
    }

    /// Delete every record whose primary key equals `key`
    pub fn delete_record(&self, type_name: &str, key: &str) -> Result<()> {
        let description = Command::DeleteRecord {
            type_name: type_name.to_string(),
            key: key.to_string(),
        }
        .to_string();

        let result = self.delete_inner(type_name, key);
        self.audited(description, result)
    }

    /// Find the first record whose primary key equals `key`
    ///
    /// Scans pages in file order and stops at the first match; never writes.
    pub fn search_record(&self, type_name: &str, key: &str) -> Result<Record> {
        let description = Command::SearchRecord {
            type_name: type_name.to_string(),
            key: key.to_string(),
        }
        .to_string();

        let result = self.search_inner(type_name, key);
        self.audited(description, result)
    }

    // =========================================================================
    // Inspection (not audited)
    // =========================================================================

    /// All records of a type, in stored order
    pub fn records(&self, type_name: &str) -> Result<Vec<Record>> {
        let (schema, lock) = self.locked_schema(type_name)?;
        let _guard = lock.lock();

        storage::read_records(&self.layout.type_file(type_name), &schema)
    }

    /// All pages of a type, as laid out on disk
    pub fn pages(&self, type_name: &str) -> Result<Vec<Page>> {
        let (_schema, lock) = self.locked_schema(type_name)?;
        let _guard = lock.lock();

        PageReader::open(&self.layout.type_file(type_name))?.collect()
    }

    /// Schema of a declared type
    pub fn schema(&self, type_name: &str) -> Option<Schema> {
        self.registry.read().lookup(type_name).cloned()
    }

    /// Declared type names, sorted
    pub fn type_names(&self) -> Vec<String> {
        self.registry.read().names()
    }

    /// Backing file of a type (declared or not)
    pub fn type_file(&self, type_name: &str) -> PathBuf {
        self.layout.type_file(type_name)
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Directory holding the type files
    pub fn types_dir(&self) -> &Path {
        self.layout.dir()
    }

    /// Audit a request that never reached an operation, such as a script
    /// line that does not parse
    pub fn record_rejected(&self, request: &str, error: &StoreError) {
        tracing::debug!(request, error = %error, "request rejected before execution");
        self.write_audit(AuditEntry::new(request.trim(), AuditOutcome::Failure));
    }

    /// Number of per-type locks allocated so far
    pub fn lock_count(&self) -> usize {
        self.type_locks.lock().len()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn declare_inner(
        &self,
        name: &str,
        field_count: usize,
        primary_key_index: usize,
        fields: Vec<String>,
    ) -> Result<Schema> {
        // Held across validation, header write and registration; a failed
        // write registers nothing.
        let mut registry = self.registry.write();
        let schema = registry.validate(name, field_count, primary_key_index, fields)?;

        let path = self.layout.type_file(name);
        if path == self.config.audit_log_path() {
            return Err(StoreError::InvalidSchema(format!(
                "type '{}' would overwrite the audit log",
                name
            )));
        }

        storage::rewrite(&path, &schema.fields, &[], self.write_options())?;
        registry.insert(schema.clone());
        drop(registry);

        tracing::info!(
            type_name = name,
            fields = schema.arity(),
            primary_key = schema.primary_key_field(),
            "type declared"
        );
        Ok(schema)
    }

    fn create_inner(&self, type_name: &str, values: Vec<String>) -> Result<()> {
        let (schema, lock) = self.locked_schema(type_name)?;
        let _guard = lock.lock();

        if values.len() != schema.arity() {
            return Err(StoreError::InvalidRecord {
                type_name: type_name.to_string(),
                expected: schema.arity(),
                actual: values.len(),
            });
        }

        let path = self.layout.type_file(type_name);
        let mut records = storage::read_records(&path, &schema)?;

        let key = &values[schema.primary_key_index];
        if records
            .iter()
            .any(|r| schema.key_of(r) == Some(key.as_str()))
        {
            return Err(StoreError::DuplicateKey {
                type_name: type_name.to_string(),
                key: key.clone(),
            });
        }

        records.push(values);
        let summary = storage::rewrite(&path, &schema.fields, &records, self.write_options())?;

        tracing::debug!(
            type_name,
            records = summary.records,
            pages = summary.pages,
            "record created"
        );
        Ok(())
    }

    fn delete_inner(&self, type_name: &str, key: &str) -> Result<()> {
        let (schema, lock) = self.locked_schema(type_name)?;
        let _guard = lock.lock();

        let path = self.layout.type_file(type_name);
        let mut records = storage::read_records(&path, &schema)?;

        let before = records.len();
        records.retain(|r| schema.key_of(r) != Some(key));
        let removed = before - records.len();

        if removed == 0 {
            return Err(StoreError::NotFound {
                type_name: type_name.to_string(),
                key: key.to_string(),
            });
        }
        if removed > 1 {
            tracing::warn!(type_name, key, removed, "duplicate primary keys found on delete");
        }

        let summary = storage::rewrite(&path, &schema.fields, &records, self.write_options())?;

        tracing::debug!(
            type_name,
            records = summary.records,
            pages = summary.pages,
            "record deleted"
        );
        Ok(())
    }

    fn search_inner(&self, type_name: &str, key: &str) -> Result<Record> {
        let (schema, lock) = self.locked_schema(type_name)?;
        let _guard = lock.lock();

        let path = self.layout.type_file(type_name);

        for page in PageReader::open(&path)? {
            let page = page?;
            for record in page.records {
                storage::check_arity(&schema, &record, page.number)?;
                if schema.key_of(&record) == Some(key) {
                    return Ok(record);
                }
            }
        }

        Err(StoreError::NotFound {
            type_name: type_name.to_string(),
            key: key.to_string(),
        })
    }

    /// Report `result` to the audit sink and hand it back unchanged
    fn audited<T>(&self, description: String, result: Result<T>) -> Result<T> {
        let outcome = match &result {
            Ok(_) => AuditOutcome::Success,
            Err(_) => AuditOutcome::Failure,
        };

        if let Err(e) = &result {
            tracing::debug!(operation = %description, error = %e, "operation failed");
        }

        self.write_audit(AuditEntry::new(description, outcome));
        result
    }

    fn write_audit(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.record(&entry) {
            tracing::error!(
                operation = %entry.operation,
                error = %e,
                "failed to write audit entry"
            );
        }
    }

    /// Schema and lock of a declared type
    ///
    /// Schemas are never removed or replaced, so the lookup may precede
    /// taking the lock. Unknown names never get a lock entry.
    fn locked_schema(&self, type_name: &str) -> Result<(Schema, Arc<Mutex<()>>)> {
        let schema = self
            .registry
            .read()
            .lookup(type_name)
            .cloned()
            .ok_or_else(|| StoreError::UnknownType(type_name.to_string()))?;

        let mut locks = self.type_locks.lock();
        let lock = Arc::clone(locks.entry(type_name.to_string()).or_default());
        Ok((schema, lock))
    }

    fn write_options(&self) -> WriteOptions {
        WriteOptions {
            page_size: self.config.page_size,
            sync: self.config.sync_writes,
        }
    }
}
