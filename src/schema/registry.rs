//! Schema Registry
//!
//! In-memory map from type name to schema. Nothing here touches disk.

use std::collections::HashMap;

use crate::error::{Result, StoreError};

use super::{Schema, MAX_FIELDS, MAX_FIELD_NAME_LEN, MAX_TYPE_NAME_LEN};

/// Registered schemas, keyed by type name
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a new type
    ///
    /// `field_count` is stored as given; only the supplied `fields` are
    /// checked against the limits.
    pub fn declare(
        &mut self,
        name: &str,
        field_count: usize,
        primary_key_index: usize,
        fields: Vec<String>,
    ) -> Result<&Schema> {
        let schema = self.validate(name, field_count, primary_key_index, fields)?;
        Ok(self.insert(schema))
    }

    /// Build the schema a declaration would register, without registering it
    pub fn validate(
        &self,
        name: &str,
        field_count: usize,
        primary_key_index: usize,
        fields: Vec<String>,
    ) -> Result<Schema> {
        check_limits(name, primary_key_index, &fields)?;

        if self.schemas.contains_key(name) {
            return Err(StoreError::DuplicateType(name.to_string()));
        }

        Ok(Schema {
            name: name.to_string(),
            fields,
            declared_field_count: field_count,
            primary_key_index,
        })
    }

    /// Register a schema from `validate`; an existing entry is kept
    pub fn insert(&mut self, schema: Schema) -> &Schema {
        self.schemas.entry(schema.name.clone()).or_insert(schema)
    }

    /// Look up a type by name
    pub fn lookup(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered type names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.keys().cloned().collect();
        names.sort();
        names
    }
}

fn check_limits(name: &str, primary_key_index: usize, fields: &[String]) -> Result<()> {
    let name_len = name.chars().count();
    if name_len == 0 {
        return Err(StoreError::InvalidSchema("type name is empty".to_string()));
    }
    if name_len > MAX_TYPE_NAME_LEN {
        return Err(StoreError::InvalidSchema(format!(
            "type name '{}' is longer than {} characters",
            name, MAX_TYPE_NAME_LEN
        )));
    }

    if fields.is_empty() || fields.len() > MAX_FIELDS {
        return Err(StoreError::InvalidSchema(format!(
            "type '{}' has {} fields (allowed 1..={})",
            name,
            fields.len(),
            MAX_FIELDS
        )));
    }

    for field in fields {
        let leading = field.split_whitespace().next().unwrap_or("");
        if leading.chars().count() > MAX_FIELD_NAME_LEN {
            return Err(StoreError::InvalidSchema(format!(
                "field name '{}' is longer than {} characters",
                leading, MAX_FIELD_NAME_LEN
            )));
        }
    }

    if primary_key_index >= fields.len() {
        return Err(StoreError::InvalidSchema(format!(
            "primary key position {} is outside {} fields",
            primary_key_index.saturating_add(1),
            fields.len()
        )));
    }

    Ok(())
}
