//! Command Module
//!
//! Line-oriented command scripts.
//!
//! ## Grammar
//! One command per line, tokens separated by whitespace:
//! ```text
//! create type <name> <fieldCount> <primaryKeyOrdinal> <field>...
//! create record <name> <value>...
//! delete record <name> <primaryKey>
//! search record <name> <primaryKey>
//! ```
//! `primaryKeyOrdinal` is 1-based.

mod script;

pub use script::{RunSummary, ScriptRunner};

use std::fmt;

use crate::error::{Result, StoreError};

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Declare a new record type
    CreateType {
        name: String,
        field_count: usize,
        primary_key_ordinal: usize,
        fields: Vec<String>,
    },

    /// Insert a record
    CreateRecord {
        type_name: String,
        values: Vec<String>,
    },

    /// Delete the record with the given primary key
    DeleteRecord { type_name: String, key: String },

    /// Look up the record with the given primary key
    SearchRecord { type_name: String, key: String },
}

impl Command {
    /// Parse one script line
    pub fn parse(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            ["create", "type", name, field_count, ordinal, fields @ ..] => {
                Ok(Command::CreateType {
                    name: name.to_string(),
                    field_count: parse_number(field_count, "field count")?,
                    primary_key_ordinal: parse_number(ordinal, "primary key ordinal")?,
                    fields: to_strings(fields),
                })
            }
            ["create", "record", type_name, values @ ..] => Ok(Command::CreateRecord {
                type_name: type_name.to_string(),
                values: to_strings(values),
            }),
            ["delete", "record", type_name, key] => Ok(Command::DeleteRecord {
                type_name: type_name.to_string(),
                key: key.to_string(),
            }),
            ["search", "record", type_name, key] => Ok(Command::SearchRecord {
                type_name: type_name.to_string(),
                key: key.to_string(),
            }),
            _ => Err(StoreError::Parse(format!("unrecognized command: '{}'", line.trim()))),
        }
    }

    /// Type the command operates on
    pub fn type_name(&self) -> &str {
        match self {
            Command::CreateType { name, .. } => name,
            Command::CreateRecord { type_name, .. }
            | Command::DeleteRecord { type_name, .. }
            | Command::SearchRecord { type_name, .. } => type_name,
        }
    }
}

fn parse_number(token: &str, what: &str) -> Result<usize> {
    token
        .parse()
        .map_err(|_| StoreError::Parse(format!("invalid {}: '{}'", what, token)))
}

fn to_strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

/// Renders the canonical script line; used as the audit description.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::CreateType {
                name,
                field_count,
                primary_key_ordinal,
                fields,
            } => {
                write!(f, "create type {} {} {}", name, field_count, primary_key_ordinal)?;
                for field in fields {
                    write!(f, " {}", field)?;
                }
                Ok(())
            }
            Command::CreateRecord { type_name, values } => {
                write!(f, "create record {}", type_name)?;
                for value in values {
                    write!(f, " {}", value)?;
                }
                Ok(())
            }
            Command::DeleteRecord { type_name, key } => {
                write!(f, "delete record {} {}", type_name, key)
            }
            Command::SearchRecord { type_name, key } => {
                write!(f, "search record {} {}", type_name, key)
            }
        }
    }
}
