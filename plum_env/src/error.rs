//! Error types for PLUM inputs and configuration.

use thiserror::Error;

/// Errors raised while validating inputs, before any event is scheduled.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Input file could not be opened or read
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A row of an input table could not be parsed
    #[error("Malformed row {row} in {table} table: {reason}")]
    MalformedRow {
        table: String,
        row: usize,
        reason: String,
    },

    /// Coordinates are not finite or outside the valid lat/lon range
    #[error("Invalid coordinates for '{id}' in {table} table: ({latitude}, {longitude})")]
    InvalidCoordinate {
        table: String,
        id: String,
        latitude: f64,
        longitude: f64,
    },

    /// Row has an empty id
    #[error("Empty id at row {row} in {table} table")]
    EmptyId { table: String, row: usize },

    /// The same id appears twice in one table
    #[error("Duplicate id '{id}' in {table} table")]
    DuplicateId { table: String, id: String },

    /// Table has no rows
    #[error("The {0} table is empty")]
    EmptyTable(String),

    /// A simulation parameter is out of its valid domain
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl ConfigError {
    /// Creates a malformed-row error.
    pub fn malformed(table: impl Into<String>, row: usize, reason: impl std::fmt::Display) -> Self {
        Self::MalformedRow {
            table: table.into(),
            row,
            reason: reason.to_string(),
        }
    }

    /// Creates an invalid-parameter error.
    pub fn parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter { name, value, reason }
    }
}
