use miette::Diagnostic;
use thiserror::Error;

use crate::DataType;

/// Errors surfaced by the table engine and the storage layer.
///
/// Every engine failure leaves the registry and row collections it was
/// handed unchanged, so all variants are recoverable at the command boundary.
#[derive(Debug, Error, Diagnostic)]
pub enum DatabaseError {
    #[error("Table \"{0}\" already exists")]
    #[diagnostic(code(scribe::duplicate_table))]
    DuplicateTable(String),

    #[error("Table \"{0}\" does not exist")]
    #[diagnostic(
        code(scribe::unknown_table),
        help("Use `list_tables` to see the existing tables")
    )]
    UnknownTable(String),

    #[error("Invalid table name \"{0}\"")]
    #[diagnostic(
        code(scribe::invalid_table_name),
        help("Start with a letter or '_' and use only ASCII letters, digits, '_' and '-'. Keywords are reserved")
    )]
    InvalidTableName(String),

    #[error("Invalid column \"{column}\": {reason}")]
    #[diagnostic(code(scribe::invalid_column))]
    InvalidColumn { column: String, reason: String },

    #[error("Expected {expected} values, got {actual}")]
    #[diagnostic(code(scribe::arity_mismatch))]
    ArityMismatch { expected: usize, actual: usize },

    #[error("Invalid type for column \"{column}\": expected {expected}, got {actual}")]
    #[diagnostic(code(scribe::type_mismatch))]
    TypeMismatch {
        column: String,
        expected: DataType,
        actual: DataType,
    },

    #[error("Column \"{0}\" does not exist in the table")]
    #[diagnostic(code(scribe::unknown_column))]
    UnknownColumn(String),

    #[error("Table \"{0}\" has used up every record ID")]
    #[diagnostic(
        code(scribe::id_exhausted),
        help("Copy the records into a new table to start IDs again from 1")
    )]
    IdExhausted(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(scribe::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(scribe::serialization))]
    Serialization(#[from] serde_json::Error),
}

impl DatabaseError {
    pub(crate) fn invalid_column(column: &str, reason: impl Into<String>) -> Self {
        Self::InvalidColumn {
            column: column.to_owned(),
            reason: reason.into(),
        }
    }
}
