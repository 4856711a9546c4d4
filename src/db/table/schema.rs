use std::collections::HashSet;

use super::column_def::{ColumnDef, ID_COLUMN};
use crate::DatabaseError;

/// A table schema defining the structure of records.
///
/// A schema is an ordered list of column definitions that always starts with
/// the implicit `ID:int` column. The only way to build one is
/// [`TableSchema::with_implicit_id`], which validates the caller's columns
/// and prepends `ID`, so the invariant holds for every table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Validates caller-supplied columns and prepends `ID:int`.
    ///
    /// Fails with [`DatabaseError::InvalidColumn`] if the list is empty, or if
    /// a name is empty, reserved (`ID`) or repeated.
    pub fn with_implicit_id(columns: Vec<ColumnDef>) -> Result<Self, DatabaseError> {
        if columns.is_empty() {
            return Err(DatabaseError::invalid_column(
                "",
                "a table needs at least one column besides ID",
            ));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.name.is_empty() {
                return Err(DatabaseError::invalid_column(
                    &column.name,
                    "column name cannot be empty",
                ));
            }
            if column.name == ID_COLUMN {
                return Err(DatabaseError::invalid_column(
                    &column.name,
                    "ID is reserved and added automatically",
                ));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(DatabaseError::invalid_column(
                    &column.name,
                    "duplicate column name",
                ));
            }
        }

        let mut full = Vec::with_capacity(columns.len() + 1);
        full.push(ColumnDef::id());
        full.extend(columns);

        Ok(Self { columns: full })
    }

    /// All columns, `ID` first.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// The caller-declared columns, in declaration order.
    pub fn non_id_columns(&self) -> &[ColumnDef] {
        &self.columns[1..]
    }

    /// Finds a column definition by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|col| col.name.as_str())
    }
}

impl std::fmt::Display for TableSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, column) in self.columns.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{column}")?;
        }
        Ok(())
    }
}
