use std::str::FromStr;

use crate::{DatabaseError, core::types::DataType};

/// Name of the implicit identity column every table starts with.
pub const ID_COLUMN: &str = "ID";

/// Definition of a single column in a table schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// The column name.
    pub name: String,

    /// The data type for values in this column.
    pub data_type: DataType,
}

impl ColumnDef {
    /// Creates a new column definition.
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_owned(),
            data_type,
        }
    }

    /// Builds a definition from a name and a type token such as `"int"`.
    pub fn typed(name: &str, type_name: &str) -> Result<Self, DatabaseError> {
        let data_type = type_name.parse::<DataType>().map_err(|_| {
            DatabaseError::invalid_column(
                name,
                format!("unsupported type \"{type_name}\", expected one of int, str, bool"),
            )
        })?;

        Ok(Self::new(name, data_type))
    }

    pub(crate) fn id() -> Self {
        Self::new(ID_COLUMN, DataType::Int)
    }
}

impl FromStr for ColumnDef {
    type Err = DatabaseError;

    /// Parses the `<name>:<type>` form used by `create_table`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((name, type_name)) = s.split_once(':') else {
            return Err(DatabaseError::invalid_column(
                s,
                "expected the form <name>:<type>",
            ));
        };

        Self::typed(name.trim(), type_name.trim())
    }
}

impl std::fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.data_type)
    }
}
