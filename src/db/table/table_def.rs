use super::schema::TableSchema;
use crate::{
    DatabaseError,
    sql::{
        keyword::Keyword,
        lexer::{is_identifier_char, is_identifier_start},
    },
};

/// A table with a name and schema.
///
/// Record data lives separately in a [`RowCollection`](super::rows::RowCollection)
/// that the storage layer loads on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    /// The table name.
    pub(crate) name: String,

    /// The table's schema defining its columns.
    pub(crate) schema: TableSchema,
}

impl TableDef {
    /// Creates a new table definition with the given name and schema.
    pub fn new(name: String, schema: TableSchema) -> Self {
        Self { name, schema }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }
}

/// Table names double as file names and must be written back as a single
/// name token, so they follow the command language's identifier rule and
/// cannot be a keyword.
pub(crate) fn validate_table_name(name: &str) -> Result<(), DatabaseError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(is_identifier_start)
        && chars.all(is_identifier_char)
        && name.parse::<Keyword>().is_err();

    if valid {
        Ok(())
    } else {
        Err(DatabaseError::InvalidTableName(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::lexer::{Lexer, Token};

    #[test]
    fn test_table_names() {
        assert!(validate_table_name("users").is_ok());
        assert!(validate_table_name("order_items-2024").is_ok());

        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("../etc").is_err());
        assert!(validate_table_name("a b").is_err());
        assert!(validate_table_name("2024_orders").is_err());
        assert!(validate_table_name("café").is_err());
        assert!(validate_table_name("select").is_err());
        assert!(validate_table_name("_staging").is_ok());
    }

    #[test]
    fn test_valid_names_lex_as_one_name() {
        for name in ["users", "_staging", "order_items-2024", "Info2"] {
            validate_table_name(name).unwrap();

            let tokens: Vec<Token> = Lexer::new(name)
                .map(|t| t.map(|(token, _)| token))
                .collect::<miette::Result<_>>()
                .unwrap();
            assert_eq!(tokens, vec![Token::Identifier(name)]);
        }
    }
}
