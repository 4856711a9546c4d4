use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    DatabaseError,
    db::table::{ColumnDef, TableDef, TableSchema, table_def::validate_table_name},
};

/// Registry of every table's schema, in creation order.
///
/// Schemas are never altered in place: a table is either created whole or
/// dropped whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    tables: Vec<TableDef>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new table and returns its full schema, `ID` first.
    ///
    /// # Errors
    ///
    /// - [`DatabaseError::InvalidTableName`] for names unusable as file names.
    /// - [`DatabaseError::DuplicateTable`] if `name` is already registered.
    /// - [`DatabaseError::InvalidColumn`] for an empty, reserved or repeated
    ///   column name, or an empty column list.
    ///
    /// The registry is left untouched on failure.
    pub fn create_table(
        &mut self,
        name: &str,
        columns: Vec<ColumnDef>,
    ) -> Result<&TableSchema, DatabaseError> {
        validate_table_name(name)?;

        if self.contains(name) {
            return Err(DatabaseError::DuplicateTable(name.to_owned()));
        }

        let schema = TableSchema::with_implicit_id(columns)?;
        self.tables.push(TableDef::new(name.to_owned(), schema));

        Ok(&self.tables[self.tables.len() - 1].schema)
    }

    /// Removes a table's schema.
    ///
    /// Fails with [`DatabaseError::UnknownTable`] if the table is absent.
    pub fn drop_table(&mut self, name: &str) -> Result<TableDef, DatabaseError> {
        let position = self
            .tables
            .iter()
            .position(|table| table.name == name)
            .ok_or_else(|| DatabaseError::UnknownTable(name.to_owned()))?;

        Ok(self.tables.remove(position))
    }

    /// Table names in creation order.
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.iter().map(TableDef::name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables
            .iter()
            .find(|table| table.name == name)
            .map(TableDef::schema)
    }

    /// Like [`SchemaRegistry::get`] but fails with
    /// [`DatabaseError::UnknownTable`].
    pub fn schema(&self, name: &str) -> Result<&TableSchema, DatabaseError> {
        self.get(name)
            .ok_or_else(|| DatabaseError::UnknownTable(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Persisted as `{ table: { column: type, ... }, ... }`.
impl Serialize for SchemaRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Columns<'a>(&'a TableSchema);

        impl Serialize for Columns<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.columns().len()))?;
                for column in self.0.columns() {
                    map.serialize_entry(&column.name, column.data_type.as_ref())?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for table in &self.tables {
            map.serialize_entry(&table.name, &Columns(&table.schema))?;
        }
        map.end()
    }
}
