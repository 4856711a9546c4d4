use std::collections::HashMap;

use super::Storage;
use crate::{DatabaseError, catalog::SchemaRegistry, db::table::RowCollection};

/// Keeps everything in memory. Used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    registry: SchemaRegistry,
    rows: HashMap<String, RowCollection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether record storage exists for `table`.
    pub fn has_rows(&self, table: &str) -> bool {
        self.rows.contains_key(table)
    }
}

impl Storage for MemoryStore {
    fn load_registry(&self) -> SchemaRegistry {
        self.registry.clone()
    }

    fn save_registry(&mut self, registry: &SchemaRegistry) -> Result<(), DatabaseError> {
        self.registry = registry.clone();
        Ok(())
    }

    fn load_rows(&self, table: &str) -> RowCollection {
        self.rows.get(table).cloned().unwrap_or_default()
    }

    fn save_rows(&mut self, table: &str, rows: &RowCollection) -> Result<(), DatabaseError> {
        self.rows.insert(table.to_owned(), rows.clone());
        Ok(())
    }

    fn drop_rows(&mut self, table: &str) -> Result<(), DatabaseError> {
        self.rows.remove(table);
        Ok(())
    }
}
