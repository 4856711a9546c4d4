//! Persistence for the schema registry and per-table record collections.
//!
//! Loading never fails: missing or unreadable state comes back empty, and
//! the next successful save replaces it.

use crate::{
    DatabaseError,
    catalog::SchemaRegistry,
    db::table::RowCollection,
};

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

/// Where schemas and records live between commands.
pub trait Storage {
    /// Loads the registry, or an empty one if nothing usable is stored.
    fn load_registry(&self) -> SchemaRegistry;

    /// Replaces the stored registry.
    fn save_registry(&mut self, registry: &SchemaRegistry) -> Result<(), DatabaseError>;

    /// Loads a table's records, or an empty collection if nothing usable is
    /// stored.
    fn load_rows(&self, table: &str) -> RowCollection;

    /// Replaces a table's stored records.
    fn save_rows(&mut self, table: &str, rows: &RowCollection) -> Result<(), DatabaseError>;

    /// Creates the (empty) record storage for a new table.
    fn create_rows(&mut self, table: &str) -> Result<(), DatabaseError> {
        self.save_rows(table, &RowCollection::new())
    }

    /// Deletes a table's record storage. Missing storage is not an error.
    fn drop_rows(&mut self, table: &str) -> Result<(), DatabaseError>;
}
