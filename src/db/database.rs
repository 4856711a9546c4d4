use std::time::Instant;

use tracing::{debug, info, warn};

use crate::{
    DatabaseError,
    core::types::Value,
    db::{
        cache::QueryCache,
        engine,
        predicate::Predicate,
        table::{ColumnDef, Record, TableSchema},
    },
    sql::statement::Command,
    storage::Storage,
};

/// Rows returned by a select, with the schema that orders their columns.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub schema: TableSchema,

    /// The matching records, in table order.
    pub rows: Vec<Record>,
}

/// Summary printed by `info`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub name: String,
    pub schema: TableSchema,
    pub row_count: usize,
}

/// What a command produced, for the shell to report.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    TableCreated { name: String, schema: TableSchema },
    TableDropped { name: String },
    Tables(Vec<String>),
    Inserted { table: String, id: i64 },
    Rows(QueryResponse),
    Updated { table: String, ids: Vec<i64> },
    Deleted { table: String, ids: Vec<i64> },
    Info(TableInfo),
    Help,
    Exit,
}

/// The main database handle.
///
/// `Database` runs each command the same way: load the registry and the
/// affected records from storage, run the engine operation, save what
/// changed, report. Nothing is kept between commands except the optional
/// select cache, which is cleared for a table whenever that table changes.
#[derive(Debug)]
pub struct Database<S: Storage> {
    storage: S,
    cache: Option<QueryCache>,
}

impl<S: Storage> Database<S> {
    /// Creates a database over `storage` with the select cache enabled.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            cache: Some(QueryCache::new()),
        }
    }

    /// Turns the select cache on or off.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(QueryCache::new);
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn invalidate(&mut self, table: &str) {
        if let Some(cache) = self.cache.as_mut() {
            cache.invalidate(table);
        }
    }

    /// Creates a table and its (empty) record storage.
    ///
    /// The record storage is written first, so a failure at either step
    /// leaves no schema behind.
    pub fn create_table(
        &mut self,
        name: &str,
        columns: Vec<ColumnDef>,
    ) -> Result<TableSchema, DatabaseError> {
        let mut registry = self.storage.load_registry();
        let schema = engine::create_table(&mut registry, name, columns)?;

        self.storage.create_rows(name)?;
        if let Err(err) = self.storage.save_registry(&registry) {
            if let Err(cleanup) = self.storage.drop_rows(name) {
                warn!(table = name, error = %cleanup, "could not remove record storage of unsaved table");
            }
            return Err(err);
        }
        self.invalidate(name);

        info!(table = name, columns = %schema, "created table");
        Ok(schema)
    }

    /// Drops a table's schema and deletes its records.
    ///
    /// Once the schema is gone the table is dropped. Record storage that
    /// cannot be removed is only logged, and is overwritten if the table is
    /// created again.
    pub fn drop_table(&mut self, name: &str) -> Result<(), DatabaseError> {
        let mut registry = self.storage.load_registry();
        engine::drop_table(&mut registry, name)?;

        self.storage.save_registry(&registry)?;
        self.invalidate(name);
        if let Err(err) = self.storage.drop_rows(name) {
            warn!(table = name, error = %err, "could not remove record storage of dropped table");
        }

        info!(table = name, "dropped table");
        Ok(())
    }

    pub fn list_tables(&self) -> Vec<String> {
        let registry = self.storage.load_registry();
        engine::list_tables(&registry)
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    pub fn info(&self, name: &str) -> Result<TableInfo, DatabaseError> {
        let registry = self.storage.load_registry();
        let schema = registry.schema(name)?.clone();
        let row_count = self.storage.load_rows(name).len();

        Ok(TableInfo {
            name: name.to_owned(),
            schema,
            row_count,
        })
    }

    /// Inserts one record and returns its ID.
    pub fn insert(&mut self, table: &str, values: Vec<Value>) -> Result<i64, DatabaseError> {
        let started = Instant::now();

        let registry = self.storage.load_registry();
        registry.schema(table)?;

        let mut rows = self.storage.load_rows(table);
        let id = engine::insert(&registry, table, &mut rows, values)?;

        self.storage.save_rows(table, &rows)?;
        self.invalidate(table);

        debug!(table, id, elapsed = ?started.elapsed(), "insert finished");
        Ok(id)
    }

    /// Returns the records matching `predicate`, serving repeated identical
    /// selects from the cache.
    pub fn select(
        &mut self,
        table: &str,
        predicate: Option<&Predicate>,
    ) -> Result<QueryResponse, DatabaseError> {
        let started = Instant::now();

        let registry = self.storage.load_registry();
        let schema = registry.schema(table)?.clone();

        if let Some(rows) = self
            .cache
            .as_ref()
            .and_then(|cache| cache.get(table, predicate))
        {
            debug!(table, elapsed = ?started.elapsed(), "select served from cache");
            return Ok(QueryResponse {
                schema,
                rows: rows.to_vec(),
            });
        }

        let collection = self.storage.load_rows(table);
        let rows: Vec<Record> = engine::select(&collection, predicate).cloned().collect();

        if let Some(cache) = self.cache.as_mut() {
            cache.insert(table, predicate, rows.clone());
        }

        debug!(
            table,
            filter = %predicate.map(Predicate::to_string).unwrap_or_default(),
            matched = rows.len(),
            elapsed = ?started.elapsed(),
            "select finished"
        );
        Ok(QueryResponse { schema, rows })
    }

    /// Updates the matching records and returns their IDs.
    pub fn update(
        &mut self,
        table: &str,
        assignments: &[(String, Value)],
        predicate: Option<&Predicate>,
    ) -> Result<Vec<i64>, DatabaseError> {
        let registry = self.storage.load_registry();
        let schema = registry.schema(table)?;

        let mut rows = self.storage.load_rows(table);
        let ids = engine::update(schema, &mut rows, assignments, predicate)?;

        self.storage.save_rows(table, &rows)?;
        self.invalidate(table);

        debug!(table, updated = ids.len(), "update finished");
        Ok(ids)
    }

    /// Deletes the matching records and returns their IDs.
    pub fn delete(
        &mut self,
        table: &str,
        predicate: Option<&Predicate>,
    ) -> Result<Vec<i64>, DatabaseError> {
        let registry = self.storage.load_registry();
        registry.schema(table)?;

        let mut rows = self.storage.load_rows(table);
        let ids = engine::delete(&mut rows, predicate);

        self.storage.save_rows(table, &rows)?;
        self.invalidate(table);

        debug!(table, deleted = ids.len(), "delete finished");
        Ok(ids)
    }

    /// Runs one parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, DatabaseError> {
        let outcome = match command {
            Command::CreateTable { name, columns } => {
                let schema = self.create_table(&name, columns)?;
                Outcome::TableCreated { name, schema }
            }
            Command::DropTable { name } => {
                self.drop_table(&name)?;
                Outcome::TableDropped { name }
            }
            Command::ListTables => Outcome::Tables(self.list_tables()),
            Command::Insert { table, values } => {
                let id = self.insert(&table, values)?;
                Outcome::Inserted { table, id }
            }
            Command::Select { table, predicate } => {
                Outcome::Rows(self.select(&table, predicate.as_ref())?)
            }
            Command::Update {
                table,
                assignments,
                predicate,
            } => {
                let ids = self.update(&table, &assignments, Some(&predicate))?;
                Outcome::Updated { table, ids }
            }
            Command::Delete { table, predicate } => {
                let ids = self.delete(&table, Some(&predicate))?;
                Outcome::Deleted { table, ids }
            }
            Command::Info { table } => Outcome::Info(self.info(&table)?),
            Command::Help => Outcome::Help,
            Command::Exit => Outcome::Exit,
        };

        Ok(outcome)
    }
}
