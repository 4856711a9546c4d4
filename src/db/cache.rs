use std::collections::HashMap;

use crate::{
    core::types::Value,
    db::{predicate::Predicate, table::Record},
};

type CacheKey = (String, Vec<(String, Value)>);

/// Process-local cache of select results keyed by table and predicate
/// conditions.
///
/// An absent predicate and an empty one share an entry. Entries for a table
/// must be dropped whenever that table is written to.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<CacheKey, Vec<Record>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(table: &str, predicate: Option<&Predicate>) -> CacheKey {
        let conditions = predicate
            .map(|p| p.conditions().to_vec())
            .unwrap_or_default();
        (table.to_owned(), conditions)
    }

    pub fn get(&self, table: &str, predicate: Option<&Predicate>) -> Option<&[Record]> {
        self.entries
            .get(&Self::key(table, predicate))
            .map(Vec::as_slice)
    }

    pub fn insert(&mut self, table: &str, predicate: Option<&Predicate>, rows: Vec<Record>) {
        self.entries.insert(Self::key(table, predicate), rows);
    }

    /// Drops every cached result for `table`.
    pub fn invalidate(&mut self, table: &str) {
        self.entries.retain(|(cached, _), _| cached != table);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
