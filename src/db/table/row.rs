use serde::{Serialize, Serializer, ser::SerializeMap};

use super::column_def::ID_COLUMN;
use crate::core::types::Value;

/// One record of a table, keyed by column name.
///
/// Fields keep the order they were written in, which for engine-created
/// records is the schema's column order. Records loaded from older files
/// may lack columns, including `ID`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the value stored under `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Stores `value` under `column`, replacing any previous value.
    pub fn set(&mut self, column: &str, value: Value) {
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column.to_owned(), value)),
        }
    }

    /// The record's `ID`, if present and an integer.
    pub fn id(&self) -> Option<i64> {
        self.get(ID_COLUMN).and_then(Value::as_integer)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            let name: String = name.into();
            record.set(&name, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
