//! JSON files on disk.
//!
//! Layout under the data directory:
//! - `db_meta.json`: `{ table: { column: type, ... }, ... }`
//! - `data/<table>.json`: `{ "last_id": n, "rows": [ { column: value }, ... ] }`
//!
//! A bare array of records is also accepted when loading a table file.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};

use super::Storage;
use crate::{
    DatabaseError,
    catalog::SchemaRegistry,
    core::types::Value,
    db::table::{ColumnDef, ID_COLUMN, Record, RowCollection},
};

const METADATA_FILE: &str = "db_meta.json";
const DATA_DIR: &str = "data";

/// File-backed storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Creates a store rooted at `root`. Nothing is touched on disk until
    /// the first save.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(METADATA_FILE)
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(DATA_DIR).join(format!("{table}.json"))
    }
}

impl Storage for JsonStore {
    fn load_registry(&self) -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();

        let Some(json) = read_json(&self.metadata_path()) else {
            return registry;
        };
        let JsonValue::Object(tables) = json else {
            warn!(path = %self.metadata_path().display(), "metadata is not an object, starting empty");
            return registry;
        };

        for (name, columns) in tables {
            let Some(columns) = columns.as_object() else {
                warn!(table = %name, "skipping table with malformed column list");
                continue;
            };

            let restored = columns_from_json(columns)
                .and_then(|columns| registry.create_table(&name, columns).map(|_| ()));
            if let Err(err) = restored {
                warn!(table = %name, error = %err, "skipping table with invalid schema");
            }
        }

        registry
    }

    fn save_registry(&mut self, registry: &SchemaRegistry) -> Result<(), DatabaseError> {
        write_json(&self.metadata_path(), registry)
    }

    fn load_rows(&self, table: &str) -> RowCollection {
        let path = self.table_path(table);

        let (rows, last_id) = match read_json(&path) {
            Some(JsonValue::Array(rows)) => (rows, 0),
            Some(JsonValue::Object(mut body)) => {
                let last_id = body
                    .get("last_id")
                    .and_then(JsonValue::as_i64)
                    .unwrap_or(0);
                match body.remove("rows") {
                    Some(JsonValue::Array(rows)) => (rows, last_id),
                    _ => {
                        warn!(path = %path.display(), "table file has no rows array, starting empty");
                        return RowCollection::new();
                    }
                }
            }
            Some(_) => {
                warn!(path = %path.display(), "table file is not an array or object, starting empty");
                return RowCollection::new();
            }
            None => return RowCollection::new(),
        };

        let records = rows
            .into_iter()
            .filter_map(|row| match row {
                JsonValue::Object(fields) => Some(record_from_json(fields)),
                other => {
                    warn!(table, row = %other, "skipping non-object row");
                    None
                }
            })
            .collect();

        RowCollection::from_records(records, last_id)
    }

    fn save_rows(&mut self, table: &str, rows: &RowCollection) -> Result<(), DatabaseError> {
        write_json(&self.table_path(table), rows)
    }

    fn drop_rows(&mut self, table: &str) -> Result<(), DatabaseError> {
        match fs::remove_file(self.table_path(table)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Reads and parses a JSON file. Every failure is logged and mapped to
/// `None`.
fn read_json(path: &Path) -> Option<JsonValue> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no file yet");
            return None;
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "unreadable file, treating as empty");
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(json) => Some(json),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "malformed JSON, treating as empty");
            None
        }
    }
}

/// Rewrites `path` in full through a temporary sibling file.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DatabaseError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;

    debug!(path = %path.display(), "saved");
    Ok(())
}

fn columns_from_json(columns: &Map<String, JsonValue>) -> Result<Vec<ColumnDef>, DatabaseError> {
    columns
        .iter()
        .filter(|(name, _)| name.as_str() != ID_COLUMN)
        .map(|(name, type_name)| ColumnDef::typed(name, type_name.as_str().unwrap_or_default()))
        .collect()
}

fn record_from_json(fields: Map<String, JsonValue>) -> Record {
    let mut record = Record::new();

    for (name, json) in fields {
        let value = match json {
            JsonValue::Bool(b) => Value::Boolean(b),
            JsonValue::String(s) => Value::Text(s),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => {
                    warn!(column = %name, number = %n, "dropping non-integer number");
                    continue;
                }
            },
            other => {
                warn!(column = %name, value = %other, "dropping unsupported value");
                continue;
            }
        };
        record.set(&name, value);
    }

    record
}
