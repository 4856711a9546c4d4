//! Runtime configuration.
//!
//! Settings come from an optional JSON file and are then overridden by
//! command-line arguments in the binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::DatabaseError;

/// Scribe configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `db_meta.json` and the `data/` table files.
    pub data_dir: PathBuf,

    /// Keep the results of repeated identical selects in memory.
    pub cache_enabled: bool,

    /// Ask for `y/n` before `drop_table` and `delete`.
    pub confirm_destructive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            cache_enabled: true,
            confirm_destructive: true,
        }
    }
}

impl Config {
    /// Reads a config file. Keys missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, DatabaseError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
