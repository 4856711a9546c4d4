//! Scribe DB: a small file-backed table store.
//!
//! Tables have typed columns (`int`, `str`, `bool`) plus an implicit
//! auto-incrementing `ID`. Records are inserted, selected, updated and
//! deleted through the table engine in [`db::engine`], wrapped by
//! [`Database`], which loads state from a [`storage::Storage`] before each
//! command and saves it afterwards.

pub mod catalog;
pub mod common;
pub(crate) mod core;
pub mod db;
pub mod shell;
pub mod sql;
pub mod storage;

pub use catalog::SchemaRegistry;
pub use common::{config::Config, error::DatabaseError};
pub use crate::core::types::{DataType, Value};
pub use db::{
    database::{Database, Outcome, QueryResponse, TableInfo},
    predicate::Predicate,
    table::*,
};
