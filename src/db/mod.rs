pub mod cache;
pub mod database;
pub mod engine;
pub mod predicate;
pub mod table;
