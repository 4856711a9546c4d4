pub mod schema_registry;

pub use schema_registry::SchemaRegistry;
