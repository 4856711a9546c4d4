pub mod column_def;
pub mod row;
pub mod rows;
pub mod schema;
pub mod table_def;

pub use column_def::{ColumnDef, ID_COLUMN};
pub use row::Record;
pub use rows::RowCollection;
pub use schema::TableSchema;
pub use table_def::TableDef;
