use crate::{
    core::types::Value,
    db::{predicate::Predicate, table::ColumnDef},
};

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `create_table <name> <col:type>...`
    CreateTable { name: String, columns: Vec<ColumnDef> },

    /// `drop_table <name>`
    DropTable { name: String },

    /// `list_tables`
    ListTables,

    /// `insert into <name> values (<value>, ...)`
    Insert { table: String, values: Vec<Value> },

    /// `select from <name> [where <col>=<val> [and ...]]`
    Select {
        table: String,
        predicate: Option<Predicate>,
    },

    /// `update <name> set <col>=<val>[, ...] where <col>=<val> [and ...]`
    Update {
        table: String,
        assignments: Vec<(String, Value)>,
        predicate: Predicate,
    },

    /// `delete from <name> where <col>=<val> [and ...]`
    Delete { table: String, predicate: Predicate },

    /// `info <name>`
    Info { table: String },

    Help,
    Exit,
}

impl Command {
    /// Whether the shell should ask before running this command.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Command::DropTable { .. } | Command::Delete { .. })
    }
}
