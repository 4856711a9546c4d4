//! Text rendering of command outcomes.

use comfy_table::{Cell, ContentArrangement, Table};

use crate::db::database::{Outcome, QueryResponse, TableInfo};

/// Renders an outcome as the text the shell prints.
pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::TableCreated { name, schema } => {
            format!("Table \"{name}\" created with columns: {schema}")
        }
        Outcome::TableDropped { name } => format!("Table \"{name}\" dropped."),
        Outcome::Tables(names) if names.is_empty() => "No tables yet.".to_string(),
        Outcome::Tables(names) => names
            .iter()
            .map(|name| format!("- {name}"))
            .collect::<Vec<_>>()
            .join("\n"),
        Outcome::Inserted { table, id } => {
            format!("Record with ID={id} added to table \"{table}\".")
        }
        Outcome::Rows(response) => render_rows(response),
        Outcome::Updated { ids, .. } if ids.is_empty() => {
            "No records matched the condition.".to_string()
        }
        Outcome::Updated { table, ids } => ids
            .iter()
            .map(|id| format!("Record with ID={id} in table \"{table}\" updated."))
            .collect::<Vec<_>>()
            .join("\n"),
        Outcome::Deleted { ids, .. } if ids.is_empty() => {
            "No records matched the condition.".to_string()
        }
        Outcome::Deleted { table, ids } => ids
            .iter()
            .map(|id| format!("Record with ID={id} deleted from table \"{table}\"."))
            .collect::<Vec<_>>()
            .join("\n"),
        Outcome::Info(info) => render_info(info),
        Outcome::Help => super::HELP.trim_end().to_string(),
        Outcome::Exit => String::new(),
    }
}

/// Formats select results as a table with one column per schema column.
pub fn render_rows(response: &QueryResponse) -> String {
    if response.rows.is_empty() {
        return "No records found.".to_string();
    }

    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_header(response.schema.column_names().map(Cell::new));

    for record in &response.rows {
        table.add_row(response.schema.column_names().map(|column| {
            record
                .get(column)
                .map(ToString::to_string)
                .unwrap_or_default()
        }));
    }

    table.to_string()
}

fn render_info(info: &TableInfo) -> String {
    format!(
        "Table: {}\nColumns: {}\nRecords: {}",
        info.name, info.schema, info.row_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DataType, Value,
        db::table::{ColumnDef, Record, TableSchema},
    };

    fn schema() -> TableSchema {
        TableSchema::with_implicit_id(vec![
            ColumnDef::new("Name", DataType::Str),
            ColumnDef::new("Age", DataType::Int),
        ])
        .unwrap()
    }

    #[test]
    fn test_render_rows() {
        let record: Record = [
            ("ID", Value::Integer(1)),
            ("Name", Value::from("Alice")),
            ("Age", Value::Integer(30)),
        ]
        .into_iter()
        .collect();

        let text = render_rows(&QueryResponse {
            schema: schema(),
            rows: vec![record],
        });

        for expected in ["ID", "Name", "Age", "Alice", "30"] {
            assert!(text.contains(expected), "missing {expected} in\n{text}");
        }
    }

    #[test]
    fn test_render_missing_field_as_blank() {
        let legacy: Record = [("Name", Value::from("Ghost"))].into_iter().collect();

        let text = render_rows(&QueryResponse {
            schema: schema(),
            rows: vec![legacy],
        });

        assert!(text.contains("Ghost"));
    }

    #[test]
    fn test_render_messages() {
        assert_eq!(render_outcome(&Outcome::Tables(vec![])), "No tables yet.");
        assert_eq!(
            render_outcome(&Outcome::Tables(vec!["a".into(), "b".into()])),
            "- a\n- b"
        );
        assert_eq!(
            render_outcome(&Outcome::Deleted {
                table: "users".into(),
                ids: vec![1, 3],
            }),
            "Record with ID=1 deleted from table \"users\".\nRecord with ID=3 deleted from table \"users\"."
        );
        assert_eq!(
            render_outcome(&Outcome::Updated {
                table: "users".into(),
                ids: vec![],
            }),
            "No records matched the condition."
        );
        assert_eq!(
            render_outcome(&Outcome::Rows(QueryResponse {
                schema: schema(),
                rows: vec![],
            })),
            "No records found."
        );
    }
}
