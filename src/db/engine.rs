//! Table engine: the CRUD operations over a schema registry and row
//! collections.
//!
//! Every function here works on state handed in by the caller and keeps no
//! state of its own. On failure nothing that was passed in is modified.

use crate::{
    DatabaseError,
    catalog::SchemaRegistry,
    core::types::Value,
    db::{
        predicate::{self, Predicate},
        table::{ColumnDef, ID_COLUMN, Record, RowCollection, TableSchema},
    },
};

/// Registers a table and returns its full schema, `ID` first.
pub fn create_table(
    registry: &mut SchemaRegistry,
    name: &str,
    columns: Vec<ColumnDef>,
) -> Result<TableSchema, DatabaseError> {
    registry.create_table(name, columns).cloned()
}

/// Removes a table's schema. Deleting its records is up to the caller.
pub fn drop_table(registry: &mut SchemaRegistry, name: &str) -> Result<(), DatabaseError> {
    registry.drop_table(name).map(|_| ())
}

pub fn list_tables(registry: &SchemaRegistry) -> Vec<&str> {
    registry.list_tables()
}

/// Appends a record built from `values` and returns its new ID.
///
/// `values` holds one value per non-`ID` column in declaration order. Types
/// are checked strictly against the schema. The new ID is one above the
/// collection's high-water mark, so IDs are never reused; once `i64::MAX`
/// is taken the insert fails with [`DatabaseError::IdExhausted`].
pub fn insert(
    registry: &SchemaRegistry,
    table: &str,
    rows: &mut RowCollection,
    values: Vec<Value>,
) -> Result<i64, DatabaseError> {
    let schema = registry.schema(table)?;
    let columns = schema.non_id_columns();

    if values.len() != columns.len() {
        return Err(DatabaseError::ArityMismatch {
            expected: columns.len(),
            actual: values.len(),
        });
    }

    for (column, value) in columns.iter().zip(&values) {
        if !value.is_compatible_with(column.data_type) {
            return Err(DatabaseError::TypeMismatch {
                column: column.name.clone(),
                expected: column.data_type,
                actual: value.data_type(),
            });
        }
    }

    let id = rows
        .next_id()
        .ok_or_else(|| DatabaseError::IdExhausted(table.to_owned()))?;
    let mut record = Record::new();
    record.set(ID_COLUMN, Value::Integer(id));
    for (column, value) in columns.iter().zip(values) {
        record.set(&column.name, value);
    }
    rows.push(record);

    Ok(id)
}

/// Lazily yields the records matching `predicate`, in collection order.
pub fn select<'a>(
    rows: &'a RowCollection,
    predicate: Option<&'a Predicate>,
) -> impl Iterator<Item = &'a Record> + 'a {
    rows.iter()
        .filter(move |record| predicate::matches(record, predicate))
}

/// Applies `assignments` to every matching record and returns the updated
/// IDs in collection order.
///
/// Everything is validated before the first write, so the call either
/// updates every matching record or none:
/// - assigning `ID` fails with [`DatabaseError::InvalidColumn`];
/// - a value whose type differs from the declared column type fails with
///   [`DatabaseError::TypeMismatch`];
/// - a column missing from a matching record fails with
///   [`DatabaseError::UnknownColumn`]. Updates never add columns.
pub fn update(
    schema: &TableSchema,
    rows: &mut RowCollection,
    assignments: &[(String, Value)],
    predicate: Option<&Predicate>,
) -> Result<Vec<i64>, DatabaseError> {
    for (column, value) in assignments {
        if column == ID_COLUMN {
            return Err(DatabaseError::invalid_column(column, "ID cannot be updated"));
        }

        if let Some(def) = schema.column(column)
            && !value.is_compatible_with(def.data_type)
        {
            return Err(DatabaseError::TypeMismatch {
                column: column.clone(),
                expected: def.data_type,
                actual: value.data_type(),
            });
        }
    }

    for record in select(rows, predicate) {
        if let Some((column, _)) = assignments
            .iter()
            .find(|(column, _)| !record.contains(column))
        {
            return Err(DatabaseError::UnknownColumn(column.clone()));
        }
    }

    let mut updated = Vec::new();
    for record in rows.records_mut() {
        if !predicate::matches(record, predicate) {
            continue;
        }

        for (column, value) in assignments {
            record.set(column, value.clone());
        }

        if let Some(id) = record.id() {
            updated.push(id);
        }
    }

    Ok(updated)
}

/// Removes every matching record and returns the removed IDs in collection
/// order. Retained records keep their order.
pub fn delete(rows: &mut RowCollection, predicate: Option<&Predicate>) -> Vec<i64> {
    let mut deleted = Vec::new();

    rows.retain(|record| {
        if predicate::matches(record, predicate) {
            deleted.extend(record.id());
            false
        } else {
            true
        }
    });

    deleted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataType;

    fn users() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        create_table(
            &mut registry,
            "users",
            vec![
                ColumnDef::new("Name", DataType::Str),
                ColumnDef::new("Age", DataType::Int),
            ],
        )
        .unwrap();
        registry
    }

    fn alice_row(registry: &SchemaRegistry) -> RowCollection {
        let mut rows = RowCollection::new();
        insert(registry, "users", &mut rows, vec!["Alice".into(), Value::Integer(30)]).unwrap();
        rows
    }

    fn record(fields: &[(&str, Value)]) -> Record {
        fields.iter().cloned().collect()
    }

    #[test]
    fn test_create_table_returns_full_schema() {
        let mut registry = SchemaRegistry::new();
        let schema = create_table(
            &mut registry,
            "flags",
            vec![
                ColumnDef::new("b", DataType::Bool),
                ColumnDef::new("a", DataType::Str),
            ],
        )
        .unwrap();

        let names: Vec<&str> = schema.column_names().collect();
        assert_eq!(names, vec!["ID", "b", "a"]);
        assert_eq!(list_tables(&registry), vec!["flags"]);
    }

    #[test]
    fn test_drop_table() {
        let mut registry = users();
        drop_table(&mut registry, "users").unwrap();
        assert!(registry.is_empty());

        assert!(matches!(
            drop_table(&mut registry, "users"),
            Err(DatabaseError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_insert_scenario() {
        let registry = users();
        let mut rows = alice_row(&registry);

        assert_eq!(
            rows.records(),
            &[record(&[
                ("ID", Value::Integer(1)),
                ("Name", "Alice".into()),
                ("Age", Value::Integer(30)),
            ])]
        );

        let err = insert(
            &registry,
            "users",
            &mut rows,
            vec![Value::Integer(42), Value::Integer(30)],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DatabaseError::TypeMismatch { ref column, expected: DataType::Str, actual: DataType::Int }
                if column == "Name"
        ));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_insert_rejects_bool_for_int() {
        let registry = users();
        let mut rows = RowCollection::new();

        let err = insert(&registry, "users", &mut rows, vec!["Bob".into(), true.into()])
            .unwrap_err();

        assert!(matches!(err, DatabaseError::TypeMismatch { ref column, .. } if column == "Age"));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_insert_arity_and_unknown_table() {
        let registry = users();
        let mut rows = RowCollection::new();

        assert!(matches!(
            insert(&registry, "users", &mut rows, vec!["Bob".into()]),
            Err(DatabaseError::ArityMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            insert(&registry, "nobody", &mut rows, vec![]),
            Err(DatabaseError::UnknownTable(_))
        ));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_ids_never_reused() {
        let registry = users();
        let mut rows = RowCollection::new();
        let add = |rows: &mut RowCollection, name: &str| {
            insert(&registry, "users", rows, vec![name.into(), Value::Integer(1)]).unwrap()
        };

        assert_eq!(add(&mut rows, "a"), 1);
        assert_eq!(add(&mut rows, "b"), 2);

        let removed = delete(&mut rows, Some(&Predicate::new().and("ID", 2_i64)));
        assert_eq!(removed, vec![2]);

        assert_eq!(add(&mut rows, "c"), 3);
        assert_eq!(add(&mut rows, "d"), 4);
    }

    #[test]
    fn test_select_is_ordered_subsequence() {
        let registry = users();
        let mut rows = RowCollection::new();
        for (name, age) in [("a", 1), ("b", 2), ("c", 1)] {
            insert(&registry, "users", &mut rows, vec![name.into(), Value::Integer(age)]).unwrap();
        }

        let all: Vec<&Record> = select(&rows, None).collect();
        assert_eq!(all.len(), 3);

        let predicate = Predicate::new().and("Age", 1_i64);
        let ids: Vec<i64> = select(&rows, Some(&predicate))
            .filter_map(Record::id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_update_scenario() {
        let registry = users();
        let mut rows = alice_row(&registry);
        let schema = registry.schema("users").unwrap();

        let updated = update(
            schema,
            &mut rows,
            &[("Age".to_string(), Value::Integer(31))],
            Some(&Predicate::new().and("Name", "Alice")),
        )
        .unwrap();

        assert_eq!(updated, vec![1]);
        assert_eq!(
            rows.records()[0],
            record(&[
                ("ID", Value::Integer(1)),
                ("Name", "Alice".into()),
                ("Age", Value::Integer(31)),
            ])
        );
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let registry = users();
        let mut rows = alice_row(&registry);
        let before = rows.clone();
        let schema = registry.schema("users").unwrap();

        let err = update(
            schema,
            &mut rows,
            &[
                ("Age".to_string(), Value::Integer(99)),
                ("Email".to_string(), "x@y.z".into()),
            ],
            None,
        )
        .unwrap_err();

        assert!(matches!(err, DatabaseError::UnknownColumn(ref c) if c == "Email"));
        assert_eq!(rows, before);
    }

    #[test]
    fn test_update_rejects_id_and_wrong_types() {
        let registry = users();
        let mut rows = alice_row(&registry);
        let before = rows.clone();
        let schema = registry.schema("users").unwrap();

        assert!(matches!(
            update(schema, &mut rows, &[("ID".to_string(), Value::Integer(5))], None),
            Err(DatabaseError::InvalidColumn { .. })
        ));
        assert!(matches!(
            update(schema, &mut rows, &[("Age".to_string(), "old".into())], None),
            Err(DatabaseError::TypeMismatch { .. })
        ));
        assert_eq!(rows, before);
    }

    #[test]
    fn test_update_without_matches_reports_nothing() {
        let registry = users();
        let mut rows = alice_row(&registry);
        let schema = registry.schema("users").unwrap();

        let updated = update(
            schema,
            &mut rows,
            &[("Age".to_string(), Value::Integer(1))],
            Some(&Predicate::new().and("Name", "Nobody")),
        )
        .unwrap();

        assert!(updated.is_empty());
        assert_eq!(rows.records()[0].get("Age"), Some(&Value::Integer(30)));
    }

    #[test]
    fn test_delete_scenario() {
        let registry = users();
        let mut rows = alice_row(&registry);
        let schema = registry.schema("users").unwrap();
        update(
            schema,
            &mut rows,
            &[("Age".to_string(), Value::Integer(31))],
            Some(&Predicate::new().and("Name", "Alice")),
        )
        .unwrap();

        let deleted = delete(&mut rows, Some(&Predicate::new().and("Age", 31_i64)));

        assert_eq!(deleted, vec![1]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_delete_keeps_order_of_survivors() {
        let mut rows = RowCollection::from_records(
            (1..=5)
                .map(|id| record(&[("ID", Value::Integer(id)), ("even", (id % 2 == 0).into())]))
                .collect(),
            0,
        );

        let deleted = delete(&mut rows, Some(&Predicate::new().and("even", true)));

        assert_eq!(deleted, vec![2, 4]);
        let left: Vec<i64> = rows.iter().filter_map(Record::id).collect();
        assert_eq!(left, vec![1, 3, 5]);
    }

    #[test]
    fn test_legacy_records_are_matched_but_not_reported() {
        let mut rows = RowCollection::from_records(
            vec![
                record(&[("Name", "ghost".into())]),
                record(&[("ID", Value::Integer(3)), ("Name", "ghost".into())]),
            ],
            0,
        );

        let deleted = delete(&mut rows, Some(&Predicate::new().and("Name", "ghost")));

        assert_eq!(deleted, vec![3]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_update_reports_column_missing_from_legacy_record() {
        let registry = users();
        let schema = registry.schema("users").unwrap();
        let mut rows = RowCollection::from_records(
            vec![record(&[("ID", Value::Integer(1)), ("Name", "Old".into())])],
            0,
        );
        let before = rows.clone();

        let err = update(
            schema,
            &mut rows,
            &[("Age".to_string(), Value::Integer(1))],
            Some(&Predicate::new().and("Name", "Old")),
        )
        .unwrap_err();

        assert!(matches!(err, DatabaseError::UnknownColumn(ref c) if c == "Age"));
        assert_eq!(rows, before);
    }

    #[test]
    fn test_insert_fails_once_ids_run_out() {
        let registry = users();
        let mut rows = RowCollection::from_records(
            vec![record(&[
                ("ID", Value::Integer(i64::MAX)),
                ("Name", "last".into()),
                ("Age", Value::Integer(0)),
            ])],
            0,
        );
        let before = rows.clone();

        let err = insert(&registry, "users", &mut rows, vec!["one more".into(), Value::Integer(1)])
            .unwrap_err();

        assert!(matches!(err, DatabaseError::IdExhausted(ref t) if t == "users"));
        assert_eq!(rows, before);
    }
}
