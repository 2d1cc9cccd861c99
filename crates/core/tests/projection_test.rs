use dbfixture_core::{Column, DataSetError, Table, Value, fixture, project, project_names};

fn wide_users() -> Table {
    fixture::table(
        "users",
        &["id", "name", "email"],
        [
            ["2", "Bob", "bob@example.com"],
            ["1", "Alice", "alice@example.com"],
        ],
    )
    .expect("fixture should build")
}

#[test]
fn projection_onto_all_columns_is_identity() {
    let table = wide_users();
    let projected = project(&table, table.columns()).expect("projection should succeed");

    assert_eq!(projected, table);
}

#[test]
fn projection_follows_reference_column_order() {
    let table = wide_users();
    let reference = [Column::unknown("email"), Column::unknown("id")];

    let projected = project(&table, &reference).expect("projection should succeed");

    assert_eq!(
        projected.metadata().column_names(),
        vec!["email".to_string(), "id".to_string()]
    );
    assert_eq!(projected.row_count(), 2);
    assert_eq!(
        projected.rows().next(),
        Some(&[Value::from("bob@example.com"), Value::from("2")][..])
    );
}

#[test]
fn projection_resolves_names_case_insensitively() {
    let table = wide_users();
    let projected = project_names(&table, &["NAME"]).expect("projection should succeed");

    assert_eq!(projected.metadata().column_names(), vec!["name".to_string()]);
    assert_eq!(projected.value(1, "name"), Ok(&Value::from("Alice")));
}

#[test]
fn projection_rejects_unknown_reference_column() {
    let table = wide_users();
    let error = project_names(&table, &["id", "age"]).expect_err("unknown column must fail");

    assert_eq!(
        error,
        DataSetError::UnknownColumn {
            table: "users".to_string(),
            column: "age".to_string(),
        }
    );
}

#[test]
fn projection_leaves_source_untouched() {
    let table = wide_users();
    let before = table.clone();

    let _ = project_names(&table, &["id"]).expect("projection should succeed");

    assert_eq!(table, before);
    assert_eq!(table.columns().len(), 3);
}
