use dbfixture_core::{DataSetError, Error, FormatError, Value};
use dbfixture_testkit::load_data_set_from_str;

#[test]
fn tables_keep_document_order_and_scalars_map_to_values() {
    let yaml = r#"
zebras:
  columns: [id]
users:
  columns: [id, name, active, score, email]
  rows:
    - [1, Alice, true, 9.5, ~]
    - ["2", "Bob", false, 7, b@example.com]
"#;

    let data_set = load_data_set_from_str(yaml).expect("yaml data set must parse");

    assert_eq!(data_set.table_names(), vec!["zebras", "users"]);
    let users = data_set.table("users").expect("users table must exist");
    assert_eq!(users.value(0, "id"), Ok(&Value::Integer(1)));
    assert_eq!(users.value(1, "id"), Ok(&Value::from("2")));
    assert_eq!(users.value(0, "active"), Ok(&Value::from("true")));
    assert_eq!(users.value(0, "score"), Ok(&Value::from("9.5")));
    assert_eq!(users.value(0, "email"), Ok(&Value::Null));
    assert!(data_set.table("zebras").expect("zebras table must exist").is_empty());
}

#[test]
fn empty_document_is_an_empty_data_set() {
    let data_set = load_data_set_from_str("").expect("empty yaml must parse");

    assert!(data_set.is_empty());
}

#[test]
fn unknown_table_keys_are_rejected() {
    let yaml = r#"
users:
  columns: [id]
  colums: [typo]
"#;

    let error = load_data_set_from_str(yaml).expect_err("unknown key must fail");

    assert!(matches!(
        error,
        Error::Format(FormatError::Io { format: "yaml", .. })
    ));
    assert!(error.to_string().contains("colums"), "unexpected error: {error}");
}

#[test]
fn nested_cells_are_rejected() {
    let yaml = r#"
users:
  columns: [id]
  rows:
    - [[1, 2]]
"#;

    let error = load_data_set_from_str(yaml).expect_err("nested cell must fail");

    let Error::Format(FormatError::Malformed { message, .. }) = error else {
        panic!("expected malformed error, got {error:?}");
    };
    assert_eq!(
        message,
        "table `users` row[0] holds a sequence where a scalar is expected"
    );
}

#[test]
fn row_arity_is_checked_by_the_table_model() {
    let yaml = r#"
users:
  columns: [id, name]
  rows:
    - [1]
"#;

    let error = load_data_set_from_str(yaml).expect_err("short row must fail");

    assert!(matches!(
        error,
        Error::DataSet(DataSetError::RowArity {
            expected: 2,
            actual: 1,
            ..
        })
    ));
}
