#[path = "support/sqlite_fixture.rs"]
mod sqlite_fixture;

use dbfixture_core::{
    ConnectionError, ConnectionProvider, DataSetError, DatabaseOperation, Error, Exporter, Loader,
    Query, TypeTag, Value, fixture, with_connection,
};
use dbfixture_sqlite::{FOREIGN_KEYS_KEY, SqliteProvider};

use sqlite_fixture::{count_rows, seeded_database};

#[test]
fn create_data_set_lists_user_tables_in_name_order() {
    let (_dir, config) = seeded_database();
    let provider = SqliteProvider::new(&config);

    let data_set = Exporter::for_db(&provider).all().expect("export should succeed");

    assert_eq!(data_set.table_names(), vec!["orders", "users"]);
}

#[test]
fn table_columns_follow_declared_affinity_and_values_keep_storage_class() {
    let (_dir, config) = seeded_database();
    let provider = SqliteProvider::new(&config);

    let users = with_connection(&provider, |connection| connection.create_table("USERS"))
        .expect("table read should succeed");

    assert_eq!(users.name(), "users");
    let tags: Vec<TypeTag> = users.columns().iter().map(|column| column.type_tag).collect();
    assert_eq!(
        tags,
        vec![
            TypeTag::Integer,
            TypeTag::Text,
            TypeTag::Real,
            TypeTag::Binary,
            TypeTag::Timestamp,
        ]
    );
    assert_eq!(users.value(0, "id"), Ok(&Value::Integer(1)));
    assert_eq!(users.value(0, "score"), Ok(&Value::from("9.5")));
    assert_eq!(users.value(0, "avatar"), Ok(&Value::Opaque(vec![0xCA, 0xFE])));
    assert_eq!(users.value(0, "joined_at"), Ok(&Value::from("2024-01-02 03:04:05")));
}

#[test]
fn unknown_table_is_a_data_set_error() {
    let (_dir, config) = seeded_database();
    let provider = SqliteProvider::new(&config);

    let error = with_connection(&provider, |connection| connection.create_table("missing"))
        .expect_err("missing table must fail");

    assert!(matches!(
        error,
        Error::DataSet(DataSetError::UnknownTable { ref table }) if table == "missing"
    ));
}

#[test]
fn query_tables_take_the_requested_name() {
    let (_dir, config) = seeded_database();
    let provider = SqliteProvider::new(&config);

    let data_set = Exporter::for_db(&provider)
        .select(
            &[Query::new(
                "user_orders",
                "SELECT u.name, o.id AS order_id FROM users u JOIN orders o ON o.user_id = u.id",
            )],
            &["users"],
        )
        .expect("query export should succeed");

    assert_eq!(data_set.table_names(), vec!["user_orders", "users"]);
    let joined = data_set.table("user_orders").expect("query table should exist");
    assert_eq!(joined.value(0, "order_id"), Ok(&Value::Integer(10)));
    assert_eq!(joined.columns()[0].type_tag, TypeTag::Text);
}

#[test]
fn clean_insert_replaces_existing_rows_and_assertions_pass() {
    let (_dir, config) = seeded_database();
    let provider = SqliteProvider::new(&config);
    let users = fixture::table("users", &["id", "name"], [["2", "Bob"], ["3", "Carol"]])
        .expect("fixture should build");
    let orders = fixture::table("orders", &["id", "user_id"], [["20", "3"]])
        .expect("fixture should build");
    let seed = fixture::data_set([users.clone(), orders]).expect("data set should build");

    Loader::for_db(&provider)
        .clean_insert(&seed)
        .expect("clean insert should succeed")
        .assert_table(&users, &["id"])
        .expect("users should match the seed");

    assert_eq!(count_rows(&config, "users"), 2);
    assert_eq!(count_rows(&config, "orders"), 1);
}

#[test]
fn failed_insert_rolls_back_the_whole_operation() {
    let (_dir, config) = seeded_database();
    let provider = SqliteProvider::new(&config);
    let users = fixture::table("users", &["id", "name"], [["5", "Eve"], ["5", "Duplicate"]])
        .expect("fixture should build");
    let seed = fixture::data_set([users]).expect("data set should build");

    let error = Loader::for_db(&provider)
        .execute(DatabaseOperation::CleanInsert, &seed)
        .expect_err("duplicate primary key must fail");

    let Error::Connection(ConnectionError::Statement { sql, .. }) = error else {
        panic!("expected statement failure, got {error:?}");
    };
    assert!(sql.starts_with("INSERT INTO \"users\""), "unexpected sql: {sql}");
    assert_eq!(count_rows(&config, "users"), 1);
}

#[test]
fn delete_all_empties_tables_in_reverse_order() {
    let (_dir, config) = seeded_database();
    let provider = SqliteProvider::new(&config.clone().with_extra(FOREIGN_KEYS_KEY, "on"));
    let users = fixture::table("users", &["id"], Vec::<[&str; 1]>::new())
        .expect("fixture should build");
    let orders = fixture::table("orders", &["id"], Vec::<[&str; 1]>::new())
        .expect("fixture should build");
    let data_set = fixture::data_set([users, orders]).expect("data set should build");

    Loader::for_db(&provider)
        .execute(DatabaseOperation::DeleteAll, &data_set)
        .expect("delete all should succeed with foreign keys enforced");

    assert_eq!(count_rows(&config, "users"), 0);
    assert_eq!(count_rows(&config, "orders"), 0);
}

#[test]
fn invalid_foreign_keys_switch_is_rejected_on_open() {
    let (_dir, config) = seeded_database();
    let provider = SqliteProvider::new(&config.with_extra(FOREIGN_KEYS_KEY, "maybe"));

    let error = provider.connection().err().expect("invalid switch must fail");

    let Error::Connection(ConnectionError::Open { source, .. }) = error else {
        panic!("expected open failure, got {error:?}");
    };
    assert!(source.to_string().contains("maybe"));
}

#[test]
fn bad_query_reports_the_failing_sql() {
    let (_dir, config) = seeded_database();
    let provider = SqliteProvider::new(&config);

    let error = Loader::for_db(&provider)
        .assert_query_table(
            &fixture::table("broken", &["x"], [["1"]]).expect("fixture should build"),
            "SELECT x FROM nowhere",
            &["x"],
        )
        .expect_err("bad query must fail");

    assert!(matches!(
        error,
        Error::Connection(ConnectionError::Statement { ref sql, .. })
            if sql == "SELECT x FROM nowhere"
    ));
}
