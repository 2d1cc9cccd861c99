use dbfixture_core::ConnectionConfig;
use tempfile::TempDir;

pub const SCHEMA: &str = r#"
CREATE TABLE users (
    id INTEGER PRIMARY KEY,
    name VARCHAR(40) NOT NULL,
    score REAL,
    avatar BLOB,
    joined_at DATETIME
);
CREATE TABLE orders (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    note TEXT
);
CREATE VIEW user_names AS SELECT name FROM users;
"#;

/// A file-backed database with the `users`/`orders` schema; the directory
/// lives as long as the returned guard.
pub fn seeded_database() -> (TempDir, ConnectionConfig) {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("fixture.db");
    let connection = rusqlite::Connection::open(&path).expect("sqlite file should open");
    connection
        .execute_batch(SCHEMA)
        .expect("schema should be created");
    connection
        .execute_batch(
            "INSERT INTO users (id, name, score, avatar, joined_at) \
             VALUES (1, 'Alice', 9.5, x'CAFE', '2024-01-02 03:04:05'); \
             INSERT INTO orders (id, user_id, note) VALUES (10, 1, NULL);",
        )
        .expect("seed rows should be inserted");
    drop(connection);

    let config = ConnectionConfig::new(path.display().to_string());
    (dir, config)
}

pub fn count_rows(config: &ConnectionConfig, table: &str) -> i64 {
    let connection =
        rusqlite::Connection::open(&config.database).expect("sqlite file should reopen");
    connection
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .expect("count query should succeed")
}
