use dbfixture_core::ConnectionConfig;
use dbfixture_sqlite::SqliteProvider;
use tempfile::TempDir;

const SCHEMA: &str = r#"
CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT);
CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INTEGER NOT NULL);
"#;

pub fn sqlite_provider() -> (TempDir, SqliteProvider) {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("cases.db");
    rusqlite::Connection::open(&path)
        .expect("sqlite file should open")
        .execute_batch(SCHEMA)
        .expect("schema should be created");

    let provider = SqliteProvider::new(&ConnectionConfig::new(path.display().to_string()));
    (dir, provider)
}
