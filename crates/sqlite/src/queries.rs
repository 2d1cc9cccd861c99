pub(crate) const TABLE_NAMES_QUERY: &str = r#"
SELECT name
FROM sqlite_master
WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
ORDER BY name ASC;
"#;

// Views are readable as tables but never listed by `create_data_set`.
pub(crate) const RESOLVE_TABLE_QUERY: &str = r#"
SELECT name
FROM sqlite_master
WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE
ORDER BY type ASC
LIMIT 1;
"#;

pub(crate) const TABLE_COLUMNS_QUERY: &str = r#"
SELECT name, type
FROM pragma_table_info(?1)
ORDER BY cid ASC;
"#;

pub(crate) const BEGIN_SQL: &str = "BEGIN";
pub(crate) const COMMIT_SQL: &str = "COMMIT";
