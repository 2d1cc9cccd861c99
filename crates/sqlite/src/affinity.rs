use dbfixture_core::TypeTag;

/// Maps a declared column type to a [`TypeTag`] following SQLite's column
/// affinity rules, refined for the date/time and boolean names SQLite files
/// under NUMERIC affinity.
pub fn type_tag_for_declared_type(declared: &str) -> TypeTag {
    let declared = declared.trim().to_ascii_uppercase();
    if declared.is_empty() {
        return TypeTag::Unknown;
    }

    if declared.contains("INT") {
        TypeTag::Integer
    } else if ["CHAR", "CLOB", "TEXT"]
        .iter()
        .any(|needle| declared.contains(needle))
    {
        TypeTag::Text
    } else if declared.contains("BLOB") {
        TypeTag::Binary
    } else if ["REAL", "FLOA", "DOUB"]
        .iter()
        .any(|needle| declared.contains(needle))
    {
        TypeTag::Real
    } else if declared.contains("BOOL") {
        TypeTag::Boolean
    } else if declared.contains("TIMESTAMP") || declared.contains("DATETIME") {
        TypeTag::Timestamp
    } else if declared.contains("DATE") {
        TypeTag::Date
    } else if declared.contains("TIME") {
        TypeTag::Time
    } else {
        TypeTag::Real
    }
}
