use std::fmt;

use crate::DataSetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeTag {
    /// The source could not infer a type; cells compare by raw value.
    #[default]
    Unknown,
    Integer,
    Real,
    Text,
    Binary,
    Boolean,
    Date,
    Time,
    Timestamp,
}

impl TypeTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Binary => "BINARY",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    pub name: String,
    pub type_tag: TypeTag,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
        }
    }

    #[must_use]
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, TypeTag::Unknown)
    }

    /// Column and table names resolve case-insensitively (ASCII folding).
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

pub(crate) fn names_match(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}

pub(crate) fn fold_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    name: String,
    columns: Vec<Column>,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self, DataSetError> {
        let name = name.into();
        for (index, column) in columns.iter().enumerate() {
            if columns[..index].iter().any(|seen| seen.is_named(&column.name)) {
                return Err(DataSetError::DuplicateColumn {
                    table: name,
                    column: column.name.clone(),
                });
            }
        }

        Ok(Self { name, columns })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.is_named(name))
    }

    pub fn require_column(&self, name: &str) -> Result<usize, DataSetError> {
        self.column_index(name)
            .ok_or_else(|| DataSetError::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }
}
