//! Literal fixture definitions.
//!
//! Fixture cells are always stored as text and every column is tagged
//! [`TypeTag::Unknown`](crate::TypeTag::Unknown); comparison falls back to
//! raw-value equality for them.

use crate::{Column, DataSet, DataSetError, Table, TableMetadata, Value};

/// Builds a table from literal rows. Each row must supply one value per column.
pub fn table<C, R, V>(name: &str, columns: &[C], rows: R) -> Result<Table, DataSetError>
where
    C: AsRef<str>,
    R: IntoIterator,
    R::Item: IntoIterator<Item = V>,
    V: AsRef<str>,
{
    let mut builder = TableBuilder::new(name).columns(columns);
    for row in rows {
        builder = builder.row(row);
    }
    builder.build()
}

pub fn data_set(tables: impl IntoIterator<Item = Table>) -> Result<DataSet, DataSetError> {
    DataSet::new(tables)
}

#[derive(Debug, Clone)]
pub struct TableBuilder {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn columns<C>(mut self, columns: &[C]) -> Self
    where
        C: AsRef<str>,
    {
        self.columns
            .extend(columns.iter().map(|column| column.as_ref().to_string()));
        self
    }

    #[must_use]
    pub fn row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        self.rows.push(
            values
                .into_iter()
                .map(|value| value.as_ref().to_string())
                .collect(),
        );
        self
    }

    pub fn build(self) -> Result<Table, DataSetError> {
        let columns = self.columns.into_iter().map(Column::unknown).collect();
        let metadata = TableMetadata::new(self.name, columns)?;
        let rows = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(Value::Text).collect())
            .collect();
        Table::new(metadata, rows)
    }
}

#[derive(Debug, Default)]
pub struct DataSetBuilder {
    tables: Vec<Table>,
}

impl DataSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn build(self) -> Result<DataSet, DataSetError> {
        DataSet::new(self.tables)
    }
}
