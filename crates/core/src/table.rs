use crate::{Column, DataSetError, TableMetadata, Value};

/// Immutable snapshot of one table: metadata plus rows in native order.
///
/// Every row holds exactly one value per declared column, positioned by the
/// column's index in the metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    metadata: TableMetadata,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(metadata: TableMetadata, rows: Vec<Vec<Value>>) -> Result<Self, DataSetError> {
        let expected = metadata.columns().len();
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != expected)
        {
            return Err(DataSetError::RowArity {
                table: metadata.name().to_string(),
                row,
                expected,
                actual: values.len(),
            });
        }

        Ok(Self { metadata, rows })
    }

    #[must_use]
    pub fn empty(metadata: TableMetadata) -> Self {
        Self {
            metadata,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        self.metadata.columns()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn row(&self, row: usize) -> Result<&[Value], DataSetError> {
        self.rows
            .get(row)
            .map(Vec::as_slice)
            .ok_or_else(|| DataSetError::RowIndexOutOfBounds {
                table: self.name().to_string(),
                row,
                row_count: self.rows.len(),
            })
    }

    pub fn value(&self, row: usize, column: &str) -> Result<&Value, DataSetError> {
        let index = self.metadata.require_column(column)?;
        Ok(&self.row(row)?[index])
    }

    /// Copies the rows for a derived table; derived tables never alias the
    /// source's row storage.
    pub(crate) fn derive(&self, metadata: TableMetadata, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == metadata.columns().len()));
        Self { metadata, rows }
    }

    pub(crate) fn raw_rows(&self) -> &[Vec<Value>] {
        &self.rows
    }
}
