use crate::{DataSetError, Table, column::names_match};

/// Named collection of tables, kept in assembly order.
///
/// Table order matters to write operations: inserts follow it and deletes
/// run in reverse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSet {
    tables: Vec<Table>,
}

impl DataSet {
    pub fn new(tables: impl IntoIterator<Item = Table>) -> Result<Self, DataSetError> {
        let mut data_set = Self::default();
        for table in tables {
            data_set.push(table)?;
        }
        Ok(data_set)
    }

    pub fn push(&mut self, table: Table) -> Result<(), DataSetError> {
        if self.contains(table.name()) {
            return Err(DataSetError::DuplicateTable {
                table: table.name().to_string(),
            });
        }

        self.tables.push(table);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tables
            .iter()
            .any(|table| names_match(table.name(), name))
    }

    pub fn table(&self, name: &str) -> Result<&Table, DataSetError> {
        self.tables
            .iter()
            .find(|table| names_match(table.name(), name))
            .ok_or_else(|| DataSetError::UnknownTable {
                table: name.to_string(),
            })
    }

    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    #[must_use]
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(Table::name).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl IntoIterator for DataSet {
    type Item = Table;
    type IntoIter = std::vec::IntoIter<Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
