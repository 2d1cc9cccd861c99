use tracing::info;

use crate::{
    Column, ConnectionProvider, DataSet, DatabaseOperation, Query, Result, Table, assert_equal,
    project, with_connection,
};

/// Fluent loader session: apply fixtures, then assert database state.
///
/// Every call acquires its own connection and releases it before returning;
/// nothing but the provider is held between calls.
pub struct Loader<'a> {
    provider: &'a dyn ConnectionProvider,
}

impl std::fmt::Debug for Loader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader").finish_non_exhaustive()
    }
}

impl<'a> Loader<'a> {
    #[must_use]
    pub fn for_db(provider: &'a dyn ConnectionProvider) -> Self {
        Self { provider }
    }

    pub fn clean_insert(&self, data_set: &DataSet) -> Result<&Self> {
        self.execute(DatabaseOperation::CleanInsert, data_set)
    }

    pub fn execute(&self, operation: DatabaseOperation, data_set: &DataSet) -> Result<&Self> {
        with_connection(self.provider, |connection| {
            operation.execute(connection, data_set)
        })?;
        info!(
            %operation,
            tables = ?data_set.table_names(),
            "applied data set"
        );
        Ok(self)
    }

    /// Asserts that the database table named like `expected` holds the same
    /// rows, restricted to `expected`'s columns and sorted by `sort_by`.
    pub fn assert_table<S>(&self, expected: &Table, sort_by: &[S]) -> Result<&Self>
    where
        S: AsRef<str>,
    {
        let actual = with_connection(self.provider, |connection| {
            connection.create_table(expected.name())
        })?;
        assert_tables(expected, &actual, sort_by)?;
        Ok(self)
    }

    /// Like [`Loader::assert_table`], with the actual rows produced by `sql`.
    pub fn assert_query_table<S>(&self, expected: &Table, sql: &str, sort_by: &[S]) -> Result<&Self>
    where
        S: AsRef<str>,
    {
        let actual = with_connection(self.provider, |connection| {
            connection.create_query_table(expected.name(), sql)
        })?;
        assert_tables(expected, &actual, sort_by)?;
        Ok(self)
    }
}

/// Reconciles `actual` with `expected` through the same projection and the
/// same sort key, then compares cell by cell.
///
/// Expected columns the actual table lacks are left out of the projection so
/// that the structural check reports them.
pub fn assert_tables<S>(expected: &Table, actual: &Table, sort_by: &[S]) -> Result<()>
where
    S: AsRef<str>,
{
    let shared: Vec<Column> = expected
        .columns()
        .iter()
        .filter(|column| actual.metadata().has_column(&column.name))
        .cloned()
        .collect();
    let actual = project(actual, &shared)?;

    if sort_by.is_empty() || shared.len() != expected.columns().len() {
        assert_equal(expected, &actual)?;
        return Ok(());
    }

    let expected = crate::sort_by(expected, sort_by)?;
    let actual = crate::sort_by(&actual, sort_by)?;
    assert_equal(&expected, &actual)?;
    Ok(())
}

/// Fluent exporter session: snapshot database state as data sets.
pub struct Exporter<'a> {
    provider: &'a dyn ConnectionProvider,
}

impl<'a> Exporter<'a> {
    #[must_use]
    pub fn for_db(provider: &'a dyn ConnectionProvider) -> Self {
        Self { provider }
    }

    pub fn tables(&self, names: &[&str]) -> Result<DataSet> {
        self.select(&[], names)
    }

    pub fn queries(&self, queries: &[Query]) -> Result<DataSet> {
        self.select(queries, &[])
    }

    pub fn select(&self, queries: &[Query], names: &[&str]) -> Result<DataSet> {
        let data_set = with_connection(self.provider, |connection| {
            connection.create_query_data_set(queries, names)
        })?;
        info!(tables = ?data_set.table_names(), "exported data set");
        Ok(data_set)
    }

    pub fn all(&self) -> Result<DataSet> {
        let data_set = with_connection(self.provider, |connection| connection.create_data_set())?;
        info!(tables = data_set.len(), "exported all tables");
        Ok(data_set)
    }
}
