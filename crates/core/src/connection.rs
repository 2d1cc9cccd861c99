use std::fmt;

use tracing::{debug, warn};

use crate::{DataSet, Result, Table};

/// A named SQL query whose result becomes a table in a query data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub table: String,
    pub sql: String,
}

impl Query {
    #[must_use]
    pub fn new(table: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            sql: sql.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseOperation {
    /// Leaves the database untouched.
    None,
    /// Inserts every row, tables in data set order.
    Insert,
    /// Deletes all rows of every table in the data set, in reverse order.
    DeleteAll,
    /// `DeleteAll` followed by `Insert`.
    CleanInsert,
}

impl DatabaseOperation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Insert => "INSERT",
            Self::DeleteAll => "DELETE_ALL",
            Self::CleanInsert => "CLEAN_INSERT",
        }
    }

    pub fn execute(self, connection: &mut dyn Connection, data_set: &DataSet) -> Result<()> {
        debug!(
            operation = self.as_str(),
            tables = data_set.len(),
            "executing database operation"
        );
        connection.execute(self, data_set)
    }
}

impl fmt::Display for DatabaseOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait ConnectionProvider {
    fn connection(&self) -> Result<Box<dyn Connection>>;
}

/// Live database access. Implementations run caller-supplied SQL as-is.
pub trait Connection {
    /// Every user table of the database.
    fn create_data_set(&mut self) -> Result<DataSet>;

    /// Full contents of one table.
    fn create_table(&mut self, name: &str) -> Result<Table>;

    fn create_query_table(&mut self, name: &str, sql: &str) -> Result<Table>;

    /// Queries first, then named tables; names must be unique across both.
    fn create_query_data_set(&mut self, queries: &[Query], names: &[&str]) -> Result<DataSet> {
        let mut data_set = DataSet::default();
        for query in queries {
            data_set.push(self.create_query_table(&query.table, &query.sql)?)?;
        }
        for name in names {
            data_set.push(self.create_table(name)?)?;
        }
        Ok(data_set)
    }

    fn execute(&mut self, operation: DatabaseOperation, data_set: &DataSet) -> Result<()>;

    fn close(self: Box<Self>) -> Result<()>;
}

/// Acquires a connection, runs `f`, and always closes the connection.
///
/// An error from `f` takes precedence over an error from closing.
pub fn with_connection<T, F>(provider: &dyn ConnectionProvider, f: F) -> Result<T>
where
    F: FnOnce(&mut dyn Connection) -> Result<T>,
{
    let mut connection = provider.connection()?;
    let outcome = f(connection.as_mut());
    let closed = connection.close();

    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(error)) => Err(error),
        (Err(error), Ok(())) => Err(error),
        (Err(error), Err(close_error)) => {
            warn!(%close_error, "closing connection failed after an earlier error");
            Err(error)
        }
    }
}
