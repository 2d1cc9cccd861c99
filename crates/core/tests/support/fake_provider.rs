use std::{cell::RefCell, error::Error as StdError, fmt, rc::Rc};

use dbfixture_core::{
    Connection, ConnectionError, ConnectionProvider, DataSet, DataSetError, DatabaseOperation,
    Result, Table, Value,
};

#[derive(Debug, Default)]
struct FakeDatabaseState {
    tables: Vec<Table>,
    query_results: Vec<(String, Table)>,
    executed_operations: Vec<DatabaseOperation>,
    open_count: usize,
    close_count: usize,
    fail_on_query: Option<String>,
}

/// In-memory stand-in for a database: tables are replaced wholesale by
/// write operations and query results are registered per SQL string.
#[derive(Debug, Clone, Default)]
pub struct FakeProvider {
    state: Rc<RefCell<FakeDatabaseState>>,
}

#[allow(dead_code)]
impl FakeProvider {
    pub fn with_tables(tables: Vec<Table>) -> Self {
        let provider = Self::default();
        provider.state.borrow_mut().tables = tables;
        provider
    }

    pub fn register_query(&self, sql: impl Into<String>, result: Table) {
        self.state
            .borrow_mut()
            .query_results
            .push((sql.into(), result));
    }

    pub fn set_fail_on_query(&self, sql: impl Into<String>) {
        self.state.borrow_mut().fail_on_query = Some(sql.into());
    }

    pub fn table(&self, name: &str) -> Option<Table> {
        self.state
            .borrow()
            .tables
            .iter()
            .find(|table| table.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn executed_operations(&self) -> Vec<DatabaseOperation> {
        self.state.borrow().executed_operations.clone()
    }

    pub fn open_count(&self) -> usize {
        self.state.borrow().open_count
    }

    pub fn close_count(&self) -> usize {
        self.state.borrow().close_count
    }
}

impl ConnectionProvider for FakeProvider {
    fn connection(&self) -> Result<Box<dyn Connection>> {
        self.state.borrow_mut().open_count += 1;
        Ok(Box::new(FakeConnection {
            state: Rc::clone(&self.state),
        }))
    }
}

struct FakeConnection {
    state: Rc<RefCell<FakeDatabaseState>>,
}

impl Connection for FakeConnection {
    fn create_data_set(&mut self) -> Result<DataSet> {
        Ok(DataSet::new(self.state.borrow().tables.clone())?)
    }

    fn create_table(&mut self, name: &str) -> Result<Table> {
        self.state
            .borrow()
            .tables
            .iter()
            .find(|table| table.name().eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| {
                DataSetError::UnknownTable {
                    table: name.to_string(),
                }
                .into()
            })
    }

    fn create_query_table(&mut self, name: &str, sql: &str) -> Result<Table> {
        let state = self.state.borrow();
        if state.fail_on_query.as_deref() == Some(sql) {
            let source = FakeSourceError("no such table".to_string());
            return Err(ConnectionError::statement(sql, source).into());
        }

        let result = state
            .query_results
            .iter()
            .find(|(registered, _)| registered == sql)
            .map(|(_, table)| table)
            .ok_or_else(|| {
                let source = FakeSourceError("unregistered query".to_string());
                ConnectionError::statement(sql, source)
            })?;

        let metadata = dbfixture_core::TableMetadata::new(name, result.columns().to_vec())?;
        let rows = result.rows().map(<[Value]>::to_vec).collect();
        Ok(Table::new(metadata, rows)?)
    }

    fn execute(&mut self, operation: DatabaseOperation, data_set: &DataSet) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.executed_operations.push(operation);

        if matches!(operation, DatabaseOperation::DeleteAll | DatabaseOperation::CleanInsert) {
            for table in data_set.tables().iter().rev() {
                if let Some(existing) = state
                    .tables
                    .iter_mut()
                    .find(|existing| existing.name().eq_ignore_ascii_case(table.name()))
                {
                    *existing = Table::empty(existing.metadata().clone());
                }
            }
        }

        if matches!(operation, DatabaseOperation::Insert | DatabaseOperation::CleanInsert) {
            for table in data_set {
                let position = state
                    .tables
                    .iter()
                    .position(|existing| existing.name().eq_ignore_ascii_case(table.name()));
                let merged = match position {
                    Some(index) => append_rows(&state.tables[index], table)?,
                    None => table.clone(),
                };
                match position {
                    Some(index) => state.tables[index] = merged,
                    None => state.tables.push(merged),
                }
            }
        }

        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.state.borrow_mut().close_count += 1;
        Ok(())
    }
}

fn append_rows(existing: &Table, incoming: &Table) -> Result<Table> {
    let mut rows: Vec<Vec<Value>> = existing.rows().map(<[Value]>::to_vec).collect();
    for row in 0..incoming.row_count() {
        let mut values = Vec::with_capacity(existing.columns().len());
        for column in existing.columns() {
            let value = if incoming.metadata().has_column(&column.name) {
                incoming.value(row, &column.name)?.clone()
            } else {
                Value::Null
            };
            values.push(value);
        }
        rows.push(values);
    }
    Ok(Table::new(existing.metadata().clone(), rows)?)
}

#[derive(Debug)]
struct FakeSourceError(String);

impl fmt::Display for FakeSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for FakeSourceError {}
