use std::error::Error as StdError;

use dbfixture_core::{
    Column, Connection, ConnectionError, DataSet, DataSetError, DatabaseOperation, Result, Table,
    TableMetadata, TypeTag, Value,
};
use rusqlite::{
    OptionalExtension, params_from_iter,
    types::{Value as SqlValue, ValueRef},
};
use tracing::{debug, info};

use crate::{affinity::type_tag_for_declared_type, queries};

pub struct SqliteConnection {
    connection: rusqlite::Connection,
}

impl SqliteConnection {
    pub(crate) fn new(connection: rusqlite::Connection) -> Self {
        Self { connection }
    }

    /// Declared name of a table or view, matched case-insensitively.
    fn resolve_table(&self, name: &str) -> Result<String> {
        self.connection
            .query_row(queries::RESOLVE_TABLE_QUERY, [name], |row| row.get(0))
            .optional()
            .map_err(|source| execution_error(queries::RESOLVE_TABLE_QUERY, source))?
            .ok_or_else(|| {
                DataSetError::UnknownTable {
                    table: name.to_string(),
                }
                .into()
            })
    }

    fn declared_types(&self, table: &str) -> Result<Vec<(String, String)>> {
        let query = queries::TABLE_COLUMNS_QUERY;
        let mut statement = self
            .connection
            .prepare(query)
            .map_err(|source| execution_error(query, source))?;
        let mut rows = statement
            .query([table])
            .map_err(|source| execution_error(query, source))?;

        let mut columns = Vec::new();
        while let Some(row) = rows.next().map_err(|source| execution_error(query, source))? {
            let name: String = row.get(0).map_err(|source| execution_error(query, source))?;
            let declared: String = row.get(1).map_err(|source| execution_error(query, source))?;
            columns.push((name, declared));
        }
        Ok(columns)
    }

    fn table_names(&self) -> Result<Vec<String>> {
        let query = queries::TABLE_NAMES_QUERY;
        let mut statement = self
            .connection
            .prepare(query)
            .map_err(|source| execution_error(query, source))?;
        let mut rows = statement
            .query([])
            .map_err(|source| execution_error(query, source))?;

        let mut names = Vec::new();
        while let Some(row) = rows.next().map_err(|source| execution_error(query, source))? {
            names.push(
                row.get::<_, String>(0)
                    .map_err(|source| execution_error(query, source))?,
            );
        }
        Ok(names)
    }

    /// Runs `sql` and materializes the result. Column tags come from
    /// `declared` when the column is listed there, otherwise from the storage
    /// class of the first non-null value.
    fn read_table(&self, name: &str, sql: &str, declared: &[(String, String)]) -> Result<Table> {
        let mut statement = self
            .connection
            .prepare(sql)
            .map_err(|source| execution_error(sql, source))?;
        let names: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut rows = statement
            .query([])
            .map_err(|source| execution_error(sql, source))?;

        let mut values: Vec<Vec<Value>> = Vec::new();
        let mut observed: Vec<TypeTag> = vec![TypeTag::Unknown; names.len()];
        while let Some(row) = rows.next().map_err(|source| execution_error(sql, source))? {
            let mut cells = Vec::with_capacity(names.len());
            for (index, tag) in observed.iter_mut().enumerate() {
                let cell = row
                    .get_ref(index)
                    .map_err(|source| execution_error(sql, source))?;
                if *tag == TypeTag::Unknown {
                    *tag = storage_class_tag(cell);
                }
                cells.push(to_value(cell));
            }
            values.push(cells);
        }

        let columns = names
            .into_iter()
            .zip(observed)
            .map(|(column, observed)| {
                let type_tag = declared
                    .iter()
                    .find(|(candidate, _)| candidate.eq_ignore_ascii_case(&column))
                    .map(|(_, declared)| type_tag_for_declared_type(declared))
                    .filter(|tag| *tag != TypeTag::Unknown)
                    .unwrap_or(observed);
                Column::new(column, type_tag)
            })
            .collect();
        let metadata = TableMetadata::new(name, columns)?;

        debug!(table = name, rows = values.len(), "read sqlite table");
        Ok(Table::new(metadata, values)?)
    }

    fn delete_all(transaction: &rusqlite::Transaction<'_>, data_set: &DataSet) -> Result<()> {
        for table in data_set.tables().iter().rev() {
            let sql = format!("DELETE FROM {}", quote_identifier(table.name()));
            let deleted = transaction
                .execute(&sql, [])
                .map_err(|source| execution_error(&sql, source))?;
            debug!(table = table.name(), deleted, "deleted rows");
        }
        Ok(())
    }

    fn insert(transaction: &rusqlite::Transaction<'_>, data_set: &DataSet) -> Result<()> {
        for table in data_set {
            if table.columns().is_empty() || table.is_empty() {
                continue;
            }

            let sql = insert_statement(table);
            let mut statement = transaction
                .prepare(&sql)
                .map_err(|source| execution_error(&sql, source))?;
            for row in table.rows() {
                statement
                    .execute(params_from_iter(row.iter().map(to_sql_value)))
                    .map_err(|source| execution_error(&sql, source))?;
            }
            debug!(table = table.name(), rows = table.row_count(), "inserted rows");
        }
        Ok(())
    }
}

impl Connection for SqliteConnection {
    fn create_data_set(&mut self) -> Result<DataSet> {
        let mut data_set = DataSet::default();
        for name in self.table_names()? {
            data_set.push(self.create_table(&name)?)?;
        }
        Ok(data_set)
    }

    fn create_table(&mut self, name: &str) -> Result<Table> {
        let declared_name = self.resolve_table(name)?;
        let declared = self.declared_types(&declared_name)?;
        let sql = format!("SELECT * FROM {}", quote_identifier(&declared_name));
        self.read_table(&declared_name, &sql, &declared)
    }

    fn create_query_table(&mut self, name: &str, sql: &str) -> Result<Table> {
        self.read_table(name, sql, &[])
    }

    fn execute(&mut self, operation: DatabaseOperation, data_set: &DataSet) -> Result<()> {
        if operation == DatabaseOperation::None {
            return Ok(());
        }

        let transaction = self
            .connection
            .transaction()
            .map_err(|source| execution_error(queries::BEGIN_SQL, source))?;
        match operation {
            DatabaseOperation::None => {}
            DatabaseOperation::Insert => Self::insert(&transaction, data_set)?,
            DatabaseOperation::DeleteAll => Self::delete_all(&transaction, data_set)?,
            DatabaseOperation::CleanInsert => {
                Self::delete_all(&transaction, data_set)?;
                Self::insert(&transaction, data_set)?;
            }
        }
        transaction
            .commit()
            .map_err(|source| execution_error(queries::COMMIT_SQL, source))?;

        info!(
            operation = operation.as_str(),
            tables = data_set.len(),
            "applied database operation"
        );
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.connection.close().map_err(|(_, source)| {
            ConnectionError::Close {
                source: Box::new(source),
            }
            .into()
        })
    }
}

fn insert_statement(table: &Table) -> String {
    let columns = table
        .columns()
        .iter()
        .map(|column| quote_identifier(&column.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=table.columns().len())
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({columns}) VALUES ({placeholders})",
        quote_identifier(table.name())
    )
}

fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn to_value(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(value) => Value::Integer(value),
        ValueRef::Real(value) => Value::Text(value.to_string()),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Opaque(bytes.to_vec()),
    }
}

fn storage_class_tag(cell: ValueRef<'_>) -> TypeTag {
    match cell {
        ValueRef::Null => TypeTag::Unknown,
        ValueRef::Integer(_) => TypeTag::Integer,
        ValueRef::Real(_) => TypeTag::Real,
        ValueRef::Text(_) => TypeTag::Text,
        ValueRef::Blob(_) => TypeTag::Binary,
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(value) => SqlValue::Integer(*value),
        Value::Text(value) => SqlValue::Text(value.clone()),
        Value::Opaque(bytes) => SqlValue::Blob(bytes.clone()),
    }
}

fn execution_error<E>(sql: &str, source: E) -> dbfixture_core::Error
where
    E: StdError + Send + Sync + 'static,
{
    ConnectionError::statement(sql, source).into()
}
