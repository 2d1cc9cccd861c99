use std::collections::HashMap;

use crate::{CursorError, Result, Table, Value, column::fold_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    On(usize),
    Exhausted,
}

/// Forward-only cursor over a table's rows with typed accessors.
///
/// Column lookups are case-insensitive: the cursor keys every column by its
/// lowercased name.
#[derive(Debug)]
pub struct ResultCursor<'t> {
    table: &'t Table,
    columns: HashMap<String, usize>,
    position: Position,
}

impl<'t> ResultCursor<'t> {
    #[must_use]
    pub fn new(table: &'t Table) -> Self {
        let columns = table
            .columns()
            .iter()
            .enumerate()
            .map(|(index, column)| (fold_name(&column.name), index))
            .collect();

        Self {
            table,
            columns,
            position: Position::BeforeFirst,
        }
    }

    /// Advances to the next row. Returns `false` once the rows are used up and
    /// keeps returning `false` afterwards.
    pub fn next(&mut self) -> bool {
        let candidate = match self.position {
            Position::BeforeFirst => 0,
            Position::On(row) => row + 1,
            Position::Exhausted => return false,
        };

        if candidate < self.table.row_count() {
            self.position = Position::On(candidate);
            true
        } else {
            self.position = Position::Exhausted;
            false
        }
    }

    /// Index of the current row, if the cursor is on one.
    #[must_use]
    pub fn row_index(&self) -> Option<usize> {
        match self.position {
            Position::On(row) => Some(row),
            Position::BeforeFirst | Position::Exhausted => None,
        }
    }

    pub fn get_value(&self, column: &str) -> std::result::Result<&'t Value, CursorError> {
        let row = self.current_row(column)?;
        let index = self
            .columns
            .get(&fold_name(column))
            .copied()
            .ok_or_else(|| CursorError::UnknownColumn {
                column: column.to_string(),
            })?;

        let table = self.table;
        Ok(&table.raw_rows()[row][index])
    }

    pub fn is_null(&self, column: &str) -> std::result::Result<bool, CursorError> {
        self.get_value(column).map(Value::is_null)
    }

    pub fn get_string(&self, column: &str) -> std::result::Result<String, CursorError> {
        match self.get_value(column)? {
            Value::Text(text) => Ok(text.clone()),
            Value::Integer(value) => Ok(value.to_string()),
            value @ (Value::Null | Value::Opaque(_)) => {
                Err(self.conversion_error(column, value, "string"))
            }
        }
    }

    pub fn get_integer(&self, column: &str) -> std::result::Result<i64, CursorError> {
        match self.get_value(column)? {
            Value::Integer(value) => Ok(*value),
            value @ Value::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| self.conversion_error(column, value, "integer")),
            value @ (Value::Null | Value::Opaque(_)) => {
                Err(self.conversion_error(column, value, "integer"))
            }
        }
    }

    fn current_row(&self, column: &str) -> std::result::Result<usize, CursorError> {
        match self.position {
            Position::On(row) => Ok(row),
            Position::BeforeFirst => Err(CursorError::State {
                state: "before the first row",
                column: column.to_string(),
            }),
            Position::Exhausted => Err(CursorError::State {
                state: "exhausted",
                column: column.to_string(),
            }),
        }
    }

    fn conversion_error(&self, column: &str, value: &Value, target: &'static str) -> CursorError {
        CursorError::TypeConversion {
            row: self.row_index().unwrap_or_default(),
            column: column.to_string(),
            value: value.clone(),
            target,
        }
    }
}

/// Turns cursor rows into domain entities without knowing how the table
/// stores them.
pub trait EntityFactory<T> {
    fn create(&self, cursor: &mut ResultCursor<'_>) -> Result<Vec<T>>;
}

impl<T, F> EntityFactory<T> for F
where
    F: Fn(&mut ResultCursor<'_>) -> Result<Vec<T>>,
{
    fn create(&self, cursor: &mut ResultCursor<'_>) -> Result<Vec<T>> {
        self(cursor)
    }
}

pub fn table_to_entities<T>(table: &Table, factory: &dyn EntityFactory<T>) -> Result<Vec<T>> {
    let mut cursor = ResultCursor::new(table);
    factory.create(&mut cursor)
}
