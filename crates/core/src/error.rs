use std::error::Error as StdError;

use thiserror::Error;

use crate::Value;

pub type Result<T> = std::result::Result<T, Error>;

pub type BoxedSourceError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    DataSet(#[from] DataSetError),
    #[error(transparent)]
    Assertion(#[from] AssertionError),
    #[error(transparent)]
    Cursor(#[from] CursorError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSetError {
    #[error("table `{table}` has no column `{column}`")]
    UnknownColumn { table: String, column: String },
    #[error("table `{table}` declares column `{column}` more than once")]
    DuplicateColumn { table: String, column: String },
    #[error("data set already contains a table named `{table}`")]
    DuplicateTable { table: String },
    #[error("data set has no table named `{table}`")]
    UnknownTable { table: String },
    #[error("table `{table}` row[{row}] has {actual} values but {expected} columns are declared")]
    RowArity {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("table `{table}` has {row_count} rows; row[{row}] is out of bounds")]
    RowIndexOutOfBounds {
        table: String,
        row: usize,
        row_count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
    #[error(
        "table `{table}` structure mismatch: expected columns [{}] with {expected_rows} rows, actual columns [{}] with {actual_rows} rows",
        .expected_columns.join(", "),
        .actual_columns.join(", ")
    )]
    StructureMismatch {
        table: String,
        expected_columns: Vec<String>,
        actual_columns: Vec<String>,
        expected_rows: usize,
        actual_rows: usize,
    },
    #[error(
        "table `{table}` row[{row}] column `{column}`: expected <{expected}> but was <{actual}>{}",
        additional_mismatches(.additional)
    )]
    CellMismatch {
        table: String,
        row: usize,
        column: String,
        expected: Value,
        actual: Value,
        additional: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("cursor is {state}; call next() and check it returned true before reading `{column}`")]
    State { state: &'static str, column: String },
    #[error("row[{row}] column `{column}`: cannot read <{value}> as {target}")]
    TypeConversion {
        row: usize,
        column: String,
        value: Value,
        target: &'static str,
    },
    #[error("cursor row has no column `{column}`")]
    UnknownColumn { column: String },
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to open connection to `{target}`: {source}")]
    Open {
        target: String,
        #[source]
        source: BoxedSourceError,
    },
    #[error("statement failed: sql=`{sql}`: {source}")]
    Statement {
        sql: String,
        #[source]
        source: BoxedSourceError,
    },
    #[error("failed to close connection: {source}")]
    Close {
        #[source]
        source: BoxedSourceError,
    },
}

impl ConnectionError {
    pub fn statement<E>(sql: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Statement {
            sql: sql.into(),
            source: Box::new(source),
        }
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{format} `{path}`: {message}")]
    Malformed {
        format: &'static str,
        path: String,
        message: String,
    },
    #[error("{format} `{path}`: {source}")]
    Io {
        format: &'static str,
        path: String,
        #[source]
        source: BoxedSourceError,
    },
}

impl FormatError {
    pub fn malformed(
        format: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            format,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io<E>(format: &'static str, path: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Io {
            format,
            path: path.into(),
            source: Box::new(source),
        }
    }
}

fn additional_mismatches(additional: &usize) -> String {
    match *additional {
        0 => String::new(),
        1 => " (and 1 more mismatching cell)".to_string(),
        count => format!(" (and {count} more mismatching cells)"),
    }
}
