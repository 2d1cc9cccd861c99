//! CSV directory data sets.
//!
//! A directory holds `table-ordering.txt`, listing one table name per line,
//! and one `<table>.csv` file per table with a header row. The literal
//! `null` marks a null cell.
//!
//! The marker is not escaped: a text cell holding exactly `null` is written
//! as the marker and loads back as a null cell.

use std::{fs, path::Path};

use dbfixture_core::{Column, DataSet, Result, Table, TableMetadata, Value};
use tracing::{debug, info};

use crate::support::Document;

const FORMAT: &str = "csv";
pub const TABLE_ORDERING_FILE: &str = "table-ordering.txt";
pub const NULL_LITERAL: &str = "null";

pub fn load_csv(directory: impl AsRef<Path>) -> Result<DataSet> {
    let directory = directory.as_ref();
    let ordering_path = directory.join(TABLE_ORDERING_FILE).display().to_string();
    let ordering_document = Document::new(FORMAT, &ordering_path);
    let ordering = fs::read_to_string(&ordering_path).map_err(|error| ordering_document.io(error))?;

    let mut data_set = DataSet::default();
    for name in ordering
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
    {
        let table_path = directory.join(format!("{name}.csv"));
        data_set.push(load_table(name, &table_path)?)?;
    }

    info!(
        directory = %directory.display(),
        tables = data_set.len(),
        "loaded csv data set"
    );
    Ok(data_set)
}

fn load_table(name: &str, path: &Path) -> Result<Table> {
    let display = path.display().to_string();
    let document = Document::new(FORMAT, &display);
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|error| document.io(error))?;

    let headers = reader.headers().map_err(|error| document.io(error))?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(document.malformed("missing header row").into());
    }

    let columns = headers
        .iter()
        .map(|header| Column::unknown(header.trim()))
        .collect();
    let metadata = TableMetadata::new(name, columns)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| document.io(error))?;
        rows.push(record.iter().map(parse_cell).collect());
    }

    debug!(table = name, rows = rows.len(), "read csv table");
    Ok(Table::new(metadata, rows)?)
}

fn parse_cell(raw: &str) -> Value {
    if raw == NULL_LITERAL {
        Value::Null
    } else {
        Value::from(raw)
    }
}

/// Writes `table-ordering.txt` plus one CSV file per table into `directory`,
/// creating the directory when needed.
pub fn write_csv(data_set: &DataSet, directory: impl AsRef<Path>) -> Result<()> {
    let directory = directory.as_ref();
    let directory_display = directory.display().to_string();
    let directory_document = Document::new(FORMAT, &directory_display);
    fs::create_dir_all(directory).map_err(|error| directory_document.io(error))?;

    let mut ordering = String::new();
    for table in data_set {
        write_table(table, &directory.join(format!("{}.csv", table.name())))?;
        ordering.push_str(table.name());
        ordering.push('\n');
    }

    let ordering_path = directory.join(TABLE_ORDERING_FILE);
    fs::write(&ordering_path, ordering).map_err(|error| directory_document.io(error))?;

    info!(
        directory = %directory_display,
        tables = data_set.len(),
        "wrote csv data set"
    );
    Ok(())
}

fn write_table(table: &Table, path: &Path) -> Result<()> {
    let display = path.display().to_string();
    let document = Document::new(FORMAT, &display);
    let mut writer = ::csv::Writer::from_path(path).map_err(|error| document.io(error))?;

    writer
        .write_record(table.columns().iter().map(|column| column.name.as_str()))
        .map_err(|error| document.io(error))?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(Value::to_string))
            .map_err(|error| document.io(error))?;
    }
    writer.flush().map_err(|error| document.io(error))?;
    Ok(())
}
