//! Flat XML data sets: one element per row, named after its table, with
//! one attribute per non-null column.
//!
//! ```xml
//! <dataset>
//!   <users id="1" name="Alice"/>
//!   <orders/>
//! </dataset>
//! ```

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use dbfixture_core::{Column, DataSet, Result, Table, TableMetadata, Value};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, Event},
};
use tracing::{debug, info};

use crate::support::{Document, configured_reader, read_to_string};

const FORMAT: &str = "flat-xml";
const ROOT: &str = "dataset";

#[derive(Debug, Default)]
struct PendingTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<(String, String)>>,
}

impl PendingTable {
    fn add_row(&mut self, attributes: Vec<(String, String)>) {
        for (column, _) in &attributes {
            if !self
                .columns
                .iter()
                .any(|seen| seen.eq_ignore_ascii_case(column))
            {
                self.columns.push(column.clone());
            }
        }
        if !attributes.is_empty() {
            self.rows.push(attributes);
        }
    }

    fn into_table(self) -> Result<Table> {
        let columns = self.columns.iter().cloned().map(Column::unknown).collect();
        let metadata = TableMetadata::new(&self.name, columns)?;
        let rows = self
            .rows
            .into_iter()
            .map(|attributes| {
                self.columns
                    .iter()
                    .map(|column| {
                        attributes
                            .iter()
                            .find(|(key, _)| key.eq_ignore_ascii_case(column))
                            .map_or(Value::Null, |(_, value)| Value::from(value.as_str()))
                    })
                    .collect()
            })
            .collect();
        Ok(Table::new(metadata, rows)?)
    }
}

/// Columns are the union of the attributes seen for a table, in order of
/// first appearance; attributes missing from a row read as null. Rows of the
/// same table may be interleaved with other tables.
pub fn load_flat_xml(path: impl AsRef<Path>) -> Result<DataSet> {
    let path = path.as_ref().display().to_string();
    let document = Document::new(FORMAT, &path);
    let content = read_to_string(&document)?;
    let mut reader = configured_reader(&content);

    let mut tables: Vec<PendingTable> = Vec::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event().map_err(|error| document.io(error))? {
            Event::Start(element) => {
                depth += 1;
                match depth {
                    1 => {
                        let name = document.element_name(&element)?;
                        if name != ROOT {
                            return Err(document
                                .malformed(format!(
                                    "expected <{ROOT}> root element, found <{name}>"
                                ))
                                .into());
                        }
                    }
                    2 => {
                        let name = document.element_name(&element)?;
                        let attributes = document.attributes(&element)?;
                        let position = tables
                            .iter()
                            .position(|table| table.name.eq_ignore_ascii_case(&name));
                        let table = match position {
                            Some(index) => &mut tables[index],
                            None => {
                                tables.push(PendingTable {
                                    name,
                                    ..PendingTable::default()
                                });
                                let last = tables.len() - 1;
                                &mut tables[last]
                            }
                        };
                        table.add_row(attributes);
                    }
                    _ => {
                        return Err(document
                            .malformed("row elements must not have children")
                            .into());
                    }
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    let mut data_set = DataSet::default();
    for table in tables {
        data_set.push(table.into_table()?)?;
    }
    info!(path = %path, tables = data_set.len(), "loaded flat xml data set");
    Ok(data_set)
}

/// Writes one element per row; null cells are omitted and an empty table is
/// written as a single attribute-less element.
///
/// A row whose cells are all null has no attributes left and would read back
/// as an empty table declaration, so it is rejected before the file is
/// created.
pub fn write_flat_xml(data_set: &DataSet, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().display().to_string();
    let document = Document::new(FORMAT, &path);
    reject_all_null_rows(&document, data_set)?;
    let file = File::create(&path).map_err(|error| document.io(error))?;
    let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|error| document.io(error))?;
    writer
        .write_event(Event::Start(BytesStart::new(ROOT)))
        .map_err(|error| document.io(error))?;

    for table in data_set {
        debug!(table = table.name(), rows = table.row_count(), "writing flat xml table");
        if table.is_empty() {
            writer
                .write_event(Event::Empty(BytesStart::new(table.name())))
                .map_err(|error| document.io(error))?;
            continue;
        }

        for row in table.rows() {
            let mut element = BytesStart::new(table.name());
            for (column, value) in table.columns().iter().zip(row) {
                if value.is_null() {
                    continue;
                }
                let rendered = value.to_string();
                element.push_attribute((column.name.as_str(), rendered.as_str()));
            }
            writer
                .write_event(Event::Empty(element))
                .map_err(|error| document.io(error))?;
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT)))
        .map_err(|error| document.io(error))?;
    writer
        .into_inner()
        .flush()
        .map_err(|error| document.io(error))?;

    info!(path = %path, tables = data_set.len(), "wrote flat xml data set");
    Ok(())
}

fn reject_all_null_rows(document: &Document<'_>, data_set: &DataSet) -> Result<()> {
    for table in data_set {
        if let Some(index) = table
            .rows()
            .position(|row| row.iter().all(Value::is_null))
        {
            return Err(document
                .malformed(format!(
                    "table `{}` row[{index}] has only null cells and cannot be written as flat xml",
                    table.name()
                ))
                .into());
        }
    }
    Ok(())
}
