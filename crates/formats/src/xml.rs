//! Structured XML data sets with explicit column declarations:
//!
//! ```xml
//! <dataset>
//!   <table name="users">
//!     <column>id</column>
//!     <column>name</column>
//!     <row><value>1</value><null/></row>
//!   </table>
//! </dataset>
//! ```

use std::path::Path;

use dbfixture_core::{Column, DataSet, Result, Table, TableMetadata, Value};
use quick_xml::events::Event;
use tracing::info;

use crate::support::{Document, configured_reader, read_to_string};

const FORMAT: &str = "xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    Column,
    Value,
}

#[derive(Debug, Default)]
struct TableDraft {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TableDraft {
    fn finish(self) -> Result<Table> {
        let columns = self.columns.into_iter().map(Column::unknown).collect();
        let metadata = TableMetadata::new(self.name, columns)?;
        Ok(Table::new(metadata, self.rows)?)
    }
}

pub fn load_xml(path: impl AsRef<Path>) -> Result<DataSet> {
    let path = path.as_ref().display().to_string();
    let document = Document::new(FORMAT, &path);
    let content = read_to_string(&document)?;
    let mut reader = configured_reader(&content);

    let mut data_set = DataSet::default();
    let mut table: Option<TableDraft> = None;
    let mut row: Option<Vec<Value>> = None;
    let mut capture = Capture::None;
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(|error| document.io(error))? {
            Event::Start(element) => {
                let name = document.element_name(&element)?;
                match (name.as_str(), table.is_some(), row.is_some()) {
                    ("dataset", false, false) => {}
                    ("table", false, false) => {
                        let table_name = document
                            .attribute(&element, "name")?
                            .ok_or_else(|| document.malformed("<table> requires a name attribute"))?;
                        table = Some(TableDraft {
                            name: table_name,
                            ..TableDraft::default()
                        });
                    }
                    ("column", true, false) => {
                        capture = Capture::Column;
                        text.clear();
                    }
                    ("row", true, false) => row = Some(Vec::new()),
                    ("value", true, true) => {
                        capture = Capture::Value;
                        text.clear();
                    }
                    ("null", true, true) => {
                        if let Some(values) = row.as_mut() {
                            values.push(Value::Null);
                        }
                    }
                    (other, _, _) => {
                        return Err(document
                            .malformed(format!("unexpected element <{other}>"))
                            .into());
                    }
                }
            }
            Event::Text(content) if capture != Capture::None => {
                document.push_text(&mut text, &content)?;
            }
            Event::CData(content) if capture != Capture::None => {
                let raw = content.xml_content().map_err(|error| document.io(error))?;
                text.push_str(&raw);
            }
            Event::GeneralRef(reference) if capture != Capture::None => {
                document.push_reference(&mut text, &reference)?;
            }
            Event::End(element) => match element.local_name().as_ref() {
                b"column" => {
                    if let Some(draft) = table.as_mut() {
                        draft.columns.push(text.trim().to_string());
                    }
                    capture = Capture::None;
                }
                b"value" => {
                    if let Some(values) = row.as_mut() {
                        values.push(Value::from(std::mem::take(&mut text)));
                    }
                    capture = Capture::None;
                }
                b"row" => {
                    if let (Some(draft), Some(values)) = (table.as_mut(), row.take()) {
                        draft.rows.push(values);
                    }
                }
                b"table" => {
                    if let Some(draft) = table.take() {
                        data_set.push(draft.finish()?)?;
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    info!(path = %path, tables = data_set.len(), "loaded xml data set");
    Ok(data_set)
}
