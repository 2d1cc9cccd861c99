//! YAML data sets:
//!
//! ```yaml
//! users:
//!   columns: [id, name]
//!   rows:
//!     - [1, Alice]
//!     - [2, ~]
//! ```
//!
//! Tables keep document order. Integers become [`Value::Integer`], `~`
//! becomes null, and every other scalar is kept as text.

use dbfixture_core::{Column, DataSet, FormatError, Result, Table, TableMetadata, Value};
use serde::Deserialize;
use serde_yaml::{Mapping, Value as YamlValue};

pub(crate) const FORMAT: &str = "yaml";
const DATA_SET_SOURCE_LABEL: &str = "yaml data set";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableDocument {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<YamlValue>>,
}

pub fn load_data_set_from_str(yaml: &str) -> Result<DataSet> {
    let document: YamlValue = serde_yaml::from_str(yaml)
        .map_err(|source| parse_yaml_error(DATA_SET_SOURCE_LABEL, source))?;
    load_data_set_from_value(&document)
}

/// Builds a data set from an already parsed YAML mapping; `null` is an empty
/// data set.
pub fn load_data_set_from_value(document: &YamlValue) -> Result<DataSet> {
    let empty = Mapping::new();
    let tables = match document {
        YamlValue::Null => &empty,
        YamlValue::Mapping(tables) => tables,
        other => {
            return Err(malformed(format!(
                "a data set must be a mapping of table names, found {}",
                kind_of(other)
            )));
        }
    };

    let mut data_set = DataSet::default();
    for (name, table) in tables {
        let name = name.as_str().ok_or_else(|| {
            malformed(format!(
                "table names must be strings, found {}",
                kind_of(name)
            ))
        })?;
        let table: TableDocument = serde_yaml::from_value(table.clone())
            .map_err(|source| parse_yaml_error(DATA_SET_SOURCE_LABEL, source))?;
        data_set.push(build_table(name, table)?)?;
    }
    Ok(data_set)
}

fn build_table(name: &str, document: TableDocument) -> Result<Table> {
    let columns = document.columns.into_iter().map(Column::unknown).collect();
    let metadata = TableMetadata::new(name, columns)?;

    let mut rows = Vec::with_capacity(document.rows.len());
    for (index, row) in document.rows.iter().enumerate() {
        let values = row
            .iter()
            .map(|cell| {
                to_value(cell).ok_or_else(|| {
                    malformed(format!(
                        "table `{name}` row[{index}] holds a {} where a scalar is expected",
                        kind_of(cell)
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(values);
    }
    Ok(Table::new(metadata, rows)?)
}

fn to_value(cell: &YamlValue) -> Option<Value> {
    match cell {
        YamlValue::Null => Some(Value::Null),
        YamlValue::Bool(flag) => Some(Value::Text(flag.to_string())),
        YamlValue::Number(number) => Some(
            number
                .as_i64()
                .map_or_else(|| Value::Text(number.to_string()), Value::Integer),
        ),
        YamlValue::String(text) => Some(Value::Text(text.clone())),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) | YamlValue::Tagged(_) => None,
    }
}

fn kind_of(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "boolean",
        YamlValue::Number(_) => "number",
        YamlValue::String(_) => "string",
        YamlValue::Sequence(_) => "sequence",
        YamlValue::Mapping(_) => "mapping",
        YamlValue::Tagged(_) => "tagged value",
    }
}

pub(crate) fn malformed(message: impl Into<String>) -> dbfixture_core::Error {
    FormatError::malformed(FORMAT, DATA_SET_SOURCE_LABEL, message).into()
}

pub(crate) fn parse_yaml_error(label: &str, source: serde_yaml::Error) -> dbfixture_core::Error {
    let location = source
        .location()
        .map(|location| format!("{label} line {} column {}", location.line(), location.column()))
        .unwrap_or_else(|| label.to_string());
    FormatError::io(FORMAT, location, source).into()
}
