//! XLSX workbooks: one table per worksheet, named after the sheet, with the
//! first row as the header.
//!
//! Shared strings, inline strings, and numbers are all read as text; empty
//! cells are null. Rows without any value are skipped.

use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::Read,
    path::Path,
};

use dbfixture_core::{Column, DataSet, FormatError, Result, Table, TableMetadata, Value};
use quick_xml::events::Event;
use tracing::{debug, info};
use zip::{ZipArchive, result::ZipError};

use crate::support::{Document, configured_reader};

const FORMAT: &str = "xlsx";
const WORKBOOK_PATH: &str = "xl/workbook.xml";
const WORKBOOK_RELATIONSHIPS_PATH: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PATH: &str = "xl/sharedStrings.xml";
const WORKSHEET_RELATIONSHIP_SUFFIX: &str = "/worksheet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Number,
    SharedString,
    InlineString,
    Boolean,
    Error,
}

impl CellKind {
    fn from_attribute(raw: Option<&str>) -> Self {
        match raw {
            Some("s") => Self::SharedString,
            Some("inlineStr" | "str") => Self::InlineString,
            Some("b") => Self::Boolean,
            Some("e") => Self::Error,
            _ => Self::Number,
        }
    }
}

struct Workbook<'a> {
    document: Document<'a>,
    archive: ZipArchive<File>,
}

impl Workbook<'_> {
    /// Reads an archive entry; entry names match case-insensitively.
    fn entry(&mut self, name: &str) -> Result<Option<String>> {
        let wanted = name.replace('\\', "/");
        let Some(actual) = self
            .archive
            .file_names()
            .find(|candidate| candidate.eq_ignore_ascii_case(&wanted))
            .map(str::to_string)
        else {
            return Ok(None);
        };

        let mut file = match self.archive.by_name(&actual) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(error) => return Err(self.document.io(error).into()),
        };
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|error| self.document.io(error))?;
        Ok(Some(content))
    }

    fn required_entry(&mut self, name: &str) -> Result<String> {
        self.entry(name)?.ok_or_else(|| {
            self.document
                .malformed(format!("missing workbook part `{name}`"))
                .into()
        })
    }
}

pub fn load_spreadsheet(path: impl AsRef<Path>) -> Result<DataSet> {
    let path = path.as_ref().display().to_string();
    let document = Document::new(FORMAT, &path);
    let file = File::open(&path).map_err(|error| document.io(error))?;
    let archive = ZipArchive::new(file).map_err(|error| document.io(error))?;
    let mut workbook = Workbook { document, archive };

    let relationships_xml = workbook.required_entry(WORKBOOK_RELATIONSHIPS_PATH)?;
    let relationships = parse_relationships(&document, &relationships_xml)?;
    let workbook_xml = workbook.required_entry(WORKBOOK_PATH)?;
    let sheets = parse_sheets(&document, &workbook_xml, &relationships)?;
    let shared_strings = match workbook.entry(SHARED_STRINGS_PATH)? {
        Some(xml) => parse_shared_strings(&document, &xml)?,
        None => Vec::new(),
    };

    let mut data_set = DataSet::default();
    for (sheet_name, sheet_path) in sheets {
        let sheet_xml = workbook.required_entry(&sheet_path)?;
        let grid = parse_sheet(&document, &sheet_xml, &shared_strings)?;
        debug!(sheet = %sheet_name, rows = grid.len(), "read worksheet");
        data_set.push(grid_to_table(&sheet_name, grid)?)?;
    }

    info!(path = %path, tables = data_set.len(), "loaded spreadsheet data set");
    Ok(data_set)
}

fn parse_relationships(document: &Document<'_>, xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = configured_reader(xml);
    let mut relationships = HashMap::new();
    loop {
        match reader.read_event().map_err(|error| document.io(error))? {
            Event::Start(element) if element.local_name().as_ref() == b"Relationship" => {
                let kind = document.attribute(&element, "Type")?;
                if kind
                    .as_deref()
                    .is_some_and(|kind| !kind.ends_with(WORKSHEET_RELATIONSHIP_SUFFIX))
                {
                    continue;
                }
                let id = document.attribute(&element, "Id")?;
                let target = document.attribute(&element, "Target")?;
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id, to_archive_path(&target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(relationships)
}

fn to_archive_path(target: &str) -> String {
    let target = target.replace('\\', "/");
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}

fn parse_sheets(
    document: &Document<'_>,
    xml: &str,
    relationships: &HashMap<String, String>,
) -> Result<Vec<(String, String)>> {
    let mut reader = configured_reader(xml);
    let mut sheets = Vec::new();
    loop {
        match reader.read_event().map_err(|error| document.io(error))? {
            Event::Start(element) if element.local_name().as_ref() == b"sheet" => {
                let name = document.attribute(&element, "name")?;
                let id = document.attribute(&element, "id")?;
                let path = id.and_then(|id| relationships.get(&id).cloned());
                if let Some((name, path)) = name.zip(path) {
                    sheets.push((name, path));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if sheets.is_empty() {
        return Err(document.malformed("workbook has no worksheets").into());
    }
    Ok(sheets)
}

fn parse_shared_strings(document: &Document<'_>, xml: &str) -> Result<Vec<String>> {
    let mut reader = configured_reader(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut in_phonetic = false;
    loop {
        match reader.read_event().map_err(|error| document.io(error))? {
            Event::Start(element) => match element.local_name().as_ref() {
                b"si" => current.clear(),
                b"rPh" => in_phonetic = true,
                b"t" if !in_phonetic => in_text = true,
                _ => {}
            },
            Event::End(element) => match element.local_name().as_ref() {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(text) if in_text => document.push_text(&mut current, &text)?,
            Event::GeneralRef(reference) if in_text => {
                document.push_reference(&mut current, &reference)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(strings)
}

type Grid = BTreeMap<usize, BTreeMap<usize, String>>;

/// Zero-based index of column `XFD`, the last one a worksheet can hold.
const MAX_COLUMN_INDEX: usize = 16_383;

fn parse_sheet(document: &Document<'_>, xml: &str, shared_strings: &[String]) -> Result<Grid> {
    let mut reader = configured_reader(xml);
    let mut grid = Grid::new();

    let mut next_row = 0usize;
    let mut row = 0usize;
    let mut next_column = 0usize;
    let mut column = 0usize;
    let mut kind = CellKind::Number;
    let mut value = String::new();
    let mut in_value = false;

    loop {
        match reader.read_event().map_err(|error| document.io(error))? {
            Event::Start(element) => match element.local_name().as_ref() {
                b"row" => {
                    row = document
                        .attribute(&element, "r")?
                        .and_then(|raw| raw.parse::<usize>().ok())
                        .and_then(|number| number.checked_sub(1))
                        .unwrap_or(next_row);
                    next_row = row + 1;
                    next_column = 0;
                }
                b"c" => {
                    let reference = document.attribute(&element, "r")?;
                    column = reference
                        .as_deref()
                        .and_then(column_index)
                        .unwrap_or(next_column);
                    if column > MAX_COLUMN_INDEX {
                        return Err(document
                            .malformed(format!(
                                "cell `{}` lies beyond the last worksheet column XFD",
                                reference.as_deref().unwrap_or_default()
                            ))
                            .into());
                    }
                    next_column = column + 1;
                    let raw_kind = document.attribute(&element, "t")?;
                    kind = CellKind::from_attribute(raw_kind.as_deref());
                    value.clear();
                }
                b"v" | b"t" => in_value = true,
                _ => {}
            },
            Event::End(element) => match element.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let Some(cell) = resolve_cell(document, kind, &value, shared_strings)? {
                        grid.entry(row).or_default().insert(column, cell);
                    }
                }
                _ => {}
            },
            Event::Text(text) if in_value => document.push_text(&mut value, &text)?,
            Event::GeneralRef(reference) if in_value => {
                document.push_reference(&mut value, &reference)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(grid)
}

fn resolve_cell(
    document: &Document<'_>,
    kind: CellKind,
    raw: &str,
    shared_strings: &[String],
) -> std::result::Result<Option<String>, FormatError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let resolved = match kind {
        CellKind::SharedString => {
            let index = raw
                .trim()
                .parse::<usize>()
                .map_err(|error| document.io(error))?;
            shared_strings.get(index).cloned().ok_or_else(|| {
                document.malformed(format!("shared string index {index} is out of range"))
            })?
        }
        CellKind::Boolean => match raw.trim() {
            "1" => "true".to_string(),
            _ => "false".to_string(),
        },
        CellKind::Error => return Ok(None),
        CellKind::Number | CellKind::InlineString => raw.to_string(),
    };
    Ok(Some(resolved))
}

/// Zero-based column index of an `A1`-style reference; saturates instead of
/// overflowing on absurdly long references.
fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .collect();
    if letters.is_empty() {
        return None;
    }

    letters
        .iter()
        .fold(0usize, |index, letter| {
            let digit = usize::from(letter.to_ascii_uppercase() - b'A') + 1;
            index.saturating_mul(26).saturating_add(digit)
        })
        .checked_sub(1)
}

fn grid_to_table(name: &str, mut grid: Grid) -> Result<Table> {
    let Some((_, header)) = grid.pop_first() else {
        return Ok(Table::empty(TableMetadata::new(name, Vec::new())?));
    };

    let width = header.keys().next_back().map_or(0, |last| last + 1);
    let columns = (0..width)
        .map(|index| {
            header
                .get(&index)
                .map(|title| Column::unknown(title.trim()))
                .unwrap_or_else(|| Column::unknown(format!("column_{}", index + 1)))
        })
        .collect();
    let metadata = TableMetadata::new(name, columns)?;

    let rows = grid
        .into_values()
        .map(|cells| {
            (0..width)
                .map(|index| {
                    cells
                        .get(&index)
                        .map_or(Value::Null, |cell| Value::from(cell.as_str()))
                })
                .collect()
        })
        .collect();
    Ok(Table::new(metadata, rows)?)
}

#[cfg(test)]
mod tests {
    use super::{column_index, to_archive_path};

    #[test]
    fn column_references_map_to_zero_based_indexes() {
        assert_eq!(column_index("A1"), Some(0));
        assert_eq!(column_index("Z9"), Some(25));
        assert_eq!(column_index("AA10"), Some(26));
        assert_eq!(column_index("ab3"), Some(27));
        assert_eq!(column_index("17"), None);
        assert_eq!(column_index("XFD1"), Some(16_383));
        assert!(column_index("ZZZZZZZZZZZZZZZZZZ1") > Some(16_383));
    }

    #[test]
    fn relationship_targets_resolve_inside_archive() {
        assert_eq!(to_archive_path("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(to_archive_path("/xl/worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
    }
}
