//! File formats for data sets: CSV directories, flat XML, structured XML,
//! and XLSX workbooks.

mod csv;
mod flat_xml;
mod spreadsheet;
mod support;
mod xml;

use std::{fmt, path::Path};

use dbfixture_core::{DataSet, FormatError, Result};

pub use crate::csv::{NULL_LITERAL, TABLE_ORDERING_FILE, load_csv, write_csv};
pub use crate::flat_xml::{load_flat_xml, write_flat_xml};
pub use crate::spreadsheet::load_spreadsheet;
pub use crate::xml::load_xml;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Csv,
    FlatXml,
    Xml,
    Spreadsheet,
}

impl Format {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::FlatXml => "flat-xml",
            Self::Xml => "xml",
            Self::Spreadsheet => "xlsx",
        }
    }

    /// Guesses the format from the path: directories are CSV data sets,
    /// `.xml` files are flat XML, and `.xlsx` files are workbooks.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            return Some(Self::Csv);
        }

        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("xml") {
            Some(Self::FlatXml)
        } else if extension.eq_ignore_ascii_case("xlsx") {
            Some(Self::Spreadsheet)
        } else {
            None
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn load(format: Format, path: impl AsRef<Path>) -> Result<DataSet> {
    match format {
        Format::Csv => load_csv(path),
        Format::FlatXml => load_flat_xml(path),
        Format::Xml => load_xml(path),
        Format::Spreadsheet => load_spreadsheet(path),
    }
}

pub fn write(format: Format, data_set: &DataSet, path: impl AsRef<Path>) -> Result<()> {
    match format {
        Format::Csv => write_csv(data_set, path),
        Format::FlatXml => write_flat_xml(data_set, path),
        Format::Xml | Format::Spreadsheet => Err(FormatError::malformed(
            format.as_str(),
            path.as_ref().display().to_string(),
            "writing is not supported for this format",
        )
        .into()),
    }
}
