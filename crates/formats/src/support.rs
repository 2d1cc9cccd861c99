//! Document-scoped error mapping and quick-xml plumbing shared by the adapters.

use std::{borrow::Cow, error::Error as StdError};

use dbfixture_core::FormatError;
use quick_xml::{
    Reader,
    escape::resolve_xml_entity,
    events::{BytesRef, BytesStart, BytesText},
};

pub(crate) fn configured_reader(content: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(content);
    let config = reader.config_mut();
    config.expand_empty_elements = true;
    config.check_end_names = true;
    config.trim_text(false);
    reader
}

/// Binds a format tag and file path so every failure names the document.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Document<'a> {
    pub(crate) format: &'static str,
    pub(crate) path: &'a str,
}

impl<'a> Document<'a> {
    pub(crate) const fn new(format: &'static str, path: &'a str) -> Self {
        Self { format, path }
    }

    pub(crate) fn io<E>(&self, source: E) -> FormatError
    where
        E: StdError + Send + Sync + 'static,
    {
        FormatError::io(self.format, self.path, source)
    }

    pub(crate) fn malformed(&self, message: impl Into<String>) -> FormatError {
        FormatError::malformed(self.format, self.path, message)
    }

    pub(crate) fn element_name(&self, element: &BytesStart<'_>) -> Result<String, FormatError> {
        std::str::from_utf8(element.local_name().as_ref())
            .map(str::to_string)
            .map_err(|error| self.io(error))
    }

    pub(crate) fn attribute(
        &self,
        element: &BytesStart<'_>,
        name: &str,
    ) -> Result<Option<String>, FormatError> {
        for attribute in element.attributes() {
            let attribute = attribute.map_err(|error| self.io(error))?;
            if attribute.key.local_name().as_ref() == name.as_bytes() {
                let value = attribute.unescape_value().map_err(|error| self.io(error))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    /// All attributes in document order, values unescaped.
    pub(crate) fn attributes(
        &self,
        element: &BytesStart<'_>,
    ) -> Result<Vec<(String, String)>, FormatError> {
        let mut pairs = Vec::new();
        for attribute in element.attributes() {
            let attribute = attribute.map_err(|error| self.io(error))?;
            let key = std::str::from_utf8(attribute.key.as_ref())
                .map_err(|error| self.io(error))?
                .to_string();
            let value = attribute.unescape_value().map_err(|error| self.io(error))?;
            pairs.push((key, value.into_owned()));
        }
        Ok(pairs)
    }

    pub(crate) fn push_text(
        &self,
        target: &mut String,
        text: &BytesText<'_>,
    ) -> Result<(), FormatError> {
        let content: Cow<'_, str> = text.xml_content().map_err(|error| self.io(error))?;
        target.push_str(&content);
        Ok(())
    }

    /// Appends an entity or character reference such as `&amp;` or `&#x41;`.
    pub(crate) fn push_reference(
        &self,
        target: &mut String,
        reference: &BytesRef<'_>,
    ) -> Result<(), FormatError> {
        let raw = reference.xml_content().map_err(|error| self.io(error))?;
        if let Some(number) = raw.strip_prefix('#') {
            let code = match number.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => number.parse::<u32>(),
            }
            .map_err(|error| self.io(error))?;
            let character = char::from_u32(code)
                .ok_or_else(|| self.malformed(format!("invalid character reference `&{raw};`")))?;
            target.push(character);
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            target.push_str(entity);
        } else {
            return Err(self.malformed(format!("unknown entity `&{raw};`")));
        }
        Ok(())
    }
}

pub(crate) fn read_to_string(document: &Document<'_>) -> Result<String, FormatError> {
    std::fs::read_to_string(document.path).map_err(|error| document.io(error))
}
