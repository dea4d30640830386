use std::fmt;

use dbfkit_charset::Charset;

use crate::column::{names_match, Columns};
use crate::error::{CodecError, Result};
use crate::field::{decode_field, Field};

/// Deletion marker of a live record.
pub const ACTIVE_MARKER: u8 = 0x20;

/// Deletion marker of a soft-deleted record.
pub const DELETED_MARKER: u8 = 0x2A;

/// One decoded record, a field per column in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    fields: Vec<Field<'a>>,
}

impl<'a> Row<'a> {
    pub fn field(&self, index: usize) -> Result<&Field<'a>> {
        self.fields.get(index).ok_or(CodecError::IndexOutOfBounds {
            index,
            len: self.fields.len(),
        })
    }

    pub fn field_by_name(&self, name: &str) -> Result<&Field<'a>> {
        self.fields
            .iter()
            .find(|f| names_match(f.name(), name))
            .ok_or_else(|| CodecError::InvalidFieldName(name.to_string()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field<'a>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The row's values as plain strings.
    pub fn values(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.value().to_string()).collect()
    }
}

impl<'r, 'a> IntoIterator for &'r Row<'a> {
    type Item = &'r Field<'a>;
    type IntoIter = std::slice::Iter<'r, Field<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} -> {}", field.name(), field.value())?;
        }
        f.write_str("]")
    }
}

/// Decode a record's fields.
///
/// `src` starts after the deletion marker and must cover every column.
pub fn parse_row<'a>(src: &[u8], columns: &'a Columns, charset: &Charset) -> Result<Row<'a>> {
    let mut fields = Vec::with_capacity(columns.len());
    let mut offset = 0usize;

    for column in columns {
        let end = offset + column.length();
        let raw = src.get(offset..end).ok_or(CodecError::IndexOutOfBounds {
            index: end,
            len: src.len(),
        })?;
        fields.push(Field::new(column, decode_field(raw, charset)?));
        offset = end;
    }

    Ok(Row { fields })
}
