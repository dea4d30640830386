use std::fmt;

use dbfkit_charset::Charset;

use crate::error::{CodecError, Result};
use crate::header::HEADER_TERMINATOR;

/// Size of one column descriptor.
pub const DESCRIPTOR_SIZE: usize = 32;

/// Maximum stored length of a column name, in encoded bytes.
pub const MAX_NAME_LEN: usize = 10;

const TYPE_OFFSET: usize = 11;
const LENGTH_OFFSET: usize = 16;
const DECIMALS_OFFSET: usize = 17;

/// Supported column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnType {
    /// `C`: codepage text.
    Text,
    /// `L`: logical, stored as `T`/`F`.
    Bool,
    /// `D`: date, stored as `YYYYMMDD`.
    Date,
    /// `N`: fixed-point number.
    Number,
    /// `F`: floating-point number.
    Float,
    /// `M`: memo block reference. The memo file itself is not read.
    Memo,
}

impl ColumnType {
    /// The descriptor type byte.
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Text => b'C',
            Self::Bool => b'L',
            Self::Date => b'D',
            Self::Number => b'N',
            Self::Float => b'F',
            Self::Memo => b'M',
        }
    }

    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Float)
    }

    /// Left-justified types are padded with spaces on the right; all others
    /// are right-justified against the end of the field.
    pub const fn is_left_justified(self) -> bool {
        matches!(self, Self::Text | Self::Bool | Self::Date)
    }
}

impl TryFrom<u8> for ColumnType {
    type Error = CodecError;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            b'C' => Ok(Self::Text),
            b'L' => Ok(Self::Bool),
            b'D' => Ok(Self::Date),
            b'N' => Ok(Self::Number),
            b'F' => Ok(Self::Float),
            b'M' => Ok(Self::Memo),
            other => Err(CodecError::UnsupportedColumnType(other)),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "Text",
            Self::Bool => "Bool",
            Self::Date => "Date",
            Self::Number => "Number",
            Self::Float => "Float",
            Self::Memo => "Memo",
        };
        f.write_str(name)
    }
}

/// One column descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    name: String,
    column_type: ColumnType,
    length: u8,
    decimal_places: u8,
    index: usize,
}

impl Column {
    /// Create a descriptor. The ordinal index is assigned by [`Columns::push`].
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        length: u8,
        decimal_places: u8,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
            length,
            decimal_places,
            index: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Field width in bytes.
    pub fn length(&self) -> usize {
        usize::from(self.length)
    }

    /// Decimal places. Only meaningful for numeric columns.
    pub fn decimal_places(&self) -> usize {
        usize::from(self.decimal_places)
    }

    /// Ordinal position within the table.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// The ordered column list of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Columns(Vec<Column>);

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, assigning its ordinal index.
    pub fn push(&mut self, mut column: Column) -> &Column {
        let index = self.0.len();
        column.index = index;
        self.0.push(column);
        &self.0[index]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Column> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Column] {
        &self.0
    }

    /// Sum of all column widths, excluding the deletion marker.
    pub fn row_length(&self) -> usize {
        self.0.iter().map(Column::length).sum()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(Column::name).collect()
    }

    /// Index of the column with this name, compared case-insensitively.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|c| names_match(c.name(), name))
    }

    /// Offset of a column's value within a record, after the deletion marker.
    pub fn offset_of(&self, index: usize) -> Option<usize> {
        if index >= self.0.len() {
            return None;
        }
        Some(self.0[..index].iter().map(Column::length).sum())
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Column names are compared without regard to case.
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || a.to_uppercase() == b.to_uppercase()
}

/// Parse one 32-byte descriptor.
///
/// The name is cut at its first NUL: short names are NUL-terminated and the
/// bytes after the terminator may hold leftovers from earlier names.
pub fn parse_column(src: &[u8], charset: &Charset) -> Result<Column> {
    if src.len() != DESCRIPTOR_SIZE {
        return Err(CodecError::InvalidColumnData(src.len()));
    }

    let raw_name = &src[..MAX_NAME_LEN];
    let raw_name = match raw_name.iter().position(|&b| b == 0) {
        Some(end) => &raw_name[..end],
        None => raw_name,
    };
    let name = charset.decode(raw_name)?;
    let name = name.trim_end_matches(['\0', ' ']).to_string();

    let column_type = ColumnType::try_from(src[TYPE_OFFSET])?;

    Ok(Column {
        name,
        column_type,
        length: src[LENGTH_OFFSET],
        decimal_places: src[DECIMALS_OFFSET],
        index: 0,
    })
}

/// Parse the descriptor region that follows the 32-byte preamble.
///
/// Stops at the `0x0D` terminator or the end of `src`. The first bad
/// descriptor fails the whole parse.
pub fn parse_columns(src: &[u8], descriptor_size: usize, charset: &Charset) -> Result<Columns> {
    let mut columns = Columns::new();
    if descriptor_size == 0 {
        return Err(CodecError::InvalidColumnData(0));
    }

    for chunk in src.chunks(descriptor_size) {
        if chunk.first() == Some(&HEADER_TERMINATOR) {
            break;
        }
        let column = columns.push(parse_column(chunk, charset)?);
        tracing::trace!(
            index = column.index(),
            name = %column.name(),
            column_type = %column.column_type(),
            length = column.length(),
            "parsed column descriptor"
        );
    }

    Ok(columns)
}

/// Encode a descriptor.
///
/// The name is encoded with `charset`, truncated to 10 bytes and NUL-padded;
/// byte 10 is always NUL and all reserved bytes are zero.
pub fn serialize_column(column: &Column, charset: &Charset) -> Result<[u8; DESCRIPTOR_SIZE]> {
    let mut out = [0u8; DESCRIPTOR_SIZE];

    let name = charset.encode(column.name())?;
    let len = name.len().min(MAX_NAME_LEN);
    out[..len].copy_from_slice(&name[..len]);

    out[TYPE_OFFSET] = column.column_type.as_byte();
    out[LENGTH_OFFSET] = column.length;
    out[DECIMALS_OFFSET] = column.decimal_places;
    Ok(out)
}

/// The name as it will read back after being stored.
///
/// Encodes, cuts at the first NUL and at 10 bytes, then decodes again, backing
/// off further when the cut splits a multi-byte character. Names carrying
/// control bytes are rejected: a leading `0x0D` would read back as the
/// descriptor terminator.
pub fn normalize_name(name: &str, charset: &Charset) -> Result<String> {
    let encoded = charset.encode(name)?;
    let encoded = match encoded.iter().position(|&b| b == 0) {
        Some(end) => &encoded[..end],
        None => &encoded[..],
    };
    let mut end = encoded.len().min(MAX_NAME_LEN);
    if encoded[..end].iter().any(u8::is_ascii_control) {
        return Err(CodecError::InvalidFieldName(name.to_string()));
    }
    loop {
        match charset.decode(&encoded[..end]) {
            Ok(decoded) => return Ok(decoded.trim_end_matches(['\0', ' ']).to_string()),
            Err(err) if end == 0 => return Err(err.into()),
            Err(_) => end -= 1,
        }
    }
}
