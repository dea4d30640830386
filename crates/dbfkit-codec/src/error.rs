use crate::column::ColumnType;

/// Errors that can occur while encoding or decoding table bytes.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The buffer is shorter than a required fixed region.
    #[error("input truncated ({actual} bytes, need {needed})")]
    TruncatedInput { needed: usize, actual: usize },

    /// A column descriptor is not exactly 32 bytes.
    #[error("invalid column descriptor ({0} bytes, expected 32)")]
    InvalidColumnData(usize),

    /// The descriptor's type byte is outside the supported set.
    #[error("column type 0x{0:02X} is not supported")]
    UnsupportedColumnType(u8),

    /// A row or column index, or a byte offset, is past the end of storage.
    #[error("index {index} is out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// No column with the given name.
    #[error("field name {0:?} does not exist")]
    InvalidFieldName(String),

    /// A typed accessor was used on a column of another type.
    #[error("field {column:?} is {actual}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: ColumnType,
    },

    /// A typed accessor was used on an empty value.
    #[error("field {0:?} is empty")]
    EmptyField(String),

    /// Stored text is not a valid boolean, date or number for its column.
    #[error("invalid value {value:?} for field {column:?}")]
    InvalidValue { column: String, value: String },

    /// Integer text failed to parse.
    #[error("invalid integer: {0}")]
    InvalidInteger(#[from] std::num::ParseIntError),

    /// Float text failed to parse.
    #[error("invalid float: {0}")]
    InvalidFloat(#[from] std::num::ParseFloatError),

    /// The column layout no longer fits the header's 16-bit size fields.
    #[error("{what} of {size} bytes exceeds the format limit")]
    LayoutOverflow { what: &'static str, size: usize },

    /// Text could not be transcoded.
    #[error("charset error: {0}")]
    Charset(#[from] dbfkit_charset::CharsetError),
}

pub type Result<T> = std::result::Result<T, CodecError>;
