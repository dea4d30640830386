use dbfkit_codec::CodecError;

/// Errors that can occur while loading or mutating a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Header, descriptor or field codec error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A column was added after data entry began.
    #[error("schema is locked once data entry has started")]
    SchemaLocked,

    /// A column with the same (normalized) name already exists.
    #[error("field name {0:?} already exists")]
    DuplicateFieldName(String),

    /// No column with the given name, or the name is empty once stored.
    #[error("invalid field name {0:?}")]
    InvalidFieldName(String),

    /// A row or column index is past the end of the table.
    #[error("index {index} is out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The header declares records too small for its columns.
    #[error("record size {declared} is smaller than column layout ({computed} bytes)")]
    RecordSizeMismatch { declared: usize, computed: usize },

    /// The header size cannot hold the preamble and terminator.
    #[error("invalid header size {0}")]
    InvalidHeaderSize(usize),

    /// Reading or writing the serialized table failed.
    #[error("table I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TableError>;
