//! Header, column descriptor and record codecs for dBase (.dbf) tables.
//!
//! A table file is laid out as:
//! - a 32-byte header (of which the first 12 bytes are interpreted here)
//! - one 32-byte descriptor per column, closed by a `0x0D` terminator
//! - fixed-width records, each a 1-byte deletion marker plus the column values
//! - a single `0x1A` end-of-file byte
//!
//! Everything in this crate works on borrowed byte slices. Owning the byte
//! store and enforcing when the schema may change is the table layer's job.

pub mod column;
pub mod error;
pub mod field;
pub mod header;
pub mod row;
pub mod value;

pub use column::{
    names_match, normalize_name, parse_column, parse_columns, serialize_column, Column,
    ColumnType, Columns, DESCRIPTOR_SIZE, MAX_NAME_LEN,
};
pub use error::{CodecError, Result};
pub use field::{decode_field, encode_field_for_write, justify_into, Field};
pub use header::{
    Header, Version, EOF_MARKER, HEADER_FIELDS_SIZE, HEADER_TERMINATOR, PREAMBLE_SIZE,
};
pub use row::{parse_row, Row, ACTIVE_MARKER, DELETED_MARKER};
pub use value::Value;
