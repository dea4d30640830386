use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use bytes::{BufMut, Bytes, BytesMut};
use chrono::{Local, NaiveDate};
use dbfkit_charset::Charset;
use dbfkit_codec::{
    decode_field, justify_into, normalize_name, parse_columns, parse_row, serialize_column,
    CodecError, Column, ColumnType, Columns, Field, Header, Row, Value, Version, ACTIVE_MARKER,
    DELETED_MARKER, DESCRIPTOR_SIZE, EOF_MARKER, HEADER_FIELDS_SIZE, HEADER_TERMINATOR,
    PREAMBLE_SIZE,
};

use crate::config::TableConfig;
use crate::error::{Result, TableError};

/// Header byte carrying the language-driver id. Some legacy writers use
/// byte 28 instead; this crate writes the standard dBase position.
const LANGUAGE_DRIVER_OFFSET: usize = 29;

/// Header bytes holding the little-endian record count.
const RECORD_COUNT_RANGE: Range<usize> = 4..8;

/// Whether the schema may still change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Columns may be added; no records exist yet.
    SchemaDefinition,
    /// Records may be appended and edited; columns are frozen.
    DataEntry,
}

/// A dBase table held entirely in memory.
///
/// Cloning copies the whole byte store.
#[derive(Clone)]
pub struct Table {
    header: Header,
    columns: Columns,
    field_map: HashMap<String, usize>,
    phase: Phase,
    config: TableConfig,
    store: BytesMut,
}

impl Table {
    /// Create an empty table whose text is stored in `charset`.
    pub fn new(charset: Charset) -> Self {
        Self::with_config(TableConfig::with_charset(charset))
    }

    /// Create an empty table with explicit configuration.
    ///
    /// The header is stamped with today's local date and the charset's
    /// language-driver id.
    pub fn with_config(config: TableConfig) -> Self {
        let header = Header::new_empty(Local::now().date_naive());

        let mut store = BytesMut::with_capacity(PREAMBLE_SIZE + 1);
        header.encode(&mut store);
        store.put_bytes(0, PREAMBLE_SIZE - HEADER_FIELDS_SIZE);
        store[LANGUAGE_DRIVER_OFFSET] = config.charset.language_driver();
        store.put_u8(HEADER_TERMINATOR);

        tracing::debug!(charset = config.charset.name(), "created empty table");

        Self {
            header,
            columns: Columns::new(),
            field_map: HashMap::new(),
            phase: Phase::SchemaDefinition,
            config,
            store,
        }
    }

    /// Load a table from its serialized bytes.
    pub fn from_bytes(src: &[u8], charset: Charset) -> Result<Self> {
        Self::from_bytes_with_config(src, TableConfig::with_charset(charset))
    }

    /// Load a table from its serialized bytes with explicit configuration.
    ///
    /// The loaded table is in [`Phase::DataEntry`] for good. Bytes after the
    /// last record (normally the `0x1A` end-of-file marker) are not kept.
    pub fn from_bytes_with_config(src: &[u8], config: TableConfig) -> Result<Self> {
        let header = Header::parse(src)?;

        let header_size = header.header_size();
        if header_size <= PREAMBLE_SIZE {
            return Err(TableError::InvalidHeaderSize(header_size));
        }
        ensure_len(src, header_size)?;

        let columns = parse_columns(
            &src[PREAMBLE_SIZE..header_size],
            DESCRIPTOR_SIZE,
            &config.charset,
        )?;

        let computed = columns.row_length() + 1;
        let declared = header.record_size();
        if declared < computed {
            return Err(TableError::RecordSizeMismatch { declared, computed });
        }
        if declared > computed {
            tracing::warn!(
                declared,
                computed,
                "record size larger than column layout; extra bytes ignored"
            );
        }

        let data_len = header
            .record_count()
            .checked_mul(declared)
            .and_then(|n| n.checked_add(header_size))
            .ok_or(CodecError::TruncatedInput {
                needed: usize::MAX,
                actual: src.len(),
            })?;
        ensure_len(src, data_len)?;

        let trailing = &src[data_len..];
        if !(trailing.is_empty() || trailing == [EOF_MARKER]) {
            tracing::warn!(
                trailing = trailing.len(),
                "dropping bytes after last record"
            );
        }

        let field_map = field_map(&columns)?;

        tracing::debug!(
            version = %header.version(),
            records = header.record_count(),
            columns = columns.len(),
            header_size,
            record_size = declared,
            "loaded table"
        );

        Ok(Self {
            field_map,
            header,
            columns,
            phase: Phase::DataEntry,
            config,
            store: BytesMut::from(&src[..data_len]),
        })
    }

    /// Serialize the table: the byte store followed by the end-of-file marker.
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.store.len() + 1);
        out.extend_from_slice(&self.store);
        out.put_u8(EOF_MARKER);
        tracing::debug!(
            bytes = out.len(),
            records = self.header.record_count(),
            "serialized table"
        );
        out.freeze()
    }

    // -- schema ---------------------------------------------------------------

    /// Add a column while the table is still in schema definition.
    ///
    /// The name is normalized to what will read back from the file (encoded,
    /// cut at the first NUL and to 10 bytes) and must be unique ignoring case.
    /// Names with control characters are rejected. Decimal places are dropped
    /// for non-numeric types.
    pub fn add_column(
        &mut self,
        name: &str,
        column_type: ColumnType,
        length: u8,
        decimal_places: u8,
    ) -> Result<&Column> {
        if self.phase != Phase::SchemaDefinition {
            return Err(TableError::SchemaLocked);
        }

        let normalized = match normalize_name(name, &self.config.charset) {
            Ok(normalized) => normalized,
            Err(CodecError::InvalidFieldName(_)) => {
                return Err(TableError::InvalidFieldName(name.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        if normalized.is_empty() {
            return Err(TableError::InvalidFieldName(name.to_string()));
        }
        if self.field_map.contains_key(&map_key(&normalized)) {
            return Err(TableError::DuplicateFieldName(normalized));
        }

        let decimal_places = if column_type.is_numeric() {
            decimal_places
        } else {
            0
        };

        let mut columns = self.columns.clone();
        let index = columns
            .push(Column::new(normalized.as_str(), column_type, length, decimal_places))
            .index();
        let mut header = self.header;
        header.update_after_schema_change(&columns)?;
        let store = self.schema_block(&header, &columns)?;

        self.header = header;
        self.columns = columns;
        self.store = store;
        self.field_map.insert(map_key(&normalized), index);

        tracing::debug!(
            column = %normalized,
            column_type = %column_type,
            length,
            header_size = self.header.header_size(),
            record_size = self.header.record_size(),
            "added column"
        );

        Ok(&self.columns.as_slice()[index])
    }

    pub fn add_text_column(&mut self, name: &str, length: u8) -> Result<&Column> {
        self.add_column(name, ColumnType::Text, length, 0)
    }

    pub fn add_bool_column(&mut self, name: &str) -> Result<&Column> {
        self.add_column(name, ColumnType::Bool, 1, 0)
    }

    pub fn add_date_column(&mut self, name: &str) -> Result<&Column> {
        self.add_column(name, ColumnType::Date, 8, 0)
    }

    pub fn add_number_column(&mut self, name: &str, length: u8, decimals: u8) -> Result<&Column> {
        self.add_column(name, ColumnType::Number, length, decimals)
    }

    pub fn add_float_column(&mut self, name: &str, length: u8, decimals: u8) -> Result<&Column> {
        self.add_column(name, ColumnType::Float, length, decimals)
    }

    /// Preamble, descriptors and terminator for a schema-phase table.
    fn schema_block(&self, header: &Header, columns: &Columns) -> Result<BytesMut> {
        let mut block = BytesMut::with_capacity(header.header_size());
        header.encode(&mut block);
        block.extend_from_slice(&self.store[HEADER_FIELDS_SIZE..PREAMBLE_SIZE]);
        for column in columns {
            block.extend_from_slice(&serialize_column(column, &self.config.charset)?);
        }
        block.put_u8(HEADER_TERMINATOR);
        Ok(block)
    }

    // -- records --------------------------------------------------------------

    /// Append an empty record and return its row index.
    ///
    /// The record is zero-filled behind an active deletion marker. The first
    /// append ends schema definition.
    pub fn append_row(&mut self) -> Result<usize> {
        let row = self.header.record_count();
        let count = u32::try_from(row + 1).map_err(|_| CodecError::LayoutOverflow {
            what: "record count",
            size: row + 1,
        })?;

        if self.phase == Phase::SchemaDefinition {
            tracing::debug!(columns = self.columns.len(), "schema locked by first record");
            self.phase = Phase::DataEntry;
        }

        let record_size = self.header.record_size();
        self.store.reserve(record_size);
        self.store.put_u8(ACTIVE_MARKER);
        self.store.put_bytes(0, record_size - 1);

        self.header.set_record_count(count);
        self.store[RECORD_COUNT_RANGE].copy_from_slice(&count.to_le_bytes());

        tracing::trace!(row, "appended record");
        Ok(row)
    }

    /// Whether the record carries the deleted marker (`0x2A`).
    pub fn row_is_deleted(&self, row: usize) -> Result<bool> {
        let start = self.record_start(row)?;
        Ok(self.store[start] == DELETED_MARKER)
    }

    /// Set or clear the record's deleted marker.
    pub fn set_row_deleted(&mut self, row: usize, deleted: bool) -> Result<()> {
        let start = self.record_start(row)?;
        self.store[start] = if deleted {
            DELETED_MARKER
        } else {
            ACTIVE_MARKER
        };
        Ok(())
    }

    /// Overwrite a field with `value`.
    ///
    /// The field is blank-filled, then the encoded value is justified into it
    /// per column type. Over-long values are truncated to the column width.
    pub fn set_field(&mut self, row: usize, column: usize, value: &str) -> Result<()> {
        let range = self.field_range(row, column)?;
        let column_type = self.column_at(column)?.column_type();
        let raw = self.config.charset.encode(value).map_err(CodecError::from)?;
        justify_into(column_type, &raw, &mut self.store[range]);
        Ok(())
    }

    pub fn set_field_by_name(&mut self, row: usize, name: &str, value: &str) -> Result<()> {
        let column = self.column_index(name)?;
        self.set_field(row, column, value)
    }

    /// Render a typed value for the column and store it.
    pub fn set_value(&mut self, row: usize, column: usize, value: impl Into<Value>) -> Result<()> {
        let text = value.into().to_field_text(self.column_at(column)?)?;
        self.set_field(row, column, &text)
    }

    pub fn set_value_by_name(
        &mut self,
        row: usize,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let column = self.column_index(name)?;
        self.set_value(row, column, value)
    }

    /// Decoded, trimmed text of a field.
    pub fn field_value(&self, row: usize, column: usize) -> Result<String> {
        let range = self.field_range(row, column)?;
        Ok(decode_field(&self.store[range], &self.config.charset)?)
    }

    pub fn field_value_by_name(&self, row: usize, name: &str) -> Result<String> {
        let column = self.column_index(name)?;
        self.field_value(row, column)
    }

    /// Typed view of a single field.
    pub fn field(&self, row: usize, column: usize) -> Result<Field<'_>> {
        let value = self.field_value(row, column)?;
        Ok(Field::new(self.column_at(column)?, value))
    }

    pub fn field_by_name(&self, row: usize, name: &str) -> Result<Field<'_>> {
        let column = self.column_index(name)?;
        self.field(row, column)
    }

    pub fn int64_value_by_name(&self, row: usize, name: &str) -> Result<i64> {
        Ok(self.field_by_name(row, name)?.as_int64()?)
    }

    pub fn float_value_by_name(&self, row: usize, name: &str) -> Result<f64> {
        Ok(self.field_by_name(row, name)?.as_float()?)
    }

    /// Decode a whole record. Deleted records decode like live ones.
    pub fn row(&self, row: usize) -> Result<Row<'_>> {
        let start = self.record_start(row)?;
        let end = start + self.header.record_size();
        let record = self.store.get(start + 1..end).ok_or(TableError::IndexOutOfBounds {
            index: end,
            len: self.store.len(),
        })?;
        Ok(parse_row(record, &self.columns, &self.config.charset)?)
    }

    /// Decode every record in order.
    pub fn rows(&self) -> impl Iterator<Item = Result<Row<'_>>> + '_ {
        (0..self.record_count()).map(move |row| self.row(row))
    }

    /// All values of a record as strings.
    pub fn row_values(&self, row: usize) -> Result<Vec<String>> {
        (0..self.columns.len())
            .map(|column| self.field_value(row, column))
            .collect()
    }

    // -- metadata -------------------------------------------------------------

    pub fn record_count(&self) -> usize {
        self.header.record_count()
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.names()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.field_map.contains_key(&map_key(name))
    }

    /// Index of a column by name, ignoring case.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.field_map
            .get(&map_key(name))
            .copied()
            .ok_or_else(|| TableError::InvalidFieldName(name.to_string()))
    }

    /// Decimal places of a Number or Float column.
    pub fn decimal_places(&self, name: &str) -> Result<usize> {
        let column = self.column_at(self.column_index(name)?)?;
        if !column.column_type().is_numeric() {
            return Err(CodecError::TypeMismatch {
                column: column.name().to_string(),
                expected: "Number or Float",
                actual: column.column_type(),
            }
            .into());
        }
        Ok(column.decimal_places())
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn version(&self) -> Version {
        self.header.version()
    }

    pub fn updated_at(&self) -> Option<NaiveDate> {
        self.header.updated_at()
    }

    /// Set the last-update date in the header.
    pub fn touch(&mut self, date: NaiveDate) {
        self.header.touch(date);
        self.store[..HEADER_FIELDS_SIZE].copy_from_slice(&self.header.serialize());
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn charset(&self) -> &Charset {
        &self.config.charset
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    // -- offsets --------------------------------------------------------------

    fn column_at(&self, column: usize) -> Result<&Column> {
        self.columns.get(column).ok_or(TableError::IndexOutOfBounds {
            index: column,
            len: self.columns.len(),
        })
    }

    /// Offset of the record's deletion marker.
    fn record_start(&self, row: usize) -> Result<usize> {
        let count = self.header.record_count();
        if row >= count {
            return Err(TableError::IndexOutOfBounds {
                index: row,
                len: count,
            });
        }
        Ok(self.header.header_size() + row * self.header.record_size())
    }

    /// Byte range of one field in the store.
    fn field_range(&self, row: usize, column: usize) -> Result<Range<usize>> {
        let width = self.column_at(column)?.length();
        let offset = self.columns.offset_of(column).unwrap_or_default();
        let start = self.record_start(row)? + 1 + offset;
        let end = start + width;
        if end > self.store.len() {
            return Err(TableError::IndexOutOfBounds {
                index: end,
                len: self.store.len(),
            });
        }
        Ok(start..end)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("header", &self.header)
            .field("columns", &self.columns.names())
            .field("phase", &self.phase)
            .field("charset", &self.config.charset)
            .field("store", &format_args!("<{} bytes>", self.store.len()))
            .finish()
    }
}

fn ensure_len(src: &[u8], needed: usize) -> Result<()> {
    if src.len() < needed {
        return Err(CodecError::TruncatedInput {
            needed,
            actual: src.len(),
        }
        .into());
    }
    Ok(())
}

fn map_key(name: &str) -> String {
    name.to_uppercase()
}

/// Name lookup for a loaded schema. Names must be unique ignoring case.
fn field_map(columns: &Columns) -> Result<HashMap<String, usize>> {
    let mut map = HashMap::with_capacity(columns.len());
    for column in columns {
        if map.insert(map_key(column.name()), column.index()).is_some() {
            return Err(TableError::DuplicateFieldName(column.name().to_string()));
        }
    }
    Ok(map)
}
