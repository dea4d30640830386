use std::fmt;

use bytes::BufMut;
use chrono::{Datelike, NaiveDate};

use crate::column::{Columns, DESCRIPTOR_SIZE};
use crate::error::{CodecError, Result};

/// Fixed header preamble: 12 interpreted bytes + 20 reserved bytes.
pub const PREAMBLE_SIZE: usize = 32;

/// Bytes of the preamble carrying signature, date, counts and sizes.
pub const HEADER_FIELDS_SIZE: usize = 12;

/// Byte closing the column descriptor array.
pub const HEADER_TERMINATOR: u8 = 0x0D;

/// Byte appended after the last record.
pub const EOF_MARKER: u8 = 0x1A;

/// Signature written into tables created from scratch (dBase III, no memo).
const NEW_TABLE_SIGNATURE: u8 = 0x03;

/// dBase level encoded in the low 3 bits of the signature byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Version {
    /// dBase Level 5.
    Level5,
    /// dBase Level 7.
    Level7,
    /// Any other signature. Not an error; the file is still read.
    Unknown,
}

impl Version {
    /// Select the version from a signature byte.
    pub fn from_signature(signature: u8) -> Self {
        match signature & 0x07 {
            3 => Self::Level5,
            4 => Self::Level7,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Level5 => "dBase Level 5",
            Self::Level7 => "dBase Level 7",
            Self::Unknown => "unknown dBase Level",
        };
        f.write_str(name)
    }
}

/// The interpreted part of a table header.
///
/// Layout (little-endian):
/// ```text
/// ┌─────┬──────────┬──────────────┬─────────────┬─────────────┐
/// │ sig │ YY MM DD │ records (u32)│ header (u16)│ record (u16)│
/// │ 1B  │ 3B       │ 4B           │ 2B          │ 2B          │
/// └─────┴──────────┴──────────────┴─────────────┴─────────────┘
/// ```
/// `YY` is the year minus 1900.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    signature: u8,
    version: Version,
    update_year: u8,
    update_month: u8,
    update_day: u8,
    record_count: u32,
    header_size: u16,
    record_size: u16,
}

impl Header {
    /// Parse the first 12 bytes of a table.
    pub fn parse(src: &[u8]) -> Result<Self> {
        if src.len() < HEADER_FIELDS_SIZE {
            return Err(CodecError::TruncatedInput {
                needed: HEADER_FIELDS_SIZE,
                actual: src.len(),
            });
        }

        let signature = src[0];
        Ok(Self {
            signature,
            version: Version::from_signature(signature),
            update_year: src[1],
            update_month: src[2],
            update_day: src[3],
            record_count: u32::from_le_bytes([src[4], src[5], src[6], src[7]]),
            header_size: u16::from_le_bytes([src[8], src[9]]),
            record_size: u16::from_le_bytes([src[10], src[11]]),
        })
    }

    /// Header for a table with no columns and no records.
    ///
    /// The header size already accounts for the descriptor terminator.
    pub fn new_empty(updated: NaiveDate) -> Self {
        let mut header = Self {
            signature: NEW_TABLE_SIGNATURE,
            version: Version::from_signature(NEW_TABLE_SIGNATURE),
            update_year: 0,
            update_month: 0,
            update_day: 0,
            record_count: 0,
            header_size: (PREAMBLE_SIZE + 1) as u16,
            record_size: 1,
        };
        header.touch(updated);
        header
    }

    /// Append the 12 interpreted bytes to `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u8(self.signature);
        dst.put_u8(self.update_year);
        dst.put_u8(self.update_month);
        dst.put_u8(self.update_day);
        dst.put_u32_le(self.record_count);
        dst.put_u16_le(self.header_size);
        dst.put_u16_le(self.record_size);
    }

    /// The 12 interpreted bytes.
    ///
    /// Callers embed these into the full 32-byte preamble themselves.
    pub fn serialize(&self) -> [u8; HEADER_FIELDS_SIZE] {
        let mut out = [0u8; HEADER_FIELDS_SIZE];
        let mut dst = &mut out[..];
        self.encode(&mut dst);
        out
    }

    /// Recompute header and record sizes from the column list.
    pub fn update_after_schema_change(&mut self, columns: &Columns) -> Result<()> {
        let header_size = PREAMBLE_SIZE + columns.len() * DESCRIPTOR_SIZE + 1;
        let record_size = columns.row_length() + 1;

        self.header_size = u16::try_from(header_size).map_err(|_| CodecError::LayoutOverflow {
            what: "header",
            size: header_size,
        })?;
        self.record_size = u16::try_from(record_size).map_err(|_| CodecError::LayoutOverflow {
            what: "record",
            size: record_size,
        })?;
        Ok(())
    }

    /// Set the last-update date.
    ///
    /// Years outside 1900..=2155 saturate to the nearest representable year.
    pub fn touch(&mut self, date: NaiveDate) {
        self.update_year = u8::try_from((date.year() - 1900).max(0)).unwrap_or(u8::MAX);
        self.update_month = date.month() as u8;
        self.update_day = date.day() as u8;
    }

    pub fn set_record_count(&mut self, record_count: u32) {
        self.record_count = record_count;
    }

    pub fn signature(&self) -> u8 {
        self.signature
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Last-update date, or `None` if the stored bytes are not a calendar date.
    pub fn updated_at(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            1900 + i32::from(self.update_year),
            u32::from(self.update_month),
            u32::from(self.update_day),
        )
    }

    pub fn record_count(&self) -> usize {
        self.record_count as usize
    }

    pub fn header_size(&self) -> usize {
        usize::from(self.header_size)
    }

    pub fn record_size(&self) -> usize {
        usize::from(self.record_size)
    }

    /// Number of descriptors implied by the header size.
    pub fn column_count(&self) -> usize {
        self.header_size().saturating_sub(PREAMBLE_SIZE + 1) / DESCRIPTOR_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Column, ColumnType};

    fn sample() -> [u8; 12] {
        [
            0x03, 123, 1, 15, // signature, 2023-01-15
            0x02, 0x01, 0x00, 0x00, // 258 records
            0x61, 0x00, // header 97
            0x2A, 0x00, // record 42
        ]
    }

    #[test]
    fn parse_reads_little_endian_fields() {
        let header = Header::parse(&sample()).unwrap();
        assert_eq!(header.signature(), 0x03);
        assert_eq!(header.version(), Version::Level5);
        assert_eq!(header.record_count(), 258);
        assert_eq!(header.header_size(), 97);
        assert_eq!(header.record_size(), 42);
        assert_eq!(header.column_count(), 2);
        assert_eq!(
            header.updated_at(),
            Some(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap())
        );
    }

    #[test]
    fn parse_rejects_short_input() {
        let err = Header::parse(&sample()[..11]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TruncatedInput {
                needed: 12,
                actual: 11
            }
        ));
    }

    #[test]
    fn serialize_is_inverse_of_parse() {
        let header = Header::parse(&sample()).unwrap();
        assert_eq!(header.serialize(), sample());
    }

    #[test]
    fn version_from_signature_low_bits() {
        assert_eq!(Version::from_signature(0x03), Version::Level5);
        assert_eq!(Version::from_signature(0x83), Version::Level5);
        assert_eq!(Version::from_signature(0x04), Version::Level7);
        assert_eq!(Version::from_signature(0x8C), Version::Level7);
        assert_eq!(Version::from_signature(0x30), Version::Unknown);
        assert_eq!(Version::Level7.to_string(), "dBase Level 7");
        assert_eq!(Version::Unknown.to_string(), "unknown dBase Level");
    }

    #[test]
    fn invalid_stored_date_is_none() {
        let mut raw = sample();
        raw[2] = 13;
        let header = Header::parse(&raw).unwrap();
        assert_eq!(header.updated_at(), None);
    }

    #[test]
    fn new_empty_header_is_self_consistent() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let header = Header::new_empty(date);
        assert_eq!(header.header_size(), 33);
        assert_eq!(header.record_size(), 1);
        assert_eq!(header.record_count(), 0);
        assert_eq!(header.column_count(), 0);
        assert_eq!(header.updated_at(), Some(date));
        assert_eq!(header.serialize()[1], 124);
    }

    #[test]
    fn schema_change_recomputes_sizes() {
        let mut header = Header::new_empty(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let mut columns = Columns::new();
        columns.push(Column::new("NAME", ColumnType::Text, 20, 0));
        columns.push(Column::new("AMOUNT", ColumnType::Number, 8, 2));

        header.update_after_schema_change(&columns).unwrap();
        assert_eq!(header.header_size(), 32 + 2 * 32 + 1);
        assert_eq!(header.record_size(), 29);
        assert_eq!(header.record_size() - 1, columns.row_length());
    }

    #[test]
    fn schema_change_rejects_oversized_records() {
        let mut header = Header::new_empty(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let mut columns = Columns::new();
        for i in 0..260 {
            columns.push(Column::new(&format!("C{i}"), ColumnType::Text, 255, 0));
        }
        let err = header.update_after_schema_change(&columns).unwrap_err();
        assert!(matches!(err, CodecError::LayoutOverflow { what: "record", .. }));
    }
}
