use std::fmt;

use chrono::NaiveDate;
use dbfkit_charset::Charset;

use crate::column::{Column, ColumnType};
use crate::error::{CodecError, Result};

/// Padding byte for unused field width.
const PAD: u8 = b' ';

/// A decoded value together with the column it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    column: &'a Column,
    value: String,
}

impl<'a> Field<'a> {
    pub fn new(column: &'a Column, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    pub fn column(&self) -> &'a Column {
        self.column
    }

    pub fn name(&self) -> &'a str {
        self.column.name()
    }

    pub fn decimal_places(&self) -> usize {
        self.column.decimal_places()
    }

    /// The trimmed text, regardless of column type.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn as_text(&self) -> Result<&str> {
        self.checked(&[ColumnType::Text, ColumnType::Memo], "Text or Memo")?;
        Ok(&self.value)
    }

    /// `T`/`t` is true, `F`/`f` is false; anything else is invalid.
    pub fn as_bool(&self) -> Result<bool> {
        self.checked(&[ColumnType::Bool], "Bool")?;
        match self.value.as_str() {
            "t" | "T" => Ok(true),
            "f" | "F" => Ok(false),
            _ => Err(self.invalid()),
        }
    }

    pub fn as_int(&self) -> Result<i32> {
        self.checked(&[ColumnType::Number], "Number")?;
        Ok(self.value.parse()?)
    }

    pub fn as_int64(&self) -> Result<i64> {
        self.checked(&[ColumnType::Number], "Number")?;
        Ok(self.value.parse()?)
    }

    pub fn as_float(&self) -> Result<f64> {
        self.checked(&[ColumnType::Number, ColumnType::Float], "Number or Float")?;
        Ok(self.value.parse()?)
    }

    /// Strict `YYYYMMDD`.
    pub fn as_date(&self) -> Result<NaiveDate> {
        self.checked(&[ColumnType::Date], "Date")?;

        let v = &self.value;
        if v.len() != 8 || !v.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.invalid());
        }
        let year: i32 = v[0..4].parse()?;
        let month: u32 = v[4..6].parse()?;
        let day: u32 = v[6..8].parse()?;
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| self.invalid())
    }

    fn checked(&self, allowed: &[ColumnType], expected: &'static str) -> Result<()> {
        let actual = self.column.column_type();
        if !allowed.contains(&actual) {
            return Err(CodecError::TypeMismatch {
                column: self.column.name().to_string(),
                expected,
                actual,
            });
        }
        if self.value.is_empty() {
            return Err(CodecError::EmptyField(self.column.name().to_string()));
        }
        Ok(())
    }

    fn invalid(&self) -> CodecError {
        CodecError::InvalidValue {
            column: self.column.name().to_string(),
            value: self.value.clone(),
        }
    }
}

impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Decode one stored field.
///
/// Stored text may be shorter than the field and NUL-terminated; the first
/// NUL ends the value. Surrounding whitespace is trimmed after transcoding.
pub fn decode_field(raw: &[u8], charset: &Charset) -> Result<String> {
    let raw = match raw.iter().position(|&b| b == 0) {
        Some(end) => &raw[..end],
        None => raw,
    };
    let text = charset.decode(raw)?;
    Ok(text.trim().to_string())
}

/// Write already-encoded bytes into a field slot.
///
/// The slot is blank-filled first. Left-justified types keep the leading
/// bytes of an over-long value, right-justified types keep the trailing
/// bytes. Nothing is ever written past the slot.
pub fn justify_into(column_type: ColumnType, raw: &[u8], slot: &mut [u8]) {
    slot.fill(PAD);
    let n = raw.len().min(slot.len());
    if column_type.is_left_justified() {
        slot[..n].copy_from_slice(&raw[..n]);
    } else {
        let start = slot.len() - n;
        slot[start..].copy_from_slice(&raw[raw.len() - n..]);
    }
}

/// Encode a value into exactly `column.length()` bytes.
pub fn encode_field_for_write(column: &Column, value: &str, charset: &Charset) -> Result<Vec<u8>> {
    let raw = charset.encode(value)?;
    let mut slot = vec![PAD; column.length()];
    justify_into(column.column_type(), &raw, &mut slot);
    Ok(slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(column_type: ColumnType, length: u8) -> Column {
        Column::new("F", column_type, length, 0)
    }

    #[test]
    fn numbers_are_right_justified() {
        let column = col(ColumnType::Number, 4);
        let raw = encode_field_for_write(&column, "5", &Charset::latin1()).unwrap();
        assert_eq!(raw, b"   5");
    }

    #[test]
    fn text_is_left_justified() {
        let column = col(ColumnType::Text, 5);
        let raw = encode_field_for_write(&column, "hello", &Charset::latin1()).unwrap();
        assert_eq!(raw, b"hello");

        let column = col(ColumnType::Text, 8);
        let raw = encode_field_for_write(&column, "hi", &Charset::latin1()).unwrap();
        assert_eq!(raw, b"hi      ");
    }

    #[test]
    fn over_long_values_truncate_silently() {
        let text = encode_field_for_write(&col(ColumnType::Text, 3), "abcdef", &Charset::latin1())
            .unwrap();
        assert_eq!(text, b"abc");

        let number =
            encode_field_for_write(&col(ColumnType::Float, 3), "12345", &Charset::latin1())
                .unwrap();
        assert_eq!(number, b"345");
    }

    #[test]
    fn memo_block_numbers_are_right_justified() {
        let raw = encode_field_for_write(&col(ColumnType::Memo, 10), "17", &Charset::latin1())
            .unwrap();
        assert_eq!(raw, b"        17");
    }

    #[test]
    fn decode_stops_at_nul_and_trims() {
        let value = decode_field(b"  abc \0garbage", &Charset::latin1()).unwrap();
        assert_eq!(value, "abc");
        assert_eq!(decode_field(b"\0\0\0\0", &Charset::latin1()).unwrap(), "");
    }

    #[test]
    fn date_accessor_is_strict() {
        let column = col(ColumnType::Date, 8);
        let date = Field::new(&column, "20230115").as_date().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());

        for bad in ["2023011X", "2023-1-15", "20231315", "2023011"] {
            let err = Field::new(&column, bad).as_date().unwrap_err();
            assert!(matches!(err, CodecError::InvalidValue { .. }), "{bad}");
        }
    }

    #[test]
    fn bool_accessor() {
        let column = col(ColumnType::Bool, 1);
        assert!(Field::new(&column, "T").as_bool().unwrap());
        assert!(Field::new(&column, "t").as_bool().unwrap());
        assert!(!Field::new(&column, "F").as_bool().unwrap());
        assert!(!Field::new(&column, "f").as_bool().unwrap());
        assert!(matches!(
            Field::new(&column, "Y").as_bool(),
            Err(CodecError::InvalidValue { .. })
        ));
        assert!(matches!(
            Field::new(&column, "?").as_bool(),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[test]
    fn type_is_checked_before_emptiness() {
        let text = col(ColumnType::Text, 4);
        assert!(matches!(
            Field::new(&text, "").as_int(),
            Err(CodecError::TypeMismatch {
                actual: ColumnType::Text,
                ..
            })
        ));

        let number = col(ColumnType::Number, 4);
        assert!(matches!(
            Field::new(&number, "").as_int(),
            Err(CodecError::EmptyField(_))
        ));
        assert!(matches!(
            Field::new(&col(ColumnType::Bool, 1), "").as_bool(),
            Err(CodecError::EmptyField(_))
        ));
    }

    #[test]
    fn numeric_accessors() {
        let number = Column::new("N", ColumnType::Number, 10, 2);
        assert_eq!(Field::new(&number, "-42").as_int().unwrap(), -42);
        assert_eq!(Field::new(&number, "9000000000").as_int64().unwrap(), 9_000_000_000);
        assert_eq!(Field::new(&number, "3.25").as_float().unwrap(), 3.25);
        assert!(matches!(
            Field::new(&number, "3.25").as_int(),
            Err(CodecError::InvalidInteger(_))
        ));
        assert!(matches!(
            Field::new(&number, "1,5").as_float(),
            Err(CodecError::InvalidFloat(_))
        ));

        let float = col(ColumnType::Float, 8);
        assert_eq!(Field::new(&float, "0.5").as_float().unwrap(), 0.5);
        assert!(matches!(
            Field::new(&float, "1").as_int(),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn text_accessor_and_display() {
        let column = Column::new("CITY", ColumnType::Text, 12, 0);
        let field = Field::new(&column, "Graz");
        assert_eq!(field.as_text().unwrap(), "Graz");
        assert_eq!(field.name(), "CITY");
        assert_eq!(field.to_string(), "Graz");
        assert!(matches!(
            Field::new(&column, "").as_text(),
            Err(CodecError::EmptyField(_))
        ));
        assert!(matches!(
            Field::new(&col(ColumnType::Date, 8), "20200101").as_text(),
            Err(CodecError::TypeMismatch { .. })
        ));
    }
}
