use chrono::NaiveDate;

use crate::column::{Column, ColumnType};
use crate::error::{CodecError, Result};

/// A typed value to be stored in a field.
///
/// Rendering happens against the target column so numbers pick up the
/// column's decimal places.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Raw text, stored as-is in any column type.
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    Int(i64),
    Float(f64),
}

impl Value {
    /// Render as the text dBase stores for `column`.
    pub fn to_field_text(&self, column: &Column) -> Result<String> {
        let column_type = column.column_type();
        let decimals = column.decimal_places();

        match (self, column_type) {
            (Self::Text(text), _) => Ok(text.clone()),
            (Self::Bool(b), ColumnType::Bool) => Ok(if *b { "T" } else { "F" }.to_string()),
            (Self::Date(date), ColumnType::Date) => Ok(date.format("%Y%m%d").to_string()),
            (Self::Int(i), ColumnType::Number | ColumnType::Float) if decimals > 0 => {
                Ok(format!("{i}.{}", "0".repeat(decimals)))
            }
            (Self::Int(i), ColumnType::Number | ColumnType::Float) => Ok(i.to_string()),
            (Self::Float(f), ColumnType::Number | ColumnType::Float) => {
                if !f.is_finite() {
                    return Err(CodecError::InvalidValue {
                        column: column.name().to_string(),
                        value: f.to_string(),
                    });
                }
                Ok(format!("{f:.decimals$}"))
            }
            (value, actual) => Err(CodecError::TypeMismatch {
                column: column.name().to_string(),
                expected: value.expected(),
                actual,
            }),
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            Self::Text(_) => "any",
            Self::Bool(_) => "Bool",
            Self::Date(_) => "Date",
            Self::Int(_) | Self::Float(_) => "Number or Float",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
