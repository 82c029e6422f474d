//! Typed field values.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbfValue {
    /// Numeric field with zero decimals.
    Integer(i64),
    /// Numeric field with fixed fractional digits.
    Decimal(Decimal),
    /// Character field decoded with a text encoding.
    Text(String),
    /// Character field read without decoding.
    Bytes(Vec<u8>),
    /// Date field.
    Date(NaiveDate),
    /// Logical field.
    Logical(bool),
    /// Missing date.
    Null,
}

impl DbfValue {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Check if this is a null value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the value kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::Logical(_) => "logical",
            Self::Null => "null",
        }
    }

    /// Get the integer value, if any.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the decimal value, if any.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the text value, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the date value, if any.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Get the logical value, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Logical(b) => Some(*b),
            _ => None,
        }
    }
}

/// Renders values the way a dump would show them; `Null` renders empty.
impl fmt::Display for DbfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Logical(b) => write!(f, "{b}"),
            Self::Null => Ok(()),
        }
    }
}

impl From<i64> for DbfValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for DbfValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<Decimal> for DbfValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for DbfValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for DbfValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDate> for DbfValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<Option<NaiveDate>> for DbfValue {
    fn from(v: Option<NaiveDate>) -> Self {
        v.map_or(Self::Null, Self::Date)
    }
}

impl From<bool> for DbfValue {
    fn from(v: bool) -> Self {
        Self::Logical(v)
    }
}
