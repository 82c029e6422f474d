//! Error types for DBF file operations.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::FieldType;

/// Errors that can occur when reading or writing DBF files.
#[derive(Debug, Error)]
pub enum DbfError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Malformed file header.
    #[error("invalid DBF header: {message}")]
    InvalidHeader { message: String },

    /// Field descriptor carries a type code outside the supported set.
    #[error("field {name}: unknown field type {code:#04x}")]
    UnknownFieldType { name: String, code: u8 },

    /// Field descriptor has a length/decimals combination the type cannot hold.
    #[error("field {name}: {message}")]
    InvalidField { name: String, message: String },

    /// Field name does not fit the 10-byte descriptor slot.
    #[error("field name '{name}' exceeds 10 bytes")]
    FieldNameTooLong { name: String },

    /// Numeric field content is not a number.
    #[error("field {field}: cannot parse '{text}' as a number")]
    NumericParse { field: String, text: String },

    /// Value kind does not match the declared field type.
    #[error("field {field}: expected {expected} value, got {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        actual: &'static str,
    },

    /// Encoded value does not fit the declared field width.
    #[error("field {field}: '{text}' does not fit in {width} columns")]
    ValueTooWide {
        field: String,
        width: usize,
        text: String,
    },

    /// Record handed to the writer lacks a declared field.
    #[error("record has no value for field {field}")]
    MissingValue { field: String },

    /// Date year cannot be written as four digits.
    #[error("date {date} is outside years 0000-9999")]
    DateOutOfRange { date: NaiveDate },

    /// Text is not a `DD.MM.YYYY` date.
    #[error("'{text}' is not a DD.MM.YYYY date")]
    InvalidHumanDate { text: String },

    /// Character bytes are not valid in the configured encoding.
    #[error("field {field}: bytes are not valid {encoding}")]
    Decode {
        field: String,
        encoding: &'static str,
    },

    /// Text cannot be represented in the configured encoding.
    #[error("field {field}: text cannot be encoded as {encoding}")]
    Encode {
        field: String,
        encoding: &'static str,
    },

    /// Encoding name has no codec.
    #[error("unknown encoding: {name}")]
    UnknownEncoding { name: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for DBF operations.
pub type Result<T> = std::result::Result<T, DbfError>;

impl DbfError {
    /// Create an InvalidHeader error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create an InvalidField error.
    pub fn invalid_field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a NumericParse error.
    pub fn numeric_parse(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::NumericParse {
            field: field.into(),
            text: text.into(),
        }
    }

    /// Create a TypeMismatch error.
    pub fn type_mismatch(field: impl Into<String>, expected: FieldType, actual: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Create a ValueTooWide error.
    pub fn value_too_wide(field: impl Into<String>, width: usize, text: impl Into<String>) -> Self {
        Self::ValueTooWide {
            field: field.into(),
            width,
            text: text.into(),
        }
    }

    /// True for errors raised by the header schema gate.
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            Self::UnknownFieldType { .. }
                | Self::InvalidField { .. }
                | Self::FieldNameTooLong { .. }
                | Self::InvalidHeader { .. }
        )
    }

    /// True for per-value conversion failures (bad text, wrong kind, bad encoding).
    #[must_use]
    pub fn is_conversion(&self) -> bool {
        matches!(
            self,
            Self::NumericParse { .. }
                | Self::TypeMismatch { .. }
                | Self::ValueTooWide { .. }
                | Self::MissingValue { .. }
                | Self::DateOutOfRange { .. }
                | Self::InvalidHumanDate { .. }
                | Self::Decode { .. }
                | Self::Encode { .. }
        )
    }
}
