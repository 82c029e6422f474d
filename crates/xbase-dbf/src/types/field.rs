//! Field descriptor types.

use std::fmt;

use crate::error::{DbfError, Result};

/// Maximum field name length in bytes (the 11-byte slot keeps a trailing NUL).
pub const MAX_NAME_LEN: usize = 10;

/// Maximum width of a numeric field.
pub const MAX_NUMERIC_LEN: u8 = 20;

/// Width of a date field (`YYYYMMDD`).
pub const DATE_LEN: u8 = 8;

/// DBF field type.
///
/// | Code | Variant     | Decoded as                        |
/// |------|-------------|-----------------------------------|
/// | `N`  | `Numeric`   | integer, or decimal when decimals > 0 |
/// | `C`  | `Character` | text (or raw bytes)               |
/// | `D`  | `Date`      | calendar date or null             |
/// | `L`  | `Logical`   | boolean                           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Right-justified ASCII number.
    Numeric,
    /// Left-justified, space-padded text.
    Character,
    /// `YYYYMMDD` date.
    Date,
    /// Single `T`/`F`/`Y`/`N` byte.
    Logical,
}

impl FieldType {
    /// Look up a type from its descriptor code byte.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            b'N' => Some(Self::Numeric),
            b'C' => Some(Self::Character),
            b'D' => Some(Self::Date),
            b'L' => Some(Self::Logical),
            _ => None,
        }
    }

    /// Descriptor code byte for this type.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Numeric => b'N',
            Self::Character => b'C',
            Self::Date => b'D',
            Self::Logical => b'L',
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Character => write!(f, "character"),
            Self::Date => write!(f, "date"),
            Self::Logical => write!(f, "logical"),
        }
    }
}

/// One column of a DBF table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name (at most 10 bytes on disk).
    pub name: String,
    /// Field type.
    pub field_type: FieldType,
    /// Width of the field in a record, in bytes.
    pub length: u8,
    /// Number of fractional digits (numeric fields only).
    pub decimals: u8,
}

impl FieldDescriptor {
    /// Build and validate a descriptor from its raw descriptor parts.
    ///
    /// This is the schema gate: unknown type codes and impossible
    /// length/decimals combinations are rejected here.
    pub fn from_raw(name: impl Into<String>, code: u8, length: u8, decimals: u8) -> Result<Self> {
        let name = name.into();
        let Some(field_type) = FieldType::from_code(code) else {
            return Err(DbfError::UnknownFieldType { name, code });
        };
        let field = Self {
            name,
            field_type,
            length,
            decimals,
        };
        field.validate()?;
        Ok(field)
    }

    /// Create an integer numeric field.
    #[must_use]
    pub fn integer(name: impl Into<String>, length: u8) -> Self {
        Self::numeric(name, length, 0)
    }

    /// Create a numeric field with `decimals` fractional digits.
    #[must_use]
    pub fn numeric(name: impl Into<String>, length: u8, decimals: u8) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Numeric,
            length,
            decimals,
        }
    }

    /// Create a character field.
    #[must_use]
    pub fn character(name: impl Into<String>, length: u8) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Character,
            length,
            decimals: 0,
        }
    }

    /// Create a date field.
    #[must_use]
    pub fn date(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Date,
            length: DATE_LEN,
            decimals: 0,
        }
    }

    /// Create a logical field.
    #[must_use]
    pub fn logical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Logical,
            length: 1,
            decimals: 0,
        }
    }

    /// Check that the type, length and decimals fit together.
    pub fn validate(&self) -> Result<()> {
        if self.length == 0 {
            return Err(DbfError::invalid_field(&self.name, "zero length"));
        }
        match self.field_type {
            FieldType::Numeric => {
                if self.length > MAX_NUMERIC_LEN {
                    return Err(DbfError::invalid_field(
                        &self.name,
                        format!("numeric length {} exceeds {MAX_NUMERIC_LEN}", self.length),
                    ));
                }
                if self.decimals >= self.length {
                    return Err(DbfError::invalid_field(
                        &self.name,
                        format!(
                            "{} decimals do not fit in length {}",
                            self.decimals, self.length
                        ),
                    ));
                }
            }
            FieldType::Date if self.length != DATE_LEN => {
                return Err(DbfError::invalid_field(
                    &self.name,
                    format!("date length must be {DATE_LEN}, got {}", self.length),
                ));
            }
            FieldType::Logical if self.length != 1 => {
                return Err(DbfError::invalid_field(
                    &self.name,
                    format!("logical length must be 1, got {}", self.length),
                ));
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes() {
        for ty in [
            FieldType::Numeric,
            FieldType::Character,
            FieldType::Date,
            FieldType::Logical,
        ] {
            assert_eq!(FieldType::from_code(ty.code()), Some(ty));
        }
        assert_eq!(FieldType::from_code(b'M'), None);
        assert_eq!(FieldType::from_code(0xd1), None);
    }

    #[test]
    fn test_from_raw_unknown_type() {
        let err = FieldDescriptor::from_raw("WRNG_FLD", 0xd1, 6, 0).unwrap_err();
        assert!(matches!(err, DbfError::UnknownFieldType { code: 0xd1, .. }));
        assert!(err.is_schema());
    }

    #[test]
    fn test_from_raw_valid() {
        let field = FieldDescriptor::from_raw("FLT_FLD", b'N', 5, 2).unwrap();
        assert_eq!(field, FieldDescriptor::numeric("FLT_FLD", 5, 2));
    }

    #[test]
    fn test_validate_combinations() {
        assert!(FieldDescriptor::from_raw("D", b'D', 6, 0).is_err());
        assert!(FieldDescriptor::from_raw("L", b'L', 2, 0).is_err());
        assert!(FieldDescriptor::from_raw("N", b'N', 3, 3).is_err());
        assert!(FieldDescriptor::from_raw("N", b'N', 21, 0).is_err());
        assert!(FieldDescriptor::from_raw("C", b'C', 0, 0).is_err());
        assert!(FieldDescriptor::from_raw("C", b'C', 254, 0).is_ok());
    }
}
