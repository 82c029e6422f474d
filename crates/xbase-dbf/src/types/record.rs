//! Decoded records and the deletion marker.

use std::collections::{BTreeMap, HashMap};

use super::DbfValue;

/// Deletion flag byte of a live record.
pub const LIVE_FLAG: u8 = b' ';

/// Deletion flag byte of a deleted record.
pub const DELETED_FLAG: u8 = b'*';

/// Per-record deletion marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionFlag {
    /// Record is live.
    Live,
    /// Record is logically deleted.
    Deleted,
}

impl DeletionFlag {
    /// Interpret a deletion flag byte. Only `*` marks a deleted record.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        if byte == DELETED_FLAG {
            Self::Deleted
        } else {
            Self::Live
        }
    }

    /// On-disk byte for this flag.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Live => LIVE_FLAG,
            Self::Deleted => DELETED_FLAG,
        }
    }

    /// Text form: empty for live records, `*` for deleted ones.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "",
            Self::Deleted => "*",
        }
    }

    /// Check if the flag marks a deleted record.
    #[must_use]
    pub const fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// One decoded record, in declared field order.
///
/// The deletion flag is only attached when the reader was asked to
/// surface deleted records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<(String, DbfValue)>,
    deletion: Option<DeletionFlag>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value (builder style).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<DbfValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Set a field value. A field already present keeps its position.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<DbfValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Build from decoded pairs in field order.
    pub(crate) fn from_fields(fields: Vec<(String, DbfValue)>) -> Self {
        Self {
            fields,
            deletion: None,
        }
    }

    pub(crate) fn set_deletion(&mut self, flag: DeletionFlag) {
        self.deletion = Some(flag);
    }

    /// Look up a value by field name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DbfValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Value at a field position.
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<&DbfValue> {
        self.fields.get(index).map(|(_, value)| value)
    }

    /// Deletion marker, present only when deleted records were requested.
    #[must_use]
    pub fn deletion(&self) -> Option<DeletionFlag> {
        self.deletion
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate `(name, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DbfValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterate values in field order.
    pub fn values(&self) -> impl Iterator<Item = &DbfValue> {
        self.fields.iter().map(|(_, value)| value)
    }

    /// Convert into a name-to-value map, dropping field order.
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, DbfValue> {
        self.fields.into_iter().collect()
    }
}

/// Source of field values for the writer.
///
/// The writer asks for each declared field by name, in declared order.
pub trait RecordValues {
    /// Value for a field, if the record has one.
    fn value(&self, name: &str) -> Option<&DbfValue>;
}

impl RecordValues for Record {
    fn value(&self, name: &str) -> Option<&DbfValue> {
        self.get(name)
    }
}

impl RecordValues for HashMap<String, DbfValue> {
    fn value(&self, name: &str) -> Option<&DbfValue> {
        self.get(name)
    }
}

impl RecordValues for BTreeMap<String, DbfValue> {
    fn value(&self, name: &str) -> Option<&DbfValue> {
        self.get(name)
    }
}

impl<T: RecordValues + ?Sized> RecordValues for &T {
    fn value(&self, name: &str) -> Option<&DbfValue> {
        (**self).value(name)
    }
}
