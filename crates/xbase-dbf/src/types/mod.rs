//! Core types for DBF file handling.
//!
//! This module provides the fundamental data structures for representing
//! DBF fields, values, records, and file handling options.

mod field;
mod options;
mod record;
mod value;

pub use field::{DATE_LEN, FieldDescriptor, FieldType, MAX_NAME_LEN, MAX_NUMERIC_LEN};
pub use options::{DEFAULT_SIGNATURE, ReaderOptions, WriterOptions};
pub use record::{DELETED_FLAG, DeletionFlag, LIVE_FLAG, Record, RecordValues};
pub use value::DbfValue;
