//! Streaming reader and writer for XBase (DBF) table files.
//!
//! This crate reads and writes dBase III style tables: a fixed header
//! describing the fields, followed by fixed-width records.
//!
//! # Features
//!
//! - **Streaming reads**: records are decoded one at a time from any `Read`
//! - **Streaming writes**: records are encoded one at a time into any `Write + Seek`
//! - **Field types**: numeric (`N`), character (`C`), date (`D`) and logical (`L`)
//! - **Code pages**: character fields decoded through the header's language
//!   driver or an explicit encoding, or passed through as raw bytes
//! - **Deleted records**: skipped by default, optionally yielded with their flag
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use chrono::NaiveDate;
//! use xbase_dbf::{DbfReader, DbfWriter, FieldDescriptor, Record};
//!
//! let fields = vec![
//!     FieldDescriptor::integer("ID", 4),
//!     FieldDescriptor::character("NAME", 10),
//!     FieldDescriptor::date("BORN"),
//! ];
//! let mut writer = DbfWriter::create(Path::new("people.dbf"), fields)?;
//! writer.write_record(
//!     &Record::new()
//!         .with("ID", 1)
//!         .with("NAME", "Ada")
//!         .with("BORN", NaiveDate::from_ymd_opt(1815, 12, 10)),
//! )?;
//! writer.finish()?;
//!
//! for record in DbfReader::open(Path::new("people.dbf"))? {
//!     let record = record?;
//!     println!("{:?}", record.get("NAME"));
//! }
//! # Ok::<(), xbase_dbf::DbfError>(())
//! ```

pub mod codec;
pub mod convert;
pub mod date;
mod error;
pub mod header;
mod reader;
mod types;
mod writer;

// === Error Types ===
pub use error::{DbfError, Result};

// === Core Types ===
pub use types::{
    DATE_LEN, DEFAULT_SIGNATURE, DELETED_FLAG, DbfValue, DeletionFlag, FieldDescriptor, FieldType,
    LIVE_FLAG, MAX_NAME_LEN, MAX_NUMERIC_LEN, ReaderOptions, Record, RecordValues, WriterOptions,
};

// === Codecs ===
pub use codec::TextCodec;

// === Header ===
pub use header::Header;

// === Reading ===
pub use reader::{DbfReader, read_dbf, read_dbf_with_options};

// === Writing ===
pub use writer::{DbfWriter, write_dbf};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
