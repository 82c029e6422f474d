//! DBF header parsing and building.
//!
//! The header is a 32-byte preamble, one 32-byte descriptor per field and
//! a `0x0D` terminator. Records follow at `header_length`, each starting
//! with a one-byte deletion flag.

pub mod descriptor;
pub mod preamble;

use std::io::{self, Read};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{DbfError, Result};
use crate::types::FieldDescriptor;

pub use descriptor::{DESCRIPTOR_LEN, build_descriptor, parse_descriptor};
pub use preamble::{
    PREAMBLE_LEN, Preamble, RECORD_COUNT_OFFSET, build_last_update, build_preamble,
    parse_last_update, parse_preamble,
};

/// Byte terminating the field descriptor array.
pub const TERMINATOR: u8 = 0x0d;

/// Byte written after the last record.
pub const EOF_MARKER: u8 = 0x1a;

/// Width of the deletion flag that starts every record.
pub const DELETION_FLAG_LEN: usize = 1;

/// Parsed or constructed table header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Signature byte.
    pub signature: u8,
    /// Raw last-update stamp (year - 1900, month, day).
    pub last_update: [u8; 3],
    /// Number of records, deleted ones included.
    pub record_count: u32,
    /// Header length in bytes.
    pub header_length: u16,
    /// Record length in bytes.
    pub record_length: u16,
    /// Language driver byte.
    pub language_driver: u8,
    /// Fields in on-disk order.
    pub fields: Vec<FieldDescriptor>,
}

impl Header {
    /// Build a header for writing.
    ///
    /// Validates every field and derives the header and record lengths.
    /// The record count starts at zero.
    pub fn new(
        fields: Vec<FieldDescriptor>,
        signature: u8,
        last_update: NaiveDate,
        language_driver: u8,
    ) -> Result<Self> {
        for field in &fields {
            field.validate()?;
            build_descriptor(field)?;
        }
        let header_length = u16::try_from(header_length_for(fields.len()))
            .map_err(|_| DbfError::invalid_header(format!("too many fields: {}", fields.len())))?;
        let record_length = u16::try_from(record_length_for(&fields))
            .map_err(|_| DbfError::invalid_header("record length exceeds 65535 bytes"))?;

        let header = Self {
            signature,
            last_update: build_last_update(last_update)?,
            record_count: 0,
            header_length,
            record_length,
            language_driver,
            fields,
        };
        debug!(
            fields = header.fields.len(),
            header_length, record_length, "built DBF header"
        );
        Ok(header)
    }

    /// Serialize the header: preamble, descriptors, terminator.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(usize::from(self.header_length));
        buf.extend_from_slice(&build_preamble(&self.preamble()));
        for field in &self.fields {
            buf.extend_from_slice(&build_descriptor(field)?);
        }
        buf.push(TERMINATOR);
        Ok(buf)
    }

    /// Fixed preamble fields of this header.
    #[must_use]
    pub fn preamble(&self) -> Preamble {
        Preamble {
            signature: self.signature,
            last_update: self.last_update,
            record_count: self.record_count,
            header_length: self.header_length,
            record_length: self.record_length,
            language_driver: self.language_driver,
        }
    }

    /// Last-update stamp as a date.
    #[must_use]
    pub fn last_update_date(&self) -> Option<NaiveDate> {
        parse_last_update(self.last_update)
    }

    /// Field names in on-disk order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Each field with its byte offset inside a record.
    ///
    /// Offsets start after the deletion flag.
    pub fn field_layout(&self) -> impl Iterator<Item = (&FieldDescriptor, usize)> {
        self.fields.iter().scan(DELETION_FLAG_LEN, |offset, field| {
            let start = *offset;
            *offset += usize::from(field.length);
            Some((field, start))
        })
    }
}

/// Header length for `num_fields` fields.
#[must_use]
pub fn header_length_for(num_fields: usize) -> usize {
    PREAMBLE_LEN + DESCRIPTOR_LEN * num_fields + 1
}

/// Record length for a field list, deletion flag included.
#[must_use]
pub fn record_length_for(fields: &[FieldDescriptor]) -> usize {
    DELETION_FLAG_LEN
        + fields
            .iter()
            .map(|f| usize::from(f.length))
            .sum::<usize>()
}

/// Read a header from the start of a stream.
///
/// Leaves the stream positioned at the first record: any bytes between
/// the terminator and `header_length` are skipped.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Header> {
    let mut raw = [0u8; PREAMBLE_LEN];
    read_exact_or(reader, &mut raw, "truncated preamble")?;
    let preamble = parse_preamble(&raw);
    let header_length = usize::from(preamble.header_length);
    if header_length < PREAMBLE_LEN + 1 {
        return Err(DbfError::invalid_header(format!(
            "header length {header_length} is too small"
        )));
    }

    let mut fields = Vec::new();
    let mut consumed = PREAMBLE_LEN;
    loop {
        let mut descriptor = [0u8; DESCRIPTOR_LEN];
        read_exact_or(reader, &mut descriptor[..1], "missing field terminator")?;
        consumed += 1;
        if descriptor[0] == TERMINATOR {
            break;
        }
        if consumed + DESCRIPTOR_LEN > header_length {
            return Err(DbfError::invalid_header("missing field terminator"));
        }
        read_exact_or(reader, &mut descriptor[1..], "truncated field descriptor")?;
        consumed += DESCRIPTOR_LEN - 1;
        fields.push(parse_descriptor(&descriptor)?);
    }

    if consumed < header_length {
        let skip = (header_length - consumed) as u64;
        let skipped = io::copy(&mut reader.by_ref().take(skip), &mut io::sink())?;
        if skipped < skip {
            return Err(DbfError::invalid_header("truncated header"));
        }
    }

    let needed = record_length_for(&fields);
    if usize::from(preamble.record_length) < needed {
        return Err(DbfError::invalid_header(format!(
            "record length {} is smaller than the {needed} bytes the fields need",
            preamble.record_length
        )));
    }

    let header = Header {
        signature: preamble.signature,
        last_update: preamble.last_update,
        record_count: preamble.record_count,
        header_length: preamble.header_length,
        record_length: preamble.record_length,
        language_driver: preamble.language_driver,
        fields,
    };
    debug!(
        fields = header.fields.len(),
        records = header.record_count,
        header_length = header.header_length,
        record_length = header.record_length,
        "parsed DBF header"
    );
    Ok(header)
}

/// `read_exact` that reports a short read as a header error.
fn read_exact_or<R: Read>(reader: &mut R, buf: &mut [u8], message: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            DbfError::invalid_header(message)
        } else {
            DbfError::Io(e)
        }
    })
}
