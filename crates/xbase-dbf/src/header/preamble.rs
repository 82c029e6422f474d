//! Table preamble parsing and building.
//!
//! # Preamble Structure (32 bytes, little-endian)
//!
//! | Offset | Field           | Type    | Description                      |
//! |--------|-----------------|---------|----------------------------------|
//! | 0      | signature       | byte    | Format/version tag               |
//! | 1-3    | last_update     | byte[3] | Year - 1900, month, day          |
//! | 4-7    | record_count    | u32     | Number of records                |
//! | 8-9    | header_length   | u16     | Bytes before the first record    |
//! | 10-11  | record_length   | u16     | Bytes per record, flag included  |
//! | 12-28  | reserved        | byte[17]| Zero                             |
//! | 29     | language_driver | byte    | Code page indicator              |
//! | 30-31  | reserved        | byte[2] | Zero                             |

use chrono::{Datelike, NaiveDate};

use crate::error::{DbfError, Result};

/// Preamble length in bytes.
pub const PREAMBLE_LEN: usize = 32;

/// Byte offset of the record count, patched once writing completes.
pub const RECORD_COUNT_OFFSET: u64 = 4;

const LANGUAGE_DRIVER_OFFSET: usize = 29;

/// Fixed fields of the table preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preamble {
    /// Signature byte.
    pub signature: u8,
    /// Raw last-update stamp.
    pub last_update: [u8; 3],
    /// Number of records.
    pub record_count: u32,
    /// Header length in bytes.
    pub header_length: u16,
    /// Record length in bytes.
    pub record_length: u16,
    /// Language driver byte.
    pub language_driver: u8,
}

/// Parse the 32-byte preamble.
#[must_use]
pub fn parse_preamble(data: &[u8; PREAMBLE_LEN]) -> Preamble {
    Preamble {
        signature: data[0],
        last_update: [data[1], data[2], data[3]],
        record_count: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
        header_length: u16::from_le_bytes([data[8], data[9]]),
        record_length: u16::from_le_bytes([data[10], data[11]]),
        language_driver: data[LANGUAGE_DRIVER_OFFSET],
    }
}

/// Build the 32-byte preamble.
#[must_use]
pub fn build_preamble(preamble: &Preamble) -> [u8; PREAMBLE_LEN] {
    let mut buf = [0u8; PREAMBLE_LEN];
    buf[0] = preamble.signature;
    buf[1..4].copy_from_slice(&preamble.last_update);
    buf[4..8].copy_from_slice(&preamble.record_count.to_le_bytes());
    buf[8..10].copy_from_slice(&preamble.header_length.to_le_bytes());
    buf[10..12].copy_from_slice(&preamble.record_length.to_le_bytes());
    buf[LANGUAGE_DRIVER_OFFSET] = preamble.language_driver;
    buf
}

/// Decode the last-update stamp; `None` if the bytes are not a real date.
#[must_use]
pub fn parse_last_update(raw: [u8; 3]) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        1900 + i32::from(raw[0]),
        u32::from(raw[1]),
        u32::from(raw[2]),
    )
}

/// Encode a last-update stamp. Only years 1900 to 2155 fit.
pub fn build_last_update(date: NaiveDate) -> Result<[u8; 3]> {
    let year = u8::try_from(date.year() - 1900).map_err(|_| {
        DbfError::invalid_header(format!("last update {date} is outside years 1900-2155"))
    })?;
    // month() and day() are at most 12 and 31
    Ok([year, date.month() as u8, date.day() as u8])
}
