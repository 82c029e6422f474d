//! Date conversions for the on-disk `YYYYMMDD` representation.
//!
//! Malformed dates are treated as missing data: the raw-to-date
//! direction returns `None` instead of failing, since many files in the
//! wild carry blank or garbage date payloads.

use chrono::{Datelike, NaiveDate};

use crate::error::{DbfError, Result};
use crate::types::DATE_LEN;

/// Placeholder some writers store for a missing date.
const NONE_LITERAL: &[u8] = b"None";

/// Human-readable date format (`DD.MM.YYYY`).
const HUMAN_FORMAT: &str = "%d.%m.%Y";

/// Decode an 8-digit `YYYYMMDD` buffer into a date.
///
/// Returns `None` for empty input, the literal `None`, blank or zeroed
/// buffers, and anything that is not a valid calendar date.
#[must_use]
pub fn raw_to_date(raw: &[u8]) -> Option<NaiveDate> {
    if raw.is_empty() || raw == NONE_LITERAL {
        return None;
    }
    if raw.len() != usize::from(DATE_LEN) || !raw.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let year = digits(&raw[0..4]);
    let month = digits(&raw[4..6]);
    let day = digits(&raw[6..8]);
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

/// Encode a date as an 8-byte `YYYYMMDD` buffer.
///
/// Years outside `0..=9999` cannot be stored in four digits.
pub fn date_to_raw(date: NaiveDate) -> Result<[u8; DATE_LEN as usize]> {
    if !(0..=9999).contains(&date.year()) {
        return Err(DbfError::DateOutOfRange { date });
    }
    let text = format!("{:04}{:02}{:02}", date.year(), date.month(), date.day());
    let mut raw = [b'0'; DATE_LEN as usize];
    raw.copy_from_slice(text.as_bytes());
    Ok(raw)
}

/// Decode an 8-digit `YYYYMMDD` buffer into `DD.MM.YYYY` text.
///
/// Follows the same `None` rules as [`raw_to_date`].
#[must_use]
pub fn raw_to_human(raw: &[u8]) -> Option<String> {
    raw_to_date(raw).map(|date| date.format(HUMAN_FORMAT).to_string())
}

/// Encode `DD.MM.YYYY` text as an 8-byte `YYYYMMDD` buffer.
///
/// The text must be exactly two day digits, a dot, two month digits, a
/// dot and four year digits, naming a real calendar date.
pub fn human_to_raw(text: &str) -> Result<[u8; DATE_LEN as usize]> {
    let invalid = || DbfError::InvalidHumanDate {
        text: text.to_string(),
    };
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'.' || bytes[5] != b'.' {
        return Err(invalid());
    }
    let (day, month, year) = (&bytes[0..2], &bytes[3..5], &bytes[6..10]);
    if ![day, month, year]
        .iter()
        .all(|part| part.iter().all(u8::is_ascii_digit))
    {
        return Err(invalid());
    }
    let date = NaiveDate::from_ymd_opt(digits(year) as i32, digits(month), digits(day))
        .ok_or_else(invalid)?;
    date_to_raw(date)
}

/// Parse a run of ASCII digits. Callers check the bytes are digits.
fn digits(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0, |acc, &b| acc * 10 + u32::from(b - b'0'))
}
