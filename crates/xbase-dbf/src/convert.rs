//! Per-type field conversion rules.
//!
//! Each field in a record is converted by a [`FieldRule`] chosen from its
//! descriptor. Decoding turns the field's raw bytes into a [`DbfValue`];
//! encoding renders a value into exactly `length` bytes.
//!
//! | Type | On disk                              | Decoded                   |
//! |------|--------------------------------------|---------------------------|
//! | `N`  | ASCII digits, right-justified        | `Integer` / `Decimal`     |
//! | `C`  | bytes, left-justified, space-padded  | `Text` / `Bytes`          |
//! | `D`  | `YYYYMMDD`                           | `Date` / `Null`           |
//! | `L`  | one of `TtYyFfNn` or space           | `Logical`                 |

use std::num::IntErrorKind;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::codec::TextCodec;
use crate::date::{date_to_raw, raw_to_date};
use crate::error::{DbfError, Result};
use crate::header::Header;
use crate::types::{DbfValue, FieldDescriptor, FieldType};

/// Conversion rule for one field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Integer when `decimals` is zero, fixed-point decimal otherwise.
    /// Integers too large for `i64` decode as scale-0 decimals.
    Numeric { decimals: u8 },
    /// Text decoded with `codec`, or raw bytes when `codec` is `None`.
    Character { codec: Option<TextCodec> },
    /// `YYYYMMDD` date; malformed payloads decode to `Null`.
    Date,
    /// Single-byte boolean.
    Logical,
}

impl FieldRule {
    /// Pick the rule for a descriptor.
    #[must_use]
    pub fn for_field(field: &FieldDescriptor, codec: Option<TextCodec>) -> Self {
        match field.field_type {
            FieldType::Numeric => Self::Numeric {
                decimals: field.decimals,
            },
            FieldType::Character => Self::Character { codec },
            FieldType::Date => Self::Date,
            FieldType::Logical => Self::Logical,
        }
    }

    /// Decode a field's raw bytes.
    pub fn decode(&self, raw: &[u8], field: &str) -> Result<DbfValue> {
        match *self {
            Self::Numeric { decimals } => decode_numeric(raw, decimals, field),
            Self::Character { codec } => decode_character(raw, codec, field),
            Self::Date => Ok(raw_to_date(raw).map_or(DbfValue::Null, DbfValue::Date)),
            Self::Logical => Ok(DbfValue::Logical(decode_logical(raw))),
        }
    }

    /// Encode a value into `out`, which must be exactly the field width.
    pub fn encode(&self, value: &DbfValue, field: &str, out: &mut [u8]) -> Result<()> {
        match *self {
            Self::Numeric { decimals } => encode_numeric(value, decimals, field, out),
            Self::Character { codec } => encode_character(value, codec, field, out),
            Self::Date => encode_date(value, field, out),
            Self::Logical => encode_logical(value, field, out),
        }
    }
}

/// A field's position inside a record plus its conversion rule.
#[derive(Debug, Clone)]
pub(crate) struct FieldSlot {
    pub name: String,
    pub offset: usize,
    pub length: usize,
    pub rule: FieldRule,
}

impl FieldSlot {
    /// The field's bytes within a full record buffer.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.length
    }
}

/// Slots for every field of a header, in on-disk order.
pub(crate) fn field_slots(header: &Header, codec: Option<TextCodec>) -> Vec<FieldSlot> {
    header
        .field_layout()
        .map(|(field, offset)| FieldSlot {
            name: field.name.clone(),
            offset,
            length: usize::from(field.length),
            rule: FieldRule::for_field(field, codec),
        })
        .collect()
}

/// Strip whitespace and NUL padding from both ends.
fn trim_numeric(raw: &[u8]) -> &[u8] {
    let pad = |b: &u8| b.is_ascii_whitespace() || *b == 0;
    let start = raw.iter().position(|b| !pad(b)).unwrap_or(raw.len());
    let end = raw.iter().rposition(|b| !pad(b)).map_or(start, |i| i + 1);
    &raw[start..end]
}

fn decode_numeric(raw: &[u8], decimals: u8, field: &str) -> Result<DbfValue> {
    let trimmed = trim_numeric(raw);
    let parse_error = || DbfError::numeric_parse(field, String::from_utf8_lossy(trimmed));
    let text = std::str::from_utf8(trimmed).map_err(|_| parse_error())?;

    if decimals == 0 {
        if text.is_empty() {
            return Ok(DbfValue::Integer(0));
        }
        return match text.parse::<i64>() {
            Ok(value) => Ok(DbfValue::Integer(value)),
            // N(19,0) and N(20,0) hold values past i64.
            Err(e)
                if matches!(
                    e.kind(),
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                ) =>
            {
                Decimal::from_str(text)
                    .map(DbfValue::Decimal)
                    .map_err(|_| parse_error())
            }
            Err(_) => Err(parse_error()),
        };
    }

    let value = if text.is_empty() {
        Decimal::ZERO
    } else {
        Decimal::from_str(text).map_err(|_| parse_error())?
    };
    Ok(DbfValue::Decimal(fixed_scale(value, decimals)))
}

/// Round half away from zero to `decimals` places and pin the scale so
/// `0.5` renders as `0.50`.
fn fixed_scale(value: Decimal, decimals: u8) -> Decimal {
    let scale = u32::from(decimals);
    let mut value = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(scale);
    value
}

fn encode_numeric(value: &DbfValue, decimals: u8, field: &str, out: &mut [u8]) -> Result<()> {
    let text = match (value, decimals) {
        (DbfValue::Integer(v), 0) => v.to_string(),
        (DbfValue::Integer(v), d) => fixed_scale(Decimal::from(*v), d).to_string(),
        (DbfValue::Decimal(v), d) => fixed_scale(*v, d).to_string(),
        (other, _) => {
            return Err(DbfError::type_mismatch(
                field,
                FieldType::Numeric,
                other.kind(),
            ));
        }
    };
    let width = out.len();
    if text.len() > width {
        return Err(DbfError::value_too_wide(field, width, text));
    }
    let pad = width - text.len();
    out[..pad].fill(b' ');
    out[pad..].copy_from_slice(text.as_bytes());
    Ok(())
}

fn decode_character(raw: &[u8], codec: Option<TextCodec>, field: &str) -> Result<DbfValue> {
    let end = raw
        .iter()
        .rposition(|&b| b != b' ')
        .map_or(0, |i| i + 1);
    let trimmed = &raw[..end];
    match codec {
        Some(codec) => Ok(DbfValue::Text(codec.decode(trimmed, field)?.into_owned())),
        None => Ok(DbfValue::Bytes(trimmed.to_vec())),
    }
}

fn encode_character(
    value: &DbfValue,
    codec: Option<TextCodec>,
    field: &str,
    out: &mut [u8],
) -> Result<()> {
    let encoded;
    let bytes: &[u8] = match (value, codec) {
        (DbfValue::Text(s), Some(codec)) => {
            encoded = codec.encode(s, field)?;
            &encoded
        }
        (DbfValue::Text(s), None) => s.as_bytes(),
        (DbfValue::Bytes(b), _) => b,
        (other, _) => {
            return Err(DbfError::type_mismatch(
                field,
                FieldType::Character,
                other.kind(),
            ));
        }
    };
    let take = bytes.len().min(out.len());
    out[..take].copy_from_slice(&bytes[..take]);
    out[take..].fill(b' ');
    Ok(())
}

fn encode_date(value: &DbfValue, field: &str, out: &mut [u8]) -> Result<()> {
    match value {
        DbfValue::Date(date) => {
            out.copy_from_slice(&date_to_raw(*date)?);
            Ok(())
        }
        other => Err(DbfError::type_mismatch(field, FieldType::Date, other.kind())),
    }
}

/// `t`/`y` in either case are true; every other byte is false.
fn decode_logical(raw: &[u8]) -> bool {
    matches!(raw.first(), Some(b't' | b'T' | b'y' | b'Y'))
}

fn encode_logical(value: &DbfValue, field: &str, out: &mut [u8]) -> Result<()> {
    let DbfValue::Logical(flag) = value else {
        return Err(DbfError::type_mismatch(
            field,
            FieldType::Logical,
            value.kind(),
        ));
    };
    out.fill(b' ');
    out[0] = if *flag { b'T' } else { b'F' };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dec(text: &str) -> DbfValue {
        DbfValue::Decimal(Decimal::from_str(text).unwrap())
    }

    fn encode(rule: FieldRule, value: &DbfValue, width: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; width];
        rule.encode(value, "F", &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_decode_integer() {
        let rule = FieldRule::Numeric { decimals: 0 };
        for (raw, expected) in [
            (b"    ", 0),
            (b"   0", 0),
            (b" 0  ", 0),
            (b" 100", 100),
            (b"3452", 3452),
            (b"-12 ", -12),
        ] {
            assert_eq!(rule.decode(raw, "INT_FLD").unwrap(), DbfValue::Integer(expected));
        }
        let err = rule.decode(b"foo ", "INT_FLD").unwrap_err();
        assert!(matches!(err, DbfError::NumericParse { .. }));
        let err = rule.decode(b" 1.5", "INT_FLD").unwrap_err();
        assert!(matches!(err, DbfError::NumericParse { .. }));
    }

    #[test]
    fn test_decode_integer_past_i64() {
        let rule = FieldRule::Numeric { decimals: 0 };
        assert_eq!(
            rule.decode(b"9223372036854775807", "F").unwrap(),
            DbfValue::Integer(i64::MAX)
        );
        assert_eq!(
            rule.decode(b"99999999999999999999", "F").unwrap(),
            dec("99999999999999999999")
        );
        assert_eq!(
            rule.decode(b"-9999999999999999999", "F").unwrap(),
            dec("-9999999999999999999")
        );
    }

    #[test]
    fn test_decode_decimal() {
        let rule = FieldRule::Numeric { decimals: 2 };
        assert_eq!(rule.decode(b"     ", "F").unwrap(), dec("0.00"));
        assert_eq!(rule.decode(b" 0   ", "F").unwrap(), dec("0.00"));
        assert_eq!(rule.decode(b"    5", "F").unwrap(), dec("5.00"));
        assert_eq!(rule.decode(b" 5.2 ", "F").unwrap(), dec("5.20"));
        assert_eq!(rule.decode(b"12.34", "F").unwrap(), dec("12.34"));
        assert!(rule.decode(b"foo", "F").is_err());

        let DbfValue::Decimal(value) = rule.decode(b" 5.2 ", "F").unwrap() else {
            panic!("expected decimal");
        };
        assert_eq!(value.to_string(), "5.20");
    }

    #[test]
    fn test_decode_nul_padded_numeric() {
        let rule = FieldRule::Numeric { decimals: 0 };
        assert_eq!(rule.decode(b"25\0\0", "F").unwrap(), DbfValue::Integer(25));
        let rule = FieldRule::Numeric { decimals: 2 };
        assert_eq!(rule.decode(b"1.01\0", "F").unwrap(), dec("1.01"));
    }

    #[test]
    fn test_encode_numeric() {
        let int = FieldRule::Numeric { decimals: 0 };
        assert_eq!(encode(int, &DbfValue::Integer(25), 4).unwrap(), b"  25");
        assert_eq!(encode(int, &dec("12.5"), 4).unwrap(), b"  13");
        let err = encode(int, &DbfValue::Integer(12345), 4).unwrap_err();
        assert!(matches!(err, DbfError::ValueTooWide { width: 4, .. }));

        let flt = FieldRule::Numeric { decimals: 2 };
        assert_eq!(encode(flt, &dec("0.5"), 5).unwrap(), b" 0.50");
        assert_eq!(encode(flt, &dec("12.34"), 5).unwrap(), b"12.34");
        assert_eq!(encode(flt, &DbfValue::Integer(7), 5).unwrap(), b" 7.00");
        assert!(encode(flt, &DbfValue::text("1"), 5).is_err());
    }

    #[test]
    fn test_encode_rounds_half_away_from_zero() {
        let int = FieldRule::Numeric { decimals: 0 };
        assert_eq!(encode(int, &dec("0.5"), 4).unwrap(), b"   1");
        assert_eq!(encode(int, &dec("-2.5"), 4).unwrap(), b"  -3");

        let flt = FieldRule::Numeric { decimals: 2 };
        assert_eq!(encode(flt, &dec("0.125"), 6).unwrap(), b"  0.13");
        assert_eq!(encode(flt, &dec("-0.125"), 6).unwrap(), b" -0.13");
        assert_eq!(encode(flt, &dec("0.135"), 6).unwrap(), b"  0.14");
        assert_eq!(flt.decode(b"0.125", "F").unwrap(), dec("0.13"));
    }

    #[test]
    fn test_decode_character() {
        let rule = FieldRule::Character {
            codec: Some(TextCodec::Ascii),
        };
        assert_eq!(rule.decode(b"      ", "F").unwrap(), DbfValue::text(""));
        assert_eq!(rule.decode(b"  x   ", "F").unwrap(), DbfValue::text("  x"));
        assert_eq!(rule.decode(b"x     ", "F").unwrap(), DbfValue::text("x"));
        assert_eq!(rule.decode(b"x\0\0   ", "F").unwrap(), DbfValue::text("x\0\0"));
        let err = rule.decode(b"\xf2\xe5\xf1\xf2", "CHR_FLD").unwrap_err();
        assert!(matches!(err, DbfError::Decode { .. }));
    }

    #[test]
    fn test_decode_character_raw() {
        let rule = FieldRule::Character { codec: None };
        assert_eq!(rule.decode(b"  x   ", "F").unwrap(), DbfValue::Bytes(b"  x".to_vec()));
        assert_eq!(
            rule.decode(b"\xf2\xe5\xf1\xf2", "F").unwrap(),
            DbfValue::Bytes(b"\xf2\xe5\xf1\xf2".to_vec())
        );
    }

    #[test]
    fn test_encode_character() {
        let rule = FieldRule::Character {
            codec: Some(TextCodec::Ascii),
        };
        assert_eq!(encode(rule, &DbfValue::text("test"), 6).unwrap(), b"test  ");
        assert_eq!(encode(rule, &DbfValue::text("toolongvalue"), 6).unwrap(), b"toolon");
        assert!(matches!(
            encode(rule, &DbfValue::text("тест"), 6),
            Err(DbfError::Encode { .. })
        ));
        assert!(encode(rule, &DbfValue::Integer(1), 6).is_err());
    }

    #[test]
    fn test_date_rule() {
        let date = NaiveDate::from_ymd_opt(2009, 7, 27).unwrap();
        assert_eq!(FieldRule::Date.decode(b"20090727", "F").unwrap(), DbfValue::Date(date));
        assert_eq!(FieldRule::Date.decode(b"        ", "F").unwrap(), DbfValue::Null);
        assert_eq!(FieldRule::Date.decode(b"foo", "F").unwrap(), DbfValue::Null);

        assert_eq!(encode(FieldRule::Date, &DbfValue::Date(date), 8).unwrap(), b"20090727");
        let err = encode(FieldRule::Date, &DbfValue::Null, 8).unwrap_err();
        assert!(matches!(
            err,
            DbfError::TypeMismatch {
                expected: FieldType::Date,
                ..
            }
        ));
        let err = encode(FieldRule::Date, &DbfValue::Bytes(b"20060506".to_vec()), 8).unwrap_err();
        assert!(matches!(
            err,
            DbfError::TypeMismatch {
                expected: FieldType::Date,
                ..
            }
        ));
    }

    #[test]
    fn test_logical_rule() {
        for raw in [b"t", b"T", b"y", b"Y"] {
            assert_eq!(FieldRule::Logical.decode(raw, "F").unwrap(), DbfValue::Logical(true));
        }
        for raw in [b"f", b"F", b"n", b"N", b" ", b"x", b"?"] {
            assert_eq!(FieldRule::Logical.decode(raw, "F").unwrap(), DbfValue::Logical(false));
        }
        assert_eq!(encode(FieldRule::Logical, &DbfValue::Logical(true), 1).unwrap(), b"T");
        assert_eq!(encode(FieldRule::Logical, &DbfValue::Logical(false), 1).unwrap(), b"F");
        assert!(encode(FieldRule::Logical, &DbfValue::Null, 1).is_err());
    }

    #[test]
    fn test_for_field() {
        let field = FieldDescriptor::numeric("FLT_FLD", 5, 2);
        assert_eq!(
            FieldRule::for_field(&field, None),
            FieldRule::Numeric { decimals: 2 }
        );
        let field = FieldDescriptor::character("CHR_FLD", 6);
        assert_eq!(
            FieldRule::for_field(&field, Some(TextCodec::Ascii)),
            FieldRule::Character {
                codec: Some(TextCodec::Ascii)
            }
        );
    }
}
