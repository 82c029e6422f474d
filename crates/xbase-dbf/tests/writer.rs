//! Writer output and write/read round trips.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tempfile::tempdir;
use xbase_dbf::{
    DbfError, DbfReader, DbfValue, DbfWriter, FieldDescriptor, ReaderOptions, Record,
    WriterOptions, read_dbf, write_dbf,
};

fn sample_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::integer("INT_FLD", 4),
        FieldDescriptor::numeric("FLT_FLD", 5, 2),
        FieldDescriptor::character("CHR_FLD", 6),
        FieldDescriptor::date("DTE_FLD"),
        FieldDescriptor::logical("BLN_FLD"),
    ]
}

fn sample_records() -> Vec<Record> {
    let row = |int: i64, flt: &str, chr: &str, (y, m, d): (i32, u32, u32), bln: bool| {
        Record::new()
            .with("INT_FLD", int)
            .with("FLT_FLD", Decimal::from_str(flt).unwrap())
            .with("CHR_FLD", chr)
            .with("DTE_FLD", NaiveDate::from_ymd_opt(y, m, d).unwrap())
            .with("BLN_FLD", bln)
    };
    vec![
        row(25, "12.34", "test", (2006, 5, 7), true),
        row(113, "1.01", "del", (2006, 12, 23), false),
        row(7436, "0.5", "ex.", (2006, 7, 15), true),
    ]
}

fn fixed_date() -> WriterOptions {
    WriterOptions::new().with_last_update(NaiveDate::from_ymd_opt(2006, 6, 19).unwrap())
}

fn reference_bytes() -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/reference.dbf");
    std::fs::read(path).unwrap()
}

#[test]
fn writes_reference_bytes() {
    let mut writer =
        DbfWriter::with_options(Cursor::new(Vec::new()), sample_fields(), fixed_date()).unwrap();
    assert_eq!(writer.header().header_length, 193);
    assert_eq!(writer.header().record_length, 25);
    assert_eq!(writer.header().signature, 3);

    writer.write_records(sample_records()).unwrap();
    assert_eq!(writer.record_count(), 3);

    let bytes = writer.finish().unwrap().into_inner();
    assert_eq!(bytes, reference_bytes());
}

#[test]
fn accepts_maps_as_records() {
    let mut writer =
        DbfWriter::with_options(Cursor::new(Vec::new()), sample_fields(), fixed_date()).unwrap();
    for record in sample_records() {
        let map: HashMap<String, DbfValue> = record.into_map().into_iter().collect();
        writer.write_record(&map).unwrap();
    }
    assert_eq!(writer.finish().unwrap().into_inner(), reference_bytes());
}

#[test]
fn rejects_unknown_field_type() {
    let fields = vec![
        FieldDescriptor::integer("INT_FLD", 4),
        FieldDescriptor::numeric("FLT_FLD", 5, 2),
    ];
    let bad = FieldDescriptor::from_raw("WRNG_FLD", 0xd1, 6, 0).unwrap_err();
    assert!(matches!(bad, DbfError::UnknownFieldType { code: 0xd1, .. }));

    let mut fields = fields;
    fields.push(FieldDescriptor::character("WAY_TOO_LONG", 6));
    let err = DbfWriter::with_options(Cursor::new(Vec::new()), fields, fixed_date())
        .err()
        .unwrap();
    assert!(matches!(err, DbfError::FieldNameTooLong { .. }));
}

#[test]
fn value_errors_surface_per_record() {
    let mut writer =
        DbfWriter::with_options(Cursor::new(Vec::new()), sample_fields(), fixed_date()).unwrap();
    let mut records = sample_records();
    records[1] = records[1].clone().with("INT_FLD", 123_456);

    writer.write_record(&records[0]).unwrap();
    let err = writer.write_record(&records[1]).unwrap_err();
    assert!(matches!(err, DbfError::ValueTooWide { width: 4, .. }));
    writer.write_record(&records[2]).unwrap();

    let bytes = writer.finish().unwrap().into_inner();
    let read: Vec<Record> = DbfReader::new(Cursor::new(bytes))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(read.len(), 2);
    assert_eq!(read[1].get("INT_FLD"), Some(&DbfValue::Integer(7436)));
}

#[test]
fn roundtrip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.dbf");

    let count = write_dbf(&path, sample_fields(), sample_records(), fixed_date()).unwrap();
    assert_eq!(count, 3);

    let records = read_dbf(&path).unwrap();
    assert_eq!(records.len(), 3);
    for (read, written) in records.iter().zip(sample_records()) {
        assert_eq!(read.get("INT_FLD"), written.get("INT_FLD"));
        assert_eq!(read.get("CHR_FLD"), written.get("CHR_FLD"));
        assert_eq!(read.get("DTE_FLD"), written.get("DTE_FLD"));
        assert_eq!(read.get("BLN_FLD"), written.get("BLN_FLD"));
        let read_flt = read.get("FLT_FLD").and_then(DbfValue::as_decimal).unwrap();
        let written_flt = written.get("FLT_FLD").and_then(DbfValue::as_decimal).unwrap();
        assert_eq!(read_flt, written_flt);
    }
}

#[test]
fn null_dates_rejected_and_text_truncated() {
    let fields = vec![
        FieldDescriptor::character("NAME", 4),
        FieldDescriptor::date("BORN"),
    ];
    let born = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
    let mut writer =
        DbfWriter::with_options(Cursor::new(Vec::new()), fields, fixed_date()).unwrap();
    let err = writer
        .write_record(&Record::new().with("NAME", "abcdefgh").with("BORN", None::<NaiveDate>))
        .unwrap_err();
    assert!(matches!(err, DbfError::TypeMismatch { .. }));
    writer
        .write_record(&Record::new().with("NAME", "abcdefgh").with("BORN", born))
        .unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let records: Vec<Record> = DbfReader::new(Cursor::new(bytes))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("NAME"), Some(&DbfValue::text("abcd")));
    assert_eq!(records[0].get("BORN"), Some(&DbfValue::Date(born)));
}

fn roundtrip_one(field: FieldDescriptor, value: DbfValue) -> DbfValue {
    let name = field.name.clone();
    let mut writer =
        DbfWriter::with_options(Cursor::new(Vec::new()), vec![field], fixed_date()).unwrap();
    writer.write_record(&Record::new().with(&name, value)).unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let record = DbfReader::new(Cursor::new(bytes)).unwrap().next().unwrap().unwrap();
    record.get(&name).cloned().unwrap()
}

#[test]
fn widest_numeric_fields_roundtrip() {
    let widest = Decimal::from_str("99999999999999999999").unwrap();
    assert_eq!(
        roundtrip_one(FieldDescriptor::integer("N", 20), DbfValue::Decimal(widest)),
        DbfValue::Decimal(widest)
    );
    assert_eq!(
        roundtrip_one(FieldDescriptor::integer("N", 20), DbfValue::Integer(i64::MIN)),
        DbfValue::Integer(i64::MIN)
    );

    let finest = Decimal::from_str("0.123456789012345678").unwrap();
    let read = roundtrip_one(FieldDescriptor::numeric("N", 20, 18), DbfValue::Decimal(finest));
    assert_eq!(read.as_decimal().unwrap().to_string(), "0.123456789012345678");
}

#[test]
fn encoded_text_roundtrip() {
    let fields = vec![FieldDescriptor::character("NAME", 6)];
    let options = fixed_date().with_encoding("cp866");
    let mut writer = DbfWriter::with_options(Cursor::new(Vec::new()), fields, options).unwrap();
    writer.write_record(&Record::new().with("NAME", "тест")).unwrap();
    let bytes = writer.finish().unwrap().into_inner();
    assert_eq!(bytes[29], 0x65);

    let mut reader = DbfReader::new(Cursor::new(&bytes)).unwrap();
    let record = reader.next().unwrap().unwrap();
    assert_eq!(record.get("NAME"), Some(&DbfValue::text("тест")));

    let mut raw = DbfReader::with_options(Cursor::new(&bytes), ReaderOptions::new().raw_bytes())
        .unwrap();
    let record = raw.next().unwrap().unwrap();
    assert_eq!(
        record.get("NAME"),
        Some(&DbfValue::Bytes(b"\xe2\xa5\xe1\xe2".to_vec()))
    );
}

#[test]
fn raw_bytes_passthrough() {
    let fields = vec![FieldDescriptor::character("CHR_FLD", 6)];
    let options = fixed_date().raw_bytes();
    let mut writer = DbfWriter::with_options(Cursor::new(Vec::new()), fields, options).unwrap();
    writer
        .write_record(&Record::new().with("CHR_FLD", DbfValue::Bytes(b"\xf2\xe5\xf1\xf2".to_vec())))
        .unwrap();
    let bytes = writer.finish().unwrap().into_inner();
    assert_eq!(&bytes[66..72], b"\xf2\xe5\xf1\xf2  ");

    let records: Vec<Record> =
        DbfReader::with_options(Cursor::new(bytes), ReaderOptions::new().raw_bytes())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
    assert_eq!(
        records[0].get("CHR_FLD"),
        Some(&DbfValue::Bytes(b"\xf2\xe5\xf1\xf2".to_vec()))
    );
}

proptest! {
    #[test]
    fn date_fields_roundtrip(days in 0i64..3_652_059) {
        let date = NaiveDate::from_ymd_opt(1, 1, 1).unwrap() + chrono::Duration::days(days);
        let fields = vec![FieldDescriptor::date("D")];
        let mut writer =
            DbfWriter::with_options(Cursor::new(Vec::new()), fields, fixed_date()).unwrap();
        writer.write_record(&Record::new().with("D", date)).unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let record = DbfReader::new(Cursor::new(bytes)).unwrap().next().unwrap().unwrap();
        prop_assert_eq!(record.get("D").cloned(), Some(DbfValue::Date(date)));
    }

    #[test]
    fn integer_fields_roundtrip(value in -99_999i64..=999_999) {
        let fields = vec![FieldDescriptor::integer("N", 6)];
        let mut writer =
            DbfWriter::with_options(Cursor::new(Vec::new()), fields, fixed_date()).unwrap();
        writer.write_record(&Record::new().with("N", value)).unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let record = DbfReader::new(Cursor::new(bytes)).unwrap().next().unwrap().unwrap();
        prop_assert_eq!(record.get("N").cloned(), Some(DbfValue::Integer(value)));
    }

    #[test]
    fn twenty_digit_integers_roundtrip(text in "-?[1-9][0-9]{0,18}|[1-9][0-9]{19}") {
        let written = Decimal::from_str(&text).unwrap();
        let read = roundtrip_one(FieldDescriptor::integer("N", 20), DbfValue::Decimal(written));
        let read = match read {
            DbfValue::Integer(v) => Decimal::from(v),
            DbfValue::Decimal(v) => v,
            other => panic!("unexpected value {other:?}"),
        };
        prop_assert_eq!(read, written);
    }

    #[test]
    fn wide_decimals_roundtrip(
        decimals in 1u8..=17,
        mantissa in -99_999_999_999_999_999i64..1_000_000_000_000_000_000,
    ) {
        let written = Decimal::new(mantissa, u32::from(decimals));
        let field = FieldDescriptor::numeric("N", 20, decimals);
        let read = roundtrip_one(field, DbfValue::Decimal(written))
            .as_decimal()
            .unwrap();
        prop_assert_eq!(read, written);
        prop_assert_eq!(read.scale(), u32::from(decimals));
    }

    #[test]
    fn full_width_text_roundtrip(text in "[ -~]{253}[!-~]") {
        let field = FieldDescriptor::character("C", 254);
        let read = roundtrip_one(field, DbfValue::text(text.clone()));
        prop_assert_eq!(read, DbfValue::text(text));
    }
}
