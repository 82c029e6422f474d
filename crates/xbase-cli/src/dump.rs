//! Text rendering of DBF tables.
//!
//! Two layouts are supported: separator-delimited lines (one record per
//! line by default) and a boxed table.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use tracing::{debug, info, warn};
use xbase_dbf::{DbfReader, DbfValue, FieldDescriptor, FieldType, ReaderOptions, Record};

/// How records are rendered.
#[derive(Debug, Clone)]
pub struct DumpOptions {
    /// Written after every record in separator mode.
    pub record_separator: String,
    /// Written between values in separator mode, and escaped inside them.
    pub field_separator: String,
    /// Lowercased names of the fields to print; empty prints every field.
    pub fields: Vec<String>,
    /// Text printed for null values.
    pub undef: String,
    /// Render a table instead of separated lines.
    pub table: bool,
    /// Decode character fields with this encoding; raw bytes otherwise.
    pub encoding: Option<String>,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            record_separator: "\n".to_string(),
            field_separator: ":".to_string(),
            fields: Vec::new(),
            undef: String::new(),
            table: false,
            encoding: None,
        }
    }
}

impl DumpOptions {
    fn reader_options(&self) -> ReaderOptions {
        match &self.encoding {
            Some(encoding) => ReaderOptions::new().with_encoding(encoding.clone()),
            None => ReaderOptions::new().raw_bytes(),
        }
    }
}

/// Replace the escape sequences `\n`, `\r` and `\t` with the characters they name.
#[must_use]
pub fn unescape_separator(value: &str) -> String {
    value
        .replace("\\n", "\n")
        .replace("\\r", "\r")
        .replace("\\t", "\t")
}

/// Split a comma-separated field list into lowercased names.
#[must_use]
pub fn parse_field_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Dump one file. Returns the number of records written.
pub fn dump_file<W: Write>(path: &Path, options: &DumpOptions, out: &mut W) -> Result<usize> {
    info!(path = %path.display(), "dumping table");
    let reader = DbfReader::open_with_options(path, options.reader_options())
        .with_context(|| format!("open {}", path.display()))?;
    dump(reader, options, out).with_context(|| format!("dump {}", path.display()))
}

/// Dump every record of an open reader.
pub fn dump<R: Read, W: Write>(
    reader: DbfReader<R>,
    options: &DumpOptions,
    out: &mut W,
) -> Result<usize> {
    let columns = select_columns(reader.fields(), &options.fields);
    let count = if options.table {
        write_table(reader, &columns, options, out)?
    } else {
        write_separated(reader, &columns, options, out)?
    };
    out.flush()?;
    debug!(records = count, "dump finished");
    Ok(count)
}

/// A printed field and its position in the record.
struct Column {
    index: usize,
    field: FieldDescriptor,
}

/// Fields to print, in table order.
fn select_columns(fields: &[FieldDescriptor], wanted: &[String]) -> Vec<Column> {
    for name in wanted {
        if !fields.iter().any(|f| f.name.to_lowercase() == *name) {
            warn!(field = %name, "requested field is not in the table");
        }
    }
    fields
        .iter()
        .enumerate()
        .filter(|(_, f)| wanted.is_empty() || wanted.contains(&f.name.to_lowercase()))
        .map(|(index, field)| Column {
            index,
            field: field.clone(),
        })
        .collect()
}

fn cell_text(record: &Record, column: &Column, undef: &str) -> String {
    match record.value_at(column.index) {
        None | Some(DbfValue::Null) => undef.to_string(),
        Some(value) => value.to_string(),
    }
}

fn write_separated<R: Read, W: Write>(
    reader: DbfReader<R>,
    columns: &[Column],
    options: &DumpOptions,
    out: &mut W,
) -> Result<usize> {
    let separator = options.field_separator.as_str();
    let escaped = format!("\\{separator}");
    let mut count = 0;
    for record in reader {
        let record = record?;
        let line = columns
            .iter()
            .map(|column| {
                let text = cell_text(&record, column, &options.undef);
                if separator.is_empty() {
                    text
                } else {
                    text.replace(separator, &escaped)
                }
            })
            .collect::<Vec<_>>()
            .join(separator);
        write!(out, "{line}{}", options.record_separator)?;
        count += 1;
    }
    Ok(count)
}

fn write_table<R: Read, W: Write>(
    reader: DbfReader<R>,
    columns: &[Column],
    options: &DumpOptions,
    out: &mut W,
) -> Result<usize> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(columns.iter().map(|c| c.field.name.as_str()));
    for (position, column) in columns.iter().enumerate() {
        if column.field.field_type == FieldType::Numeric
            && let Some(table_column) = table.column_mut(position)
        {
            table_column.set_cell_alignment(CellAlignment::Right);
        }
    }

    let mut count = 0;
    for record in reader {
        let record = record?;
        table.add_row(
            columns
                .iter()
                .map(|column| cell_text(&record, column, &options.undef)),
        );
        count += 1;
    }
    writeln!(out, "{table}")?;
    Ok(count)
}
