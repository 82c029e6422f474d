//! DBF file writer.
//!
//! The header goes out first with a zero record count. Each record is
//! encoded into a buffer and written whole, so a value that fails to
//! encode leaves no partial record behind. [`DbfWriter::finish`] patches
//! the record count and appends the end-of-file marker.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use crate::codec::{TextCodec, driver_for_codec};
use crate::convert::{FieldSlot, field_slots};
use crate::error::{DbfError, Result};
use crate::header::{EOF_MARKER, Header, RECORD_COUNT_OFFSET};
use crate::types::{FieldDescriptor, LIVE_FLAG, RecordValues, WriterOptions};

/// Streaming DBF writer.
pub struct DbfWriter<W: Write + Seek> {
    writer: BufWriter<W>,
    start: u64,
    header: Header,
    slots: Vec<FieldSlot>,
    buf: Vec<u8>,
}

impl<W: Write + Seek> DbfWriter<W> {
    /// Create a writer with default options and write the header.
    pub fn new(writer: W, fields: Vec<FieldDescriptor>) -> Result<Self> {
        Self::with_options(writer, fields, WriterOptions::default())
    }

    /// Create a writer with options and write the header.
    pub fn with_options(
        writer: W,
        fields: Vec<FieldDescriptor>,
        options: WriterOptions,
    ) -> Result<Self> {
        let codec = if options.use_unicode {
            let name = options.encoding.as_deref().unwrap_or("ascii");
            Some(TextCodec::for_name(name)?)
        } else {
            None
        };
        let language_driver = options
            .language_driver
            .or_else(|| codec.and_then(driver_for_codec))
            .unwrap_or(0);

        let header = Header::new(
            fields,
            options.signature,
            options.get_last_update(),
            language_driver,
        )?;
        let slots = field_slots(&header, codec);
        let buf = vec![b' '; usize::from(header.record_length)];

        let mut writer = BufWriter::new(writer);
        let start = writer.stream_position()?;
        writer.write_all(&header.to_bytes()?)?;

        Ok(Self {
            writer,
            start,
            header,
            slots,
            buf,
        })
    }

    /// The header being written. Its record count tracks records written so far.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of records written so far.
    #[must_use]
    pub fn record_count(&self) -> u32 {
        self.header.record_count
    }

    /// Encode and append one record.
    ///
    /// Values are looked up by field name. On error nothing is written
    /// for this record; records written before it stay in place.
    pub fn write_record<V: RecordValues + ?Sized>(&mut self, record: &V) -> Result<()> {
        let count = self
            .header
            .record_count
            .checked_add(1)
            .ok_or_else(|| DbfError::invalid_header("record count exceeds u32"))?;

        self.buf[0] = LIVE_FLAG;
        for slot in &self.slots {
            let value = record
                .value(&slot.name)
                .ok_or_else(|| DbfError::MissingValue {
                    field: slot.name.clone(),
                })?;
            slot.rule
                .encode(value, &slot.name, &mut self.buf[slot.range()])?;
        }

        self.writer.write_all(&self.buf)?;
        self.header.record_count = count;
        Ok(())
    }

    /// Encode and append every record of a sequence.
    pub fn write_records<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: RecordValues,
    {
        for record in records {
            self.write_record(&record)?;
        }
        Ok(())
    }

    /// Patch the record count, append the end-of-file marker and flush.
    ///
    /// The header is patched relative to where the stream stood when the
    /// writer was created. Returns the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        let count = self.header.record_count;
        let end = self.writer.stream_position()?;
        self.writer
            .seek(SeekFrom::Start(self.start + RECORD_COUNT_OFFSET))?;
        self.writer.write_all(&count.to_le_bytes())?;
        self.writer.seek(SeekFrom::Start(end))?;
        self.writer.write_all(&[EOF_MARKER])?;
        self.writer.flush()?;
        debug!(records = count, "finalized DBF file");
        self.writer
            .into_inner()
            .map_err(|e| DbfError::Io(e.into_error()))
    }
}

impl DbfWriter<File> {
    /// Create a DBF file for writing.
    pub fn create(path: &Path, fields: Vec<FieldDescriptor>) -> Result<Self> {
        Self::create_with_options(path, fields, WriterOptions::default())
    }

    /// Create a DBF file with options.
    pub fn create_with_options(
        path: &Path,
        fields: Vec<FieldDescriptor>,
        options: WriterOptions,
    ) -> Result<Self> {
        let file = File::create(path)?;
        Self::with_options(file, fields, options)
    }
}

/// Write a whole table to a DBF file.
///
/// This is a convenience function that creates the file, writes every
/// record and finalizes the header. Returns the number of records written.
pub fn write_dbf<I>(
    path: &Path,
    fields: Vec<FieldDescriptor>,
    records: I,
    options: WriterOptions,
) -> Result<u32>
where
    I: IntoIterator,
    I::Item: RecordValues,
{
    let mut writer = DbfWriter::create_with_options(path, fields, options)?;
    writer.write_records(records)?;
    let count = writer.record_count();
    writer.finish()?;
    Ok(count)
}
