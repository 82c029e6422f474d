//! DBF file reader.
//!
//! The reader parses the header when it is created and then yields one
//! decoded record per iteration step, so memory use does not grow with
//! the table size. It is single-pass: to read again, open the source again.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use tracing::{trace, warn};

use crate::codec::{TextCodec, encoding_for_driver};
use crate::convert::{FieldSlot, field_slots};
use crate::error::{DbfError, Result};
use crate::header::{Header, read_header};
use crate::types::{DeletionFlag, FieldDescriptor, ReaderOptions, Record};

/// Streaming DBF reader.
///
/// Iterating yields `Result<Record>`. Deleted records are skipped unless
/// [`ReaderOptions::show_deleted`] is set; `start_from` and `limit` are
/// counted over the records that survive that filter.
pub struct DbfReader<R: Read> {
    reader: BufReader<R>,
    header: Header,
    slots: Vec<FieldSlot>,
    codec: Option<TextCodec>,
    options: ReaderOptions,
    buf: Vec<u8>,
    /// Raw records consumed, deleted ones included.
    position: u32,
    /// Filtered records passed over toward `start_from`.
    skipped: usize,
    /// Records yielded.
    emitted: usize,
    exhausted: bool,
}

impl<R: Read> DbfReader<R> {
    /// Create a reader with default options, parsing the header.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_options(reader, ReaderOptions::default())
    }

    /// Create a reader with options, parsing the header.
    pub fn with_options(reader: R, options: ReaderOptions) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let header = read_header(&mut reader)?;
        let codec = resolve_codec(&options, header.language_driver)?;
        let slots = field_slots(&header, codec);
        let buf = vec![0u8; usize::from(header.record_length)];

        Ok(Self {
            reader,
            header,
            slots,
            codec,
            options,
            buf,
            position: 0,
            skipped: 0,
            emitted: 0,
            exhausted: false,
        })
    }

    /// The parsed header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Field descriptors in on-disk order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.header.fields
    }

    /// Field names in on-disk order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.header.field_names()
    }

    /// Number of records stored in the file, deleted ones included.
    #[must_use]
    pub fn record_count(&self) -> u32 {
        self.header.record_count
    }

    /// Name of the codec used for character fields; `None` when reading raw bytes.
    #[must_use]
    pub fn encoding(&self) -> Option<&'static str> {
        self.codec.map(TextCodec::name)
    }

    /// Language driver byte from the header.
    #[must_use]
    pub fn language_driver(&self) -> u8 {
        self.header.language_driver
    }

    /// Last-update stamp from the header.
    #[must_use]
    pub fn last_update(&self) -> Option<NaiveDate> {
        self.header.last_update_date()
    }

    /// Decode the record currently held in the buffer.
    fn decode_record(&self, flag: DeletionFlag) -> Result<Record> {
        let fields = self
            .slots
            .iter()
            .map(|slot| {
                let value = slot.rule.decode(&self.buf[slot.range()], &slot.name)?;
                Ok((slot.name.clone(), value))
            })
            .collect::<Result<Vec<_>>>()?;
        let mut record = Record::from_fields(fields);
        if self.options.show_deleted {
            record.set_deletion(flag);
        }
        Ok(record)
    }
}

impl DbfReader<File> {
    /// Open a DBF file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, ReaderOptions::default())
    }

    /// Open a DBF file with options.
    pub fn open_with_options(path: &Path, options: ReaderOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DbfError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DbfError::Io(e)
            }
        })?;
        Self::with_options(file, options)
    }
}

impl<R: Read> Iterator for DbfReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.exhausted {
                return None;
            }
            let limit_reached = self.options.limit.is_some_and(|limit| self.emitted >= limit);
            if limit_reached || self.position >= self.header.record_count {
                self.exhausted = true;
                return None;
            }

            if let Err(e) = self.reader.read_exact(&mut self.buf) {
                self.exhausted = true;
                return Some(Err(e.into()));
            }
            self.position += 1;

            let flag = DeletionFlag::from_byte(self.buf[0]);
            if flag.is_deleted() && !self.options.show_deleted {
                trace!(record = self.position, "skipping deleted record");
                continue;
            }
            if self.skipped < self.options.start_from {
                self.skipped += 1;
                continue;
            }

            self.emitted += 1;
            return Some(self.decode_record(flag));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            return (0, Some(0));
        }
        let remaining = (self.header.record_count - self.position) as usize;
        let upper = match self.options.limit {
            Some(limit) => remaining.min(limit.saturating_sub(self.emitted)),
            None => remaining,
        };
        (0, Some(upper))
    }
}

/// Pick the character codec: explicit name first, then the language driver.
fn resolve_codec(options: &ReaderOptions, language_driver: u8) -> Result<Option<TextCodec>> {
    if !options.use_unicode {
        return Ok(None);
    }
    if let Some(name) = &options.encoding {
        return TextCodec::for_name(name).map(Some);
    }
    match encoding_for_driver(language_driver) {
        Some(name) => TextCodec::for_name(name).map(Some),
        None => {
            warn!(
                language_driver,
                "unknown language driver, decoding character fields as ASCII"
            );
            Ok(Some(TextCodec::Ascii))
        }
    }
}

/// Read every record of a DBF file.
///
/// This is a convenience function that opens the file and collects the records.
pub fn read_dbf(path: &Path) -> Result<Vec<Record>> {
    DbfReader::open(path)?.collect()
}

/// Read every record of a DBF file with options.
pub fn read_dbf_with_options(path: &Path, options: ReaderOptions) -> Result<Vec<Record>> {
    DbfReader::open_with_options(path, options)?.collect()
}
