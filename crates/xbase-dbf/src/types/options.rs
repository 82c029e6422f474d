//! Reader and writer options.

use chrono::NaiveDate;

/// Default table signature (dBase III without memo).
pub const DEFAULT_SIGNATURE: u8 = 0x03;

/// Options for reading DBF files.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Decode character fields to text (default: true).
    pub use_unicode: bool,
    /// Encoding name; overrides the header's language driver.
    /// Ignored when `use_unicode` is false.
    pub encoding: Option<String>,
    /// Yield deleted records too, with their deletion flag attached.
    pub show_deleted: bool,
    /// Number of records to skip, counted after deletion filtering.
    pub start_from: usize,
    /// Maximum number of records to yield.
    pub limit: Option<usize>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            use_unicode: true,
            encoding: None,
            show_deleted: false,
            start_from: 0,
            limit: None,
        }
    }
}

impl ReaderOptions {
    /// Create reader options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return character fields as raw bytes.
    #[must_use]
    pub fn raw_bytes(mut self) -> Self {
        self.use_unicode = false;
        self
    }

    /// Decode character fields with the named encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Include deleted records.
    #[must_use]
    pub fn show_deleted(mut self) -> Self {
        self.show_deleted = true;
        self
    }

    /// Skip the first `start` records of the filtered sequence.
    #[must_use]
    pub fn start_from(mut self, start: usize) -> Self {
        self.start_from = start;
        self
    }

    /// Yield at most `limit` records.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Options for writing DBF files.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Encode text values with `encoding` (default: true).
    pub use_unicode: bool,
    /// Encoding name (default: ASCII).
    pub encoding: Option<String>,
    /// Signature byte (default: 0x03).
    pub signature: u8,
    /// Last-update stamp (default: today).
    pub last_update: Option<NaiveDate>,
    /// Language driver byte (default: derived from the encoding).
    pub language_driver: Option<u8>,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            use_unicode: true,
            encoding: None,
            signature: DEFAULT_SIGNATURE,
            last_update: None,
            language_driver: None,
        }
    }
}

impl WriterOptions {
    /// Create writer options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write text values as their UTF-8 bytes without transcoding.
    #[must_use]
    pub fn raw_bytes(mut self) -> Self {
        self.use_unicode = false;
        self
    }

    /// Set the encoding name.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Set the signature byte.
    #[must_use]
    pub fn with_signature(mut self, signature: u8) -> Self {
        self.signature = signature;
        self
    }

    /// Set the last-update stamp.
    #[must_use]
    pub fn with_last_update(mut self, date: NaiveDate) -> Self {
        self.last_update = Some(date);
        self
    }

    /// Set the language driver byte explicitly.
    #[must_use]
    pub fn with_language_driver(mut self, driver: u8) -> Self {
        self.language_driver = Some(driver);
        self
    }

    /// Get the last-update stamp (today if not set).
    #[must_use]
    pub fn get_last_update(&self) -> NaiveDate {
        self.last_update
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
