//! Text codecs for character fields.
//!
//! Character data is stored in whatever single-byte code page the
//! producing application used. The header's language-driver byte names
//! it; callers can also pick a codec by name. Strict 7-bit ASCII is
//! handled here, everything else goes through `encoding_rs`.

use std::borrow::Cow;

use encoding_rs::Encoding;

use crate::error::{DbfError, Result};

/// Language-driver byte to encoding name.
///
/// Only code pages `encoding_rs` can serve are listed.
pub const LANGUAGE_DRIVERS: &[(u8, &str)] = &[
    (0x00, "ascii"),
    (0x03, "windows-1252"),
    (0x04, "macintosh"),
    (0x57, "windows-1252"),
    (0x65, "ibm866"),
    (0x96, "x-mac-cyrillic"),
    (0xc8, "windows-1250"),
    (0xc9, "windows-1251"),
    (0xca, "windows-1254"),
    (0xcb, "windows-1253"),
];

/// Encoding name for a language-driver byte.
#[must_use]
pub fn encoding_for_driver(driver: u8) -> Option<&'static str> {
    LANGUAGE_DRIVERS
        .iter()
        .find(|(code, _)| *code == driver)
        .map(|(_, name)| *name)
}

/// Language-driver byte for a codec, if the table has one.
#[must_use]
pub fn driver_for_codec(codec: TextCodec) -> Option<u8> {
    LANGUAGE_DRIVERS
        .iter()
        .find(|(_, name)| TextCodec::for_name(name).is_ok_and(|c| c == codec))
        .map(|(code, _)| *code)
}

/// A resolved text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextCodec {
    /// Strict 7-bit ASCII; bytes above 0x7f are errors.
    #[default]
    Ascii,
    /// Any encoding known to `encoding_rs`.
    Encoding(&'static Encoding),
}

impl TextCodec {
    /// Resolve an encoding by name.
    ///
    /// Accepts WHATWG labels (`windows-1251`, `ibm866`, `koi8-r`) and the
    /// Python-style spellings older tools write (`cp1251`, `mac_cyrillic`).
    pub fn for_name(name: &str) -> Result<Self> {
        let label = normalize_label(name);
        match label.as_str() {
            "ascii" | "us-ascii" | "646" => Ok(Self::Ascii),
            other => Encoding::for_label_no_replacement(other.as_bytes())
                .map(Self::Encoding)
                .ok_or_else(|| DbfError::UnknownEncoding {
                    name: name.to_string(),
                }),
        }
    }

    /// Canonical name of the codec.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Encoding(encoding) => encoding.name(),
        }
    }

    /// Decode bytes to text, failing on sequences invalid for the codec.
    pub fn decode<'a>(self, bytes: &'a [u8], field: &str) -> Result<Cow<'a, str>> {
        let decoded = match self {
            Self::Ascii => bytes
                .is_ascii()
                .then(|| String::from_utf8_lossy(bytes)),
            Self::Encoding(encoding) => {
                encoding.decode_without_bom_handling_and_without_replacement(bytes)
            }
        };
        decoded.ok_or_else(|| DbfError::Decode {
            field: field.to_string(),
            encoding: self.name(),
        })
    }

    /// Encode text to bytes, failing on characters the codec cannot represent.
    pub fn encode<'a>(self, text: &'a str, field: &str) -> Result<Cow<'a, [u8]>> {
        let unmappable = || DbfError::Encode {
            field: field.to_string(),
            encoding: self.name(),
        };
        match self {
            Self::Ascii => {
                if text.is_ascii() {
                    Ok(Cow::Borrowed(text.as_bytes()))
                } else {
                    Err(unmappable())
                }
            }
            Self::Encoding(encoding) => {
                let (bytes, _, had_errors) = encoding.encode(text);
                if had_errors {
                    Err(unmappable())
                } else {
                    Ok(bytes)
                }
            }
        }
    }
}

/// Lowercase a name and map Python codec spellings onto WHATWG labels.
fn normalize_label(name: &str) -> String {
    let label = name.trim().to_ascii_lowercase().replace('_', "-");
    match label.as_str() {
        "mac-cyrillic" => "x-mac-cyrillic".to_string(),
        "mac-roman" => "macintosh".to_string(),
        "latin-1" => "latin1".to_string(),
        _ => label,
    }
}
