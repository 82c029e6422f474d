//! Field descriptor parsing and building.
//!
//! # Descriptor Structure (32 bytes)
//!
//! | Offset | Field    | Type     | Description                    |
//! |--------|----------|----------|--------------------------------|
//! | 0-10   | name     | char[11] | Field name, NUL-padded         |
//! | 11     | type     | char     | `N`, `C`, `D` or `L`           |
//! | 12-15  | reserved | byte[4]  | Zero                           |
//! | 16     | length   | byte     | Field width in a record        |
//! | 17     | decimals | byte     | Fractional digits              |
//! | 18-31  | reserved | byte[14] | Zero                           |

use crate::error::{DbfError, Result};
use crate::types::{FieldDescriptor, MAX_NAME_LEN};

/// Descriptor length in bytes.
pub const DESCRIPTOR_LEN: usize = 32;

const NAME_SLOT: usize = 11;
const TYPE_OFFSET: usize = 11;
const LENGTH_OFFSET: usize = 16;
const DECIMALS_OFFSET: usize = 17;

/// Parse a 32-byte field descriptor.
///
/// Fails with `UnknownFieldType` or `InvalidField` when the descriptor
/// does not describe a supported field.
pub fn parse_descriptor(data: &[u8; DESCRIPTOR_LEN]) -> Result<FieldDescriptor> {
    let name_bytes = &data[..NAME_SLOT];
    let end = name_bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(NAME_SLOT);
    let name = String::from_utf8_lossy(&name_bytes[..end]).trim_end().to_string();

    FieldDescriptor::from_raw(
        name,
        data[TYPE_OFFSET],
        data[LENGTH_OFFSET],
        data[DECIMALS_OFFSET],
    )
}

/// Build a 32-byte field descriptor.
pub fn build_descriptor(field: &FieldDescriptor) -> Result<[u8; DESCRIPTOR_LEN]> {
    let name = field.name.as_bytes();
    if name.len() > MAX_NAME_LEN {
        return Err(DbfError::FieldNameTooLong {
            name: field.name.clone(),
        });
    }
    if name.is_empty() {
        return Err(DbfError::invalid_field("", "empty field name"));
    }

    let mut buf = [0u8; DESCRIPTOR_LEN];
    buf[..name.len()].copy_from_slice(name);
    buf[TYPE_OFFSET] = field.field_type.code();
    buf[LENGTH_OFFSET] = field.length;
    buf[DECIMALS_OFFSET] = field.decimals;
    Ok(buf)
}
