//! TIFF tag value reading.
//!
//! A value either lies inline in the entry's value slot or out of line at
//! the offset the slot holds. The rule is purely size-based: if
//! `count * item_size` is at most the slot width (4 bytes classic, 8 bytes
//! BigTIFF) the value is inline, including the case where it fills the slot
//! exactly.

use std::io::{Read, Seek};

use crate::error::TiffError;

use super::directory::IfdEntry;
use super::stream::TiffStream;
use super::tags::FieldType;

// =============================================================================
// TagValue
// =============================================================================

/// A decoded tag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// ASCII text with the NUL terminator removed
    Ascii(String),

    /// SHORT, LONG or LONG8 values widened to u64, in file order
    Unsigned(Vec<u64>),
}

impl TagValue {
    /// The text of an ASCII value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(s) => Some(s),
            TagValue::Unsigned(_) => None,
        }
    }

    /// The elements of a numeric value.
    pub fn as_unsigned(&self) -> Option<&[u64]> {
        match self {
            TagValue::Unsigned(values) => Some(values),
            TagValue::Ascii(_) => None,
        }
    }

    /// Consume a numeric value into its elements.
    pub fn into_unsigned(self) -> Option<Vec<u64>> {
        match self {
            TagValue::Unsigned(values) => Some(values),
            TagValue::Ascii(_) => None,
        }
    }
}

// =============================================================================
// Value location
// =============================================================================

/// Where an entry's value bytes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueLocation {
    /// Absolute offset of the first value byte
    pub offset: u64,

    /// Total value size in bytes
    pub len: u64,

    /// Whether the value sits inside the entry's slot
    pub inline: bool,
}

/// Locate an entry's value without reading it.
///
/// # Errors
/// - `UnsupportedValueType` for type codes other than ASCII, SHORT, LONG and LONG8
/// - `ImplausibleCount` when the value cannot fit in the file
pub fn locate_value<S: Read + Seek>(
    stream: &TiffStream<S>,
    entry: &IfdEntry,
) -> Result<ValueLocation, TiffError> {
    let field_type = entry
        .field_type()
        .ok_or(TiffError::UnsupportedValueType(entry.field_type_raw))?;

    let header = stream.header();
    let slot_width = header.slot_width();

    let implausible = |available: u64| TiffError::ImplausibleCount {
        tag: entry.tag,
        count: entry.count,
        available,
    };

    let len = field_type
        .total_size(entry.count)
        .ok_or_else(|| implausible(stream.size()))?;

    let (offset, inline) = if field_type.fits_inline(entry.count, slot_width) {
        (entry.start + header.entry_header_size() as u64, true)
    } else {
        (entry.value_offset(header.byte_order), false)
    };

    let available = stream.remaining_from(offset);
    if len > available {
        return Err(implausible(available));
    }

    Ok(ValueLocation {
        offset,
        len,
        inline,
    })
}

/// Read and decode an entry's value.
///
/// ASCII values must end in NUL; everything before the terminator becomes
/// the text (invalid UTF-8 is replaced). Numeric values are returned in
/// file order.
///
/// # Errors
/// - `UnsupportedValueType` for unsupported type codes
/// - `MalformedString` for ASCII values without a trailing NUL (including empty ones)
/// - `ImplausibleCount` / `Truncated` when the value runs past the end of the file
pub fn read_value<S: Read + Seek>(
    stream: &mut TiffStream<S>,
    entry: &IfdEntry,
) -> Result<TagValue, TiffError> {
    let location = locate_value(stream, entry)?;
    let bytes = stream.read_bytes_at(location.offset, location.len as usize)?;

    let field_type = entry
        .field_type()
        .ok_or(TiffError::UnsupportedValueType(entry.field_type_raw))?;

    match field_type {
        FieldType::Ascii => match bytes.split_last() {
            Some((&0, text)) => Ok(TagValue::Ascii(String::from_utf8_lossy(text).into_owned())),
            _ => Err(TiffError::MalformedString { tag: entry.tag }),
        },
        FieldType::Short | FieldType::Long | FieldType::Long8 => {
            let byte_order = stream.header().byte_order;
            let values = bytes
                .chunks_exact(field_type.size_in_bytes())
                .map(|item| byte_order.decode(item))
                .collect();
            Ok(TagValue::Unsigned(values))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
