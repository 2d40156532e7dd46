//! TIFF tag and field type definitions.
//!
//! Only the vocabulary needed to find and wipe a label image is defined:
//! three tags and the four field types those tags use in practice.

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF field types that determine how values are encoded.
///
/// The item size of each type decides whether a value fits inline in an
/// IFD entry and how arrays of values are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum FieldType {
    /// 8-bit ASCII character, NUL-terminated string (1 byte)
    Ascii = 2,

    /// Unsigned 16-bit integer (2 bytes)
    Short = 3,

    /// Unsigned 32-bit integer (4 bytes)
    Long = 4,

    /// Unsigned 64-bit integer (8 bytes) - BigTIFF offsets and counts
    Long8 = 16,
}

impl FieldType {
    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Ascii => 1,
            FieldType::Short => 2,
            FieldType::Long => 4,
            FieldType::Long8 => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unsupported type codes.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            16 => Some(FieldType::Long8),
            _ => None,
        }
    }

    /// Total byte size of `count` values, or `None` on overflow.
    #[inline]
    pub fn total_size(self, count: u64) -> Option<u64> {
        count.checked_mul(self.size_in_bytes() as u64)
    }

    /// Check if `count` values of this type fit in a value slot of `slot_width` bytes.
    ///
    /// A value exactly as wide as the slot is inline.
    #[inline]
    pub fn fits_inline(self, count: u64, slot_width: usize) -> bool {
        self.total_size(count)
            .is_some_and(|total| total <= slot_width as u64)
    }
}

// =============================================================================
// TIFF Tags
// =============================================================================

/// TIFF tag IDs interpreted by the redactor.
///
/// All other tags are carried through directory parsing untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TiffTag {
    /// Description string (Aperio writes its vendor marker and image kind here)
    ImageDescription = 270,

    /// Byte offsets of strips
    StripOffsets = 273,

    /// Byte counts of strips
    StripByteCounts = 279,
}

impl TiffTag {
    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

// =============================================================================
// Tests
// =============================================================================
