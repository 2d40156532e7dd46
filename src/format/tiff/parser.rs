//! TIFF header parsing and field width resolution.
//!
//! The header fixes the byte order and the width class of the file once;
//! every later decision about how wide an offset, count or entry is derives
//! from the [`FieldWidths`] resolved here.
//!
//! # TIFF Header Structure
//!
//! ## Classic TIFF (8 bytes)
//! ```text
//! Bytes 0-1: Byte order ("II" little-endian, "MM" big-endian)
//! Bytes 2-3: Version (42)
//! Bytes 4-7: Offset to first IFD (4 bytes)
//! ```
//!
//! ## BigTIFF (16 bytes)
//! ```text
//! Bytes 0-1: Byte order ("II" little-endian, "MM" big-endian)
//! Bytes 2-3: Version (43)
//! Bytes 4-5: Offset byte size (must be 8)
//! Bytes 6-7: Reserved (must be 0)
//! Bytes 8-15: Offset to first IFD (8 bytes)
//! ```

use crate::error::TiffError;
use crate::io::{decode_uint_be, decode_uint_le, encode_uint_be, encode_uint_le};

// =============================================================================
// Constants
// =============================================================================

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: [u8; 2] = *b"II";

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: [u8; 2] = *b"MM";

/// Version number for classic TIFF
const VERSION_TIFF: u16 = 42;

/// Version number for BigTIFF
const VERSION_BIGTIFF: u16 = 43;

/// BigTIFF offset byte size field value
const BIGTIFF_OFFSET_SIZE: u16 = 8;

/// Bytes preceding the first IFD link in a classic TIFF header
pub const TIFF_PREAMBLE_SIZE: usize = 4;

/// Bytes preceding the first IFD link in a BigTIFF header
pub const BIGTIFF_PREAMBLE_SIZE: usize = 8;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a TIFF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Decode an unsigned integer occupying all of `bytes`.
    #[inline]
    pub fn decode(self, bytes: &[u8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => decode_uint_le(bytes),
            ByteOrder::BigEndian => decode_uint_be(bytes),
        }
    }

    /// Encode `value` into all of `out`, truncating to its width.
    #[inline]
    pub fn encode(self, value: u64, out: &mut [u8]) {
        match self {
            ByteOrder::LittleEndian => encode_uint_le(value, out),
            ByteOrder::BigEndian => encode_uint_be(value, out),
        }
    }

    /// Read a u16 from the first two bytes of a slice.
    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        self.decode(&bytes[..2]) as u16
    }
}

// =============================================================================
// Width resolution
// =============================================================================

/// Classic TIFF (32-bit offsets) or BigTIFF (64-bit offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffMode {
    Classic,
    Big,
}

/// The two mode-relative integer kinds used by the container layout.
///
/// - `NativeShort` is the IFD entry-count field: 16 bits classic, 64 bits Big.
/// - `NativeLong` is every offset, value count and value slot: 32 bits classic, 64 bits Big.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthClass {
    NativeShort,
    NativeLong,
}

/// A concrete integer width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    Bits8,
    Bits16,
    Bits32,
    Bits64,
}

impl IntWidth {
    /// Size of an integer of this width in bytes.
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            IntWidth::Bits8 => 1,
            IntWidth::Bits16 => 2,
            IntWidth::Bits32 => 4,
            IntWidth::Bits64 => 8,
        }
    }

    /// Sign-extend a raw value of this width to i64.
    #[inline]
    pub const fn sign_extend(self, raw: u64) -> i64 {
        match self {
            IntWidth::Bits8 => raw as u8 as i8 as i64,
            IntWidth::Bits16 => raw as u16 as i16 as i64,
            IntWidth::Bits32 => raw as u32 as i32 as i64,
            IntWidth::Bits64 => raw as i64,
        }
    }
}

/// (mode, width class) -> concrete width.
const WIDTH_TABLE: [(TiffMode, WidthClass, IntWidth); 4] = [
    (TiffMode::Classic, WidthClass::NativeShort, IntWidth::Bits16),
    (TiffMode::Classic, WidthClass::NativeLong, IntWidth::Bits32),
    (TiffMode::Big, WidthClass::NativeShort, IntWidth::Bits64),
    (TiffMode::Big, WidthClass::NativeLong, IntWidth::Bits64),
];

/// Concrete widths of the native integer kinds for one file.
///
/// Resolved once from the table when the header is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWidths {
    pub native_short: IntWidth,
    pub native_long: IntWidth,
}

impl FieldWidths {
    /// Look up the widths for a mode.
    pub fn resolve(mode: TiffMode) -> Self {
        let lookup = |class: WidthClass| {
            WIDTH_TABLE
                .iter()
                .find(|(m, c, _)| *m == mode && *c == class)
                .map(|(_, _, width)| *width)
                .unwrap_or(IntWidth::Bits64)
        };

        FieldWidths {
            native_short: lookup(WidthClass::NativeShort),
            native_long: lookup(WidthClass::NativeLong),
        }
    }

    /// Width for a class.
    #[inline]
    pub const fn get(&self, class: WidthClass) -> IntWidth {
        match class {
            WidthClass::NativeShort => self.native_short,
            WidthClass::NativeLong => self.native_long,
        }
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF file header.
///
/// Holds what every later read depends on: byte order, mode with its
/// resolved widths, and the position of the link slot that points at the
/// first IFD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the file
    pub byte_order: ByteOrder,

    /// Classic or BigTIFF
    pub mode: TiffMode,

    /// Native integer widths for `mode`
    pub widths: FieldWidths,

    /// Position of the native-long slot holding the first IFD offset
    pub first_link_offset: u64,
}

impl TiffHeader {
    /// Parse a TIFF header from its leading bytes.
    ///
    /// Four bytes are enough for classic TIFF; BigTIFF needs eight. Bytes
    /// beyond the preamble are ignored.
    ///
    /// # Errors
    /// - `InvalidMagic` if byte order bytes are not II or MM
    /// - `InvalidVersion` if version is not 42 or 43
    /// - `InvalidBigTiffHeader` if BigTIFF offset size is not 8 or reserved is not 0
    /// - `Truncated` if there aren't enough bytes for the preamble
    pub fn parse(bytes: &[u8]) -> Result<Self, TiffError> {
        if bytes.len() < TIFF_PREAMBLE_SIZE {
            return Err(TiffError::Truncated {
                offset: 0,
                requested: TIFF_PREAMBLE_SIZE as u64,
            });
        }

        let byte_order = match [bytes[0], bytes[1]] {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => {
                return Err(TiffError::InvalidMagic(u16::from_be_bytes([
                    bytes[0], bytes[1],
                ])))
            }
        };

        let version = byte_order.read_u16(&bytes[2..4]);

        let (mode, first_link_offset) = match version {
            VERSION_TIFF => (TiffMode::Classic, TIFF_PREAMBLE_SIZE),
            VERSION_BIGTIFF => {
                if bytes.len() < BIGTIFF_PREAMBLE_SIZE {
                    return Err(TiffError::Truncated {
                        offset: TIFF_PREAMBLE_SIZE as u64,
                        requested: (BIGTIFF_PREAMBLE_SIZE - TIFF_PREAMBLE_SIZE) as u64,
                    });
                }

                let offset_size = byte_order.read_u16(&bytes[4..6]);
                let reserved = byte_order.read_u16(&bytes[6..8]);
                if offset_size != BIGTIFF_OFFSET_SIZE || reserved != 0 {
                    return Err(TiffError::InvalidBigTiffHeader {
                        offset_size,
                        reserved,
                    });
                }

                (TiffMode::Big, BIGTIFF_PREAMBLE_SIZE)
            }
            _ => return Err(TiffError::InvalidVersion(version)),
        };

        Ok(TiffHeader {
            byte_order,
            mode,
            widths: FieldWidths::resolve(mode),
            first_link_offset: first_link_offset as u64,
        })
    }

    /// Whether this is a BigTIFF file.
    #[inline]
    pub fn is_bigtiff(&self) -> bool {
        self.mode == TiffMode::Big
    }

    /// Width of the value/offset slot in an IFD entry (the inline threshold).
    ///
    /// Classic TIFF: 4 bytes, BigTIFF: 8 bytes
    #[inline]
    pub const fn slot_width(&self) -> usize {
        self.widths.native_long.bytes()
    }

    /// Bytes of an entry preceding its value slot (tag + type + count).
    #[inline]
    pub const fn entry_header_size(&self) -> usize {
        2 + 2 + self.widths.native_long.bytes()
    }

    /// Size of an IFD entry in bytes.
    ///
    /// Classic TIFF: 12 bytes, BigTIFF: 20 bytes
    #[inline]
    pub const fn ifd_entry_size(&self) -> usize {
        self.entry_header_size() + self.slot_width()
    }

    /// Size of the entry count field at the start of an IFD.
    ///
    /// Classic TIFF: 2 bytes, BigTIFF: 8 bytes
    #[inline]
    pub const fn ifd_count_size(&self) -> usize {
        self.widths.native_short.bytes()
    }
}

// =============================================================================
// Tests
// =============================================================================
