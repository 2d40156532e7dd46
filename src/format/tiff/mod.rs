//! Minimal TIFF/BigTIFF container access.
//!
//! This module reads just enough of a TIFF file to walk its directories and
//! resolve tag values, and exposes the positional writes needed to edit the
//! file in place.
//!
//! # Key Concepts
//!
//! - **Byte order**: TIFF files declare their endianness (II = little-endian, MM = big-endian)
//!   in the header. All multi-byte values must be read and written in that order.
//!
//! - **Classic TIFF vs BigTIFF**: Classic TIFF uses 32-bit offsets and counts, BigTIFF uses
//!   64-bit ones. The widths are resolved once from the header into [`FieldWidths`].
//!
//! - **IFD chain**: Directories form a singly linked list. Each [`Ifd`] remembers the link
//!   slot that pointed at it and its own next link slot, which is what makes splicing a
//!   directory out of the chain possible.
//!
//! - **Inline vs offset values**: Values no wider than the entry's value slot are stored
//!   inline; larger ones are stored at an offset held by the slot.

mod directory;
mod parser;
mod stream;
mod tags;
mod values;

pub use directory::{read_directories, DirectoryWalker, Ifd, IfdEntry, MAX_IFD_ENTRIES};
pub use parser::{
    ByteOrder, FieldWidths, IntWidth, TiffHeader, TiffMode, WidthClass, BIGTIFF_PREAMBLE_SIZE,
    TIFF_PREAMBLE_SIZE,
};
pub use stream::TiffStream;
pub use tags::{FieldType, TiffTag};
pub use values::{locate_value, read_value, TagValue, ValueLocation};
