//! Image File Directory parsing and chain traversal.
//!
//! IFDs form a singly linked list: the header holds a link slot with the
//! offset of the first IFD, and every IFD ends with a link slot holding the
//! offset of the next one (0 terminates the chain).
//!
//! # IFD Structure
//!
//! ```text
//! Entry count      (native short: 2 bytes classic, 8 bytes BigTIFF)
//! Entries[count]   (12 bytes classic, 20 bytes BigTIFF each)
//! Next IFD offset  (native long: 4 bytes classic, 8 bytes BigTIFF)
//! ```
//!
//! # Entry Structure
//!
//! ```text
//! Tag        (u16)
//! Type       (u16)
//! Count      (native long)
//! Value slot (native long width; inline value or offset to it)
//! ```

use std::collections::{HashMap, HashSet};
use std::io::{Read, Seek};

use tracing::debug;

use crate::error::TiffError;

use super::parser::{ByteOrder, WidthClass};
use super::stream::TiffStream;
use super::tags::{FieldType, TiffTag};

/// Upper bound on entries per directory.
///
/// Classic TIFF cannot store more; BigTIFF directories above it are corrupt.
pub const MAX_IFD_ENTRIES: u64 = u16::MAX as u64;

// =============================================================================
// IfdEntry
// =============================================================================

/// A single IFD entry as stored on disk.
///
/// The value slot is kept as raw bytes; interpreting it is the job of
/// [`read_value`](super::values::read_value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfdEntry {
    /// Tag identifier
    pub tag: u16,

    /// Raw type code
    pub field_type_raw: u16,

    /// Number of values (not bytes)
    pub count: u64,

    /// File offset of the entry's first byte
    pub start: u64,

    /// Raw value slot bytes (4 classic, 8 BigTIFF)
    pub value_slot: Vec<u8>,
}

impl IfdEntry {
    /// Parsed field type, if supported.
    #[inline]
    pub fn field_type(&self) -> Option<FieldType> {
        FieldType::from_u16(self.field_type_raw)
    }

    /// Interpret the value slot as an offset.
    #[inline]
    pub fn value_offset(&self, byte_order: ByteOrder) -> u64 {
        byte_order.decode(&self.value_slot)
    }
}

// =============================================================================
// Ifd
// =============================================================================

/// A parsed Image File Directory together with its two link slots.
#[derive(Debug, Clone)]
pub struct Ifd {
    /// Position of this IFD in the chain (0-based)
    pub index: usize,

    /// File offset of the IFD itself
    pub offset: u64,

    /// Offset of the link slot that pointed at this IFD
    pub in_pointer_offset: u64,

    /// Offset of this IFD's own next-IFD link slot
    pub out_pointer_offset: u64,

    /// Entries by tag; when a tag repeats, the last entry wins
    entries: HashMap<u16, IfdEntry>,
}

impl Ifd {
    /// Look up an entry by known tag.
    #[inline]
    pub fn get(&self, tag: TiffTag) -> Option<&IfdEntry> {
        self.entries.get(&tag.as_u16())
    }

    /// Look up an entry by raw tag id.
    #[inline]
    pub fn get_raw(&self, tag: u16) -> Option<&IfdEntry> {
        self.entries.get(&tag)
    }

    /// Number of distinct tags.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode the IFD at the cursor.
    fn parse<S: Read + Seek>(
        stream: &mut TiffStream<S>,
        index: usize,
        offset: u64,
        in_pointer_offset: u64,
    ) -> Result<Self, TiffError> {
        let header = *stream.header();

        stream.seek(offset)?;
        let count = stream.read_native(WidthClass::NativeShort)?;

        let available = stream.remaining_from(offset + header.ifd_count_size() as u64);
        let needed = count.checked_mul(header.ifd_entry_size() as u64);
        if count > MAX_IFD_ENTRIES || needed.map_or(true, |n| n > available) {
            return Err(TiffError::ImplausibleEntryCount { offset, count });
        }

        let mut entries = HashMap::new();
        for _ in 0..count {
            let start = stream.position()?;
            let tag = stream.read_u16()?;
            let field_type_raw = stream.read_u16()?;
            let value_count = stream.read_native(WidthClass::NativeLong)?;
            let value_slot = stream.read_bytes(header.slot_width())?;

            entries.insert(
                tag,
                IfdEntry {
                    tag,
                    field_type_raw,
                    count: value_count,
                    start,
                    value_slot,
                },
            );
        }

        let out_pointer_offset = stream.position()?;

        Ok(Ifd {
            index,
            offset,
            in_pointer_offset,
            out_pointer_offset,
            entries,
        })
    }
}

// =============================================================================
// DirectoryWalker
// =============================================================================

/// Walks the IFD chain one directory at a time.
///
/// The walker holds only the position of the next link slot, so the stream
/// stays free for value reads between steps. Each directory's address is
/// only known from the previous link, so traversal is strictly sequential.
#[derive(Debug)]
pub struct DirectoryWalker {
    next_link: u64,
    index: usize,
    visited: HashSet<u64>,
    finished: bool,
}

impl DirectoryWalker {
    /// Start at the header's first link slot.
    pub fn new<S>(stream: &TiffStream<S>) -> Self {
        Self::from_link(stream.header().first_link_offset)
    }

    /// Start at an arbitrary link slot.
    pub fn from_link(link_offset: u64) -> Self {
        DirectoryWalker {
            next_link: link_offset,
            index: 0,
            visited: HashSet::new(),
            finished: false,
        }
    }

    /// Decode the next directory, or `None` once a zero link is reached.
    ///
    /// After an error the walker is finished.
    pub fn next<S: Read + Seek>(
        &mut self,
        stream: &mut TiffStream<S>,
    ) -> Result<Option<Ifd>, TiffError> {
        if self.finished {
            return Ok(None);
        }

        let result = self.step(stream);
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }

    fn step<S: Read + Seek>(&mut self, stream: &mut TiffStream<S>) -> Result<Option<Ifd>, TiffError> {
        let in_pointer_offset = self.next_link;
        stream.seek(in_pointer_offset)?;
        let offset = stream.read_native(WidthClass::NativeLong)?;

        if offset == 0 {
            debug!(directories = self.index, "directory chain exhausted");
            return Ok(None);
        }

        if !self.visited.insert(offset) {
            return Err(TiffError::DirectoryLoop(offset));
        }

        let ifd = Ifd::parse(stream, self.index, offset, in_pointer_offset)?;
        debug!(
            index = ifd.index,
            offset = ifd.offset,
            entries = ifd.len(),
            "read directory"
        );

        self.next_link = ifd.out_pointer_offset;
        self.index += 1;
        Ok(Some(ifd))
    }
}

/// Read every directory in the chain.
pub fn read_directories<S: Read + Seek>(stream: &mut TiffStream<S>) -> Result<Vec<Ifd>, TiffError> {
    let mut walker = DirectoryWalker::new(stream);
    let mut directories = Vec::new();
    while let Some(ifd) = walker.next(stream)? {
        directories.push(ifd);
    }
    Ok(directories)
}

// =============================================================================
// Tests
// =============================================================================
