//! Label image redaction.
//!
//! Redaction walks the IFD chain until it finds the directory whose
//! ImageDescription marks it as the Aperio label, overwrites every strip of
//! that image with zeros and, optionally, splices the directory out of the
//! chain by pointing its incoming link at its successor.
//!
//! ```text
//! SCANNING --match--> MATCHED --> STRIPPING --> [UNLINKING] --> DONE
//!     |
//!     +--chain exhausted--> LabelNotFound
//! ```
//!
//! The file is modified in place and nothing is rolled back: if a write
//! fails part way, strips already zeroed stay zeroed. Re-zeroing is
//! harmless, but a partially applied unlink is not, so callers should not
//! retry blindly.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::RedactError;
use crate::format::svs::is_label_description;
use crate::format::tiff::{read_value, DirectoryWalker, TiffStream, TiffTag, WidthClass};
use crate::io::RandomAccess;

// =============================================================================
// Types
// =============================================================================

/// One strip of image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Strip {
    pub offset: u64,
    pub length: u64,
}

/// The label directory and its strips, as found in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelLocation {
    /// Position of the label IFD in the chain (0-based)
    pub directory_index: usize,

    /// File offset of the label IFD
    pub directory_offset: u64,

    /// Link slot pointing at the label IFD
    pub in_pointer_offset: u64,

    /// The label IFD's own next-IFD link slot
    pub out_pointer_offset: u64,

    /// Strips paired by position; the shorter of the two arrays wins
    pub strips: Vec<Strip>,
}

impl LabelLocation {
    /// Total bytes covered by the strips.
    pub fn total_bytes(&self) -> u64 {
        self.strips.iter().map(|s| s.length).sum()
    }
}

/// Outcome of a successful redaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RedactSummary {
    /// Bytes overwritten with zeros
    pub bytes_wiped: u64,

    /// Position of the label IFD in the chain (0-based)
    pub directory_index: usize,

    /// Number of strips wiped
    pub strip_count: usize,

    /// Whether the label IFD was spliced out of the chain
    pub unlinked: bool,
}

// =============================================================================
// File entry points
// =============================================================================

/// Redact the label image of the file at `path`.
///
/// With `unlink` set, the label directory is also removed from the IFD
/// chain; otherwise it stays reachable with its pixel data zeroed.
/// The file handle is released before returning, on success or failure.
pub fn redact(path: impl AsRef<Path>, unlink: bool) -> Result<RedactSummary, RedactError> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|source| RedactError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let mut stream = TiffStream::open(file)?;
    let summary = redact_stream(&mut stream, unlink)?;
    stream.into_inner().sync_all()?;

    Ok(summary)
}

/// Locate the label image of the file at `path` without modifying it.
pub fn find_label(path: impl AsRef<Path>) -> Result<LabelLocation, RedactError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| RedactError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut stream = TiffStream::open(file)?;
    find_label_stream(&mut stream)
}

// =============================================================================
// Stream operations
// =============================================================================

/// Walk the IFD chain and return the first directory matching the label heuristic.
///
/// Directories without an ImageDescription, or whose description is not
/// text, are skipped.
///
/// # Errors
/// - `MissingStripInfo` if the label has no usable StripOffsets/StripByteCounts
/// - `LabelNotFound` if no directory matches
/// - `Tiff` for structural errors met along the way
pub fn find_label_stream<S: Read + Seek>(
    stream: &mut TiffStream<S>,
) -> Result<LabelLocation, RedactError> {
    let mut walker = DirectoryWalker::new(stream);

    while let Some(ifd) = walker.next(stream)? {
        let Some(entry) = ifd.get(TiffTag::ImageDescription) else {
            debug!(index = ifd.index, "no ImageDescription, skipping");
            continue;
        };

        let description = read_value(stream, entry)?;
        let Some(text) = description.as_str() else {
            debug!(index = ifd.index, "ImageDescription is not text, skipping");
            continue;
        };

        if !is_label_description(text) {
            continue;
        }

        debug!(index = ifd.index, offset = ifd.offset, "matched label directory");

        let missing = || RedactError::MissingStripInfo {
            directory: ifd.index,
        };

        let (Some(offsets_entry), Some(lengths_entry)) = (
            ifd.get(TiffTag::StripOffsets),
            ifd.get(TiffTag::StripByteCounts),
        ) else {
            return Err(missing());
        };

        let offsets = read_value(stream, offsets_entry)?
            .into_unsigned()
            .ok_or_else(missing)?;
        let lengths = read_value(stream, lengths_entry)?
            .into_unsigned()
            .ok_or_else(missing)?;

        let strips = offsets
            .into_iter()
            .zip(lengths)
            .map(|(offset, length)| Strip { offset, length })
            .collect();

        return Ok(LabelLocation {
            directory_index: ifd.index,
            directory_offset: ifd.offset,
            in_pointer_offset: ifd.in_pointer_offset,
            out_pointer_offset: ifd.out_pointer_offset,
            strips,
        });
    }

    Err(RedactError::LabelNotFound)
}

/// Redact the label image of an open container.
///
/// Every strip is checked against the file size before the first zero is
/// written, so a corrupt strip table leaves the file untouched.
pub fn redact_stream<S: RandomAccess>(
    stream: &mut TiffStream<S>,
    unlink: bool,
) -> Result<RedactSummary, RedactError> {
    let label = find_label_stream(stream)?;

    let file_size = stream.size();
    for strip in &label.strips {
        let end = strip.offset.checked_add(strip.length);
        if end.map_or(true, |end| end > file_size) {
            return Err(RedactError::StripOutOfBounds {
                offset: strip.offset,
                length: strip.length,
                file_size,
            });
        }
    }

    let mut bytes_wiped = 0u64;
    for strip in &label.strips {
        stream.zero_fill(strip.offset, strip.length)?;
        bytes_wiped += strip.length;
    }
    debug!(
        strips = label.strips.len(),
        bytes_wiped, "wiped label strips"
    );

    if unlink {
        stream.seek(label.out_pointer_offset)?;
        let next = stream.read_native(WidthClass::NativeLong)?;
        stream.seek(label.in_pointer_offset)?;
        stream.write_native(WidthClass::NativeLong, next)?;
        debug!(
            in_pointer = label.in_pointer_offset,
            next, "unlinked label directory"
        );
    }

    stream.flush()?;

    info!(
        directory = label.directory_index,
        bytes_wiped,
        unlinked = unlink,
        "redacted label"
    );

    Ok(RedactSummary {
        bytes_wiped,
        directory_index: label.directory_index,
        strip_count: label.strips.len(),
        unlinked: unlink,
    })
}

// =============================================================================
// Tests
// =============================================================================
