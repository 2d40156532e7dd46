use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing TIFF structures and tag values
#[derive(Debug, Error)]
pub enum TiffError {
    /// Invalid TIFF magic bytes (not II or MM)
    #[error("Invalid TIFF magic bytes: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidMagic(u16),

    /// Invalid TIFF version number
    #[error("Invalid TIFF version: expected 42 (TIFF) or 43 (BigTIFF), got {0}")]
    InvalidVersion(u16),

    /// BigTIFF header must declare 8-byte offsets and a zero reserved field
    #[error("Bad BigTIFF header: offset size {offset_size} (expected 8), reserved {reserved} (expected 0)")]
    InvalidBigTiffHeader { offset_size: u16, reserved: u16 },

    /// The file ended before a read could be satisfied
    #[error("Truncated file: needed {requested} bytes at offset {offset}")]
    Truncated { offset: u64, requested: u64 },

    /// A count field claims more data than the file can possibly hold
    #[error("Implausible count {count} for tag {tag}: only {available} bytes available")]
    ImplausibleCount { tag: u16, count: u64, available: u64 },

    /// An IFD claims more entries than fit in the rest of the file
    #[error("Implausible entry count {count} for directory at offset {offset}")]
    ImplausibleEntryCount { offset: u64, count: u64 },

    /// The directory chain points back at a directory already visited
    #[error("Directory chain loops back to offset {0}")]
    DirectoryLoop(u64),

    /// Entry type code outside ASCII, SHORT, LONG and LONG8
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(u16),

    /// ASCII value whose last byte is not NUL
    #[error("String value of tag {tag} is not null-terminated")]
    MalformedString { tag: u16 },

    /// Underlying read, write or seek failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TiffError {
    /// Whether this error describes a structurally invalid container
    /// (bad magic, bad version, bad BigTIFF header, truncation, implausible sizes).
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            TiffError::InvalidMagic(_)
                | TiffError::InvalidVersion(_)
                | TiffError::InvalidBigTiffHeader { .. }
                | TiffError::Truncated { .. }
                | TiffError::ImplausibleCount { .. }
                | TiffError::ImplausibleEntryCount { .. }
                | TiffError::DirectoryLoop(_)
        )
    }
}

/// Errors produced while redacting the label of a single file
#[derive(Debug, Error)]
pub enum RedactError {
    /// The file could not be opened
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TIFF structure or value error
    #[error("TIFF error: {0}")]
    Tiff(#[from] TiffError),

    /// The label directory does not store its image as strips
    #[error("Label is not stripped: directory {directory} lacks StripOffsets or StripByteCounts")]
    MissingStripInfo { directory: usize },

    /// A strip would extend past the end of the file
    #[error("Strip at offset {offset} with length {length} exceeds file size {file_size}")]
    StripOutOfBounds {
        offset: u64,
        length: u64,
        file_size: u64,
    },

    /// The directory chain was exhausted without a label match
    #[error("Couldn't find Aperio label directory")]
    LabelNotFound,

    /// Write or seek failure while mutating the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
