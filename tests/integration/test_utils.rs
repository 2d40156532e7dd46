//! Test utilities for integration tests.
//!
//! This module provides a builder for synthetic TIFF files and helpers for
//! putting them on disk.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Description of a pyramid level as written by Aperio software.
pub const LEVEL_DESCRIPTION: &str =
    "Aperio Image Library v12.0.15\n46000x32914 [0,100 46000x32814] (256x256) JPEG/RGB Q=30|AppMag = 20|MPP = 0.4990";

/// Description of a label image.
pub const LABEL_DESCRIPTION: &str = "Aperio Image\nlabel 12345x6789 (3x2)";

/// Description of the macro image.
pub const MACRO_DESCRIPTION: &str = "Aperio Image Library v12.0.15\nmacro 1280x431";

/// Byte used to fill the padding region that holds strip data.
pub const FILL: u8 = 0xAA;

// =============================================================================
// TIFF Builder
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

enum Payload {
    Ascii(Vec<u8>),
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Long8s(Vec<u64>),
    Raw {
        field_type: u16,
        count: u64,
        bytes: Vec<u8>,
    },
}

struct PendingEntry {
    tag: u16,
    payload: Payload,
}

/// Builder for one IFD.
#[derive(Default)]
pub struct IfdBuilder {
    entries: Vec<PendingEntry>,
}

impl IfdBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ASCII entry; the NUL terminator is appended.
    pub fn ascii(mut self, tag: u16, text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.entries.push(PendingEntry {
            tag,
            payload: Payload::Ascii(bytes),
        });
        self
    }

    pub fn shorts(mut self, tag: u16, values: &[u16]) -> Self {
        self.entries.push(PendingEntry {
            tag,
            payload: Payload::Shorts(values.to_vec()),
        });
        self
    }

    pub fn longs(mut self, tag: u16, values: &[u32]) -> Self {
        self.entries.push(PendingEntry {
            tag,
            payload: Payload::Longs(values.to_vec()),
        });
        self
    }

    pub fn long8s(mut self, tag: u16, values: &[u64]) -> Self {
        self.entries.push(PendingEntry {
            tag,
            payload: Payload::Long8s(values.to_vec()),
        });
        self
    }

    /// Add an entry with arbitrary type, count and value bytes.
    pub fn raw(mut self, tag: u16, field_type: u16, count: u64, bytes: &[u8]) -> Self {
        self.entries.push(PendingEntry {
            tag,
            payload: Payload::Raw {
                field_type,
                count,
                bytes: bytes.to_vec(),
            },
        });
        self
    }

    /// ImageDescription (270).
    pub fn description(self, text: &str) -> Self {
        self.ascii(270, text)
    }

    /// StripOffsets (273) and StripByteCounts (279) as LONG arrays.
    pub fn strips(self, offsets: &[u32], counts: &[u32]) -> Self {
        self.longs(273, offsets).longs(279, counts)
    }

    /// StripOffsets (273) and StripByteCounts (279) as LONG8 arrays.
    pub fn strips8(self, offsets: &[u64], counts: &[u64]) -> Self {
        self.long8s(273, offsets).long8s(279, counts)
    }
}

/// A built TIFF file plus the layout facts tests assert against.
pub struct TiffFile {
    pub data: Vec<u8>,

    /// Offset of each IFD, in chain order
    pub ifd_offsets: Vec<u64>,

    /// `link_offsets[i]` is the slot pointing at IFD `i`; the last element
    /// is the terminal link of the final IFD
    pub link_offsets: Vec<u64>,
}

/// Builder for creating test TIFF files.
pub struct TiffBuilder {
    byte_order: ByteOrderType,
    is_bigtiff: bool,
    ifds: Vec<IfdBuilder>,
    min_len: usize,
}

impl TiffBuilder {
    pub fn new() -> Self {
        Self {
            byte_order: ByteOrderType::LittleEndian,
            is_bigtiff: false,
            ifds: Vec::new(),
            min_len: 0,
        }
    }

    pub fn with_byte_order(mut self, order: ByteOrderType) -> Self {
        self.byte_order = order;
        self
    }

    pub fn with_bigtiff(mut self, is_bigtiff: bool) -> Self {
        self.is_bigtiff = is_bigtiff;
        self
    }

    pub fn add_ifd(mut self, ifd: IfdBuilder) -> Self {
        self.ifds.push(ifd);
        self
    }

    /// Pad the file with [`FILL`] up to `len` bytes.
    pub fn pad_to(mut self, len: usize) -> Self {
        self.min_len = len;
        self
    }

    /// Build the TIFF file data.
    ///
    /// Layout: header, all IFDs back to back, then out-of-line values, then padding.
    pub fn build(self) -> TiffFile {
        let header_size = if self.is_bigtiff { 16 } else { 8 };
        let count_size = if self.is_bigtiff { 8 } else { 2 };
        let word = if self.is_bigtiff { 8 } else { 4 };
        let entry_size = 4 + 2 * word;

        let mut ifd_offsets = Vec::new();
        let mut offset = header_size;
        for ifd in &self.ifds {
            ifd_offsets.push(offset as u64);
            offset += count_size + ifd.entries.len() * entry_size + word;
        }

        let mut external = Vec::new();
        let external_start = offset;

        let mut data = Vec::new();
        match self.byte_order {
            ByteOrderType::LittleEndian => data.extend_from_slice(b"II"),
            ByteOrderType::BigEndian => data.extend_from_slice(b"MM"),
        }
        if self.is_bigtiff {
            self.put(&mut data, 43, 2);
            self.put(&mut data, 8, 2);
            self.put(&mut data, 0, 2);
        } else {
            self.put(&mut data, 42, 2);
        }

        let mut link_offsets = vec![data.len() as u64];
        self.put(&mut data, ifd_offsets.first().copied().unwrap_or(0), word);

        for (idx, ifd) in self.ifds.iter().enumerate() {
            assert_eq!(data.len() as u64, ifd_offsets[idx]);
            self.put(&mut data, ifd.entries.len() as u64, count_size);

            for entry in &ifd.entries {
                let (field_type, count, bytes) = self.encode(&entry.payload);
                self.put(&mut data, entry.tag as u64, 2);
                self.put(&mut data, field_type as u64, 2);
                self.put(&mut data, count, word);

                if bytes.len() <= word {
                    let mut slot = bytes;
                    slot.resize(word, 0);
                    data.extend_from_slice(&slot);
                } else {
                    let value_offset = (external_start + external.len()) as u64;
                    external.extend_from_slice(&bytes);
                    self.put(&mut data, value_offset, word);
                }
            }

            link_offsets.push(data.len() as u64);
            let next = ifd_offsets.get(idx + 1).copied().unwrap_or(0);
            self.put(&mut data, next, word);
        }

        data.extend_from_slice(&external);
        if data.len() < self.min_len {
            data.resize(self.min_len, FILL);
        }

        TiffFile {
            data,
            ifd_offsets,
            link_offsets,
        }
    }

    fn encode(&self, payload: &Payload) -> (u16, u64, Vec<u8>) {
        let mut bytes = Vec::new();
        match payload {
            Payload::Ascii(text) => (2, text.len() as u64, text.clone()),
            Payload::Shorts(values) => {
                for &v in values {
                    self.put(&mut bytes, v as u64, 2);
                }
                (3, values.len() as u64, bytes)
            }
            Payload::Longs(values) => {
                for &v in values {
                    self.put(&mut bytes, v as u64, 4);
                }
                (4, values.len() as u64, bytes)
            }
            Payload::Long8s(values) => {
                for &v in values {
                    self.put(&mut bytes, v, 8);
                }
                (16, values.len() as u64, bytes)
            }
            Payload::Raw {
                field_type,
                count,
                bytes,
            } => (*field_type, *count, bytes.clone()),
        }
    }

    fn put(&self, data: &mut Vec<u8>, value: u64, size: usize) {
        match self.byte_order {
            ByteOrderType::LittleEndian => data.extend_from_slice(&value.to_le_bytes()[..size]),
            ByteOrderType::BigEndian => data.extend_from_slice(&value.to_be_bytes()[8 - size..]),
        }
    }
}

impl Default for TiffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// The canonical single-directory label file: classic little-endian,
/// StripOffsets=[100], StripByteCounts=[20], padded to 200 bytes.
pub fn single_label_tiff() -> TiffFile {
    TiffBuilder::new()
        .add_ifd(
            IfdBuilder::new()
                .description(LABEL_DESCRIPTION)
                .strips(&[100], &[20]),
        )
        .pad_to(200)
        .build()
}

/// A typical slide: pyramid level, label, macro and a directory without
/// description. Label strips: (1000, 50) and (1100, 60). Macro strip: (1200, 40).
pub fn slide_tiff(byte_order: ByteOrderType, is_bigtiff: bool) -> TiffFile {
    let label = if is_bigtiff {
        IfdBuilder::new()
            .description(LABEL_DESCRIPTION)
            .strips8(&[1000, 1100], &[50, 60])
    } else {
        IfdBuilder::new()
            .description(LABEL_DESCRIPTION)
            .strips(&[1000, 1100], &[50, 60])
    };

    TiffBuilder::new()
        .with_byte_order(byte_order)
        .with_bigtiff(is_bigtiff)
        .add_ifd(
            IfdBuilder::new()
                .shorts(256, &[512])
                .description(LEVEL_DESCRIPTION),
        )
        .add_ifd(label)
        .add_ifd(
            IfdBuilder::new()
                .description(MACRO_DESCRIPTION)
                .strips(&[1200], &[40]),
        )
        .add_ifd(IfdBuilder::new().shorts(256, &[64]).shorts(257, &[64]))
        .pad_to(2048)
        .build()
}

/// Write bytes to a fresh temporary file.
pub fn write_temp(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(data).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Read a file back.
pub fn read_file(path: &Path) -> Vec<u8> {
    std::fs::read(path).expect("read file")
}

/// Whether `data[start..start + len]` is all zeros.
pub fn is_zeroed(data: &[u8], start: usize, len: usize) -> bool {
    data[start..start + len].iter().all(|&b| b == 0)
}

/// Whether `data[start..start + len]` still holds the fill pattern.
pub fn is_filled(data: &[u8], start: usize, len: usize) -> bool {
    data[start..start + len].iter().all(|&b| b == FILL)
}
