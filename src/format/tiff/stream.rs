//! Positional typed reads and writes over a TIFF container.
//!
//! [`TiffStream`] owns the random-access handle together with the resolved
//! header. Every operation is positional: callers seek explicitly before
//! reading or writing, and nothing assumes where the cursor was left by an
//! unrelated call.

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use crate::error::TiffError;
use crate::io::file_size;

use super::parser::{IntWidth, TiffHeader, WidthClass, BIGTIFF_PREAMBLE_SIZE};

/// Chunk size used when overwriting a region with zeros.
const ZERO_CHUNK_SIZE: usize = 64 * 1024;

/// An open TIFF container: the handle, its size and its resolved header.
#[derive(Debug)]
pub struct TiffStream<S> {
    inner: S,
    header: TiffHeader,
    size: u64,
}

impl<S> TiffStream<S> {
    /// The resolved header.
    #[inline]
    pub fn header(&self) -> &TiffHeader {
        &self.header
    }

    /// Total size of the underlying file in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Byte size of a native integer kind, without performing I/O.
    #[inline]
    pub fn native_size(&self, class: WidthClass) -> usize {
        self.header.widths.get(class).bytes()
    }

    /// Bytes available between `offset` and the end of the file.
    #[inline]
    pub fn remaining_from(&self, offset: u64) -> u64 {
        self.size.saturating_sub(offset)
    }

    /// Release the underlying handle.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Read + Seek> TiffStream<S> {
    /// Resolve the header of `inner` and wrap it.
    ///
    /// On success the cursor sits on the link slot holding the first IFD
    /// offset, where directory traversal begins.
    pub fn open(mut inner: S) -> Result<Self, TiffError> {
        let size = file_size(&mut inner)?;

        let preamble_len = (size as usize).min(BIGTIFF_PREAMBLE_SIZE);
        let mut preamble = vec![0u8; preamble_len];
        inner.seek(SeekFrom::Start(0))?;
        inner.read_exact(&mut preamble)?;

        let header = TiffHeader::parse(&preamble)?;
        inner.seek(SeekFrom::Start(header.first_link_offset))?;

        Ok(TiffStream {
            inner,
            header,
            size,
        })
    }

    /// Move the cursor to an absolute offset.
    pub fn seek(&mut self, offset: u64) -> Result<(), TiffError> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Current cursor position.
    pub fn position(&mut self) -> Result<u64, TiffError> {
        Ok(self.inner.stream_position()?)
    }

    /// Read exactly `len` bytes at the cursor.
    ///
    /// Fails with `Truncated` when the file ends first; the check happens
    /// before allocating so a corrupt length cannot trigger a huge buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, TiffError> {
        let offset = self.position()?;
        let truncated = TiffError::Truncated {
            offset,
            requested: len as u64,
        };

        if (len as u64) > self.remaining_from(offset) {
            return Err(truncated);
        }

        let mut buf = vec![0u8; len];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => Ok(buf),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(truncated),
            Err(e) => Err(e.into()),
        }
    }

    /// Seek to `offset` and read exactly `len` bytes.
    pub fn read_bytes_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, TiffError> {
        self.seek(offset)?;
        self.read_bytes(len)
    }

    /// Read an unsigned integer of the given width at the cursor.
    pub fn read_uint(&mut self, width: IntWidth) -> Result<u64, TiffError> {
        let bytes = self.read_bytes(width.bytes())?;
        Ok(self.header.byte_order.decode(&bytes))
    }

    /// Read a signed integer of the given width at the cursor.
    pub fn read_int(&mut self, width: IntWidth) -> Result<i64, TiffError> {
        let raw = self.read_uint(width)?;
        Ok(width.sign_extend(raw))
    }

    /// Read a u16 (tag ids and type codes) at the cursor.
    pub fn read_u16(&mut self) -> Result<u16, TiffError> {
        Ok(self.read_uint(IntWidth::Bits16)? as u16)
    }

    /// Read an unsigned native short or native long at the cursor.
    pub fn read_native(&mut self, class: WidthClass) -> Result<u64, TiffError> {
        self.read_uint(self.header.widths.get(class))
    }

    /// Read a signed native short or native long at the cursor.
    pub fn read_native_signed(&mut self, class: WidthClass) -> Result<i64, TiffError> {
        self.read_int(self.header.widths.get(class))
    }
}

impl<S: Read + Write + Seek> TiffStream<S> {
    /// Write raw bytes at the cursor.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TiffError> {
        self.inner.write_all(bytes)?;
        let end = self.position()?;
        self.size = self.size.max(end);
        Ok(())
    }

    /// Seek to `offset` and write raw bytes.
    pub fn write_bytes_at(&mut self, offset: u64, bytes: &[u8]) -> Result<(), TiffError> {
        self.seek(offset)?;
        self.write_bytes(bytes)
    }

    /// Write an unsigned integer of the given width at the cursor.
    ///
    /// The value is truncated to the width.
    pub fn write_uint(&mut self, width: IntWidth, value: u64) -> Result<(), TiffError> {
        let mut buf = [0u8; 8];
        let out = &mut buf[..width.bytes()];
        self.header.byte_order.encode(value, out);
        self.write_bytes(out)
    }

    /// Write a signed integer of the given width at the cursor.
    pub fn write_int(&mut self, width: IntWidth, value: i64) -> Result<(), TiffError> {
        self.write_uint(width, value as u64)
    }

    /// Write an unsigned native short or native long at the cursor.
    pub fn write_native(&mut self, class: WidthClass, value: u64) -> Result<(), TiffError> {
        self.write_uint(self.header.widths.get(class), value)
    }

    /// Write a signed native short or native long at the cursor.
    pub fn write_native_signed(&mut self, class: WidthClass, value: i64) -> Result<(), TiffError> {
        self.write_int(self.header.widths.get(class), value)
    }

    /// Overwrite `len` bytes starting at `offset` with zeros.
    pub fn zero_fill(&mut self, offset: u64, len: u64) -> Result<(), TiffError> {
        self.seek(offset)?;

        let zeros = [0u8; ZERO_CHUNK_SIZE];
        let mut remaining = len;
        while remaining > 0 {
            let chunk = remaining.min(ZERO_CHUNK_SIZE as u64) as usize;
            self.write_bytes(&zeros[..chunk])?;
            remaining -= chunk as u64;
        }

        Ok(())
    }

    /// Flush buffered writes to the underlying handle.
    pub fn flush(&mut self) -> Result<(), TiffError> {
        self.inner.flush()?;
        Ok(())
    }
}
