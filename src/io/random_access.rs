use std::io::{Read, Seek, SeekFrom, Write};

/// A seekable byte stream that can be both read and written in place.
///
/// This is the only capability the TIFF layer needs from its backing store.
/// `std::fs::File` and `std::io::Cursor<Vec<u8>>` both qualify, which lets
/// the parser run against real slides and in-memory fixtures alike.
pub trait RandomAccess: Read + Write + Seek {}

impl<T: Read + Write + Seek> RandomAccess for T {}

/// Determine the total length of a seekable stream.
///
/// The stream position is restored afterwards.
pub fn file_size<S: Seek>(stream: &mut S) -> std::io::Result<u64> {
    let position = stream.stream_position()?;
    let size = stream.seek(SeekFrom::End(0))?;
    stream.seek(SeekFrom::Start(position))?;
    Ok(size)
}

// =============================================================================
// Endian Helper Functions
// =============================================================================
//
// TIFF integers are 1, 2, 4 or 8 bytes wide in either byte order. The helpers
// below work on any width up to 8 bytes so callers can drive them from a
// width table instead of matching on every integer type.

/// Decode a little-endian unsigned integer of `bytes.len()` bytes (at most 8).
#[inline]
pub fn decode_uint_le(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= 8);
    bytes
        .iter()
        .rev()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Decode a big-endian unsigned integer of `bytes.len()` bytes (at most 8).
#[inline]
pub fn decode_uint_be(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= 8);
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Encode the low `out.len()` bytes of `value` in little-endian order.
#[inline]
pub fn encode_uint_le(value: u64, out: &mut [u8]) {
    let full = value.to_le_bytes();
    out.copy_from_slice(&full[..out.len()]);
}

/// Encode the low `out.len()` bytes of `value` in big-endian order.
#[inline]
pub fn encode_uint_be(value: u64, out: &mut [u8]) {
    let full = value.to_be_bytes();
    out.copy_from_slice(&full[8 - out.len()..]);
}
