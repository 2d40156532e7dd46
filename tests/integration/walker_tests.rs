//! Directory chain traversal and value resolution on synthetic files.

use std::io::Cursor;

use super::test_utils::*;
use svs_label_redactor::format::tiff::locate_value;
use svs_label_redactor::{read_directories, read_value, DirectoryWalker, TiffError, TiffStream};

fn open(data: Vec<u8>) -> TiffStream<Cursor<Vec<u8>>> {
    TiffStream::open(Cursor::new(data)).unwrap()
}

fn check_chain(byte_order: ByteOrderType, is_bigtiff: bool) {
    let tiff = slide_tiff(byte_order, is_bigtiff);
    let mut stream = open(tiff.data.clone());

    assert_eq!(stream.header().is_bigtiff(), is_bigtiff);

    let ifds = read_directories(&mut stream).unwrap();
    assert_eq!(ifds.len(), 4);

    for (i, ifd) in ifds.iter().enumerate() {
        assert_eq!(ifd.index, i);
        assert_eq!(ifd.offset, tiff.ifd_offsets[i]);
        assert_eq!(ifd.in_pointer_offset, tiff.link_offsets[i]);
        assert_eq!(ifd.out_pointer_offset, tiff.link_offsets[i + 1]);
    }

    // Each directory's out slot is the next directory's in slot
    for pair in ifds.windows(2) {
        assert_eq!(pair[0].out_pointer_offset, pair[1].in_pointer_offset);
    }

    let description = ifds[1].get_raw(270).unwrap();
    let value = read_value(&mut stream, description).unwrap();
    assert_eq!(value.as_str(), Some(LABEL_DESCRIPTION));

    let offsets = read_value(&mut stream, ifds[1].get_raw(273).unwrap()).unwrap();
    assert_eq!(offsets.as_unsigned(), Some(&[1000u64, 1100][..]));
}

#[test]
fn test_chain_classic_little_endian() {
    check_chain(ByteOrderType::LittleEndian, false);
}

#[test]
fn test_chain_classic_big_endian() {
    check_chain(ByteOrderType::BigEndian, false);
}

#[test]
fn test_chain_bigtiff_little_endian() {
    check_chain(ByteOrderType::LittleEndian, true);
}

#[test]
fn test_chain_bigtiff_big_endian() {
    check_chain(ByteOrderType::BigEndian, true);
}

#[test]
fn test_walker_is_lazy() {
    let tiff = slide_tiff(ByteOrderType::LittleEndian, false);
    let mut stream = open(tiff.data);
    let mut walker = DirectoryWalker::new(&stream);

    let first = walker.next(&mut stream).unwrap().unwrap();
    assert_eq!(first.index, 0);
    let second = walker.next(&mut stream).unwrap().unwrap();
    assert_eq!(second.index, 1);
    assert_eq!(second.in_pointer_offset, first.out_pointer_offset);
}

#[test]
fn test_empty_chain() {
    let tiff = TiffBuilder::new().pad_to(64).build();
    let mut stream = open(tiff.data);
    assert!(read_directories(&mut stream).unwrap().is_empty());
}

#[test]
fn test_inline_boundary_classic() {
    let tiff = TiffBuilder::new()
        .add_ifd(
            IfdBuilder::new()
                .ascii(305, "abc")
                .ascii(306, "abcd")
                .longs(320, &[7])
                .longs(321, &[7, 8])
                .shorts(322, &[1, 2]),
        )
        .build();
    let mut stream = open(tiff.data);
    let ifds = read_directories(&mut stream).unwrap();
    let ifd = &ifds[0];

    let inline = |tag: u16, stream: &TiffStream<Cursor<Vec<u8>>>| {
        locate_value(stream, ifd.get_raw(tag).unwrap()).unwrap().inline
    };

    // Exactly four bytes stays in the slot
    assert!(inline(305, &stream));
    assert!(!inline(306, &stream));
    assert!(inline(320, &stream));
    assert!(!inline(321, &stream));
    assert!(inline(322, &stream));

    let value = read_value(&mut stream, ifd.get_raw(305).unwrap()).unwrap();
    assert_eq!(value.as_str(), Some("abc"));
    let value = read_value(&mut stream, ifd.get_raw(306).unwrap()).unwrap();
    assert_eq!(value.as_str(), Some("abcd"));
    let value = read_value(&mut stream, ifd.get_raw(322).unwrap()).unwrap();
    assert_eq!(value.as_unsigned(), Some(&[1u64, 2][..]));
}

#[test]
fn test_inline_boundary_bigtiff() {
    let tiff = TiffBuilder::new()
        .with_bigtiff(true)
        .with_byte_order(ByteOrderType::BigEndian)
        .add_ifd(
            IfdBuilder::new()
                .ascii(305, "abcdefg")
                .ascii(306, "abcdefgh")
                .longs(320, &[1, 2])
                .longs(321, &[1, 2, 3])
                .long8s(322, &[1 << 40]),
        )
        .build();
    let mut stream = open(tiff.data);
    let ifds = read_directories(&mut stream).unwrap();
    let ifd = &ifds[0];

    let locate = |tag: u16, stream: &TiffStream<Cursor<Vec<u8>>>| {
        locate_value(stream, ifd.get_raw(tag).unwrap()).unwrap()
    };

    assert!(locate(305, &stream).inline);
    assert_eq!(locate(305, &stream).len, 8);
    assert!(!locate(306, &stream).inline);
    assert!(locate(320, &stream).inline);
    assert!(!locate(321, &stream).inline);
    assert!(locate(322, &stream).inline);

    let value = read_value(&mut stream, ifd.get_raw(306).unwrap()).unwrap();
    assert_eq!(value.as_str(), Some("abcdefgh"));
    let value = read_value(&mut stream, ifd.get_raw(321).unwrap()).unwrap();
    assert_eq!(value.as_unsigned(), Some(&[1u64, 2, 3][..]));
    let value = read_value(&mut stream, ifd.get_raw(322).unwrap()).unwrap();
    assert_eq!(value.as_unsigned(), Some(&[1u64 << 40][..]));
}

#[test]
fn test_unsupported_type_is_reported() {
    // RATIONAL (type 5), one value, stored out of line
    let tiff = TiffBuilder::new()
        .add_ifd(IfdBuilder::new().raw(282, 5, 1, &[0; 8]))
        .build();
    let mut stream = open(tiff.data);
    let ifds = read_directories(&mut stream).unwrap();

    let result = read_value(&mut stream, ifds[0].get_raw(282).unwrap());
    assert!(matches!(result, Err(TiffError::UnsupportedValueType(5))));
}

#[test]
fn test_truncated_chain() {
    let tiff = slide_tiff(ByteOrderType::LittleEndian, false);
    let cut = tiff.ifd_offsets[2] as usize + 6;
    let mut stream = open(tiff.data[..cut].to_vec());

    let result = read_directories(&mut stream);
    assert!(result.is_err());
    assert!(result.unwrap_err().is_format_error());
}

#[test]
fn test_header_errors() {
    let result = TiffStream::open(Cursor::new(b"XX\x2a\x00\x08\x00\x00\x00".to_vec()));
    assert!(matches!(result, Err(TiffError::InvalidMagic(_))));

    let result = TiffStream::open(Cursor::new(b"II\x2c\x00\x08\x00\x00\x00".to_vec()));
    assert!(matches!(result, Err(TiffError::InvalidVersion(_))));

    let result = TiffStream::open(Cursor::new(b"II\x2b\x00\x08\x00\x01\x00".to_vec()));
    assert!(matches!(
        result,
        Err(TiffError::InvalidBigTiffHeader {
            offset_size: 8,
            reserved: 1
        })
    ));
}
