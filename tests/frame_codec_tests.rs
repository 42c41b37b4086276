//! Frame header wire-format tests
//!
//! The offline decoder reads `<HHbBI>` little-endian; these tests pin
//! that contract.

use esp_csi_streamer::{FrameHeader, HEADER_LEN, MAGIC};

#[test]
fn test_header_is_ten_bytes() {
    assert_eq!(HEADER_LEN, 10);
}

#[test]
fn test_field_offsets_match_decoder() {
    let header = FrameHeader::new(-70, 11, 0x0234, 0xDEAD_BEEF);
    let mut buf = [0u8; HEADER_LEN];
    header.encode(&mut buf);

    assert_eq!(u16::from_le_bytes([buf[0], buf[1]]), MAGIC);
    assert_eq!(u16::from_le_bytes([buf[2], buf[3]]), 0x0234);
    assert_eq!(buf[4] as i8, -70);
    assert_eq!(buf[5], 11);
    assert_eq!(
        u32::from_le_bytes([buf[6], buf[7], buf[8], buf[9]]),
        0xDEAD_BEEF
    );
}

#[test]
fn test_magic_bytes_on_wire() {
    // The decoder resynchronizes by scanning for these two bytes
    let header = FrameHeader::new(0, 0, 0, 0);
    let mut buf = [0u8; HEADER_LEN];
    header.encode(&mut buf);
    assert_eq!(&buf[0..2], &[0xFA, 0xFA]);
}

#[test]
fn test_extreme_values_encode() {
    let header = FrameHeader::new(i8::MIN, u8::MAX, u16::MAX, u32::MAX);
    let mut buf = [0u8; HEADER_LEN];
    header.encode(&mut buf);

    assert_eq!(buf[4], 0x80);
    assert_eq!(buf[5], 0xFF);
    assert_eq!(u16::from_le_bytes([buf[2], buf[3]]), u16::MAX);
    assert_eq!(&buf[6..10], &[0xFF; 4]);
    assert_eq!(header.frame_len(), HEADER_LEN + u16::MAX as usize);
}
