//! Frame codec: the fixed header prepended to every captured CSI payload.
//!
//! # Wire format
//!
//! ```text
//! [magic:2][payload_len:2][rssi:1][channel:1][timestamp_us:4] = 10 bytes
//! ```
//!
//! All integers little-endian, no padding. The stream written to the
//! transport is a plain concatenation of `header + payload` with no
//! inter-frame delimiter; the offline decoder locates frames by scanning
//! for `MAGIC` and skipping `payload_len` bytes. Field widths and order
//! are a compatibility contract with that decoder and must not change
//! independently of it.
//!
//! There is no on-device decode path. Decoding (and resynchronization
//! after a torn frame, by re-scanning for `MAGIC`) happens off-device.

/// Sentinel marking the start of a well-formed frame.
pub const MAGIC: u16 = 0xFAFA;

/// Encoded header size in bytes.
pub const HEADER_LEN: usize = 10;

/// Header prepended to every captured payload.
///
/// `payload_len` counts only the payload bytes that follow the header;
/// total frame size on the wire is `HEADER_LEN + payload_len`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHeader {
    /// Frame sentinel, always [`MAGIC`].
    pub magic: u16,
    /// Length of the payload following this header.
    pub payload_len: u16,
    /// Received signal strength of the event, dBm.
    pub rssi: i8,
    /// Radio channel the event was captured on.
    pub channel: u8,
    /// Capture time, microseconds, monotonic (wraps every ~71 minutes).
    pub timestamp_us: u32,
}

impl FrameHeader {
    /// Build a header for a payload of `payload_len` bytes.
    pub const fn new(rssi: i8, channel: u8, payload_len: u16, timestamp_us: u32) -> Self {
        Self {
            magic: MAGIC,
            payload_len,
            rssi,
            channel,
            timestamp_us,
        }
    }

    /// Serialize into the wire representation.
    ///
    /// Explicit per-field little-endian writes: the layout must hold on
    /// any target regardless of struct padding or alignment rules, so no
    /// transmute of the struct itself.
    #[inline]
    pub fn encode(&self, out: &mut [u8; HEADER_LEN]) {
        out[0..2].copy_from_slice(&self.magic.to_le_bytes());
        out[2..4].copy_from_slice(&self.payload_len.to_le_bytes());
        out[4] = self.rssi as u8;
        out[5] = self.channel;
        out[6..10].copy_from_slice(&self.timestamp_us.to_le_bytes());
    }

    /// Total on-wire size of this frame (header + payload).
    #[inline]
    pub const fn frame_len(&self) -> usize {
        HEADER_LEN + self.payload_len as usize
    }
}
