//! Compile-time tunables.
//!
//! The original deployment exposes these as build-time constants, not
//! runtime configuration; changing one means reflashing. Values mirror
//! the reference deployment on ESP32-C6.

/// Ring buffer capacity in bytes.
///
/// Sized to absorb multi-hundred-millisecond consumer stalls at full
/// CSI capture rate (roughly 400 byte frames at ~1 kHz).
pub const RING_CAPACITY: usize = 120 * 1024;

/// Minimum occupied bytes before the drain task bothers the transport.
///
/// Below this the task sleeps one tick instead of issuing tiny writes.
pub const MIN_SEND_THRESHOLD: usize = 1024;

/// Drain staging-buffer size in bytes.
///
/// Substantially larger than [`MIN_SEND_THRESHOLD`] to amortize
/// per-write transport overhead.
pub const STAGING_CHUNK: usize = 8192;

/// Timeout for a single transport write, milliseconds.
///
/// A timed-out write is partial success (0 bytes), retried next
/// iteration.
pub const TRANSPORT_TIMEOUT_MS: u32 = 5;

/// Interval between liveness lines on the diagnostic channel,
/// milliseconds.
pub const LIVENESS_INTERVAL_MS: u32 = 2000;

/// Wi-Fi channel the receiver parks on for capture.
pub const RX_CHANNEL: u8 = 6;

/// Wi-Fi channel the companion blaster transmits on.
///
/// The blaster itself lives outside this firmware; the constant is kept
/// here so receiver and generator are tuned from one place.
pub const TX_CHANNEL: u8 = 6;

/// PHY rate the companion blaster pins its broadcast peer to.
///
/// Value of `wifi_phy_rate_t::WIFI_PHY_RATE_MCS7_SGI`, kept as a plain
/// integer so host-side tests build without the ESP-IDF bindings. Must
/// stay an OFDM (HT) rate; the radio only produces CSI for OFDM frames.
pub const TX_RATE: u32 = 0x1F;

/// USB-Serial-JTAG driver TX ring size in bytes.
pub const USB_TX_RING: usize = 16384;

/// USB-Serial-JTAG driver RX ring size in bytes.
pub const USB_RX_RING: usize = 16384;
