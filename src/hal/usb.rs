//! USB-Serial-JTAG outbound transport.
//!
//! The framed capture stream leaves the device through the built-in
//! USB-Serial-JTAG peripheral. The driver's own TX ring gives one more
//! layer of elasticity between the drain task and the host; a host that
//! stops reading shows up here as short writes, which the drain task
//! absorbs without losing buffered bytes.

#[cfg(target_os = "espidf")]
use crate::drain::ByteSink;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{self, EspError};

/// Install the USB-Serial-JTAG driver with the given ring sizes.
///
/// Call once at startup, before constructing [`UsbSerialJtag`].
#[cfg(target_os = "espidf")]
pub fn install(tx_ring: usize, rx_ring: usize) -> Result<(), EspError> {
    let mut config = sys::usb_serial_jtag_driver_config_t {
        tx_buffer_size: tx_ring as u32,
        rx_buffer_size: rx_ring as u32,
    };

    // SAFETY: config outlives the call; the driver copies it
    unsafe { sys::esp!(sys::usb_serial_jtag_driver_install(&mut config)) }
}

/// Byte-sink handle over the installed USB-Serial-JTAG driver.
pub struct UsbSerialJtag {
    _private: (),
}

impl UsbSerialJtag {
    /// Create a handle. The driver must already be installed via
    /// [`install`].
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(target_os = "espidf")]
impl ByteSink for UsbSerialJtag {
    fn write(&mut self, buf: &[u8], timeout_ms: u32) -> usize {
        let ticks = timeout_ms * esp_idf_svc::hal::delay::TICK_RATE_HZ / 1000;

        // SAFETY: buf is valid for the duration of the call
        let written = unsafe {
            sys::usb_serial_jtag_write_bytes(
                buf.as_ptr() as *const core::ffi::c_void,
                buf.len(),
                ticks,
            )
        };

        // Negative means driver error; treat like a timeout and retry later
        written.max(0) as usize
    }
}
