//! Capture producer: turns one CSI callback invocation into one framed
//! append.
//!
//! The Wi-Fi driver delivers CSI events from interrupt context at
//! unpredictable, possibly very high rates. The path through here must
//! never block, allocate, or do unbounded work; every failure mode
//! degrades to a counter on the ring.
//!
//! [`capture_event`] is the platform-independent core and is what the
//! tests exercise. [`csi_rx_trampoline`] is the `extern "C"` shim the
//! driver actually calls; it unpacks the raw descriptor and stamps the
//! event with the monotonic microsecond clock.

use crate::frame::{FrameHeader, HEADER_LEN};
use crate::ring::CaptureRing;

/// One hardware-delivered measurement event, as seen by the core.
#[derive(Clone, Copy, Debug)]
pub struct CsiEvent<'a> {
    /// Raw measurement bytes. Opaque to the core.
    pub payload: &'a [u8],
    /// Per-event received signal strength, dBm.
    pub rssi: i8,
    /// Radio channel the event was captured on.
    pub channel: u8,
    /// Capture time, monotonic microseconds.
    pub timestamp_us: u32,
}

/// Frame one event and append it to the ring.
///
/// Counting contract:
/// - `frames_observed` increments for every call, including empty-payload
///   no-ops, so `observed - accepted` equals rejected frames plus
///   malformed events.
/// - `frames_accepted` increments only when the ring stored the frame.
/// - `frames_dropped` increments when a well-formed frame found no room.
///
/// Never reports an error to the caller; the driver has no recovery path
/// for a failed capture.
#[inline]
pub fn capture_event<const N: usize>(ring: &CaptureRing<N>, event: CsiEvent<'_>) {
    ring.note_observed();

    if event.payload.is_empty() || event.payload.len() > u16::MAX as usize {
        return;
    }

    let header = FrameHeader::new(
        event.rssi,
        event.channel,
        event.payload.len() as u16,
        event.timestamp_us,
    );

    let mut head = [0u8; HEADER_LEN];
    header.encode(&mut head);

    if ring.try_append(&head, event.payload) {
        ring.note_accepted();
    } else {
        ring.note_dropped();
    }
}

/// CSI receive callback registered with `esp_wifi_set_csi_rx_cb`.
///
/// `ctx` is the `&'static CaptureRing` handle passed at registration.
/// Runs in interrupt context: unpack, stamp, append, return.
#[cfg(target_os = "espidf")]
pub unsafe extern "C" fn csi_rx_trampoline(
    ctx: *mut core::ffi::c_void,
    info: *mut esp_idf_svc::sys::wifi_csi_info_t,
) {
    use crate::config::RING_CAPACITY;

    if ctx.is_null() || info.is_null() {
        return;
    }

    let ring = &*(ctx as *const CaptureRing<RING_CAPACITY>);
    let info = &*info;

    if info.buf.is_null() || info.len == 0 {
        // Malformed descriptor: counted no-op
        ring.note_observed();
        crate::diag!(
            crate::diag::DIAG,
            esp_idf_svc::sys::esp_timer_get_time() as u32,
            "csi: empty descriptor"
        );
        return;
    }

    let payload = core::slice::from_raw_parts(info.buf, info.len as usize);

    capture_event(
        ring,
        CsiEvent {
            payload,
            rssi: info.rx_ctrl.rssi() as i8,
            channel: info.rx_ctrl.channel() as u8,
            timestamp_us: esp_idf_svc::sys::esp_timer_get_time() as u32,
        },
    );
}
