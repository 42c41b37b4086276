//! Drain consumer: moves buffered frame bytes from the ring to the
//! outbound transport.
//!
//! Runs as an ordinary FreeRTOS task, so unlike the capture side it may
//! sleep and may block for the (short, bounded) transport timeout. It is
//! the single owner of the ring's read cursor.
//!
//! # Per-iteration contract
//!
//! 1. Below [`MIN_SEND_THRESHOLD`](crate::config::MIN_SEND_THRESHOLD)
//!    occupied bytes: do nothing, caller sleeps a tick (no busy spin).
//! 2. Otherwise peek a contiguous chunk, copy it into the private
//!    staging buffer, offer it to the transport.
//! 3. Advance the read cursor by exactly what the transport accepted; a
//!    short write leaves the remainder buffered for the next iteration.
//!
//! A stalled transport therefore degrades to dropped captures (the ring
//! fills and the producer starts rejecting), never to a frozen pipeline.

use crate::ring::CaptureRing;

/// Bounded-time byte sink, the outbound transport boundary.
///
/// `write` offers `buf` and returns how many leading bytes the sink
/// accepted within `timeout_ms`; 0 means the sink was not ready in time.
/// It must never block past the timeout.
pub trait ByteSink {
    fn write(&mut self, buf: &[u8], timeout_ms: u32) -> usize;
}

/// Outcome of one drain iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Occupied bytes below the send threshold; nothing offered.
    BelowThreshold,
    /// Chunk offered; the sink accepted this many bytes (0 = timeout).
    Sent(usize),
}

/// Sole reader of the ring's occupied region.
///
/// Holds the ring handle and a caller-provided staging buffer; the
/// staging size bounds each `peek_chunk`, so a wrapped occupied region
/// is simply drained in two iterations.
pub struct DrainConsumer<'a, const N: usize> {
    ring: &'a CaptureRing<N>,
    staging: &'a mut [u8],
    min_threshold: usize,
    timeout_ms: u32,
}

impl<'a, const N: usize> DrainConsumer<'a, N> {
    /// Create a consumer over `ring`.
    ///
    /// `staging` is the private copy buffer (normally
    /// [`STAGING_CHUNK`](crate::config::STAGING_CHUNK) bytes);
    /// `min_threshold` is the minimum occupancy worth a transport write.
    pub fn new(
        ring: &'a CaptureRing<N>,
        staging: &'a mut [u8],
        min_threshold: usize,
        timeout_ms: u32,
    ) -> Self {
        Self {
            ring,
            staging,
            min_threshold,
            timeout_ms,
        }
    }

    /// Run one iteration of the drain contract.
    pub fn drain_once<S: ByteSink>(&mut self, sink: &mut S) -> DrainOutcome {
        if self.ring.available() < self.min_threshold {
            return DrainOutcome::BelowThreshold;
        }

        let chunk = self.ring.peek_chunk(self.staging.len());
        let len = chunk.len();
        self.staging[..len].copy_from_slice(chunk);

        let accepted = sink.write(&self.staging[..len], self.timeout_ms);
        // Do not trust the sink to stay within bounds
        let accepted = accepted.min(len);

        self.ring.advance_read(accepted);
        DrainOutcome::Sent(accepted)
    }

    /// Bytes currently buffered in the ring.
    #[inline]
    pub fn available(&self) -> usize {
        self.ring.available()
    }
}

/// Drain task body: iterate forever, emitting a liveness line at a fixed
/// cadence.
///
/// The liveness line and any queued capture-side diagnostics go to the
/// console logger, an independent channel from the data transport.
#[cfg(target_os = "espidf")]
pub fn drain_task<const N: usize, S: ByteSink>(
    ring: &CaptureRing<N>,
    staging: &mut [u8],
    sink: &mut S,
) -> ! {
    use crate::config::{LIVENESS_INTERVAL_MS, MIN_SEND_THRESHOLD, TRANSPORT_TIMEOUT_MS};
    use esp_idf_svc::sys;

    let mut consumer = DrainConsumer::new(ring, staging, MIN_SEND_THRESHOLD, TRANSPORT_TIMEOUT_MS);
    let mut last_liveness: i64 = 0;

    loop {
        let outcome = consumer.drain_once(sink);

        // SAFETY: esp_timer_get_time is always safe to call
        let now = unsafe { sys::esp_timer_get_time() };
        if now - last_liveness > (LIVENESS_INTERVAL_MS as i64) * 1000 {
            log::info!(
                "STATUS: observed={} accepted={} dropped={}",
                ring.frames_observed(),
                ring.frames_accepted(),
                ring.frames_dropped()
            );
            crate::diag::DIAG.flush_to_log();
            last_liveness = now;
        }

        match outcome {
            // Nothing to send, or the transport timed out: wait a tick
            DrainOutcome::BelowThreshold | DrainOutcome::Sent(0) => unsafe {
                sys::vTaskDelay(1);
            },
            DrainOutcome::Sent(_) => {}
        }
    }
}
