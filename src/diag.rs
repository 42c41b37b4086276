//! ISR-safe diagnostics.
//!
//! The capture callback runs in interrupt context where `log::warn!`,
//! `printf` and friends are forbidden (they may block on the console
//! lock). Anything it wants to report goes into a lock-free text ring
//! instead, which the drain task flushes to the console logger at the
//! liveness cadence.
//!
//! ```text
//! ISR path              DiagStream           Drain task
//! ────────              ──────────           ──────────
//! diag!() ───────────▶ [E0][E1][E2] ───────▶ log::warn!
//! non-blocking          lock-free            blocking ok
//! ```
//!
//! Messages are dropped (and counted) when the ring is full; diagnostics
//! are best-effort by design.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length in bytes.
pub const MAX_MSG_LEN: usize = 96;

/// Diagnostic ring size in entries. Must be a power of 2.
pub const DIAG_BUFFER_SIZE: usize = 32;

/// Global diagnostic stream: ISR producer, drain-task consumer.
pub static DIAG: DiagStream = DiagStream::new();

/// A single queued diagnostic message.
#[derive(Clone, Copy)]
pub struct DiagEntry {
    /// Capture-side timestamp, microseconds.
    pub timestamp_us: u32,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl DiagEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message as UTF-8, lossy on truncation boundaries.
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

/// Lock-free SPSC text ring.
///
/// Single producer (the capture ISR), single consumer (the drain task).
/// Push never blocks; a full ring drops the message and bumps a counter.
pub struct DiagStream<const N: usize = DIAG_BUFFER_SIZE> {
    entries: UnsafeCell<[DiagEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: single producer, single consumer, handoff ordered by
// Release/Acquire on the indices.
unsafe impl<const N: usize> Sync for DiagStream<N> {}
unsafe impl<const N: usize> Send for DiagStream<N> {}

impl<const N: usize> DiagStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "diag buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new([DiagEntry::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue a message (ISR-safe, never blocks).
    ///
    /// Returns `false` if the ring was full and the message dropped.
    #[inline]
    pub fn push(&self, timestamp_us: u32, msg: &[u8]) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;

        // SAFETY: single producer; the slot is outside the occupied
        // region until the index store below publishes it.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_us = timestamp_us;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Take the next queued message, if any. Consumer side.
    #[inline]
    pub fn pop(&self) -> Option<DiagEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: single consumer, entry published by the producer's
        // Release store
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Messages dropped because the ring was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Drain everything queued into the console logger. Task context
    /// only.
    pub fn flush_to_log(&self) {
        while let Some(entry) = self.pop() {
            log::warn!("[{:10}] {}", entry.timestamp_us, entry.text());
        }

        let dropped = self.dropped.swap(0, Ordering::Relaxed);
        if dropped > 0 {
            log::warn!("diag: {} messages dropped", dropped);
        }
    }
}

impl<const N: usize> Default for DiagStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format into a caller-provided buffer without allocating.
///
/// Returns the number of bytes written; output is truncated to fit.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl<'a> Write for BufWriter<'a> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let remaining = self.buf.len() - self.pos;
            let to_write = bytes.len().min(remaining);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Queue a formatted diagnostic from interrupt context.
///
/// ```ignore
/// diag!(DIAG, timestamp_us, "csi: null descriptor");
/// ```
#[macro_export]
macro_rules! diag {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::diag::MAX_MSG_LEN];
        let len = $crate::diag::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($timestamp, &buf[..len]);
    }};
}
