//! Lock-free SPSC byte ring shared between the CSI interrupt callback and
//! the drain task.
//!
//! This is the heart of esp-csi-streamer. All captured frames flow through
//! here.
//!
//! # Architecture
//!
//! ```text
//! CSI callback ──────▶ CaptureRing ──────▶ Drain task
//! (ISR context)        (lock-free)         (FreeRTOS task)
//! try_append           (byte-oriented)     peek_chunk / advance_read
//! ```
//!
//! # Discipline
//!
//! - Only the capture callback advances `write`; only the drain task
//!   advances `read`. Single writer per cursor, enforced by design, not
//!   by the type system.
//! - Neither side ever blocks. A full ring rejects the whole frame; the
//!   producer's caller (the Wi-Fi driver) has no recovery path, so the
//!   rejection surfaces only as a counter.
//! - The occupied region is the cyclic interval `read → write`. Equal
//!   cursors mean empty; an append is rejected if it would make `write`
//!   reach `read`.
//!
//! # Memory ordering
//!
//! The producer publishes data with a Release store on `write`; the
//! consumer loads `write` with Acquire before reading bytes (and
//! symmetrically for `read`). Each side sees a possibly stale value of
//! the counterpart cursor, which only under-reports room/data, never
//! overruns.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Fixed-capacity byte ring with frame-drop backpressure.
///
/// `N` is the backing-store size in bytes. Unlike an index-masked ring
/// the cursors here are plain byte offsets in `[0, N)` advanced modulo
/// `N`, so `N` does not need to be a power of two (the default capacity
/// is 120 KiB). At most `N - 1` bytes can be occupied at once.
pub struct CaptureRing<const N: usize> {
    /// Backing store.
    buf: UnsafeCell<[u8; N]>,

    /// Next write offset. Mutated only by the producer.
    write: AtomicUsize,

    /// Next read offset. Mutated only by the consumer.
    read: AtomicUsize,

    /// Capture events seen, including malformed and rejected ones.
    frames_observed: AtomicU32,

    /// Frames successfully stored.
    frames_accepted: AtomicU32,

    /// Well-formed frames rejected for lack of room.
    frames_dropped: AtomicU32,
}

// SAFETY: Single producer (ISR) and single consumer (drain task), each
// mutating only its own cursor; data handoff ordered by Release/Acquire
// on the cursors. No mutable aliasing within that discipline.
unsafe impl<const N: usize> Sync for CaptureRing<N> {}
unsafe impl<const N: usize> Send for CaptureRing<N> {}

impl<const N: usize> CaptureRing<N> {
    /// Create a new empty ring.
    pub const fn new() -> Self {
        assert!(N > 1, "ring capacity must be at least 2 bytes");

        Self {
            buf: UnsafeCell::new([0u8; N]),
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
            frames_observed: AtomicU32::new(0),
            frames_accepted: AtomicU32::new(0),
            frames_dropped: AtomicU32::new(0),
        }
    }

    /// Ring capacity in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Try to store one frame, given as header bytes plus payload bytes,
    /// logically contiguous.
    ///
    /// Returns `false` and performs no mutation if the frame would not
    /// fit. A frame that straddles the physical end of the backing store
    /// is split-copied across the boundary, so the logical byte sequence
    /// is identical to a non-wrapping append.
    ///
    /// # Timing
    ///
    /// O(len) copy, no blocking calls, no allocation. Safe to call from
    /// interrupt context. Producer side only.
    #[inline]
    pub fn try_append(&self, head: &[u8], tail: &[u8]) -> bool {
        let total = head.len() + tail.len();
        if total == 0 || total >= N {
            return false;
        }

        // Own cursor: Relaxed. Counterpart cursor: Acquire, loaded once;
        // a stale value can only under-report room.
        let write = self.write.load(Ordering::Relaxed);
        let read = self.read.load(Ordering::Acquire);

        // Forward cyclic distance write → read. Equal cursors mean empty,
        // so the full capacity is ahead of us.
        let room = if read > write {
            read - write
        } else {
            N - write + read
        };

        // Reject rather than let write reach read (which would alias the
        // empty state).
        if total >= room {
            return false;
        }

        let mut at = write;
        at = self.copy_in(at, head);
        at = self.copy_in(at, tail);

        // Publish: bytes written above become visible before the cursor.
        self.write.store(at, Ordering::Release);
        true
    }

    /// Copy `src` into the backing store starting at offset `at`,
    /// wrapping at the physical end. Returns the offset past the copy.
    ///
    /// Raw-pointer copies only: forming a `&mut` over the whole backing
    /// array would assert uniqueness over bytes the consumer may be
    /// viewing through a live `peek_chunk` slice.
    #[inline]
    fn copy_in(&self, at: usize, src: &[u8]) -> usize {
        let first = src.len().min(N - at);
        let base = self.buf.get() as *mut u8;

        // SAFETY: the target region lies between `write` and `read` in
        // the forward direction (checked by the caller), which the
        // consumer never reads, so the copies are disjoint from any
        // live peek view. Single producer, so no concurrent write.
        unsafe {
            core::ptr::copy_nonoverlapping(src.as_ptr(), base.add(at), first);
            if first < src.len() {
                core::ptr::copy_nonoverlapping(
                    src.as_ptr().add(first),
                    base,
                    src.len() - first,
                );
            }
        }

        (at + src.len()) % N
    }

    /// Number of bytes currently occupied.
    ///
    /// Consumer side: a stale `write` under-reports, never over-reports.
    #[inline]
    pub fn available(&self) -> usize {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);

        if write >= read {
            write - read
        } else {
            N - read + write
        }
    }

    /// Contiguous view of up to `max` occupied bytes starting at the
    /// read cursor, clipped at the physical end of the backing store.
    ///
    /// A wrapped occupied region is never spanned in one call; after
    /// [`advance_read`](Self::advance_read) moves the cursor past the
    /// end, the next call returns the remainder from offset 0. Does not
    /// mutate cursors. Consumer side only.
    #[inline]
    pub fn peek_chunk(&self, max: usize) -> &[u8] {
        let avail = self.available();
        let read = self.read.load(Ordering::Relaxed);
        let len = max.min(avail).min(N - read);
        let base = self.buf.get() as *const u8;

        // SAFETY: [read, read + len) is inside the occupied region, which
        // the producer never touches. Single consumer, and the Acquire in
        // available() ordered these bytes before the cursor value. Built
        // from a raw pointer so the view covers only these `len` bytes,
        // never the producer's half of the store.
        unsafe { core::slice::from_raw_parts(base.add(read), len) }
    }

    /// Release `n` bytes back to the producer.
    ///
    /// `n` should not exceed the length returned by the most recent
    /// [`peek_chunk`](Self::peek_chunk); an excess is clamped to the
    /// occupied byte count, so a misbehaving caller empties the ring
    /// rather than marching the read cursor into unwritten bytes.
    /// Consumer side only.
    #[inline]
    pub fn advance_read(&self, n: usize) {
        let read = self.read.load(Ordering::Relaxed);
        let n = n.min(self.available());
        self.read.store((read + n) % N, Ordering::Release);
    }

    // --- Capture accounting ---

    /// Count a capture event (valid or not). Producer side.
    #[inline]
    pub fn note_observed(&self) {
        self.frames_observed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a successfully stored frame. Producer side.
    #[inline]
    pub fn note_accepted(&self) {
        self.frames_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a frame rejected for lack of room. Producer side.
    #[inline]
    pub fn note_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Capture events seen so far.
    #[inline]
    pub fn frames_observed(&self) -> u32 {
        self.frames_observed.load(Ordering::Relaxed)
    }

    /// Frames stored so far.
    #[inline]
    pub fn frames_accepted(&self) -> u32 {
        self.frames_accepted.load(Ordering::Relaxed)
    }

    /// Frames dropped so far.
    #[inline]
    pub fn frames_dropped(&self) -> u32 {
        self.frames_dropped.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for CaptureRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
