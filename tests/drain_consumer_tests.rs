//! Drain consumer tests against a scripted transport

use esp_csi_streamer::{ByteSink, CaptureRing, DrainConsumer, DrainOutcome};

/// Transport double: accepts a scripted byte count per call, then
/// everything.
struct ScriptedSink {
    accepts: Vec<usize>,
    received: Vec<u8>,
    writes: usize,
}

impl ScriptedSink {
    fn new(accepts: &[usize]) -> Self {
        Self {
            accepts: accepts.to_vec(),
            received: Vec::new(),
            writes: 0,
        }
    }
}

impl ByteSink for ScriptedSink {
    fn write(&mut self, buf: &[u8], _timeout_ms: u32) -> usize {
        self.writes += 1;
        let n = if self.accepts.is_empty() {
            buf.len()
        } else {
            self.accepts.remove(0).min(buf.len())
        };
        self.received.extend_from_slice(&buf[..n]);
        n
    }
}

#[test]
fn test_partial_accept_then_timeout() {
    // Staging 100, 250 bytes available, transport accepts 40 then
    // times out: one iteration drains 40, the next sees 210 untouched.
    let ring: CaptureRing<1024> = CaptureRing::new();
    let data: Vec<u8> = (0..250u32).map(|i| i as u8).collect();
    assert!(ring.try_append(&data, &[]));

    let mut staging = [0u8; 100];
    let mut sink = ScriptedSink::new(&[40, 0]);
    let mut consumer = DrainConsumer::new(&ring, &mut staging, 64, 5);

    assert_eq!(consumer.drain_once(&mut sink), DrainOutcome::Sent(40));
    assert_eq!(ring.available(), 210);
    assert_eq!(sink.received, &data[..40]);

    assert_eq!(consumer.drain_once(&mut sink), DrainOutcome::Sent(0));
    assert_eq!(ring.available(), 210);

    // Remaining bytes come out unchanged once the transport recovers
    while ring.available() > 0 {
        consumer.drain_once(&mut sink);
    }
    assert_eq!(sink.received, data);
}

#[test]
fn test_threshold_prevents_tiny_writes() {
    let ring: CaptureRing<1024> = CaptureRing::new();
    let mut staging = [0u8; 100];
    let mut sink = ScriptedSink::new(&[]);
    let mut consumer = DrainConsumer::new(&ring, &mut staging, 64, 5);

    assert!(ring.try_append(&[1u8; 63], &[]));
    assert_eq!(consumer.drain_once(&mut sink), DrainOutcome::BelowThreshold);
    assert_eq!(sink.writes, 0);

    // One more byte crosses the threshold
    assert!(ring.try_append(&[2u8; 1], &[]));
    assert_eq!(consumer.drain_once(&mut sink), DrainOutcome::Sent(64));
}

#[test]
fn test_wrapped_region_drains_in_two_chunks() {
    let ring: CaptureRing<128> = CaptureRing::new();

    // Park the cursors 30 bytes before the physical end
    assert!(ring.try_append(&[0u8; 98], &[]));
    ring.advance_read(98);

    // 60-byte frame wraps: 30 at the tail, 30 at the start
    let data: Vec<u8> = (0..60u8).collect();
    assert!(ring.try_append(&data[..10], &data[10..]));

    let mut staging = [0u8; 100];
    let mut sink = ScriptedSink::new(&[]);
    let mut consumer = DrainConsumer::new(&ring, &mut staging, 1, 5);

    assert_eq!(consumer.drain_once(&mut sink), DrainOutcome::Sent(30));
    assert_eq!(consumer.drain_once(&mut sink), DrainOutcome::Sent(30));
    assert_eq!(sink.received, data);
}
