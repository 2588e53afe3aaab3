use std::collections::VecDeque;

use crate::reading::PACKET_LEN;

/// Packet-start marker: two of these in a row resynchronize the stream.
pub const SENTINEL: u8 = 0xAA;

/// Streaming frame synchronizer for the sensor's serial protocol.
///
/// Feed raw serial bytes via `push_data`, then drain completed 17-byte
/// candidate packets via `next_packet`. Chunk boundaries carry no meaning:
/// any re-chunking of the same byte sequence yields the same packets.
pub struct FrameSynchronizer {
    /// Fixed accumulation buffer, reused across packets.
    buf: [u8; PACKET_LEN],
    /// Write position into `buf`. May sit past the end after an emission
    /// until the next sentinel pair arrives.
    cursor: usize,
    /// Previously consumed byte, for sentinel-pair detection.
    last: Option<u8>,
    /// Completed candidate packets awaiting `next_packet`.
    ready: VecDeque<[u8; PACKET_LEN]>,
}

impl FrameSynchronizer {
    pub fn new() -> Self {
        Self {
            buf: [0; PACKET_LEN],
            cursor: 0,
            last: None,
            ready: VecDeque::new(),
        }
    }

    /// Consume a chunk of received bytes, in order. Empty chunks are a no-op.
    pub fn push_data(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            self.accept(byte);
        }
    }

    /// Pop the next completed candidate packet, if any.
    pub fn next_packet(&mut self) -> Option<[u8; PACKET_LEN]> {
        self.ready.pop_front()
    }

    fn accept(&mut self, byte: u8) {
        // Two consecutive sentinels mark a packet start. The marker byte is
        // not payload, and `last` keeps the sentinel value so a longer run
        // of sentinels keeps resynchronizing.
        if byte == SENTINEL && self.last == Some(SENTINEL) {
            self.cursor = 0;
            return;
        }

        // Bytes arriving after the buffer has filled (sentinel overdue) are
        // discarded until the next marker.
        if self.cursor < PACKET_LEN {
            self.buf[self.cursor] = byte;
            if self.cursor == PACKET_LEN - 1 {
                self.ready.push_back(self.buf);
            }
            self.cursor += 1;
        }

        self.last = Some(byte);
    }
}

impl Default for FrameSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}
