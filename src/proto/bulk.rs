//! Bulk config reassembly: multi-fragment track-table writes.
//!
//! Fragment wire shape: `[total u16 BE][seq u8][len u8][len bytes]`.
//! Fragments arrive strictly in order; any gap, duplicate, declared-size
//! change, or capacity overflow discards the partial message. The channel
//! acknowledges with its readable value, not a reply message: `0x00` on a
//! fully reassembled and decoded batch, `0x01` on any failure.

use heapless::Vec;
use log::warn;

use crate::proto::{DecodeError, Reader};
use crate::track::{PaceTable, Track, TrackTable};
use crate::units::rgb_from_u32;

/// Fixed reassembly capacity; fragment sets declaring more are rejected.
pub const REASSEMBLY_CAPACITY: usize = 512;

/// Fragment header bytes before the payload.
pub const FRAGMENT_HEADER_LEN: usize = 4;

/// A fully reassembled message body.
pub type AssembledPayload = Vec<u8, REASSEMBLY_CAPACITY>;

/// A rejected fragment. Every variant resets the in-progress message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencingError {
    /// Declared total exceeds [`REASSEMBLY_CAPACITY`].
    TooLarge { total: u16 },
    /// Fragment arrived out of order (gap or duplicate).
    BadSequence { expected: u8, got: u8 },
    /// A later fragment declared a different total than the first.
    TotalMismatch { first: u16, got: u16 },
    /// Fragment header truncated, or payload spills past the declared
    /// total.
    Malformed,
}

/// Outcome of feeding one valid fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedOutcome {
    /// More fragments expected.
    Incomplete,
    /// All fragments received; the assembled message body.
    Complete(AssembledPayload),
}

/// Accumulates one in-flight fragmented message.
///
/// Reset to empty after every complete or failed message.
pub struct ReassemblyBuffer {
    total: u16,
    expected_sequence: u8,
    offset: usize,
    buffer: [u8; REASSEMBLY_CAPACITY],
}

impl Default for ReassemblyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReassemblyBuffer {
    pub const fn new() -> Self {
        Self {
            total: 0,
            expected_sequence: 0,
            offset: 0,
            buffer: [0; REASSEMBLY_CAPACITY],
        }
    }

    /// Discard any partial progress.
    pub fn reset(&mut self) {
        self.total = 0;
        self.expected_sequence = 0;
        self.offset = 0;
    }

    /// Validate and absorb one fragment.
    ///
    /// On any error the buffer is reset and the partial message lost.
    /// Once `offset == total` the assembled payload is handed back and
    /// the buffer reset, ready for the next message.
    pub fn feed(&mut self, fragment: &[u8]) -> Result<FeedOutcome, SequencingError> {
        match self.feed_inner(fragment) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.reset();
                Err(err)
            }
        }
    }

    fn feed_inner(&mut self, fragment: &[u8]) -> Result<FeedOutcome, SequencingError> {
        let mut r = Reader::new(fragment);
        let total = r.u16_be().map_err(|_| SequencingError::Malformed)?;
        let sequence = r.u8().map_err(|_| SequencingError::Malformed)?;
        let len = r.u8().map_err(|_| SequencingError::Malformed)?;
        let payload = r
            .take(usize::from(len))
            .map_err(|_| SequencingError::Malformed)?;

        if usize::from(total) > REASSEMBLY_CAPACITY {
            return Err(SequencingError::TooLarge { total });
        }
        if sequence != self.expected_sequence {
            return Err(SequencingError::BadSequence {
                expected: self.expected_sequence,
                got: sequence,
            });
        }
        if sequence > 0 && total != self.total {
            return Err(SequencingError::TotalMismatch {
                first: self.total,
                got: total,
            });
        }
        if sequence == 0 {
            self.total = total;
        }
        if self.offset + payload.len() > usize::from(self.total) {
            return Err(SequencingError::Malformed);
        }

        self.buffer[self.offset..self.offset + payload.len()].copy_from_slice(payload);
        self.offset += payload.len();
        self.expected_sequence = self.expected_sequence.wrapping_add(1);

        if self.offset < usize::from(self.total) {
            return Ok(FeedOutcome::Incomplete);
        }

        let mut assembled = AssembledPayload::new();
        // Cannot fail: offset never exceeds the buffer capacity.
        let _ = assembled.extend_from_slice(&self.buffer[..self.offset]);
        self.reset();
        Ok(FeedOutcome::Complete(assembled))
    }
}

/// Parse an assembled batch payload: `[track_count u8]`, then per track
/// `[id u8][rgb u32 LE][pair_count u8]` followed by
/// `[distance u16 LE][speed f32 LE]` pairs.
///
/// An empty pace table is suspicious but not fatal; the track is kept.
pub fn decode_batch(data: &[u8]) -> Result<TrackTable, DecodeError> {
    let mut r = Reader::new(data);
    let mut tracks = TrackTable::new();

    let count = r.u8()?;
    for _ in 0..count {
        let id = r.u8()?;
        let color = rgb_from_u32(r.u32_le()?);
        let pairs = r.u8()?;

        let mut pace = PaceTable::new();
        for _ in 0..pairs {
            let distance = r.u16_le()?;
            let speed = r.f32_le()?;
            pace.insert(distance, speed)
                .map_err(|_| DecodeError::BadValue)?;
        }
        if pace.is_empty() {
            warn!("track {} has an empty pace table", id);
        }

        tracks
            .push(Track { id, color, pace })
            .map_err(|_| DecodeError::BadValue)?;
    }
    r.finish()?;
    Ok(tracks)
}
