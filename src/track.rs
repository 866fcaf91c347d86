//! Pace-track model delivered by the bulk config channel.

use heapless::{LinearMap, Vec};

use crate::units::Rgb;

/// Maximum tracks held by one engine.
pub const MAX_TRACKS: usize = 8;

/// Maximum pace entries per track.
pub const MAX_PACE_ENTRIES: usize = 16;

/// Sparse distance (meters) → pace speed (m/s) mapping.
pub type PaceTable = LinearMap<u16, f32, MAX_PACE_ENTRIES>;

/// One configured track: identity, appearance, and its pace table.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: u8,
    pub color: Rgb,
    pub pace: PaceTable,
}

/// The full track list; replaced atomically by a bulk config write.
pub type TrackTable = Vec<Track, MAX_TRACKS>;
