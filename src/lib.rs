#![no_std]

pub mod intent;
pub mod link;
pub mod motion;
pub mod proto;
pub mod render;
pub mod scheduler;
pub mod settings;
pub mod snapshot;
pub mod track;
pub mod units;

pub use intent::{
    Geometry, IntentChannel, IntentReceiver, IntentSender, LaneIntent, TryReceiveError,
    TrySendError,
};
pub use link::{ChannelId, LaneLink};
pub use motion::{LaneConfig, LaneParams, LaneStatus, MotionState, advance};
pub use proto::bulk::{FeedOutcome, ReassemblyBuffer, SequencingError};
pub use proto::{DecodeError, EncodeError};
pub use render::{LaneRenderer, meters_to_index};
pub use scheduler::{LaneScheduler, TickResult};
pub use settings::{SettingsStore, StoreError, keys, load_config};
pub use snapshot::{ConfigCell, SnapshotCell};
pub use track::{PaceTable, Track, TrackTable};
pub use units::{Meters, Rgb, rgb_from_u32, rgb_to_u32};

pub use embassy_time::{Duration, Instant};

/// Error raised by a [`LaneSurface`] when it cannot allocate or
/// reinitialize its pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceError;

/// Abstract LED surface trait
///
/// Implement this trait to support different hardware strips.
/// The engine is generic over this trait and only ever addresses
/// logical pixel indices; implementations clip out-of-range fills.
pub trait LaneSurface {
    /// Resize the logical pixel buffer. May reallocate and reinitialize
    /// the underlying hardware buffer.
    fn set_length(&mut self, leds: u32) -> Result<(), SurfaceError>;

    /// Set every pixel to off.
    fn clear(&mut self);

    /// Fill `count` pixels with `color`, counting from the strip's start.
    fn fill_forward(&mut self, start: u32, count: u32, color: Rgb);

    /// Fill `count` pixels with `color`, mirrored from the strip's end:
    /// the filled range begins at `total − start − count`.
    fn fill_backward(&mut self, start: u32, count: u32, color: Rgb);

    /// Present the buffer on the hardware.
    fn show(&mut self);
}

/// Sink for state-notify payloads pushed to the remote peer.
///
/// The transport collaborator implements this over its notify channel.
pub trait NotifySink {
    /// Push an encoded payload. Delivery is best-effort.
    fn push(&mut self, payload: &[u8]);
}
