//! Intents and the bounded queue that carries them.
//!
//! All external mutation of the engine flows through this queue: the
//! transport callbacks are producers, the scheduler task is the single
//! consumer and the only writer of motion state, config, and params.
//! Built on `critical-section` and `heapless::Deque`, so it is safe to
//! feed from interrupt/callback context.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::motion::LaneStatus;
use crate::track::TrackTable;
use crate::units::{Meters, Rgb};

/// Track geometry carried by a length-config write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub line_length: Meters,
    pub active_length: Meters,
    pub total_length: Meters,
    pub line_leds: u32,
}

/// A request for the scheduler to apply on its next tick.
#[derive(Debug, Clone)]
pub enum LaneIntent {
    /// Update the commanded speed.
    SetSpeed(f64),
    /// Update the commanded status.
    SetStatus(LaneStatus),
    /// Change the comet color; applies in any state.
    SetColor(Rgb),
    /// Change the track geometry; applies only while stopped.
    SetGeometry(Geometry),
    /// Replace the whole pace-track table.
    ReplaceTracks(TrackTable),
}

/// Error returned when trying to send to a full channel.
#[derive(Debug, Clone, PartialEq)]
pub struct TrySendError<T>(pub T);

/// Error returned when trying to receive from an empty channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// A bounded, thread-safe intent queue.
///
/// Synchronized with critical sections, suitable for embedded targets.
/// Backed by a fixed-size `heapless::Deque`.
pub struct Channel<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    /// Create a new empty channel.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle for this channel.
    ///
    /// Multiple senders can coexist; they share access to the same queue.
    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { channel: self }
    }

    /// Get a receiver handle for this channel.
    ///
    /// One receiver (the scheduler) should drain the queue.
    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { channel: self }
    }

    /// Try to send a value into the channel.
    ///
    /// Returns `Err(TrySendError(value))` if the channel is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(value).map_err(TrySendError)
        })
    }

    /// Try to receive a value from the channel.
    ///
    /// Returns `Err(TryReceiveError)` if the channel is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`Channel`].
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    /// Try to send a value into the channel.
    ///
    /// Returns `Err(TrySendError(value))` if the channel is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.channel.try_send(value)
    }
}

/// A receiver handle for a [`Channel`].
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Receiver<'_, T, SIZE> {
    /// Try to receive a value from the channel.
    ///
    /// Returns `Err(TryReceiveError)` if the channel is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        self.channel.try_receive()
    }
}

/// Type alias for the intent channel.
pub type IntentChannel<const SIZE: usize> = Channel<LaneIntent, SIZE>;

/// Type alias for an intent sender.
pub type IntentSender<'a, const SIZE: usize> = Sender<'a, LaneIntent, SIZE>;

/// Type alias for an intent receiver.
pub type IntentReceiver<'a, const SIZE: usize> = Receiver<'a, LaneIntent, SIZE>;
