//! Motion state model and the per-tick transition function.
//!
//! The comet is the lit segment between `tail` and `head`. Direction is
//! carried entirely by [`LaneStatus`]; the commanded speed is applied as
//! a per-tick delta of `speed / fps` with whatever sign the peer sent.

use log::warn;

use crate::units::{Meters, Rgb, rgb_from_u32};

const STATUS_STOP: u8 = 0;
const STATUS_FORWARD: u8 = 1;
const STATUS_BACKWARD: u8 = 2;
const STATUS_BLINK: u8 = 3;

/// Motion status of the lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LaneStatus {
    #[default]
    Stop = STATUS_STOP,
    Forward = STATUS_FORWARD,
    Backward = STATUS_BACKWARD,
    Blink = STATUS_BLINK,
}

impl LaneStatus {
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            STATUS_STOP => Some(Self::Stop),
            STATUS_FORWARD => Some(Self::Forward),
            STATUS_BACKWARD => Some(Self::Backward),
            STATUS_BLINK => Some(Self::Blink),
            _ => None,
        }
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// The opposite travel direction. Stop and Blink are unaffected.
    pub const fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
            other => other,
        }
    }

    pub const fn is_moving(self) -> bool {
        matches!(self, Self::Forward | Self::Backward)
    }
}

/// Where the comet is and how it moves. One instance per lane, owned by
/// the scheduler; everyone else sees copies.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    /// Cumulative signed distance traveled since the last reset (meters).
    pub shift: f64,
    /// Speed commanded by the last SetSpeed (m/s). Unbounded here.
    pub speed: f64,
    /// Clamped leading edge, `0 <= head <= line_length`, `head >= tail`.
    pub head: f64,
    /// Unclamped leading-edge accumulator; drives the wrap check.
    /// Always `>= head`.
    pub raw_head: f64,
    /// Trailing edge, `0 <= tail <= line_length`.
    pub tail: f64,
    pub status: LaneStatus,
}

impl MotionState {
    /// Zeroed state carrying a status and speed, used for cold starts
    /// and wrap resets.
    const fn restarted(status: LaneStatus, speed: f64) -> Self {
        Self {
            shift: 0.0,
            speed,
            head: 0.0,
            raw_head: 0.0,
            tail: 0.0,
            status,
        }
    }
}

/// Static lane geometry and appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneConfig {
    pub color: Rgb,
    /// One-way track length: the span `head` travels before clamping.
    pub line_length: Meters,
    /// Length of the lit comet segment.
    pub active_length: Meters,
    /// Advisory full-track length; persisted and reported, never fed to
    /// the transition function.
    pub total_length: Meters,
    /// Logical LED count corresponding to `line_length`.
    pub line_leds: u32,
    /// Assumed tick rate; `1 / fps` is the per-tick time delta.
    pub fps: u32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            color: rgb_from_u32(0x00FF_2000),
            line_length: Meters::new(50.0),
            active_length: Meters::new(1.0),
            total_length: Meters::new(50.0),
            line_leds: 300,
            fps: 30,
        }
    }
}

/// Parameters commanded over the control channel, consumed every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LaneParams {
    pub speed: f64,
    pub status: LaneStatus,
}

/// Compute the next [`MotionState`] from the current one.
///
/// Call exactly once per nominal tick (`1 / fps` seconds); the model
/// assumes that interval. A direct Forward↔Backward command while moving
/// is rejected and `params.status` is forced back to the current status;
/// direction only reverses automatically at the wrap threshold.
pub fn advance(state: &MotionState, cfg: &LaneConfig, params: &mut LaneParams) -> MotionState {
    if !state.status.is_moving() {
        // Cold start from Stop or Blink; any other command leaves the
        // lane parked.
        if params.status.is_moving() {
            return MotionState::restarted(params.status, params.speed);
        }
        return MotionState::default();
    }

    if params.status == LaneStatus::Stop {
        // Motion cancels immediately, no coast-down.
        return MotionState::default();
    }
    if params.status != state.status {
        warn!(
            "rejecting direct {:?} command while {:?}; reversal only happens at wrap",
            params.status, state.status
        );
        params.status = state.status;
    }

    let delta = params.speed / f64::from(cfg.fps);
    let line_length = f64::from(cfg.line_length);
    let active_length = f64::from(cfg.active_length);

    let shift = state.shift + delta;
    let temp_head = state.raw_head + delta;

    if temp_head >= active_length + line_length - delta {
        // Wrap: flip direction and restart from the origin.
        return MotionState::restarted(state.status.flipped(), params.speed);
    }

    let mut next = MotionState {
        shift,
        speed: params.speed,
        status: state.status,
        ..*state
    };
    if temp_head >= line_length {
        next.raw_head = temp_head;
        next.head = line_length;
        next.tail = line_length.min(temp_head - active_length);
    } else {
        next.raw_head = temp_head;
        next.head = temp_head;
        next.tail = (temp_head - active_length).max(0.0);
    }
    next
}
