//! Pixel mapping: meter-valued comet intervals onto LED indices.

use crate::motion::{LaneConfig, LaneStatus, MotionState};
use crate::LaneSurface;

/// Pixels lit at each end of the strip in blink mode.
const MARKER_LEDS: u32 = 10;

/// Map a position in meters onto a 1-based LED index.
pub fn meters_to_index(meters: f64, leds_per_meter: f64) -> u32 {
    let index = libm::round(meters * leds_per_meter) + 1.0;
    if index <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        index as u32
    }
}

/// Draws the comet onto a [`LaneSurface`].
///
/// Consumes the tick's state snapshot; never mutates it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaneRenderer;

impl LaneRenderer {
    /// Render one frame: clear, fill the `[tail, head]` interval in the
    /// direction of travel, present.
    pub fn render<S: LaneSurface>(self, state: &MotionState, cfg: &LaneConfig, surface: &mut S) {
        let leds_per_meter = f64::from(cfg.line_leds) / f64::from(cfg.line_length);
        let tail_index = meters_to_index(state.tail, leds_per_meter);
        let head_index = meters_to_index(state.head, leds_per_meter);
        let count = head_index.saturating_sub(tail_index);

        surface.clear();
        match state.status {
            LaneStatus::Forward => surface.fill_forward(tail_index, count, cfg.color),
            LaneStatus::Backward => surface.fill_backward(tail_index, count, cfg.color),
            LaneStatus::Stop | LaneStatus::Blink => {}
        }
        surface.show();
    }

    /// Render one blink frame: dark, or a marker segment at each end.
    pub fn render_markers<S: LaneSurface>(self, cfg: &LaneConfig, lit: bool, surface: &mut S) {
        surface.clear();
        if lit {
            let marker = MARKER_LEDS.min(cfg.line_leds);
            surface.fill_forward(0, marker, cfg.color);
            surface.fill_backward(0, marker, cfg.color);
        }
        surface.show();
    }
}
