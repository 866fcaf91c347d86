//! State-notify payload pushed on the notify timer.

use crate::motion::{LaneStatus, MotionState};
use crate::proto::{DecodeError, EncodeError, Reader, Writer};
use crate::units::Meters;

/// Encoded size of a [`StateNotify`].
pub const NOTIFY_LEN: usize = 5;

/// Periodic state report: motion status plus head position in whole
/// centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateNotify {
    pub status: LaneStatus,
    pub head_cm: u32,
}

impl StateNotify {
    pub fn from_state(state: &MotionState) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let head = state.head as f32;
        Self {
            status: state.status,
            head_cm: Meters::new(head).as_centimeters(),
        }
    }

    pub fn encode(&self, out: &mut [u8]) -> Result<usize, EncodeError> {
        let mut w = Writer::new(out);
        w.u8(self.status.as_raw())?;
        w.u32_le(self.head_cm)?;
        Ok(w.written())
    }

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(data);
        let status = LaneStatus::from_raw(r.u8()?).ok_or(DecodeError::BadValue)?;
        let head_cm = r.u32_le()?;
        r.finish()?;
        Ok(Self { status, head_cm })
    }
}
