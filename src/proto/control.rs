//! Control channel: status and speed commands.

use crate::motion::LaneStatus;
use crate::proto::{DecodeError, Reader};

const TAG_SET_STATUS: u8 = 1;
const TAG_SET_SPEED: u8 = 2;

/// A decoded control write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlRequest {
    SetStatus(LaneStatus),
    SetSpeed(f64),
}

impl ControlRequest {
    /// Decode a control message: `[tag][payload]`, tag 1 carries a
    /// status byte, tag 2 a little-endian f64 speed.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(data);
        let request = match r.u8()? {
            TAG_SET_STATUS => {
                let status = LaneStatus::from_raw(r.u8()?).ok_or(DecodeError::BadValue)?;
                Self::SetStatus(status)
            }
            TAG_SET_SPEED => Self::SetSpeed(r.f64_le()?),
            tag => return Err(DecodeError::UnknownTag(tag)),
        };
        r.finish()?;
        Ok(request)
    }
}
