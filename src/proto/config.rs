//! Config channel: geometry and color writes, full-config reads.

use crate::intent::Geometry;
use crate::motion::LaneConfig;
use crate::proto::{DecodeError, EncodeError, Reader, Writer};
use crate::units::{Meters, rgb_from_u32, rgb_to_u32};

const TAG_LENGTH: u8 = 1;
const TAG_COLOR: u8 = 2;

/// Encoded size of a [`ConfigSnapshot`].
pub const SNAPSHOT_LEN: usize = 20;

/// A decoded config write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigRequest {
    Length(Geometry),
    Color(u32),
}

impl ConfigRequest {
    /// Decode a config message: tag 1 carries
    /// `[line f32][active f32][total f32][leds u32]`, tag 2 a packed
    /// RGB word. All fields little-endian.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(data);
        let request = match r.u8()? {
            TAG_LENGTH => Self::Length(Geometry {
                line_length: Meters::new(r.f32_le()?),
                active_length: Meters::new(r.f32_le()?),
                total_length: Meters::new(r.f32_le()?),
                line_leds: r.u32_le()?,
            }),
            TAG_COLOR => Self::Color(r.u32_le()?),
            tag => return Err(DecodeError::UnknownTag(tag)),
        };
        r.finish()?;
        Ok(request)
    }
}

/// Read-only snapshot served on the config channel's read path.
///
/// Both sub-messages are always present: the value is zero-initialized
/// and then every field filled from the live config, so a peer never
/// sees a partially-populated message.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfigSnapshot {
    pub line_length_m: f32,
    pub active_length_m: f32,
    pub total_length_m: f32,
    pub line_leds: u32,
    pub rgb: u32,
}

impl ConfigSnapshot {
    pub fn from_config(cfg: &LaneConfig) -> Self {
        Self {
            line_length_m: cfg.line_length.value(),
            active_length_m: cfg.active_length.value(),
            total_length_m: cfg.total_length.value(),
            line_leds: cfg.line_leds,
            rgb: rgb_to_u32(cfg.color),
        }
    }

    /// Apply a decoded snapshot to a config, peer-side.
    pub fn into_config(self, fps: u32) -> LaneConfig {
        LaneConfig {
            color: rgb_from_u32(self.rgb),
            line_length: Meters::new(self.line_length_m),
            active_length: Meters::new(self.active_length_m),
            total_length: Meters::new(self.total_length_m),
            line_leds: self.line_leds,
            fps,
        }
    }

    pub fn encode(&self, out: &mut [u8]) -> Result<usize, EncodeError> {
        let mut w = Writer::new(out);
        w.f32_le(self.line_length_m)?;
        w.f32_le(self.active_length_m)?;
        w.f32_le(self.total_length_m)?;
        w.u32_le(self.line_leds)?;
        w.u32_le(self.rgb)?;
        Ok(w.written())
    }

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(data);
        let snapshot = Self {
            line_length_m: r.f32_le()?,
            active_length_m: r.f32_le()?,
            total_length_m: r.f32_le()?,
            line_leds: r.u32_le()?,
            rgb: r.u32_le()?,
        };
        r.finish()?;
        Ok(snapshot)
    }
}
