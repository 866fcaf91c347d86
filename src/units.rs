//! Physical unit values: metric lengths and packed RGB colors.

use core::ops::{Add, Sub};

use smart_leds::RGB8;

pub type Rgb = RGB8;

/// Convert a packed `0x00RRGGBB` word into an [`Rgb`] color.
pub const fn rgb_from_u32(raw: u32) -> Rgb {
    Rgb {
        r: ((raw >> 16) & 0xFF) as u8,
        g: ((raw >> 8) & 0xFF) as u8,
        b: (raw & 0xFF) as u8,
    }
}

/// Pack an [`Rgb`] color into a `0x00RRGGBB` word.
pub const fn rgb_to_u32(color: Rgb) -> u32 {
    ((color.r as u32) << 16) | ((color.g as u32) << 8) | (color.b as u32)
}

/// A length in meters.
///
/// Immutable once constructed; arithmetic stays in meters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Meters(pub f32);

impl Meters {
    pub const ZERO: Self = Self(0.0);

    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    pub fn from_centimeters(cm: u32) -> Self {
        #[allow(clippy::cast_precision_loss)]
        Self(cm as f32 / 100.0)
    }

    /// Whole centimeters, rounded half away from zero. Negative lengths
    /// clamp to zero.
    pub fn as_centimeters(self) -> u32 {
        let cm = libm::roundf(self.0 * 100.0);
        if cm <= 0.0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            cm as u32
        }
    }

    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Add for Meters {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Meters {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl From<Meters> for f64 {
    fn from(m: Meters) -> Self {
        Self::from(m.0)
    }
}
