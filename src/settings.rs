//! Persistence seam: named scalar settings in a key/value store.
//!
//! The concrete store (NVS, flash page, file) lives with the firmware;
//! the engine only loads defaults at startup and writes back on
//! accepted config changes. Store failures are logged, never fatal.

use log::warn;

use crate::intent::Geometry;
use crate::motion::LaneConfig;
use crate::units::{Meters, rgb_from_u32, rgb_to_u32};

/// Setting keys used by the lane engine.
pub mod keys {
    pub const COLOR: &str = "color";
    pub const LINE_LENGTH: &str = "line_length";
    pub const ACTIVE_LENGTH: &str = "active_length";
    pub const TOTAL_LENGTH: &str = "total_length";
    pub const LINE_LEDS: &str = "line_leds";
}

/// The store could not persist a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreError;

/// Named scalar settings storage.
pub trait SettingsStore {
    /// Load a stored value, `None` if the key was never written.
    fn load_u32(&mut self, key: &str) -> Option<u32>;
    fn load_f32(&mut self, key: &str) -> Option<f32>;

    fn store_u32(&mut self, key: &str, value: u32) -> Result<(), StoreError>;
    fn store_f32(&mut self, key: &str, value: f32) -> Result<(), StoreError>;
}

/// Build the startup [`LaneConfig`] from persisted settings, falling
/// back to defaults field by field.
pub fn load_config<P: SettingsStore>(store: &mut P) -> LaneConfig {
    let mut cfg = LaneConfig::default();
    if let Some(raw) = store.load_u32(keys::COLOR) {
        cfg.color = rgb_from_u32(raw);
    }
    if let Some(m) = store.load_f32(keys::LINE_LENGTH) {
        cfg.line_length = Meters::new(m);
    }
    if let Some(m) = store.load_f32(keys::ACTIVE_LENGTH) {
        cfg.active_length = Meters::new(m);
    }
    if let Some(m) = store.load_f32(keys::TOTAL_LENGTH) {
        cfg.total_length = Meters::new(m);
    }
    if let Some(leds) = store.load_u32(keys::LINE_LEDS) {
        cfg.line_leds = leds;
    }
    cfg
}

pub(crate) fn persist_color<P: SettingsStore>(store: &mut P, cfg: &LaneConfig) {
    if store.store_u32(keys::COLOR, rgb_to_u32(cfg.color)).is_err() {
        warn!("failed to persist color");
    }
}

pub(crate) fn persist_geometry<P: SettingsStore>(store: &mut P, geometry: &Geometry) {
    let writes = [
        store.store_f32(keys::LINE_LENGTH, geometry.line_length.value()),
        store.store_f32(keys::ACTIVE_LENGTH, geometry.active_length.value()),
        store.store_f32(keys::TOTAL_LENGTH, geometry.total_length.value()),
        store.store_u32(keys::LINE_LEDS, geometry.line_leds),
    ];
    if writes.iter().any(Result::is_err) {
        warn!("failed to persist geometry");
    }
}
