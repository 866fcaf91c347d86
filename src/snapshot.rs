//! Shared read-only snapshots across execution contexts.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::motion::LaneConfig;

/// A `Copy` value shared between the scheduler and the transport
/// callbacks. The scheduler publishes after every accepted change; other
/// contexts only ever read whole copies.
pub struct SnapshotCell<T: Copy> {
    inner: Mutex<RefCell<T>>,
}

impl<T: Copy> SnapshotCell<T> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    pub fn get(&self) -> T {
        critical_section::with(|cs| *self.inner.borrow(cs).borrow())
    }

    pub fn set(&self, value: T) {
        critical_section::with(|cs| {
            *self.inner.borrow(cs).borrow_mut() = value;
        });
    }
}

/// The published lane configuration, read by the config channel's
/// read handler.
pub type ConfigCell = SnapshotCell<LaneConfig>;
