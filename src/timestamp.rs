//! Process-relative millisecond timestamps.
//!
//! All scheduling (slot enumeration, battery polling) runs off a single
//! monotonic epoch captured the first time any timestamp is requested, or
//! earlier if the host calls [`init`] explicitly at startup.
//!
//! Components never read the clock directly; they go through a [`Clock`] so
//! tests can drive time by hand with [`ManualClock`].

use std::cell::Cell;
use std::sync::OnceLock;
use std::time::Instant;

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Capture the process epoch now. Later calls are no-ops.
pub fn init() {
    EPOCH.get_or_init(Instant::now);
}

/// Milliseconds elapsed since the process epoch.
pub fn now_ms() -> u64 {
    let epoch = *EPOCH.get_or_init(Instant::now);
    u64::try_from(epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Source of millisecond timestamps.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// The process-wide monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        now_ms()
    }
}

/// Hand-driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move time forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
