//! Input backends for `padwatch`.
//!
//! An [`InputBackend`] is the opaque hardware-polling API underneath the
//! manager: a fixed table of slots, each of which can be polled, probed for
//! capabilities, vibrated, and queried for battery status. Backends decode
//! their platform structures into the typed values of
//! [`snapshot`](crate::snapshot) before handing them over.
//!
//! Every method is a binary success/failure signal as far as the core is
//! concerned; the [`BackendError`] variant is only used for logging.
//!
//! # Feature flags
//! - **`xinput`** enables the Windows XInput backend (default).
//!
//! [`virtual_input::VirtualBackend`] is always available; it is a scriptable
//! in-memory backend for tests, demos and headless hosts.

use crate::error::BackendError;
use crate::event::BatteryId;
use crate::snapshot::{BatteryReport, Capabilities, Snapshot, Vibration};

pub mod virtual_input;

#[cfg(all(feature = "xinput", target_os = "windows"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "xinput", target_os = "windows"))))]
pub mod windows;

/// Slot-indexed controller API.
///
/// Methods take `&self`: devices and the manager share one backend handle.
/// Implementations that keep state use interior mutability.
pub trait InputBackend {
    /// Number of slots; fixed for the backend's lifetime.
    fn max_devices(&self) -> usize;

    /// Describe the device in `slot`.
    fn query_capabilities(&self, slot: usize) -> Result<Capabilities, BackendError>;

    /// Sample the device in `slot`. `Err` means the slot is empty.
    fn poll_state(&self, slot: usize) -> Result<Snapshot, BackendError>;

    /// Set both vibration motors at once.
    fn set_vibration(&self, slot: usize, vibration: Vibration) -> Result<(), BackendError>;

    /// Query one of the device's batteries.
    fn query_battery(&self, slot: usize, battery: BatteryId) -> Result<BatteryReport, BackendError>;
}
