//! Device capability summary.
//!
//! [`DeviceMeta`] is a lightweight, cloneable description of a connected
//! [`Device`] suitable for UI display, logging, and persistence. It lists the
//! components the device reported at connect time, by name.
//!
//! # Example
//! ```no_run
//! # use padwatch::DeviceManager;
//! # fn show(mgr: &DeviceManager) {
//! for device in mgr.devices() {
//!     let meta = device.metadata();
//!     println!("slot {}: {} buttons={:?}", meta.slot, meta.sub_type, meta.buttons);
//! }
//! # }
//! ```

use crate::device::Device;
use crate::event::{BatteryId, ButtonId, MotorId, ThumbstickId, TriggerId};
use serde::{Deserialize, Serialize};

/// Snapshot of what a device can do.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// Backend slot index.
    pub slot: usize,

    /// Human-readable sub-type, e.g. `"XBox 360 Wheel"`.
    pub sub_type: String,

    pub voice_support: bool,

    /// Names of the available buttons.
    pub buttons: Vec<String>,

    pub triggers: Vec<String>,

    pub thumbsticks: Vec<String>,

    pub vibration_motors: Vec<String>,

    /// Batteries present *at the time of the call*; this can change.
    pub batteries: Vec<String>,
}

fn names<T: Copy>(ids: &[T], has: impl Fn(T) -> bool, name: impl Fn(T) -> &'static str) -> Vec<String> {
    ids.iter()
        .copied()
        .filter(|id| has(*id))
        .map(|id| name(id).to_string())
        .collect()
}

impl DeviceMeta {
    pub fn from_device(device: &Device) -> Self {
        Self {
            slot: device.slot(),
            sub_type: device.sub_type_name().to_string(),
            voice_support: device.has_voice_support(),
            buttons: names(&ButtonId::ALL, |b| device.has_button(b), ButtonId::name),
            triggers: names(&TriggerId::ALL, |t| device.has_trigger(t), TriggerId::name),
            thumbsticks: names(&ThumbstickId::ALL, |t| device.has_thumbstick(t), ThumbstickId::name),
            vibration_motors: names(&MotorId::ALL, |m| device.has_vibration_motor(m), MotorId::name),
            batteries: names(&BatteryId::ALL, |b| device.has_battery(b), BatteryId::name),
        }
    }
}
