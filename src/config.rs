//! Polling configuration.
//!
//! [`Config`] carries the two scheduling intervals used by the manager and the
//! devices it creates, plus the initial dead-zone radii. Every field has a
//! default, so a partial TOML document (or an empty one) is valid:
//!
//! ```
//! use padwatch::Config;
//!
//! let cfg = Config::from_toml_str(r#"
//!     enumeration_interval_ms = 500
//!
//!     [dead_zones]
//!     left_trigger = 10
//! "#).unwrap();
//!
//! assert_eq!(cfg.enumeration_interval_ms, 500);
//! assert_eq!(cfg.battery_poll_interval_ms, 10_000);
//! assert_eq!(cfg.dead_zones.left_trigger, 10);
//! assert_eq!(cfg.dead_zones.right_trigger, 30);
//! ```

use crate::error::Result;
use crate::event::{ThumbstickId, TriggerId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default interval between scans of *empty* slots.
pub const DEFAULT_ENUMERATION_INTERVAL_MS: u64 = 1_000;

/// Default interval between battery queries on a connected device.
pub const DEFAULT_BATTERY_POLL_INTERVAL_MS: u64 = 10_000;

/// XInput's recommended left thumbstick dead zone.
pub const LEFT_THUMBSTICK_DEAD_ZONE: i16 = 7849;

/// XInput's recommended right thumbstick dead zone.
pub const RIGHT_THUMBSTICK_DEAD_ZONE: i16 = 8689;

/// XInput's recommended trigger threshold.
pub const TRIGGER_DEAD_ZONE: u8 = 30;

/// Initial dead-zone radii applied to every newly connected device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadZones {
    /// Radial dead zone of the left stick (raw units, `<= 0` disables it).
    pub left_thumbstick: i16,
    /// Radial dead zone of the right stick (raw units, `<= 0` disables it).
    pub right_thumbstick: i16,
    /// Left trigger threshold (`0..=255`).
    pub left_trigger: u8,
    /// Right trigger threshold (`0..=255`).
    pub right_trigger: u8,
}

impl Default for DeadZones {
    fn default() -> Self {
        Self {
            left_thumbstick: LEFT_THUMBSTICK_DEAD_ZONE,
            right_thumbstick: RIGHT_THUMBSTICK_DEAD_ZONE,
            left_trigger: TRIGGER_DEAD_ZONE,
            right_trigger: TRIGGER_DEAD_ZONE,
        }
    }
}

impl DeadZones {
    /// Dead zone configured for a trigger.
    pub fn trigger(&self, id: TriggerId) -> u8 {
        match id {
            TriggerId::Left => self.left_trigger,
            TriggerId::Right => self.right_trigger,
        }
    }

    /// Dead zone configured for a thumbstick.
    pub fn thumbstick(&self, id: ThumbstickId) -> i16 {
        match id {
            ThumbstickId::Left => self.left_thumbstick,
            ThumbstickId::Right => self.right_thumbstick,
        }
    }
}

/// Manager and device scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How often empty slots are checked for a newly plugged-in device.
    pub enumeration_interval_ms: u64,
    /// How often each connected device re-queries its batteries.
    pub battery_poll_interval_ms: u64,
    /// Initial dead zones for new devices.
    pub dead_zones: DeadZones,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enumeration_interval_ms: DEFAULT_ENUMERATION_INTERVAL_MS,
            battery_poll_interval_ms: DEFAULT_BATTERY_POLL_INTERVAL_MS,
            dead_zones: DeadZones::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
