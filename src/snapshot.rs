//! Typed values exchanged with an input backend.
//!
//! Backends decode their platform structures into these types once, at the
//! boundary, so nothing below [`DeviceManager`](crate::manager::DeviceManager)
//! ever sees raw bytes.
//!
//! - [`Snapshot`]: one polled sample of a slot (packet counter + raw inputs).
//! - [`Capabilities`]: what a device reported about itself at connect time.
//! - [`BatteryReport`]: one battery query result.
//!
//! Values here are *raw*: dead zones are applied later by the
//! [`Device`](crate::device::Device).

use crate::event::{ButtonId, MotorId, SubType, ThumbstickId, TriggerId};
use serde::{Deserialize, Serialize};

/// Set of digital buttons, laid out like the XInput `wButtons` word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Buttons(pub u16);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);

    /// Every button defined by [`ButtonId`].
    pub fn all() -> Self {
        ButtonId::ALL.iter().copied().collect()
    }

    #[inline]
    pub fn contains(self, id: ButtonId) -> bool {
        self.0 & id.mask() != 0
    }

    #[inline]
    pub fn with(self, id: ButtonId) -> Self {
        Buttons(self.0 | id.mask())
    }

    /// Pressed/available buttons in [`ButtonId::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = ButtonId> {
        ButtonId::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl FromIterator<ButtonId> for Buttons {
    fn from_iter<I: IntoIterator<Item = ButtonId>>(iter: I) -> Self {
        iter.into_iter().fold(Buttons::NONE, Buttons::with)
    }
}

/// Raw X/Y position of a thumbstick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StickPosition {
    pub x: i16,
    pub y: i16,
}

impl StickPosition {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// One polled sample of a connected slot.
///
/// `packet` advances whenever the hardware state changes; equal packet numbers
/// mean identical input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub packet: u32,
    pub buttons: Buttons,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub left_thumbstick: StickPosition,
    pub right_thumbstick: StickPosition,
}

impl Snapshot {
    pub fn trigger(&self, id: TriggerId) -> u8 {
        match id {
            TriggerId::Left => self.left_trigger,
            TriggerId::Right => self.right_trigger,
        }
    }

    pub fn thumbstick(&self, id: ThumbstickId) -> StickPosition {
        match id {
            ThumbstickId::Left => self.left_thumbstick,
            ThumbstickId::Right => self.right_thumbstick,
        }
    }
}

/// Self-description of a device, queried once when it connects.
///
/// Mirrors the XInput capability report: the button word is a mask of
/// supported buttons, and the trigger/stick/motor fields carry the device's
/// reported extrema (non-zero when the component exists).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub sub_type: SubType,
    pub voice_support: bool,
    pub buttons: Buttons,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub left_thumbstick: StickPosition,
    pub right_thumbstick: StickPosition,
    pub left_motor: u16,
    pub right_motor: u16,
}

impl Capabilities {
    /// A fully featured gamepad: every button, both triggers, sticks and motors.
    pub fn full_gamepad() -> Self {
        Self {
            sub_type: SubType::Gamepad,
            voice_support: false,
            buttons: Buttons::all(),
            left_trigger: u8::MAX,
            right_trigger: u8::MAX,
            left_thumbstick: StickPosition::new(i16::MAX, i16::MAX),
            right_thumbstick: StickPosition::new(i16::MAX, i16::MAX),
            left_motor: u16::MAX,
            right_motor: u16::MAX,
        }
    }

    // Presence of analog components is inferred from a non-zero reported value.
    // A component that happens to report exactly zero is classified as absent;
    // this is a known false-negative and is kept as-is.

    pub fn has_trigger(&self, id: TriggerId) -> bool {
        match id {
            TriggerId::Left => self.left_trigger != 0,
            TriggerId::Right => self.right_trigger != 0,
        }
    }

    /// Both axes must be non-zero.
    pub fn has_thumbstick(&self, id: ThumbstickId) -> bool {
        let pos = match id {
            ThumbstickId::Left => self.left_thumbstick,
            ThumbstickId::Right => self.right_thumbstick,
        };
        pos.x != 0 && pos.y != 0
    }

    pub fn has_motor(&self, id: MotorId) -> bool {
        match id {
            MotorId::Left => self.left_motor != 0,
            MotorId::Right => self.right_motor != 0,
        }
    }
}

/// Battery type as reported by the backend, before interpretation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawBatteryType {
    /// The device (or headset) is not connected.
    #[default]
    Disconnected,
    /// Powered by cable: no battery to report.
    Wired,
    Alkaline,
    NiMH,
    Unknown,
}

/// Result of a battery query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryReport {
    pub kind: RawBatteryType,
    /// Raw level; may exceed the documented maximum on misbehaving backends.
    pub level: u8,
}

impl BatteryReport {
    pub const fn new(kind: RawBatteryType, level: u8) -> Self {
        Self { kind, level }
    }
}

/// Outgoing two-motor vibration command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vibration {
    pub left: u16,
    pub right: u16,
}
