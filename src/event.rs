//! Component identifiers and change events.
//!
//! A controller is described as a fixed set of components: 14 buttons, 2
//! triggers, 2 thumbsticks, 2 vibration motors and 2 batteries. Each kind has
//! its own id enum so an out-of-range id cannot be expressed; the `ALL`
//! constants list them in notification order.
//!
//! When a component's observable value changes, listeners receive a
//! [`Component`] naming what changed. The new value is read back from the
//! [`Device`](crate::device::Device).
//!
//! ## Value conventions
//! - **Buttons:** `true` while pressed.
//! - **Triggers:** `0..=255` after the trigger dead zone.
//! - **Thumbsticks:** signed 16-bit X/Y after the radial dead zone.
//! - **Vibration motors:** `0..=65535` speed.
//! - **Batteries:** `0..=battery_level_max()` level plus a [`BatteryType`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hardware category reported by the backend at connect time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubType {
    #[default]
    Gamepad,
    Wheel,
    ArcadeStick,
    FlightStick,
    DancePad,
    Guitar,
    GuitarAlternate,
    DrumKit,
    GuitarBass,
    ArcadePad,
}

impl SubType {
    pub const ALL: [SubType; 10] = [
        SubType::Gamepad,
        SubType::Wheel,
        SubType::ArcadeStick,
        SubType::FlightStick,
        SubType::DancePad,
        SubType::Guitar,
        SubType::GuitarAlternate,
        SubType::DrumKit,
        SubType::GuitarBass,
        SubType::ArcadePad,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SubType::Gamepad => "XBox 360 Gamepad",
            SubType::Wheel => "XBox 360 Wheel",
            SubType::ArcadeStick => "XBox 360 Arcade Stick",
            SubType::FlightStick => "XBox 360 Flight Stick",
            SubType::DancePad => "XBox 360 Dance Pad",
            SubType::Guitar => "XBox 360 Guitar",
            SubType::GuitarAlternate => "XBox 360 Guitar Alternate",
            SubType::DrumKit => "XBox 360 Drum Kit",
            SubType::GuitarBass => "XBox 360 Guitar Bass",
            SubType::ArcadePad => "XBox 360 Arcade Pad",
        }
    }
}

/// Category of a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Button,
    Trigger,
    Thumbstick,
    VibrationMotor,
    Battery,
}

impl ComponentKind {
    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Button => "Button",
            ComponentKind::Trigger => "Trigger",
            ComponentKind::Thumbstick => "Thumbstick",
            ComponentKind::VibrationMotor => "Vibration Motor",
            ComponentKind::Battery => "Battery",
        }
    }
}

/// Digital buttons, in the order they are diffed on each packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ButtonId {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Start,
    Back,
    LeftThumbstick,
    RightThumbstick,
    LeftShoulder,
    RightShoulder,
    A,
    B,
    X,
    Y,
}

impl ButtonId {
    pub const COUNT: usize = 14;

    pub const ALL: [ButtonId; Self::COUNT] = [
        ButtonId::DPadUp,
        ButtonId::DPadDown,
        ButtonId::DPadLeft,
        ButtonId::DPadRight,
        ButtonId::Start,
        ButtonId::Back,
        ButtonId::LeftThumbstick,
        ButtonId::RightThumbstick,
        ButtonId::LeftShoulder,
        ButtonId::RightShoulder,
        ButtonId::A,
        ButtonId::B,
        ButtonId::X,
        ButtonId::Y,
    ];

    /// Bit of this button in the XInput `wButtons` word.
    pub const fn mask(self) -> u16 {
        match self {
            ButtonId::DPadUp => 0x0001,
            ButtonId::DPadDown => 0x0002,
            ButtonId::DPadLeft => 0x0004,
            ButtonId::DPadRight => 0x0008,
            ButtonId::Start => 0x0010,
            ButtonId::Back => 0x0020,
            ButtonId::LeftThumbstick => 0x0040,
            ButtonId::RightThumbstick => 0x0080,
            ButtonId::LeftShoulder => 0x0100,
            ButtonId::RightShoulder => 0x0200,
            ButtonId::A => 0x1000,
            ButtonId::B => 0x2000,
            ButtonId::X => 0x4000,
            ButtonId::Y => 0x8000,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ButtonId::DPadUp => "DPad Up",
            ButtonId::DPadDown => "DPad Down",
            ButtonId::DPadLeft => "DPad Left",
            ButtonId::DPadRight => "DPad Right",
            ButtonId::Start => "Start",
            ButtonId::Back => "Back",
            ButtonId::LeftThumbstick => "Left Thumbstick",
            ButtonId::RightThumbstick => "Right Thumbstick",
            ButtonId::LeftShoulder => "Left Shoulder",
            ButtonId::RightShoulder => "Right Shoulder",
            ButtonId::A => "A",
            ButtonId::B => "B",
            ButtonId::X => "X",
            ButtonId::Y => "Y",
        }
    }

    /// Position in [`ButtonId::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerId {
    Left,
    Right,
}

impl TriggerId {
    pub const ALL: [TriggerId; 2] = [TriggerId::Left, TriggerId::Right];

    pub fn name(self) -> &'static str {
        match self {
            TriggerId::Left => "Left Trigger",
            TriggerId::Right => "Right Trigger",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThumbstickId {
    Left,
    Right,
}

impl ThumbstickId {
    pub const ALL: [ThumbstickId; 2] = [ThumbstickId::Left, ThumbstickId::Right];

    pub fn name(self) -> &'static str {
        match self {
            ThumbstickId::Left => "Left Thumbstick",
            ThumbstickId::Right => "Right Thumbstick",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Vibration motors. The left one is the low-frequency rumble motor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotorId {
    Left,
    Right,
}

impl MotorId {
    pub const ALL: [MotorId; 2] = [MotorId::Left, MotorId::Right];

    pub fn name(self) -> &'static str {
        match self {
            MotorId::Left => "Left Motor",
            MotorId::Right => "Right Motor",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Batteries a device may report: its own, and that of an attached headset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatteryId {
    Controller,
    Headset,
}

impl BatteryId {
    pub const ALL: [BatteryId; 2] = [BatteryId::Controller, BatteryId::Headset];

    pub fn name(self) -> &'static str {
        match self {
            BatteryId::Controller => "Controller",
            BatteryId::Headset => "Headset",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Chemistry of a present battery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatteryType {
    #[default]
    Unknown,
    Alkaline,
    NiMH,
}

impl BatteryType {
    pub fn name(self) -> &'static str {
        match self {
            BatteryType::Unknown => "Unknown",
            BatteryType::Alkaline => "Alkaline",
            BatteryType::NiMH => "NiMH",
        }
    }
}

/// The component whose value just changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    Button(ButtonId),
    Trigger(TriggerId),
    Thumbstick(ThumbstickId),
    VibrationMotor(MotorId),
    Battery(BatteryId),
}

impl Component {
    pub fn kind(self) -> ComponentKind {
        match self {
            Component::Button(_) => ComponentKind::Button,
            Component::Trigger(_) => ComponentKind::Trigger,
            Component::Thumbstick(_) => ComponentKind::Thumbstick,
            Component::VibrationMotor(_) => ComponentKind::VibrationMotor,
            Component::Battery(_) => ComponentKind::Battery,
        }
    }

    /// Index of the component within its kind.
    pub fn index(self) -> usize {
        match self {
            Component::Button(id) => id.index(),
            Component::Trigger(id) => id.index(),
            Component::Thumbstick(id) => id.index(),
            Component::VibrationMotor(id) => id.index(),
            Component::Battery(id) => id.index(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Component::Button(id) => id.name(),
            Component::Trigger(id) => id.name(),
            Component::Thumbstick(id) => id.name(),
            Component::VibrationMotor(id) => id.name(),
            Component::Battery(id) => id.name(),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind().name(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_masks_are_distinct_bits() {
        let mut seen = 0u16;
        for b in ButtonId::ALL {
            assert_eq!(b.mask().count_ones(), 1, "{b:?}");
            assert_eq!(seen & b.mask(), 0, "{b:?} overlaps");
            seen |= b.mask();
        }
    }

    #[test]
    fn indices_follow_all_order() {
        for (i, b) in ButtonId::ALL.iter().enumerate() {
            assert_eq!(b.index(), i);
        }
        assert_eq!(TriggerId::Right.index(), 1);
        assert_eq!(BatteryId::Headset.index(), 1);
    }

    #[test]
    fn component_display() {
        let c = Component::VibrationMotor(MotorId::Left);
        assert_eq!(c.kind(), ComponentKind::VibrationMotor);
        assert_eq!(c.to_string(), "Vibration Motor 'Left Motor'");
        assert_eq!(Component::Button(ButtonId::A).index(), 10);
    }

    #[test]
    fn sub_type_names() {
        assert_eq!(SubType::default().name(), "XBox 360 Gamepad");
        assert_eq!(SubType::ALL.len(), 10);
        assert_eq!(SubType::ArcadePad.name(), "XBox 360 Arcade Pad");
    }
}
