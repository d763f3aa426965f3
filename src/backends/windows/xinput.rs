#![cfg(target_os = "windows")]

//! Windows XInput backend.
//!
//! Exposes the XInput user slots as an [`InputBackend`]. Every call goes
//! straight to the XInput runtime; the backend itself holds no state.
//!
//! # Decoding
//! Platform structures are converted into padwatch types right here:
//! - `XINPUT_STATE` becomes a [`Snapshot`] (`dwPacketNumber` is the packet counter).
//! - `XINPUT_CAPABILITIES` becomes [`Capabilities`]; its `Gamepad` and
//!   `Vibration` fields carry the supported-button mask and component extrema.
//! - `XINPUT_BATTERY_INFORMATION` becomes a [`BatteryReport`].
//!
//! # Performance note
//! Microsoft recommends not calling `XInputGetState` on *empty* slots every
//! frame; the manager's enumeration interval takes care of that.

use crate::backends::InputBackend;
use crate::error::BackendError;
use crate::event::{BatteryId, SubType};
use crate::snapshot::{
    BatteryReport, Buttons, Capabilities, RawBatteryType, Snapshot, StickPosition, Vibration,
};

use windows_sys::Win32::Foundation::{ERROR_DEVICE_NOT_CONNECTED, ERROR_SUCCESS};
use windows_sys::Win32::UI::Input::XboxController::*;

/// XInput device sub-types, as reported in `XINPUT_CAPABILITIES::SubType`.
const SUB_TYPES: [(u8, SubType); 10] = [
    (XINPUT_DEVSUBTYPE_GAMEPAD as u8, SubType::Gamepad),
    (XINPUT_DEVSUBTYPE_WHEEL as u8, SubType::Wheel),
    (XINPUT_DEVSUBTYPE_ARCADE_STICK as u8, SubType::ArcadeStick),
    (XINPUT_DEVSUBTYPE_FLIGHT_STICK as u8, SubType::FlightStick),
    (XINPUT_DEVSUBTYPE_DANCE_PAD as u8, SubType::DancePad),
    (XINPUT_DEVSUBTYPE_GUITAR as u8, SubType::Guitar),
    (XINPUT_DEVSUBTYPE_GUITAR_ALTERNATE as u8, SubType::GuitarAlternate),
    (XINPUT_DEVSUBTYPE_DRUM_KIT as u8, SubType::DrumKit),
    (XINPUT_DEVSUBTYPE_GUITAR_BASS as u8, SubType::GuitarBass),
    (XINPUT_DEVSUBTYPE_ARCADE_PAD as u8, SubType::ArcadePad),
];

/// XInput-backed slot table.
#[derive(Debug, Clone, Copy, Default)]
pub struct XInputBackend;

impl XInputBackend {
    pub fn new() -> Self {
        Self
    }
}

#[inline]
fn check(status: u32) -> Result<(), BackendError> {
    if status == ERROR_SUCCESS {
        Ok(())
    } else if status == ERROR_DEVICE_NOT_CONNECTED {
        Err(BackendError::NotConnected)
    } else {
        Err(BackendError::Os(status))
    }
}

#[inline]
fn user_index(slot: usize) -> Result<u32, BackendError> {
    u32::try_from(slot)
        .ok()
        .filter(|i| *i < XUSER_MAX_COUNT as u32)
        .ok_or(BackendError::NotConnected)
}

/// Unknown sub-types fall back to a plain gamepad.
fn decode_sub_type(raw: u8) -> SubType {
    SUB_TYPES
        .iter()
        .find(|(code, _)| *code == raw)
        .map(|(_, sub_type)| *sub_type)
        .unwrap_or_default()
}

fn decode_gamepad(gp: &XINPUT_GAMEPAD) -> (Buttons, u8, u8, StickPosition, StickPosition) {
    (
        Buttons(gp.wButtons as u16),
        gp.bLeftTrigger,
        gp.bRightTrigger,
        StickPosition::new(gp.sThumbLX, gp.sThumbLY),
        StickPosition::new(gp.sThumbRX, gp.sThumbRY),
    )
}

fn decode_state(state: &XINPUT_STATE) -> Snapshot {
    let (buttons, left_trigger, right_trigger, left_thumbstick, right_thumbstick) =
        decode_gamepad(&state.Gamepad);
    Snapshot {
        packet: state.dwPacketNumber,
        buttons,
        left_trigger,
        right_trigger,
        left_thumbstick,
        right_thumbstick,
    }
}

fn decode_capabilities(caps: &XINPUT_CAPABILITIES) -> Capabilities {
    let (buttons, left_trigger, right_trigger, left_thumbstick, right_thumbstick) =
        decode_gamepad(&caps.Gamepad);
    Capabilities {
        sub_type: decode_sub_type(caps.SubType as u8),
        voice_support: (caps.Flags as u16) & (XINPUT_CAPS_VOICE_SUPPORTED as u16) != 0,
        buttons,
        left_trigger,
        right_trigger,
        left_thumbstick,
        right_thumbstick,
        left_motor: caps.Vibration.wLeftMotorSpeed,
        right_motor: caps.Vibration.wRightMotorSpeed,
    }
}

fn decode_battery(info: &XINPUT_BATTERY_INFORMATION) -> BatteryReport {
    let raw = info.BatteryType as u8;
    let kind = if raw == BATTERY_TYPE_WIRED as u8 {
        RawBatteryType::Wired
    } else if raw == BATTERY_TYPE_ALKALINE as u8 {
        RawBatteryType::Alkaline
    } else if raw == BATTERY_TYPE_NIMH as u8 {
        RawBatteryType::NiMH
    } else if raw == BATTERY_TYPE_UNKNOWN as u8 {
        RawBatteryType::Unknown
    } else {
        RawBatteryType::Disconnected
    };
    BatteryReport::new(kind, info.BatteryLevel as u8)
}

impl InputBackend for XInputBackend {
    fn max_devices(&self) -> usize {
        XUSER_MAX_COUNT as usize
    }

    fn query_capabilities(&self, slot: usize) -> Result<Capabilities, BackendError> {
        let index = user_index(slot)?;
        // FFI struct: must be manually zeroed
        let mut caps: XINPUT_CAPABILITIES = unsafe { std::mem::zeroed() };
        check(unsafe { XInputGetCapabilities(index, XINPUT_FLAG_GAMEPAD, &mut caps) })?;
        Ok(decode_capabilities(&caps))
    }

    fn poll_state(&self, slot: usize) -> Result<Snapshot, BackendError> {
        let index = user_index(slot)?;
        let mut state: XINPUT_STATE = unsafe { std::mem::zeroed() };
        check(unsafe { XInputGetState(index, &mut state) })?;
        Ok(decode_state(&state))
    }

    fn set_vibration(&self, slot: usize, vibration: Vibration) -> Result<(), BackendError> {
        let index = user_index(slot)?;
        let mut cmd: XINPUT_VIBRATION = unsafe { std::mem::zeroed() };
        cmd.wLeftMotorSpeed = vibration.left;
        cmd.wRightMotorSpeed = vibration.right;
        check(unsafe { XInputSetState(index, &cmd) })
    }

    fn query_battery(&self, slot: usize, battery: BatteryId) -> Result<BatteryReport, BackendError> {
        let index = user_index(slot)?;
        let dev_type = match battery {
            BatteryId::Controller => BATTERY_DEVTYPE_GAMEPAD,
            BatteryId::Headset => BATTERY_DEVTYPE_HEADSET,
        };
        let mut info: XINPUT_BATTERY_INFORMATION = unsafe { std::mem::zeroed() };
        check(unsafe { XInputGetBatteryInformation(index, dev_type, &mut info) })?;
        Ok(decode_battery(&info))
    }
}
