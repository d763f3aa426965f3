#![cfg(target_os = "windows")]

//! Windows input backends.
//!
//! - **XInput** controller slots (`0..XUSER_MAX_COUNT`) via `XInputGetState`,
//!   `XInputGetCapabilities`, `XInputSetState` and `XInputGetBatteryInformation`.
//!
//! Most users should not interact with this module directly. Prefer
//! [`DeviceManager::xinput`](crate::manager::DeviceManager::xinput).

pub mod xinput;

pub use xinput::XInputBackend;
