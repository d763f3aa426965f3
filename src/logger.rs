//! A listener that reports every notification through `tracing`.
use crate::device::{Device, DeviceListener};
use crate::event::Component;
use crate::manager::{DeviceManager, ManagerListener};
use tracing::info;

/// Logs component changes and connection events at `info` level.
///
/// Register it on the manager for connection events and as a device listener
/// (see [`DeviceManager::add_device_listener`]) for component changes.
#[derive(Debug, Default)]
pub struct Logger;

impl Logger {
    pub fn new() -> Self {
        Logger
    }
}

/// Current value of a component, formatted for display.
pub fn describe_value(device: &Device, component: Component) -> String {
    match component {
        Component::Button(id) => {
            if device.is_button_pressed(id) { "pressed" } else { "released" }.to_string()
        }
        Component::Trigger(id) => device.trigger_position(id).to_string(),
        Component::Thumbstick(id) => {
            let (x, y) = device.thumbstick_position(id);
            format!("({x}, {y})")
        }
        Component::VibrationMotor(id) => device.vibration_motor_speed(id).to_string(),
        Component::Battery(id) => {
            if device.has_battery(id) {
                format!(
                    "{} {}/{}",
                    device.battery_type(id).name(),
                    device.battery_level(id),
                    Device::battery_level_max()
                )
            } else {
                "absent".to_string()
            }
        }
    }
}

impl DeviceListener for Logger {
    fn on_component_changed(&mut self, device: &Device, component: Component) {
        info!(
            slot = device.slot(),
            "{component} = {}",
            describe_value(device, component)
        );
    }
}

impl ManagerListener for Logger {
    fn on_controller_connecting(&mut self, _manager: &DeviceManager, slot: usize) {
        info!(slot, "controller connecting");
    }

    fn on_controller_connected(&mut self, _manager: &DeviceManager, device: &Device) {
        info!(
            slot = device.slot(),
            sub_type = device.sub_type_name(),
            "controller connected"
        );
    }

    fn on_controller_disconnecting(&mut self, _manager: &DeviceManager, device: &Device) {
        info!(slot = device.slot(), "controller disconnecting");
    }

    fn on_controller_disconnected(&mut self, _manager: &DeviceManager, slot: usize) {
        info!(slot, "controller disconnected");
    }
}
