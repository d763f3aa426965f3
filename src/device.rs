//! A single connected controller.
//!
//! A [`Device`] turns the raw [`Snapshot`]s of one slot into stable,
//! dead-zone corrected state and tells its listeners about every observable
//! change, once per change.
//!
//! Devices are created and destroyed by the
//! [`DeviceManager`](crate::manager::DeviceManager); hosts borrow them from
//! the manager to read state, tune dead zones, drive the vibration motors or
//! register a [`DeviceListener`].
//!
//! # Capabilities
//! Which buttons, triggers, thumbsticks and motors exist is probed once at
//! construction and never changes afterwards. Batteries are the exception:
//! they are re-queried periodically and may come and go (e.g. a headset).
//!
//! # Change detection
//! - Inputs are re-derived only when the snapshot's packet counter moves.
//! - Each setter compares the *corrected* value with the stored one and
//!   notifies only on a real transition.
//! - Batteries are polled on their own schedule, independent of packets.

use crate::backends::InputBackend;
use crate::config::Config;
use crate::deadzone::{apply_thumbstick_dead_zone, apply_trigger_dead_zone};
use crate::event::{
    BatteryId, BatteryType, ButtonId, Component, MotorId, SubType, ThumbstickId, TriggerId,
};
use crate::eventbus::ListenerSet;
use crate::metadata::DeviceMeta;
use crate::snapshot::{BatteryReport, Capabilities, RawBatteryType, Snapshot, Vibration};
use crate::timestamp::Clock;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// Highest battery level a device reports ("full").
pub const BATTERY_LEVEL_MAX: u8 = 3;

/// Observer of a [`Device`]'s component changes.
///
/// Called synchronously from inside [`DeviceManager::update`](crate::manager::DeviceManager::update)
/// (or a direct setter call), after the new value has been stored.
pub trait DeviceListener {
    fn on_component_changed(&mut self, _device: &Device, _component: Component) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BatteryState {
    present: bool,
    kind: BatteryType,
    level: u8,
}

/// Map a raw battery report to `(present, type, level)`.
///
/// Disconnected and wired devices have no battery; levels are clamped.
fn interpret_battery(report: Option<BatteryReport>) -> BatteryState {
    let Some(report) = report else {
        return BatteryState::default();
    };
    let kind = match report.kind {
        RawBatteryType::Disconnected | RawBatteryType::Wired => return BatteryState::default(),
        RawBatteryType::Alkaline => BatteryType::Alkaline,
        RawBatteryType::NiMH => BatteryType::NiMH,
        RawBatteryType::Unknown => BatteryType::Unknown,
    };
    BatteryState {
        present: true,
        kind,
        level: report.level.min(BATTERY_LEVEL_MAX),
    }
}

/// One connected controller, identified by its slot.
pub struct Device {
    slot: usize,
    backend: Rc<dyn InputBackend>,
    clock: Rc<dyn Clock>,

    // Capabilities, fixed at construction.
    capabilities: Capabilities,
    has_button: [bool; ButtonId::COUNT],
    has_trigger: [bool; 2],
    has_thumbstick: [bool; 2],
    has_motor: [bool; 2],

    // State
    last_packet: Option<u32>,
    pressed: [bool; ButtonId::COUNT],
    trigger_position: [u8; 2],
    trigger_dead_zone: [u8; 2],
    thumbstick_position: [(i16, i16); 2],
    thumbstick_dead_zone: [i16; 2],
    motor_speed: [u16; 2],
    batteries: [BatteryState; 2],
    battery_poll_interval_ms: u64,
    next_battery_poll_ms: u64,

    listeners: ListenerSet<dyn DeviceListener>,
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("slot", &self.slot)
            .field("sub_type", &self.capabilities.sub_type)
            .field("last_packet", &self.last_packet)
            .field("pressed", &self.pressed)
            .field("trigger_position", &self.trigger_position)
            .field("thumbstick_position", &self.thumbstick_position)
            .field("motor_speed", &self.motor_speed)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl Device {
    /// Create the device for a newly connected slot.
    ///
    /// Probes capabilities, installs the configured dead zones, applies
    /// `initial` (and a first battery query), then stops both motors.
    /// `listeners` are attached before any of that, so they observe the
    /// construction-time changes.
    pub(crate) fn new(
        slot: usize,
        backend: Rc<dyn InputBackend>,
        clock: Rc<dyn Clock>,
        config: &Config,
        initial: &Snapshot,
        listeners: ListenerSet<dyn DeviceListener>,
    ) -> Self {
        let capabilities = match backend.query_capabilities(slot) {
            Ok(caps) => caps,
            Err(err) => {
                debug!(slot, %err, "capability probe failed; treating device as featureless");
                Capabilities::default()
            }
        };
        let now = clock.now_ms();
        let dead_zones = config.dead_zones;

        let mut device = Self {
            slot,
            backend,
            clock,
            capabilities,
            has_button: ButtonId::ALL.map(|b| capabilities.buttons.contains(b)),
            has_trigger: TriggerId::ALL.map(|t| capabilities.has_trigger(t)),
            has_thumbstick: ThumbstickId::ALL.map(|t| capabilities.has_thumbstick(t)),
            has_motor: MotorId::ALL.map(|m| capabilities.has_motor(m)),
            last_packet: None,
            pressed: [false; ButtonId::COUNT],
            trigger_position: [0; 2],
            trigger_dead_zone: TriggerId::ALL.map(|t| dead_zones.trigger(t)),
            thumbstick_position: [(0, 0); 2],
            thumbstick_dead_zone: ThumbstickId::ALL.map(|t| dead_zones.thumbstick(t)),
            motor_speed: [0; 2],
            batteries: [BatteryState::default(); 2],
            battery_poll_interval_ms: config.battery_poll_interval_ms,
            next_battery_poll_ms: now,
            listeners,
        };

        device.update(Some(initial));

        // Pre-seed a non-zero speed so the stop command really reaches the hardware.
        for motor in MotorId::ALL {
            if device.has_vibration_motor(motor) {
                device.motor_speed[motor.index()] = 1;
                device.set_vibration_motor_speed(motor, 0);
            }
        }

        debug!(
            slot,
            sub_type = device.sub_type_name(),
            "device initialised"
        );
        device
    }

    /// Feed one polled sample. `None` is ignored.
    pub(crate) fn update(&mut self, snapshot: Option<&Snapshot>) {
        let Some(snapshot) = snapshot else {
            return;
        };

        if self.last_packet != Some(snapshot.packet) {
            self.last_packet = Some(snapshot.packet);

            for button in ButtonId::ALL {
                self.set_button_pressed(button, snapshot.buttons.contains(button));
            }
            for trigger in TriggerId::ALL {
                self.set_trigger_position(trigger, snapshot.trigger(trigger));
            }
            for stick in ThumbstickId::ALL {
                let pos = snapshot.thumbstick(stick);
                self.set_thumbstick_position(stick, pos.x, pos.y);
            }
        }

        let now = self.clock.now_ms();
        if now >= self.next_battery_poll_ms {
            self.next_battery_poll_ms = now.saturating_add(self.battery_poll_interval_ms);
            for battery in BatteryId::ALL {
                let report = self.backend.query_battery(self.slot, battery).ok();
                self.set_battery_state(battery, interpret_battery(report));
            }
        }
    }

    fn notify(&self, component: Component) {
        self.listeners
            .notify(|l| l.on_component_changed(self, component));
    }

    pub(crate) fn set_button_pressed(&mut self, id: ButtonId, pressed: bool) {
        if !self.has_button(id) || self.is_button_pressed(id) == pressed {
            return;
        }
        self.pressed[id.index()] = pressed;
        self.notify(Component::Button(id));
    }

    pub(crate) fn set_trigger_position(&mut self, id: TriggerId, raw: u8) {
        if !self.has_trigger(id) {
            return;
        }
        let position = apply_trigger_dead_zone(raw, self.trigger_dead_zone(id));
        if self.trigger_position(id) == position {
            return;
        }
        self.trigger_position[id.index()] = position;
        self.notify(Component::Trigger(id));
    }

    pub(crate) fn set_thumbstick_position(&mut self, id: ThumbstickId, raw_x: i16, raw_y: i16) {
        if !self.has_thumbstick(id) {
            return;
        }
        let position = apply_thumbstick_dead_zone(raw_x, raw_y, self.thumbstick_dead_zone(id));
        if self.thumbstick_position(id) == position {
            return;
        }
        self.thumbstick_position[id.index()] = position;
        self.notify(Component::Thumbstick(id));
    }

    fn set_battery_state(&mut self, id: BatteryId, state: BatteryState) {
        let Some(slot) = self.batteries.get_mut(id.index()) else {
            return;
        };
        if *slot == state {
            return;
        }
        *slot = state;
        self.notify(Component::Battery(id));
    }

    /// Set one motor's speed.
    ///
    /// Both motors are commanded together; the other motor keeps its last
    /// speed. If the backend rejects the command nothing changes and no
    /// notification fires.
    pub fn set_vibration_motor_speed(&mut self, id: MotorId, speed: u16) {
        if !self.has_vibration_motor(id) || self.vibration_motor_speed(id) == speed {
            return;
        }

        let command = match id {
            MotorId::Left => Vibration {
                left: speed,
                right: self.vibration_motor_speed(MotorId::Right),
            },
            MotorId::Right => Vibration {
                left: self.vibration_motor_speed(MotorId::Left),
                right: speed,
            },
        };

        if let Err(err) = self.backend.set_vibration(self.slot, command) {
            trace!(slot = self.slot, motor = id.name(), %err, "vibration command rejected");
            return;
        }

        self.motor_speed[id.index()] = speed;
        self.notify(Component::VibrationMotor(id));
    }

    /// Change a trigger's dead zone. Takes effect on the next changed packet.
    pub fn set_trigger_dead_zone(&mut self, id: TriggerId, radius: u8) {
        self.trigger_dead_zone[id.index()] = radius;
    }

    /// Change a thumbstick's radial dead zone (`<= 0` disables it).
    /// Takes effect on the next changed packet.
    pub fn set_thumbstick_dead_zone(&mut self, id: ThumbstickId, radius: i16) {
        self.thumbstick_dead_zone[id.index()] = radius;
    }

    // ---- identity & capabilities ----

    /// Backend slot this device lives in.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn sub_type(&self) -> SubType {
        self.capabilities.sub_type
    }

    pub fn sub_type_name(&self) -> &'static str {
        self.capabilities.sub_type.name()
    }

    pub fn has_voice_support(&self) -> bool {
        self.capabilities.voice_support
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn has_button(&self, id: ButtonId) -> bool {
        self.has_button[id.index()]
    }

    pub fn has_trigger(&self, id: TriggerId) -> bool {
        self.has_trigger[id.index()]
    }

    pub fn has_thumbstick(&self, id: ThumbstickId) -> bool {
        self.has_thumbstick[id.index()]
    }

    pub fn has_vibration_motor(&self, id: MotorId) -> bool {
        self.has_motor[id.index()]
    }

    /// Whether the battery is currently reported present. Can change over time.
    pub fn has_battery(&self, id: BatteryId) -> bool {
        self.batteries[id.index()].present
    }

    // ---- state ----

    pub fn is_button_pressed(&self, id: ButtonId) -> bool {
        self.pressed[id.index()]
    }

    /// Corrected trigger position, `0..=255`.
    pub fn trigger_position(&self, id: TriggerId) -> u8 {
        self.trigger_position[id.index()]
    }

    pub fn trigger_dead_zone(&self, id: TriggerId) -> u8 {
        self.trigger_dead_zone[id.index()]
    }

    /// Corrected `(x, y)` stick position.
    pub fn thumbstick_position(&self, id: ThumbstickId) -> (i16, i16) {
        self.thumbstick_position[id.index()]
    }

    pub fn thumbstick_dead_zone(&self, id: ThumbstickId) -> i16 {
        self.thumbstick_dead_zone[id.index()]
    }

    pub fn vibration_motor_speed(&self, id: MotorId) -> u16 {
        self.motor_speed[id.index()]
    }

    pub fn battery_type(&self, id: BatteryId) -> BatteryType {
        self.batteries[id.index()].kind
    }

    /// Battery level in `0..=battery_level_max()`.
    pub fn battery_level(&self, id: BatteryId) -> u8 {
        self.batteries[id.index()].level
    }

    pub const fn battery_level_max() -> u8 {
        BATTERY_LEVEL_MAX
    }

    /// Packet number of the last applied snapshot.
    pub fn last_packet(&self) -> Option<u32> {
        self.last_packet
    }

    /// Capability summary for display or logging.
    pub fn metadata(&self) -> DeviceMeta {
        DeviceMeta::from_device(self)
    }

    // ---- listeners ----

    /// Register a listener. The device keeps only a weak handle.
    ///
    /// Takes `&self`, so listeners can register or deregister from inside
    /// [`DeviceListener::on_component_changed`].
    pub fn add_listener<L: DeviceListener + 'static>(&self, listener: &Rc<RefCell<L>>) {
        let listener: Rc<RefCell<dyn DeviceListener>> = listener.clone();
        self.listeners.add(Rc::downgrade(&listener));
    }

    /// Deregister a listener. Returns `false` if it was not registered.
    pub fn remove_listener<L: DeviceListener + 'static>(&self, listener: &Rc<RefCell<L>>) -> bool {
        let listener: Rc<RefCell<dyn DeviceListener>> = listener.clone();
        self.listeners.remove(&Rc::downgrade(&listener))
    }

    pub(crate) fn listeners(&self) -> &ListenerSet<dyn DeviceListener> {
        &self.listeners
    }

    /// Number of live registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        for motor in MotorId::ALL {
            self.set_vibration_motor_speed(motor, 0);
        }
    }
}
