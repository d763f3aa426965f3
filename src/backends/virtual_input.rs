//! Scriptable in-memory backend.
//!
//! [`VirtualBackend`] behaves like a hardware slot table that the host fills
//! in by hand: plug a device into a slot, feed it snapshots, change battery
//! readings, make vibration commands fail. It records every successful
//! vibration command so tests can check what reached the "hardware".
//!
//! ```
//! use padwatch::backends::virtual_input::VirtualBackend;
//! use padwatch::backends::InputBackend;
//! use padwatch::{ButtonId, Buttons, Capabilities, Snapshot};
//!
//! let backend = VirtualBackend::new(4);
//! assert!(backend.poll_state(0).is_err());
//!
//! backend.connect(0, Capabilities::full_gamepad());
//! backend.feed(0, Snapshot { packet: 1, buttons: Buttons::NONE.with(ButtonId::A), ..Default::default() });
//! assert_eq!(backend.poll_state(0).unwrap().packet, 1);
//! ```

use crate::backends::InputBackend;
use crate::error::BackendError;
use crate::event::BatteryId;
use crate::snapshot::{BatteryReport, Capabilities, Snapshot, Vibration};
use std::cell::RefCell;

#[derive(Debug, Default)]
struct VirtualSlot {
    capabilities: Capabilities,
    state: Snapshot,
    batteries: [Option<BatteryReport>; 2],
    vibration: Vibration,
    vibration_commands: usize,
    fail_capabilities: bool,
    fail_vibration: bool,
}

/// In-memory backend with a fixed number of slots.
#[derive(Debug)]
pub struct VirtualBackend {
    slots: RefCell<Vec<Option<VirtualSlot>>>,
}

impl VirtualBackend {
    /// A backend with `max_devices` empty slots.
    pub fn new(max_devices: usize) -> Self {
        Self {
            slots: RefCell::new((0..max_devices).map(|_| None).collect()),
        }
    }

    fn with_slot<R>(&self, slot: usize, f: impl FnOnce(&mut VirtualSlot) -> R) -> Option<R> {
        self.slots
            .borrow_mut()
            .get_mut(slot)
            .and_then(Option::as_mut)
            .map(f)
    }

    /// Plug a device into `slot`, replacing any previous one.
    ///
    /// Its initial state is all-zero with packet number 0.
    pub fn connect(&self, slot: usize, capabilities: Capabilities) {
        if let Some(entry) = self.slots.borrow_mut().get_mut(slot) {
            *entry = Some(VirtualSlot {
                capabilities,
                ..VirtualSlot::default()
            });
        }
    }

    /// Unplug the device in `slot`.
    pub fn disconnect(&self, slot: usize) {
        if let Some(entry) = self.slots.borrow_mut().get_mut(slot) {
            *entry = None;
        }
    }

    pub fn is_connected(&self, slot: usize) -> bool {
        self.with_slot(slot, |_| ()).is_some()
    }

    /// Replace the state returned by the next polls of `slot`.
    pub fn feed(&self, slot: usize, snapshot: Snapshot) {
        self.with_slot(slot, |s| s.state = snapshot);
    }

    /// Set (or clear) the report returned for one battery.
    pub fn set_battery(&self, slot: usize, battery: BatteryId, report: Option<BatteryReport>) {
        self.with_slot(slot, |s| {
            if let Some(b) = s.batteries.get_mut(battery.index()) {
                *b = report;
            }
        });
    }

    /// Make capability queries on `slot` fail.
    pub fn fail_capabilities(&self, slot: usize, fail: bool) {
        self.with_slot(slot, |s| s.fail_capabilities = fail);
    }

    /// Make vibration commands on `slot` fail.
    pub fn fail_vibration(&self, slot: usize, fail: bool) {
        self.with_slot(slot, |s| s.fail_vibration = fail);
    }

    /// Last vibration command accepted for `slot`.
    pub fn vibration(&self, slot: usize) -> Option<Vibration> {
        self.with_slot(slot, |s| s.vibration)
    }

    /// Number of vibration commands accepted for `slot` since it connected.
    pub fn vibration_commands(&self, slot: usize) -> usize {
        self.with_slot(slot, |s| s.vibration_commands).unwrap_or(0)
    }
}

impl InputBackend for VirtualBackend {
    fn max_devices(&self) -> usize {
        self.slots.borrow().len()
    }

    fn query_capabilities(&self, slot: usize) -> Result<Capabilities, BackendError> {
        match self.with_slot(slot, |s| (!s.fail_capabilities).then_some(s.capabilities)) {
            Some(Some(caps)) => Ok(caps),
            Some(None) => Err(BackendError::Os(1)),
            None => Err(BackendError::NotConnected),
        }
    }

    fn poll_state(&self, slot: usize) -> Result<Snapshot, BackendError> {
        self.with_slot(slot, |s| s.state)
            .ok_or(BackendError::NotConnected)
    }

    fn set_vibration(&self, slot: usize, vibration: Vibration) -> Result<(), BackendError> {
        self.with_slot(slot, |s| {
            if s.fail_vibration {
                return Err(BackendError::Os(1));
            }
            s.vibration = vibration;
            s.vibration_commands += 1;
            Ok(())
        })
        .unwrap_or(Err(BackendError::NotConnected))
    }

    fn query_battery(&self, slot: usize, battery: BatteryId) -> Result<BatteryReport, BackendError> {
        self.with_slot(slot, |s| s.batteries.get(battery.index()).copied().flatten())
            .ok_or(BackendError::NotConnected)?
            .ok_or(BackendError::Unsupported)
    }
}
