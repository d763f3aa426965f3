//! The slot table.
//!
//! [`DeviceManager`] owns one optional [`Device`] per backend slot and keeps
//! that table in sync with the hardware. The host calls
//! [`DeviceManager::update`] once per tick; everything (polling, diffing,
//! notifications) happens synchronously inside that call.
//!
//! # Polling cadence
//! Occupied slots are polled every tick. Empty slots are only checked when
//! an enumeration is due (every `enumeration_interval_ms`, and on the very
//! first update), because querying empty slots is comparatively expensive.
//!
//! # Connection events
//! For each slot, a [`ManagerListener`] sees:
//! `on_controller_connecting` → `on_controller_connected` … later …
//! `on_controller_disconnecting` → `on_controller_disconnected`.
//! Dropping the manager disconnects every remaining device through the same
//! path, so each connection is always paired with a disconnection.

use crate::backends::InputBackend;
use crate::config::Config;
use crate::device::{Device, DeviceListener};
use crate::eventbus::ListenerSet;
use crate::snapshot::Snapshot;
use crate::timestamp::{Clock, MonotonicClock};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// Observer of connection changes.
pub trait ManagerListener {
    /// A device was detected in `slot`; its [`Device`] does not exist yet.
    fn on_controller_connecting(&mut self, _manager: &DeviceManager, _slot: usize) {}

    /// The device is fully initialised and present in the table.
    fn on_controller_connected(&mut self, _manager: &DeviceManager, _device: &Device) {}

    /// The device is about to be removed; it is still in the table.
    fn on_controller_disconnecting(&mut self, _manager: &DeviceManager, _device: &Device) {}

    /// The device in `slot` has been destroyed.
    fn on_controller_disconnected(&mut self, _manager: &DeviceManager, _slot: usize) {}
}

/// Owner of every connected [`Device`], indexed by slot.
pub struct DeviceManager {
    backend: Rc<dyn InputBackend>,
    clock: Rc<dyn Clock>,
    config: Config,
    slots: Vec<Option<Device>>,
    next_enumeration_ms: u64,
    listeners: ListenerSet<dyn ManagerListener>,
    device_listeners: ListenerSet<dyn DeviceListener>,
}

impl fmt::Debug for DeviceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceManager")
            .field("config", &self.config)
            .field("slots", &self.slots)
            .field("next_enumeration_ms", &self.next_enumeration_ms)
            .field("listeners", &self.listeners)
            .field("device_listeners", &self.device_listeners)
            .finish_non_exhaustive()
    }
}

impl DeviceManager {
    /// Manager over `backend` with default settings and the process clock.
    pub fn new(backend: Rc<dyn InputBackend>) -> Self {
        Self::with_config(backend, Rc::new(MonotonicClock), Config::default())
    }

    pub fn with_config(backend: Rc<dyn InputBackend>, clock: Rc<dyn Clock>, config: Config) -> Self {
        let slots = (0..backend.max_devices()).map(|_| None).collect();
        let next_enumeration_ms = clock.now_ms();
        Self {
            backend,
            clock,
            config,
            slots,
            next_enumeration_ms,
            listeners: ListenerSet::new(),
            device_listeners: ListenerSet::new(),
        }
    }

    /// Manager over the XInput runtime.
    #[cfg(all(feature = "xinput", target_os = "windows"))]
    #[cfg_attr(docsrs, doc(cfg(all(feature = "xinput", target_os = "windows"))))]
    pub fn xinput() -> Self {
        Self::new(Rc::new(crate::backends::windows::XInputBackend::new()))
    }

    /// Poll the backend and propagate connects, disconnects and state changes.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();
        let enumerate = now >= self.next_enumeration_ms;
        if enumerate {
            self.next_enumeration_ms = now.saturating_add(self.config.enumeration_interval_ms);
        }

        for slot in 0..self.slots.len() {
            if enumerate || self.device(slot).is_some() {
                self.update_slot(slot);
            }
        }
    }

    fn update_slot(&mut self, slot: usize) {
        match self.backend.poll_state(slot) {
            Ok(snapshot) => {
                if self.device(slot).is_none() && !self.add_device(slot, &snapshot) {
                    return;
                }
                if let Some(device) = self.device_mut(slot) {
                    device.update(Some(&snapshot));
                }
            }
            Err(err) => {
                if self.device(slot).is_some() {
                    trace!(slot, %err, "poll failed");
                    self.remove_device(slot);
                }
            }
        }
    }

    /// Construct the device for `slot`. `false` if out of range or occupied.
    fn add_device(&mut self, slot: usize, snapshot: &Snapshot) -> bool {
        if !matches!(self.slots.get(slot), Some(None)) {
            return false;
        }

        self.listeners
            .notify(|l| l.on_controller_connecting(self, slot));

        let device = Device::new(
            slot,
            self.backend.clone(),
            self.clock.clone(),
            &self.config,
            snapshot,
            self.device_listeners.clone(),
        );
        debug!(slot, sub_type = device.sub_type_name(), "controller connected");

        let Some(entry) = self.slots.get_mut(slot) else {
            return false;
        };
        *entry = Some(device);

        if let Some(device) = self.device(slot) {
            self.listeners
                .notify(|l| l.on_controller_connected(self, device));
        }
        true
    }

    /// Destroy the device in `slot`. `false` if out of range or empty.
    fn remove_device(&mut self, slot: usize) -> bool {
        let Some(device) = self.device(slot) else {
            return false;
        };
        self.listeners
            .notify(|l| l.on_controller_disconnecting(self, device));

        // Dropping the device stops its motors.
        let removed = self.slots.get_mut(slot).and_then(Option::take);
        drop(removed);
        debug!(slot, "controller disconnected");

        self.listeners
            .notify(|l| l.on_controller_disconnected(self, slot));
        true
    }

    fn remove_all_devices(&mut self) {
        for slot in 0..self.slots.len() {
            self.remove_device(slot);
        }
    }

    // ---- accessors ----

    /// Number of slots, fixed by the backend.
    pub fn max_devices(&self) -> usize {
        self.slots.len()
    }

    pub fn device(&self, slot: usize) -> Option<&Device> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn device_mut(&mut self, slot: usize) -> Option<&mut Device> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Connected devices, in slot order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn devices_mut(&mut self) -> impl Iterator<Item = &mut Device> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    pub fn connected_count(&self) -> usize {
        self.devices().count()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---- listeners ----

    /// Register a connection listener. The manager keeps only a weak handle.
    ///
    /// Takes `&self`, so a listener can register or deregister listeners
    /// (itself included) while it is being notified.
    pub fn add_listener<L: ManagerListener + 'static>(&self, listener: &Rc<RefCell<L>>) {
        let listener: Rc<RefCell<dyn ManagerListener>> = listener.clone();
        self.listeners.add(Rc::downgrade(&listener));
    }

    /// Deregister a connection listener. Returns `false` if it was not registered.
    pub fn remove_listener<L: ManagerListener + 'static>(&self, listener: &Rc<RefCell<L>>) -> bool {
        let listener: Rc<RefCell<dyn ManagerListener>> = listener.clone();
        self.listeners.remove(&Rc::downgrade(&listener))
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Attach a component listener to every connected device and to every
    /// device connected from now on.
    ///
    /// Newly connected devices get it before their first snapshot is applied,
    /// so it also sees the changes made while the device is initialised.
    pub fn add_device_listener<L: DeviceListener + 'static>(&self, listener: &Rc<RefCell<L>>) {
        let listener: Rc<RefCell<dyn DeviceListener>> = listener.clone();
        let weak = Rc::downgrade(&listener);
        for device in self.devices() {
            device.listeners().add(weak.clone());
        }
        self.device_listeners.add(weak);
    }

    /// Undo [`add_device_listener`](Self::add_device_listener), including on
    /// devices that are currently connected.
    ///
    /// Registrations are not tagged by origin: on each connected device this
    /// removes the *first* registration of `listener`. If the same listener
    /// was also added directly with [`Device::add_listener`], one of its two
    /// registrations survives either way, but it may be the manager's one.
    pub fn remove_device_listener<L: DeviceListener + 'static>(
        &self,
        listener: &Rc<RefCell<L>>,
    ) -> bool {
        let listener: Rc<RefCell<dyn DeviceListener>> = listener.clone();
        let weak = Rc::downgrade(&listener);
        for device in self.devices() {
            device.listeners().remove(&weak);
        }
        self.device_listeners.remove(&weak)
    }
}

impl Drop for DeviceManager {
    fn drop(&mut self) {
        self.remove_all_devices();
    }
}
