//! Slot-based game controller polling.
//!
//! Polls a controller backend (XInput on Windows, or the in-memory
//! [`VirtualBackend`](backends::virtual_input::VirtualBackend)), keeps a
//! de-duplicated, dead-zone corrected view of each connected controller, and
//! notifies listeners about every transition.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use padwatch::backends::virtual_input::VirtualBackend;
//! use padwatch::{ButtonId, Buttons, Capabilities, DeviceManager, Logger, Snapshot};
//!
//! let backend = Rc::new(VirtualBackend::new(4));
//! let mut manager = DeviceManager::new(backend.clone());
//! let logger = Rc::new(RefCell::new(Logger::new()));
//! manager.add_listener(&logger);
//! manager.add_device_listener(&logger);
//!
//! backend.connect(0, Capabilities::full_gamepad());
//! backend.feed(0, Snapshot { packet: 1, buttons: Buttons::NONE.with(ButtonId::A), ..Default::default() });
//! manager.update();
//!
//! let pad = manager.device(0).unwrap();
//! assert!(pad.is_button_pressed(ButtonId::A));
//! ```

pub mod backends;
pub mod config;
pub mod deadzone;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filtered_listener;
pub mod logger;
pub mod manager;
pub mod metadata;
pub mod snapshot;
pub mod timestamp;

pub use backends::InputBackend;
pub use config::{Config, DeadZones};
pub use device::{Device, DeviceListener};
pub use error::{BackendError, Error, Result};
pub use event::*;
pub use filtered_listener::FilteredListener;
pub use logger::Logger;
pub use manager::{DeviceManager, ManagerListener};
pub use metadata::DeviceMeta;
pub use snapshot::*;
pub use timestamp::{Clock, ManualClock, MonotonicClock};
