use padwatch::backends::virtual_input::VirtualBackend;
use padwatch::{
    BatteryId, BatteryReport, ButtonId, Buttons, Capabilities, Component, ComponentKind, Config,
    Device, DeviceListener, DeviceManager, DeviceMeta, FilteredListener, ManagerListener,
    ManualClock, MotorId, RawBatteryType, Snapshot, StickPosition, SubType, ThumbstickId,
    TriggerId,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Connecting(usize),
    Connected(usize),
    Disconnecting(usize),
    Disconnected(usize),
    Changed(usize, Component),
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl DeviceListener for Recorder {
    fn on_component_changed(&mut self, device: &Device, component: Component) {
        self.events.push(Event::Changed(device.slot(), component));
    }
}

impl ManagerListener for Recorder {
    fn on_controller_connecting(&mut self, _manager: &DeviceManager, slot: usize) {
        self.events.push(Event::Connecting(slot));
    }
    fn on_controller_connected(&mut self, _manager: &DeviceManager, device: &Device) {
        self.events.push(Event::Connected(device.slot()));
    }
    fn on_controller_disconnecting(&mut self, _manager: &DeviceManager, device: &Device) {
        self.events.push(Event::Disconnecting(device.slot()));
    }
    fn on_controller_disconnected(&mut self, _manager: &DeviceManager, slot: usize) {
        self.events.push(Event::Disconnected(slot));
    }
}

struct Rig {
    backend: Rc<VirtualBackend>,
    clock: Rc<ManualClock>,
    recorder: Rc<RefCell<Recorder>>,
    manager: DeviceManager,
}

impl Rig {
    fn new(slots: usize) -> Self {
        let backend = Rc::new(VirtualBackend::new(slots));
        let clock = Rc::new(ManualClock::new(0));
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let manager =
            DeviceManager::with_config(backend.clone(), clock.clone(), Config::default());
        manager.add_listener(&recorder);
        manager.add_device_listener(&recorder);
        Self {
            backend,
            clock,
            recorder,
            manager,
        }
    }

    fn events(&self) -> Vec<Event> {
        self.recorder.borrow_mut().take()
    }

    fn tick(&mut self, ms: u64) {
        self.clock.advance(ms);
        self.manager.update();
    }
}

fn buttons(ids: &[ButtonId]) -> Buttons {
    ids.iter().copied().collect()
}

#[test]
fn first_poll_creates_device_and_reports_pressed_button() {
    let mut rig = Rig::new(4);
    rig.backend.connect(0, Capabilities::full_gamepad());
    rig.backend.feed(
        0,
        Snapshot {
            packet: 1,
            buttons: buttons(&[ButtonId::A]),
            ..Snapshot::default()
        },
    );

    rig.manager.update();

    let events = rig.events();
    assert_eq!(events.first(), Some(&Event::Connecting(0)));
    assert_eq!(events.last(), Some(&Event::Connected(0)));
    let a_presses = events
        .iter()
        .filter(|e| **e == Event::Changed(0, Component::Button(ButtonId::A)))
        .count();
    assert_eq!(a_presses, 1);
    assert!(rig.manager.device(0).is_some_and(|d| d.is_button_pressed(ButtonId::A)));
}

#[test]
fn unchanged_packet_fires_nothing() {
    let mut rig = Rig::new(1);
    rig.backend.connect(0, Capabilities::full_gamepad());
    rig.backend.feed(
        0,
        Snapshot {
            packet: 1,
            buttons: buttons(&[ButtonId::A]),
            ..Snapshot::default()
        },
    );
    rig.manager.update();
    rig.events();

    rig.tick(16);
    rig.tick(16);
    assert!(rig.events().is_empty());
}

#[test]
fn trigger_reading_is_dead_zone_corrected() {
    let mut rig = Rig::new(1);
    rig.backend.connect(0, Capabilities::full_gamepad());
    rig.manager.update();
    rig.events();

    rig.backend.feed(
        0,
        Snapshot {
            packet: 2,
            left_trigger: 200,
            ..Snapshot::default()
        },
    );
    rig.tick(16);

    assert_eq!(
        rig.events(),
        vec![Event::Changed(0, Component::Trigger(TriggerId::Left))]
    );
    let device = rig.manager.device(0).expect("connected");
    assert_eq!(device.trigger_dead_zone(TriggerId::Left), 30);
    assert_eq!(device.trigger_position(TriggerId::Left), 192);
}

#[test]
fn failed_vibration_changes_nothing() {
    let mut rig = Rig::new(1);
    rig.backend.connect(0, Capabilities::full_gamepad());
    rig.manager.update();
    rig.events();

    rig.backend.fail_vibration(0, true);
    let device = rig.manager.device_mut(0).expect("connected");
    device.set_vibration_motor_speed(MotorId::Right, 30_000);
    assert_eq!(device.vibration_motor_speed(MotorId::Right), 0);
    assert!(rig.events().is_empty());

    rig.backend.fail_vibration(0, false);
    let device = rig.manager.device_mut(0).expect("connected");
    device.set_vibration_motor_speed(MotorId::Right, 30_000);
    assert_eq!(device.vibration_motor_speed(MotorId::Right), 30_000);
    assert_eq!(
        rig.events(),
        vec![Event::Changed(0, Component::VibrationMotor(MotorId::Right))]
    );
}

#[test]
fn connect_disconnect_symmetry_through_teardown() {
    let mut rig = Rig::new(4);
    rig.backend.connect(0, Capabilities::full_gamepad());
    rig.backend.connect(3, Capabilities::full_gamepad());
    rig.manager.update();

    // slot 0 goes away, then comes back on the next enumeration
    rig.backend.disconnect(0);
    rig.tick(1);
    rig.backend.connect(0, Capabilities::full_gamepad());
    rig.tick(1);
    assert!(rig.manager.device(0).is_none());
    rig.tick(1_000);
    assert!(rig.manager.device(0).is_some());

    let Rig {
        backend,
        recorder,
        manager,
        ..
    } = rig;
    drop(manager);

    let connection_events: Vec<Event> = recorder
        .borrow_mut()
        .take()
        .into_iter()
        .filter(|e| !matches!(e, Event::Changed(..)))
        .collect();

    for slot in [0, 3] {
        let per_slot: Vec<&Event> = connection_events
            .iter()
            .filter(|e| match e {
                Event::Connecting(s)
                | Event::Connected(s)
                | Event::Disconnecting(s)
                | Event::Disconnected(s) => *s == slot,
                Event::Changed(..) => false,
            })
            .collect();
        assert_eq!(per_slot.len() % 4, 0, "slot {slot}: {per_slot:?}");
        for chunk in per_slot.chunks(4) {
            assert_eq!(
                chunk,
                [
                    &Event::Connecting(slot),
                    &Event::Connected(slot),
                    &Event::Disconnecting(slot),
                    &Event::Disconnected(slot),
                ]
            );
        }
    }
    assert_eq!(backend.vibration(3).map(|v| (v.left, v.right)), Some((0, 0)));
}

#[test]
fn capabilities_are_fixed_at_connect() {
    let mut rig = Rig::new(1);
    let caps = Capabilities {
        sub_type: SubType::Wheel,
        voice_support: true,
        buttons: buttons(&[ButtonId::A, ButtonId::B, ButtonId::Start]),
        left_trigger: 255,
        right_trigger: 0,
        left_thumbstick: StickPosition::new(i16::MAX, i16::MAX),
        right_thumbstick: StickPosition::new(0, 0),
        left_motor: 1,
        right_motor: 0,
    };
    rig.backend.connect(0, caps);
    rig.manager.update();

    let device = rig.manager.device(0).expect("connected");
    assert_eq!(device.sub_type(), SubType::Wheel);
    assert_eq!(device.sub_type_name(), "XBox 360 Wheel");
    assert!(device.has_voice_support());
    assert!(device.has_trigger(TriggerId::Left));
    assert!(!device.has_trigger(TriggerId::Right));
    assert!(device.has_thumbstick(ThumbstickId::Left));
    assert!(!device.has_thumbstick(ThumbstickId::Right));
    assert!(device.has_vibration_motor(MotorId::Left));
    assert!(!device.has_vibration_motor(MotorId::Right));

    let meta = device.metadata();
    assert_eq!(meta.slot, 0);
    assert_eq!(meta.buttons, vec!["Start", "A", "B"]);
    assert_eq!(meta.vibration_motors, vec!["Left Motor"]);
    assert!(meta.batteries.is_empty());

    let json = serde_json::to_string(&meta).expect("serialize");
    let back: DeviceMeta = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, meta);
}

#[test]
fn headset_battery_comes_and_goes() {
    let mut rig = Rig::new(1);
    rig.backend.connect(0, Capabilities::full_gamepad());
    rig.manager.update();
    rig.events();

    rig.backend.set_battery(
        0,
        BatteryId::Headset,
        Some(BatteryReport::new(RawBatteryType::NiMH, 2)),
    );
    rig.tick(5_000);
    assert!(rig.events().is_empty());
    rig.tick(5_000);
    assert_eq!(
        rig.events(),
        vec![Event::Changed(0, Component::Battery(BatteryId::Headset))]
    );
    assert!(rig.manager.device(0).is_some_and(|d| d.has_battery(BatteryId::Headset)));

    rig.backend.set_battery(0, BatteryId::Headset, None);
    rig.tick(10_000);
    assert_eq!(
        rig.events(),
        vec![Event::Changed(0, Component::Battery(BatteryId::Headset))]
    );
    assert!(rig.manager.device(0).is_some_and(|d| !d.has_battery(BatteryId::Headset)));
}

#[test]
fn device_listener_removed_from_live_devices() {
    let mut rig = Rig::new(1);
    rig.backend.connect(0, Capabilities::full_gamepad());
    rig.manager.update();
    rig.events();

    let recorder = rig.recorder.clone();
    assert!(rig.manager.remove_device_listener(&recorder));
    rig.backend.feed(
        0,
        Snapshot {
            packet: 5,
            buttons: buttons(&[ButtonId::Y]),
            ..Snapshot::default()
        },
    );
    rig.tick(16);
    assert!(rig.events().is_empty());
    assert!(!rig.manager.remove_device_listener(&recorder));
}

#[test]
fn filtered_listener_only_forwards_matching() {
    #[derive(Default)]
    struct Counter(Rc<RefCell<usize>>);
    impl DeviceListener for Counter {
        fn on_component_changed(&mut self, _device: &Device, _component: Component) {
            *self.0.borrow_mut() += 1;
        }
    }

    let mut rig = Rig::new(1);
    rig.backend.connect(0, Capabilities::full_gamepad());
    rig.manager.update();

    let count = Rc::new(RefCell::new(0));
    let filtered = Rc::new(RefCell::new(FilteredListener::new(
        |c| c.kind() == ComponentKind::Thumbstick,
        Box::new(Counter(count.clone())),
    )));
    if let Some(device) = rig.manager.device(0) {
        device.add_listener(&filtered);
    }

    rig.backend.feed(
        0,
        Snapshot {
            packet: 9,
            buttons: buttons(&[ButtonId::X, ButtonId::LeftShoulder]),
            right_trigger: 255,
            right_thumbstick: StickPosition::new(-i16::MAX, 0),
            ..Snapshot::default()
        },
    );
    rig.tick(16);

    assert_eq!(*count.borrow(), 1);
    assert_eq!(
        rig.manager.device(0).map(|d| d.thumbstick_position(ThumbstickId::Right)),
        Some((-i16::MAX, 0))
    );
}

#[test]
fn listener_dropped_without_deregistering_is_skipped() {
    let mut rig = Rig::new(1);
    rig.backend.connect(0, Capabilities::full_gamepad());
    rig.manager.update();

    {
        let transient = Rc::new(RefCell::new(Recorder::default()));
        rig.manager.add_listener(&transient);
        assert_eq!(rig.manager.listener_count(), 2);
    }
    assert_eq!(rig.manager.listener_count(), 1);

    rig.backend.disconnect(0);
    rig.tick(1);
    assert!(rig.events().contains(&Event::Disconnected(0)));
}

type Log = Rc<RefCell<Vec<(&'static str, Event)>>>;

struct Tagged {
    tag: &'static str,
    log: Log,
}

impl ManagerListener for Tagged {
    fn on_controller_connecting(&mut self, _manager: &DeviceManager, slot: usize) {
        self.log.borrow_mut().push((self.tag, Event::Connecting(slot)));
    }
    fn on_controller_connected(&mut self, _manager: &DeviceManager, device: &Device) {
        self.log.borrow_mut().push((self.tag, Event::Connected(device.slot())));
    }
    fn on_controller_disconnecting(&mut self, _manager: &DeviceManager, device: &Device) {
        self.log.borrow_mut().push((self.tag, Event::Disconnecting(device.slot())));
    }
    fn on_controller_disconnected(&mut self, _manager: &DeviceManager, slot: usize) {
        self.log.borrow_mut().push((self.tag, Event::Disconnected(slot)));
    }
}

/// Deregisters `victim` and then itself once the first controller is connected.
struct Gatekeeper {
    me: Weak<RefCell<Gatekeeper>>,
    victim: Rc<RefCell<Tagged>>,
    log: Log,
}

impl ManagerListener for Gatekeeper {
    fn on_controller_connecting(&mut self, _manager: &DeviceManager, slot: usize) {
        self.log.borrow_mut().push(("gate", Event::Connecting(slot)));
    }
    fn on_controller_connected(&mut self, manager: &DeviceManager, device: &Device) {
        self.log.borrow_mut().push(("gate", Event::Connected(device.slot())));
        assert!(manager.remove_listener(&self.victim));
        if let Some(me) = self.me.upgrade() {
            assert!(manager.remove_listener(&me));
        }
    }
    fn on_controller_disconnecting(&mut self, _manager: &DeviceManager, device: &Device) {
        self.log.borrow_mut().push(("gate", Event::Disconnecting(device.slot())));
    }
}

#[test]
fn manager_listener_deregisters_others_and_itself_while_notified() {
    let mut rig = Rig::new(1);
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let victim = Rc::new(RefCell::new(Tagged { tag: "victim", log: log.clone() }));
    let tail = Rc::new(RefCell::new(Tagged { tag: "tail", log: log.clone() }));
    let gate = Rc::new_cyclic(|me| {
        RefCell::new(Gatekeeper {
            me: me.clone(),
            victim: victim.clone(),
            log: log.clone(),
        })
    });
    assert!(rig.manager.remove_listener(&rig.recorder));
    rig.manager.add_listener(&gate);
    rig.manager.add_listener(&victim);
    rig.manager.add_listener(&tail);

    rig.backend.connect(0, Capabilities::full_gamepad());
    rig.manager.update();
    assert_eq!(rig.manager.listener_count(), 1);

    rig.backend.disconnect(0);
    rig.tick(1);

    // recipients of the in-flight notification were fixed before the removal
    assert_eq!(
        *log.borrow(),
        vec![
            ("gate", Event::Connecting(0)),
            ("victim", Event::Connecting(0)),
            ("tail", Event::Connecting(0)),
            ("gate", Event::Connected(0)),
            ("victim", Event::Connected(0)),
            ("tail", Event::Connected(0)),
            ("tail", Event::Disconnecting(0)),
            ("tail", Event::Disconnected(0)),
        ]
    );
}

#[test]
fn direct_and_manager_registrations_are_counted_separately() {
    let mut rig = Rig::new(1);
    rig.backend.connect(0, Capabilities::full_gamepad());
    rig.manager.update();

    let extra = Rc::new(RefCell::new(Recorder::default()));
    rig.manager.add_device_listener(&extra);
    if let Some(device) = rig.manager.device(0) {
        device.add_listener(&extra);
        assert_eq!(device.listener_count(), 3);
    }

    assert!(rig.manager.remove_device_listener(&extra));
    assert_eq!(rig.manager.device(0).map(Device::listener_count), Some(2));

    rig.backend.feed(
        0,
        Snapshot {
            packet: 3,
            buttons: buttons(&[ButtonId::Back]),
            ..Snapshot::default()
        },
    );
    rig.tick(16);
    assert_eq!(
        extra.borrow_mut().take(),
        vec![Event::Changed(0, Component::Button(ButtonId::Back))]
    );
}
