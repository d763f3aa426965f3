//! Polls controllers and logs every connection and component change.
//!
//! ```text
//! RUST_LOG=padwatch=debug cargo run --example poll -- [config.toml]
//! ```
//!
//! On Windows this drives the real XInput slots. Elsewhere it runs a short
//! scripted session on the virtual backend.

use padwatch::{Config, DeviceManager, Logger};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::info;

fn main() -> padwatch::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();
    padwatch::timestamp::init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    info!(?config, "padwatch v{} starting", env!("CARGO_PKG_VERSION"));

    let logger = Rc::new(RefCell::new(Logger::new()));
    run(config, &logger);
    Ok(())
}

#[cfg(all(feature = "xinput", target_os = "windows"))]
fn run(config: Config, logger: &Rc<RefCell<Logger>>) {
    use padwatch::backends::windows::XInputBackend;
    use padwatch::MonotonicClock;

    let mut manager =
        DeviceManager::with_config(Rc::new(XInputBackend::new()), Rc::new(MonotonicClock), config);
    manager.add_listener(logger);
    manager.add_device_listener(logger);

    loop {
        manager.update();
        // ~60 Hz is plenty for a console demo
        std::thread::sleep(Duration::from_millis(16));
    }
}

#[cfg(not(all(feature = "xinput", target_os = "windows")))]
fn run(config: Config, logger: &Rc<RefCell<Logger>>) {
    use padwatch::backends::virtual_input::VirtualBackend;
    use padwatch::{
        BatteryId, BatteryReport, ButtonId, Buttons, Capabilities, MotorId, MonotonicClock,
        RawBatteryType, Snapshot, StickPosition,
    };

    let backend = Rc::new(VirtualBackend::new(4));
    let mut manager = DeviceManager::with_config(backend.clone(), Rc::new(MonotonicClock), config);
    manager.add_listener(logger);
    manager.add_device_listener(logger);

    backend.connect(1, Capabilities::full_gamepad());
    backend.set_battery(
        1,
        BatteryId::Controller,
        Some(BatteryReport::new(RawBatteryType::Alkaline, 2)),
    );

    let script = [
        Snapshot { packet: 1, buttons: Buttons::NONE.with(ButtonId::A), ..Snapshot::default() },
        Snapshot { packet: 2, right_trigger: 200, ..Snapshot::default() },
        Snapshot {
            packet: 3,
            left_thumbstick: StickPosition::new(20_000, -20_000),
            ..Snapshot::default()
        },
        Snapshot::default(),
    ];

    for (tick, snapshot) in script.into_iter().enumerate() {
        backend.feed(1, snapshot);
        manager.update();
        if tick == 1 {
            if let Some(pad) = manager.device_mut(1) {
                pad.set_vibration_motor_speed(MotorId::Left, 20_000);
            }
        }
        std::thread::sleep(Duration::from_millis(16));
    }

    backend.disconnect(1);
    manager.update();
    info!(connected = manager.connected_count(), "scripted session finished");
}
