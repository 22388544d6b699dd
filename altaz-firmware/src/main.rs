//! altaz - Alt-Azimuth Mount Firmware
//!
//! Main firmware binary for a Raspberry Pi Pico W driving two STEP/DIR
//! stepper drivers. Pointing commands arrive over WiFi as `AZ:..ALT:..`
//! lines on a TCP socket.
//!
//! Pin map:
//!
//! | GPIO | Function                          |
//! |------|-----------------------------------|
//! | 2/3  | Azimuth STEP / DIR                |
//! | 4/5  | Altitude STEP / DIR               |
//! | 6    | Shared driver EN (active-low)     |
//! | 10   | Azimuth home button (pull-down)   |
//! | 11   | Altitude home button (pull-down)  |
//! | 12   | Emergency stop (pull-down)        |
//! | 15   | Status LED                        |
//!
//! GPIO 23/24/25/29 belong to the CYW43439 radio.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use altaz_core::config::{parse_settings, MountConfig};
use altaz_core::traits::PinPanel;
use altaz_core::MountController;
use altaz_hal_rp2040::{ActiveLow, GpioStepper, RpInput, RpOutput};

mod channels;
mod network;
mod tasks;

/// Embedded network settings (compiled into firmware)
/// Edit settings.cfg and rebuild to change them
const EMBEDDED_SETTINGS: &str = include_str!("../settings.cfg");

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("altaz firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Drivers released before anything else can fail
    let enable = ActiveLow::new(RpOutput::new(Output::new(p.PIN_6, Level::High)));
    let indicator = RpOutput::new(Output::new(p.PIN_15, Level::Low));
    info!("Drivers released");

    let config = MountConfig::default();
    if !config.has_valid_altitude_range() {
        error!("Altitude limits inverted; refusing to start");
        park().await;
    }

    let settings = match parse_settings(EMBEDDED_SETTINGS) {
        Ok(settings) => settings,
        Err(e) => {
            error!("settings.cfg rejected: {}", e);
            park().await;
        }
    };
    let port = settings.server_port(config.server_port);
    info!(
        "Settings loaded: ssid='{}', port={}",
        settings.ssid.as_str(),
        port
    );

    let wifi = network::WifiResources {
        pwr: p.PIN_23,
        dio: p.PIN_24,
        cs: p.PIN_25,
        clk: p.PIN_29,
        pio: p.PIO0,
        dma: p.DMA_CH0,
    };
    // Radio control must outlive the link
    let (stack, _control) = match network::start(spawner, &settings, wifi).await {
        Ok(up) => up,
        Err(e) => {
            error!("WiFi bring-up failed: {}", e);
            park().await;
        }
    };

    let azimuth = GpioStepper::new(
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        false,
    );
    let altitude = GpioStepper::new(
        Output::new(p.PIN_4, Level::Low),
        Output::new(p.PIN_5, Level::Low),
        false,
    );
    let panel = PinPanel {
        force_stop: RpInput::new(Input::new(p.PIN_12, Pull::Down)),
        home_azimuth: RpInput::new(Input::new(p.PIN_10, Pull::Down)),
        home_altitude: RpInput::new(Input::new(p.PIN_11, Pull::Down)),
        enable,
        indicator,
    };
    let mount = MountController::new(&config, azimuth, altitude);

    spawner.spawn(unwrap!(tasks::link_task(stack, port)));
    spawner.spawn(unwrap!(tasks::control_task(mount, panel)));

    info!("All tasks spawned");
    park().await;
}

/// Idle forever, keeping everything in scope alive
async fn park() -> ! {
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
