//! WiFi bring-up
//!
//! Powers the CYW43439, joins the configured network and starts the
//! embassy-net stack with DHCP.
//!
//! ```text
//! 1. Load CYW43439 firmware blobs (compiled in)
//! 2. PIO SPI to the radio, spawn the driver task
//! 3. Load CLM, join with the settings.cfg credentials
//! 4. Spawn the network stack task, wait for a DHCP lease
//! ```
//!
//! Join failure is fatal: the caller halts before homing.

use cyw43::{aligned_bytes, JoinOptions};
use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::{bind_interrupts, Peri};
use embassy_time::{with_timeout, Duration, Timer};
use static_cell::StaticCell;

use altaz_core::config::Settings;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Join attempts before giving up
const MAX_JOIN_ATTEMPTS: u8 = 5;

/// Timeout for a single join attempt
const JOIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause between join attempts
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Timeout for obtaining a DHCP lease
const DHCP_TIMEOUT: Duration = Duration::from_secs(30);

/// Sockets available to the stack (one TCP listener plus DHCP)
const STACK_SOCKETS: usize = 3;

/// WiFi bring-up errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum WifiError {
    /// Could not associate with the network
    JoinFailed,
    /// Associated but no DHCP lease arrived
    DhcpTimeout,
}

/// Radio pins and peripherals on the Pico W
pub struct WifiResources {
    pub pwr: Peri<'static, PIN_23>,
    pub dio: Peri<'static, PIN_24>,
    pub cs: Peri<'static, PIN_25>,
    pub clk: Peri<'static, PIN_29>,
    pub pio: Peri<'static, PIO0>,
    pub dma: Peri<'static, DMA_CH0>,
}

/// Radio handle; must stay alive for the link to keep working
pub type WifiControl = cyw43::Control<'static>;

type RadioSpi = PioSpi<'static, PIO0, 0, DMA_CH0>;

/// Bring the radio up and join the configured network
pub async fn start(
    spawner: Spawner,
    settings: &Settings,
    res: WifiResources,
) -> Result<(Stack<'static>, WifiControl), WifiError> {
    let fw = aligned_bytes!("../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../cyw43-firmware/43439A0_clm.bin");
    let nvram = aligned_bytes!("../cyw43-firmware/nvram_rp2040.bin");

    let pwr = Output::new(res.pwr, Level::Low);
    let cs = Output::new(res.cs, Level::High);
    let mut pio = Pio::new(res.pio, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        res.dio,
        res.clk,
        res.dma,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw, nvram).await;
    spawner.spawn(unwrap!(wifi_task(runner)));

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::None)
        .await;

    let mut rng = RoscRng;
    let seed = rng.next_u64();

    static RESOURCES: StaticCell<StackResources<STACK_SOCKETS>> = StaticCell::new();
    let (stack, net_runner) = embassy_net::new(
        net_device,
        NetConfig::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(unwrap!(net_task(net_runner)));

    join(&mut control, settings).await?;

    info!("Waiting for DHCP lease...");
    if with_timeout(DHCP_TIMEOUT, stack.wait_config_up()).await.is_err() {
        return Err(WifiError::DhcpTimeout);
    }
    if let Some(config) = stack.config_v4() {
        info!("Network up: {}", config.address);
    }

    Ok((stack, control))
}

async fn join(control: &mut WifiControl, settings: &Settings) -> Result<(), WifiError> {
    for attempt in 1..=MAX_JOIN_ATTEMPTS {
        info!(
            "Joining '{}' (attempt {}/{})",
            settings.ssid.as_str(),
            attempt,
            MAX_JOIN_ATTEMPTS
        );

        let options = if settings.is_open_network() {
            JoinOptions::new_open()
        } else {
            JoinOptions::new(settings.password.as_bytes())
        };

        match with_timeout(JOIN_TIMEOUT, control.join(settings.ssid.as_str(), options)).await {
            Ok(Ok(())) => {
                info!("WiFi joined");
                return Ok(());
            }
            Ok(Err(e)) => warn!("Join failed: status {}", e.status),
            Err(_) => warn!("Join timed out"),
        }

        // Resets the radio's join state before retrying
        control.leave().await;
        Timer::after(RETRY_DELAY).await;
    }

    Err(WifiError::JoinFailed)
}

#[embassy_executor::task]
async fn wifi_task(runner: cyw43::Runner<'static, Output<'static>, RadioSpi>) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}
