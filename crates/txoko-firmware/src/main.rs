mod config;
mod price_service;
mod runtime_diagnostics;
mod time_sync;
mod wifi_manager;

use anyhow::{anyhow, Context};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::{
    delay::FreeRtos,
    gpio::{AnyIOPin, PinDriver},
    peripherals::Peripherals,
    spi::{config::Config, SpiDeviceDriver, SpiDriver, SpiDriverConfig},
    units::Hertz,
};

use txoko_ui::{
    Builder, Dimensions, DisplayModeController, EinkDisplay, EinkInterface, EinkPanel,
    EpaperRenderer, Redraw,
};

use price_service::PriceService;
use runtime_diagnostics::{log_heap, uptime};
use time_sync::LocalClock;
use wifi_manager::{WifiCredentials, WifiManager};

/// GYE042A87 in landscape: 300 gate lines by 400 source lines.
const PANEL_ROWS: u16 = 300;
const PANEL_COLS: u16 = 400;
const SPI_BAUDRATE_HZ: u32 = 4_000_000;

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("Txoko Clock starting");
    log_heap("startup");

    let clock_config = config::clock_config().map_err(|err| anyhow!("bad config: {}", err))?;

    let peripherals = Peripherals::take().context("peripherals already taken")?;
    let sys_loop = EspSystemEventLoop::take()?;

    let mut wifi = WifiManager::new(peripherals.modem, sys_loop);
    let credentials = WifiCredentials {
        ssid: config::WIFI_SSID.to_string(),
        password: config::WIFI_PASS.to_string(),
    };
    if let Err(err) = wifi.join(&credentials, wifi_manager::JOIN_BUDGET) {
        log::warn!("WiFi join failed, running offline: {}", err);
    }

    // Dropping the client would stop background re-sync.
    let _sntp = if wifi.is_connected() {
        match time_sync::sync_time(&clock_config.timezone, time_sync::SYNC_BUDGET) {
            Ok(sntp) => Some(sntp),
            Err(err) => {
                log::warn!("SNTP start failed: {:?}", err);
                None
            }
        }
    } else {
        std::env::set_var("TZ", &clock_config.timezone);
        None
    };

    let spi = SpiDriver::new(
        peripherals.spi2,
        peripherals.pins.gpio18,
        peripherals.pins.gpio23,
        None::<AnyIOPin>,
        &SpiDriverConfig::default(),
    )?;
    let spi_config = Config::default()
        .baudrate(Hertz(SPI_BAUDRATE_HZ))
        .data_mode(embedded_hal::spi::Mode {
            polarity: embedded_hal::spi::Polarity::IdleLow,
            phase: embedded_hal::spi::Phase::CaptureOnFirstTransition,
        });
    let spi_device = SpiDeviceDriver::new(&spi, Some(peripherals.pins.gpio5), &spi_config)?;

    let dc = PinDriver::output(peripherals.pins.gpio17)?;
    let rst = PinDriver::output(peripherals.pins.gpio16)?;
    let busy = PinDriver::input(peripherals.pins.gpio4)?;

    let interface = EinkInterface::new(spi_device, dc, rst, busy);
    let dimensions = Dimensions::new(PANEL_ROWS, PANEL_COLS)
        .map_err(|err| anyhow!("panel dimensions: {}", err))?;
    let panel_config = Builder::new()
        .dimensions(dimensions)
        .build()
        .map_err(|err| anyhow!("panel config: {}", err))?;
    let mut panel = EinkPanel::new(EinkDisplay::new(interface, panel_config), FreeRtos);

    log::info!("Resetting display...");
    panel
        .reset()
        .map_err(|err| anyhow!("display reset failed: {:?}", err))?;

    let renderer = EpaperRenderer::new(panel, clock_config.partial_margin);
    let prices = PriceService::new(
        clock_config.price_url.clone(),
        clock_config.price_pointer.clone(),
    );
    let mut controller =
        DisplayModeController::new(LocalClock, prices, renderer, clock_config, uptime());

    let mut first_render_logged = false;
    loop {
        let tick = controller.tick(uptime());
        if tick.redraw != Redraw::None && !first_render_logged {
            log_heap("first render");
            first_render_logged = true;
        }
        let sleep_ms = u32::try_from(tick.sleep.as_millis()).unwrap_or(u32::MAX);
        FreeRtos::delay_ms(sleep_ms);
    }
}
