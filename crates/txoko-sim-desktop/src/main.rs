//! Desktop SDL simulator for the Txoko clock.
//!
//! Runs the real controller and renderer against an SDL window standing in
//! for the e-paper panel. Environment knobs:
//! `TXOKO_SIM_MODE_SECS` (seconds per mode, default 20),
//! `TXOKO_SIM_SPEED` (clock speed-up factor, default 1),
//! `TXOKO_SIM_FAIL_EVERY` (every Nth price fetch fails, default 4, 0 = never).

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use txoko_ui::{
    ClockConfig, ClockError, ClockSource, DisplayModeController, EpaperRenderer, FrameBuffer,
    Panel, PriceError, PriceSource, Region, WallTime, DISPLAY_HEIGHT, DISPLAY_WIDTH,
};

const POLL_SLICE: Duration = Duration::from_millis(50);

/// SDL window that shows whatever the controller refreshes.
struct SimulatorPanel {
    display: SimulatorDisplay<BinaryColor>,
    window: Window,
    shown: bool,
}

impl SimulatorPanel {
    fn new() -> Self {
        let output_settings = OutputSettingsBuilder::new().scale(2).build();
        Self {
            display: SimulatorDisplay::new(Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)),
            window: Window::new("Txoko Clock", &output_settings),
            shown: false,
        }
    }

    /// Copy packed 1-bit rows (0 = black) into the simulator display.
    fn blit(&mut self, region: Region, bytes: &[u8]) {
        let row_bytes = region.width_bytes();
        for (dy, row) in bytes.chunks(row_bytes).take(region.h as usize).enumerate() {
            for dx in 0..region.w as usize {
                let black = row[dx / 8] & (0x80 >> (dx % 8)) == 0;
                let color = if black {
                    BinaryColor::On
                } else {
                    BinaryColor::Off
                };
                let point = Point::new(
                    i32::from(region.x) + dx as i32,
                    i32::from(region.y) + dy as i32,
                );
                let _ = Pixel(point, color).draw(&mut self.display);
            }
        }
        self.window.update(&self.display);
        self.shown = true;
    }

    /// Drain window events; `false` once the window was closed.
    fn pump_events(&mut self) -> bool {
        if !self.shown {
            return true;
        }
        let events = self.window.events().collect::<Vec<_>>();
        !events
            .iter()
            .any(|event| matches!(event, SimulatorEvent::Quit))
    }
}

impl Panel for SimulatorPanel {
    type Error = std::convert::Infallible;

    fn refresh_full(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        let full = Region::new(0, 0, DISPLAY_WIDTH as u16, DISPLAY_HEIGHT as u16);
        self.blit(full, &frame[..FrameBuffer::BUFFER_SIZE]);
        log::debug!("sim: full refresh");
        Ok(())
    }

    fn refresh_partial(&mut self, region: Region, window: &[u8]) -> Result<(), Self::Error> {
        self.blit(region, window);
        log::debug!("sim: partial refresh {:?}", region);
        Ok(())
    }

    fn power_off(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// UTC wall clock, optionally running faster than real time.
struct SystemClock {
    started: Instant,
    epoch_at_start: u64,
    speed: u64,
}

impl SystemClock {
    fn new(speed: u64) -> Self {
        let epoch_at_start = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            started: Instant::now(),
            epoch_at_start,
            speed: speed.max(1),
        }
    }
}

impl ClockSource for SystemClock {
    fn now(&mut self) -> Result<WallTime, ClockError> {
        if self.epoch_at_start == 0 {
            return Err(ClockError::NotSynchronized);
        }
        let secs = self.epoch_at_start + self.started.elapsed().as_secs() * self.speed;
        let of_day = secs % 86_400;
        WallTime::new((of_day / 3600) as u8, (of_day % 3600 / 60) as u8)
            .ok_or(ClockError::Conversion)
    }
}

/// Deterministic random walk around 67k with injected failures.
struct RandomWalkPrices {
    price: f64,
    state: u64,
    fetches: u64,
    fail_every: u64,
}

impl RandomWalkPrices {
    fn new(fail_every: u64) -> Self {
        Self {
            price: 67_000.0,
            state: 0x2545_F491_4F6C_DD1D,
            fetches: 0,
            fail_every,
        }
    }

    fn next_step(&mut self) -> f64 {
        // xorshift64
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        (self.state % 2001) as f64 - 1000.0
    }
}

impl PriceSource for RandomWalkPrices {
    fn fetch_price(&mut self) -> Result<f64, PriceError> {
        self.fetches += 1;
        if self.fail_every > 0 && self.fetches % self.fail_every == 0 {
            return Err(PriceError::Transport(String::from("simulated outage")));
        }
        self.price = (self.price + self.next_step()).max(1.0);
        Ok(self.price)
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ClockConfig::builder()
        .mode_duration(Duration::from_secs(env_u64("TXOKO_SIM_MODE_SECS", 20)))
        .clock_caption(Some(String::from("UTC")))
        .build()?;

    println!("Txoko Clock Simulator");
    println!("  Mode flips every {}s", config.mode_duration.as_secs());
    println!("  Close the window to quit");

    let renderer = EpaperRenderer::new(SimulatorPanel::new(), config.partial_margin);
    let clock = SystemClock::new(env_u64("TXOKO_SIM_SPEED", 1));
    let prices = RandomWalkPrices::new(env_u64("TXOKO_SIM_FAIL_EVERY", 4));

    let started = Instant::now();
    let mut controller = DisplayModeController::new(clock, prices, renderer, config, Duration::ZERO);

    loop {
        let tick = controller.tick(started.elapsed());
        let wake = Instant::now() + tick.sleep;
        while Instant::now() < wake {
            if !controller.renderer_mut().panel_mut().pump_events() {
                return Ok(());
            }
            std::thread::sleep(POLL_SLICE);
        }
    }
}
