//! Host-side scenario harness: the real controller and renderer driven by
//! scripted sources on virtual time, drawing into a [`RecordingPanel`].

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use embedded_graphics::pixelcolor::BinaryColor;
use png::{BitDepth, ColorType, Encoder};
use txoko_ui::{
    ClockConfig, ClockError, ClockSource, ControllerState, DisplayModeController, EpaperRenderer,
    PriceError, PriceSource, RecordingPanel, Tick, WallTime, DISPLAY_HEIGHT, DISPLAY_WIDTH,
};

/// Clock that reports whatever the test last set.
#[derive(Debug, Clone)]
pub struct ScriptedClock {
    current: Result<WallTime, ClockError>,
    reads: usize,
}

impl ScriptedClock {
    pub fn new(start: WallTime) -> Self {
        Self {
            current: Ok(start),
            reads: 0,
        }
    }

    pub fn set(&mut self, time: WallTime) {
        self.current = Ok(time);
    }

    pub fn fail(&mut self, error: ClockError) {
        self.current = Err(error);
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl ClockSource for ScriptedClock {
    fn now(&mut self) -> Result<WallTime, ClockError> {
        self.reads += 1;
        self.current.clone()
    }
}

/// Price feed that replays queued results, then repeats `fallback`.
#[derive(Debug, Clone)]
pub struct ScriptedPrices {
    queue: VecDeque<Result<f64, PriceError>>,
    fallback: Result<f64, PriceError>,
    fetches: usize,
}

impl ScriptedPrices {
    pub fn new(fallback: Result<f64, PriceError>) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback,
            fetches: 0,
        }
    }

    pub fn push(&mut self, result: Result<f64, PriceError>) {
        self.queue.push_back(result);
    }

    pub fn fetches(&self) -> usize {
        self.fetches
    }
}

impl PriceSource for ScriptedPrices {
    fn fetch_price(&mut self) -> Result<f64, PriceError> {
        self.fetches += 1;
        self.queue
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

pub type ScenarioController =
    DisplayModeController<ScriptedClock, ScriptedPrices, EpaperRenderer<RecordingPanel>>;

/// Couples the controller with a virtual monotonic clock.
pub struct ClockScenario {
    controller: ScenarioController,
    now: Duration,
}

impl ClockScenario {
    /// Default config, wall clock at `hour:minute`, prices at 67,123.45.
    pub fn new(hour: u8, minute: u8) -> Self {
        Self::with_config(ClockConfig::default(), hour, minute)
    }

    pub fn with_config(config: ClockConfig, hour: u8, minute: u8) -> Self {
        let start = WallTime::new(hour, minute).expect("scenario start time should be valid");
        let renderer = EpaperRenderer::new(RecordingPanel::new(), config.partial_margin);
        let controller = DisplayModeController::new(
            ScriptedClock::new(start),
            ScriptedPrices::new(Ok(67_123.45)),
            renderer,
            config,
            Duration::ZERO,
        );
        Self {
            controller,
            now: Duration::ZERO,
        }
    }

    /// Tick at the current virtual time.
    pub fn tick(&mut self) -> Tick {
        self.controller.tick(self.now)
    }

    /// Advance virtual time without ticking.
    pub fn advance(&mut self, elapsed: Duration) {
        self.now += elapsed;
    }

    /// Advance virtual time, then tick.
    pub fn tick_after(&mut self, elapsed: Duration) -> Tick {
        self.now += elapsed;
        self.tick()
    }

    /// Tick repeatedly, sleeping as instructed, until `elapsed` has passed.
    /// Returns every tick taken.
    pub fn run_for(&mut self, elapsed: Duration) -> Vec<Tick> {
        let end = self.now + elapsed;
        let mut ticks = Vec::new();
        while self.now < end {
            let tick = self.tick();
            self.now += tick.sleep;
            ticks.push(tick);
        }
        ticks
    }

    pub fn set_time(&mut self, hour: u8, minute: u8) {
        let time = WallTime::new(hour, minute).expect("scenario time should be valid");
        self.controller.clock_mut().set(time);
    }

    pub fn fail_clock(&mut self) {
        self.controller.clock_mut().fail(ClockError::NotSynchronized);
    }

    pub fn queue_price(&mut self, result: Result<f64, PriceError>) {
        self.controller.prices_mut().push(result);
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn state(&self) -> &ControllerState {
        self.controller.state()
    }

    pub fn controller_mut(&mut self) -> &mut ScenarioController {
        &mut self.controller
    }

    pub fn panel(&self) -> &RecordingPanel {
        self.controller.renderer().panel()
    }

    pub fn panel_mut(&mut self) -> &mut RecordingPanel {
        self.controller.renderer_mut().panel_mut()
    }

    /// Text currently shown in the headline slot.
    pub fn headline(&self) -> Option<&str> {
        self.controller.renderer().headline()
    }

    pub fn price_fetches(&self) -> usize {
        self.controller.prices().fetches()
    }

    /// Save what the panel shows to a PNG (white = Off, black = On).
    pub fn save_screenshot_png(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let panel = self.panel();
        let mut data = Vec::with_capacity((DISPLAY_WIDTH * DISPLAY_HEIGHT) as usize);
        for y in 0..DISPLAY_HEIGHT {
            for x in 0..DISPLAY_WIDTH {
                data.push(match panel.pixel(x, y) {
                    BinaryColor::On => 0u8,
                    BinaryColor::Off => 255u8,
                });
            }
        }

        let file = File::create(path).map_err(|e| e.to_string())?;
        let writer = BufWriter::new(file);
        let mut encoder = Encoder::new(writer, DISPLAY_WIDTH, DISPLAY_HEIGHT);
        encoder.set_color(ColorType::Grayscale);
        encoder.set_depth(BitDepth::Eight);
        let mut png_writer = encoder.write_header().map_err(|e| e.to_string())?;
        png_writer
            .write_image_data(&data)
            .map_err(|e| e.to_string())
    }
}
