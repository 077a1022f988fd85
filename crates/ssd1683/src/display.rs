//! Core display operations

use embedded_hal::delay::DelayNs;

use crate::command::{
    BORDER_FOLLOW_LUT_WHITE, BORDER_WAVEFORM, CTRL1_BYPASS_RED, CTRL1_NORMAL, CTRL1_SOURCE_RANGE,
    DATA_ENTRY_MODE, DATA_ENTRY_X_INC_Y_INC, DEEP_SLEEP, DISPLAY_UPDATE_CTRL1,
    DISPLAY_UPDATE_CTRL2, DRIVER_OUTPUT_CONTROL, GATE_SCAN_G0_FIRST, MASTER_ACTIVATION,
    SET_RAM_X_COUNTER, SET_RAM_X_RANGE, SET_RAM_Y_COUNTER, SET_RAM_Y_RANGE, SOFT_RESET,
    TEMP_SENSOR_CONTROL, TEMP_SENSOR_INTERNAL, UPDATE_FULL, UPDATE_PARTIAL, UPDATE_POWER_OFF,
    WRITE_RAM_BW, WRITE_RAM_RED,
};
use crate::config::{Config, Dimensions};
use crate::error::Error;
use crate::interface::DisplayInterface;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Rectangular window of the panel, in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// X coordinate in pixels (multiple of 8)
    pub x: u16,
    /// Y coordinate in pixels
    pub y: u16,
    /// Width in pixels (multiple of 8)
    pub w: u16,
    /// Height in pixels
    pub h: u16,
}

impl Region {
    #[allow(clippy::many_single_char_names)]
    pub fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Region covering the whole panel
    pub fn full(dimensions: &Dimensions) -> Self {
        Self::new(0, 0, dimensions.cols, dimensions.rows)
    }

    /// Bytes per row of this region
    pub fn width_bytes(&self) -> usize {
        self.w as usize / 8
    }

    /// Buffer size in bytes for this region
    pub fn buffer_size(&self) -> usize {
        self.width_bytes() * self.h as usize
    }
}

/// Windowed update request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateRegion<'a> {
    /// Target region
    pub region: Region,
    /// Row-major 1bpp pixels for the region only (0=black, 1=white)
    pub buffer: &'a [u8],
    /// Refresh mode to use for this update
    pub mode: RefreshMode,
}

/// Refresh mode for display updates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefreshMode {
    /// OTP full waveform; flashes, clears ghosting
    #[default]
    Full,
    /// OTP differential waveform; only pixels that differ from RED RAM move
    Partial,
}

/// RAM retention when entering deep sleep
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(u8)]
pub enum DeepSleepMode {
    /// RAM content is preserved
    #[default]
    Mode1 = 0x01,
    /// RAM content is lost
    Mode2 = 0x03,
}

/// Core display driver for SSD1683
///
/// Keeps RED RAM equal to the last displayed frame after every update, so a
/// following [`RefreshMode::Partial`] always compares against what is on
/// the glass.
pub struct Display<I>
where
    I: DisplayInterface,
{
    interface: I,
    config: Config,
    /// Analog rails and clock are up
    is_display_on: bool,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            is_display_on: false,
        }
    }

    /// Perform hardware reset, software reset, and initialization
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface.reset(delay);
        self.send_command(SOFT_RESET)?;
        delay.delay_ms(10);
        self.interface.busy_wait(delay).map_err(Error::Interface)?;
        self.is_display_on = false;
        self.init()
    }

    fn init(&mut self) -> DisplayResult<I> {
        let rows = self.config.dimensions.rows;
        self.send_command(DRIVER_OUTPUT_CONTROL)?;
        self.send_data(&[
            ((rows - 1) % 256) as u8,
            ((rows - 1) / 256) as u8,
            GATE_SCAN_G0_FIRST,
        ])?;

        self.send_command(BORDER_WAVEFORM)?;
        self.send_data(&[BORDER_FOLLOW_LUT_WHITE])?;

        self.send_command(TEMP_SENSOR_CONTROL)?;
        self.send_data(&[TEMP_SENSOR_INTERNAL])?;

        let full = Region::full(&self.config.dimensions);
        self.set_ram_area(full)
    }

    /// Write a whole frame and refresh
    ///
    /// `buffer` is row-major 1bpp, MSB first, 0=black, 1=white.
    pub fn update<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        mode: RefreshMode,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let update = UpdateRegion {
            region: Region::full(&self.config.dimensions),
            buffer,
            mode,
        };
        self.update_region(update, delay)
    }

    /// Write a window of the frame and refresh
    ///
    /// Full mode refreshes the whole glass even for a window; the rest of
    /// the panel shows whatever BW RAM already holds.
    pub fn update_region<D: DelayNs>(
        &mut self,
        update: UpdateRegion<'_>,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let expected_size = update.region.buffer_size();
        if update.buffer.len() < expected_size {
            return Err(Error::BufferTooSmall {
                required: expected_size,
                provided: update.buffer.len(),
            });
        }
        let pixels = &update.buffer[..expected_size];

        self.set_ram_area(update.region)?;
        self.send_command(WRITE_RAM_BW)?;
        self.send_data(pixels)?;

        if update.mode == RefreshMode::Full {
            self.set_ram_area(update.region)?;
            self.send_command(WRITE_RAM_RED)?;
            self.send_data(pixels)?;
        }

        self.refresh(update.mode, delay)?;

        if update.mode == RefreshMode::Partial {
            self.set_ram_area(update.region)?;
            self.send_command(WRITE_RAM_RED)?;
            self.send_data(pixels)?;
        }

        Ok(())
    }

    /// Run the update sequence on whatever RAM currently holds
    pub fn refresh<D: DelayNs>(&mut self, mode: RefreshMode, delay: &mut D) -> DisplayResult<I> {
        let ctrl1 = match mode {
            RefreshMode::Full => CTRL1_BYPASS_RED,
            RefreshMode::Partial => CTRL1_NORMAL,
        };
        self.send_command(DISPLAY_UPDATE_CTRL1)?;
        self.send_data(&[ctrl1, CTRL1_SOURCE_RANGE])?;

        let ctrl2 = match mode {
            RefreshMode::Full => UPDATE_FULL,
            RefreshMode::Partial => UPDATE_PARTIAL,
        };
        self.send_command(DISPLAY_UPDATE_CTRL2)?;
        self.send_data(&[ctrl2])?;
        self.send_command(MASTER_ACTIVATION)?;
        self.interface.busy_wait(delay).map_err(Error::Interface)?;

        // The full sequence ends with analog and clock off
        self.is_display_on = mode == RefreshMode::Partial;
        Ok(())
    }

    /// Switch analog rails and clock off; the image stays on the glass
    pub fn power_off<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        if !self.is_display_on {
            return Ok(());
        }
        self.send_command(DISPLAY_UPDATE_CTRL2)?;
        self.send_data(&[UPDATE_POWER_OFF])?;
        self.send_command(MASTER_ACTIVATION)?;
        self.interface.busy_wait(delay).map_err(Error::Interface)?;
        self.is_display_on = false;
        Ok(())
    }

    /// Power off and enter deep sleep; only a hardware reset wakes the controller
    pub fn deep_sleep<D: DelayNs>(
        &mut self,
        delay: &mut D,
        mode: DeepSleepMode,
    ) -> DisplayResult<I> {
        self.power_off(delay)?;
        self.send_command(DEEP_SLEEP)?;
        self.send_data(&[mode as u8])?;
        Ok(())
    }

    /// Whether the analog rails are currently up
    pub fn is_powered(&self) -> bool {
        self.is_display_on
    }

    /// Set the RAM window and counters
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRamArea` if:
    /// - w == 0 or h == 0
    /// - x + w > cols or y + h > rows
    /// - x or w is not a multiple of 8
    fn set_ram_area(&mut self, region: Region) -> DisplayResult<I> {
        let Region { x, y, w, h } = region;
        if w == 0 || h == 0 {
            return Err(Error::InvalidRamArea { x, y, w, h });
        }
        if x.saturating_add(w) > self.config.dimensions.cols
            || y.saturating_add(h) > self.config.dimensions.rows
        {
            return Err(Error::InvalidRamArea { x, y, w, h });
        }
        if x % 8 != 0 || w % 8 != 0 {
            return Err(Error::InvalidRamArea { x, y, w, h });
        }

        self.send_command(DATA_ENTRY_MODE)?;
        self.send_data(&[DATA_ENTRY_X_INC_Y_INC])?;

        // X is addressed in bytes, at most 50 on this controller
        let x_start = (x / 8) as u8;
        let x_end = ((x + w - 1) / 8) as u8;
        self.send_command(SET_RAM_X_RANGE)?;
        self.send_data(&[x_start, x_end])?;

        let y_end = y + h - 1;
        self.send_command(SET_RAM_Y_RANGE)?;
        self.send_data(&[
            (y % 256) as u8,
            (y / 256) as u8,
            (y_end % 256) as u8,
            (y_end / 256) as u8,
        ])?;

        self.send_command(SET_RAM_X_COUNTER)?;
        self.send_data(&[x_start])?;

        self.send_command(SET_RAM_Y_COUNTER)?;
        self.send_data(&[(y % 256) as u8, (y / 256) as u8])?;

        Ok(())
    }

    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.interface.send_data(data).map_err(Error::Interface)
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
