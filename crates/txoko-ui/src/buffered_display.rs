//! Offscreen 1bpp frame for the 4.2" panel
//!
//! Drawing goes to this buffer first; the renderer then ships either the
//! whole buffer or a byte-aligned window of it to the controller.

use alloc::vec;
use alloc::vec::Vec;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use crate::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Frame buffer in native SSD1683 layout
///
/// Row-major, MSB first, 1 = white. The GYE042A87 is mounted landscape, so
/// no coordinate transpose is needed. `BinaryColor::On` draws black.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    buffer: Vec<u8>,
}

impl FrameBuffer {
    pub const WIDTH_BYTES: usize = DISPLAY_WIDTH as usize / 8;

    /// Total buffer size (15KB)
    pub const BUFFER_SIZE: usize = Self::WIDTH_BYTES * DISPLAY_HEIGHT as usize;

    /// Create a white frame
    pub fn new() -> Self {
        Self {
            buffer: vec![0xFF; Self::BUFFER_SIZE],
        }
    }

    /// Clear buffer to white
    pub fn clear(&mut self) {
        self.buffer.fill(0xFF);
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        if x < 0 || y < 0 || x >= DISPLAY_WIDTH as i32 || y >= DISPLAY_HEIGHT as i32 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let byte_index = y * Self::WIDTH_BYTES + x / 8;
        let bit = 0x80u8 >> (x % 8);

        match color {
            BinaryColor::On => self.buffer[byte_index] &= !bit,
            BinaryColor::Off => self.buffer[byte_index] |= bit,
        }
    }

    /// Pixel at (x, y); white outside the panel
    pub fn pixel(&self, x: i32, y: i32) -> BinaryColor {
        if x < 0 || y < 0 || x >= DISPLAY_WIDTH as i32 || y >= DISPLAY_HEIGHT as i32 {
            return BinaryColor::Off;
        }
        let (x, y) = (x as usize, y as usize);
        let byte = self.buffer[y * Self::WIDTH_BYTES + x / 8];
        if byte & (0x80 >> (x % 8)) == 0 {
            BinaryColor::On
        } else {
            BinaryColor::Off
        }
    }

    /// Raw bytes, ready for the driver
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let black = self.buffer.iter().map(|b| b.count_zeros()).sum::<u32>();
        f.debug_struct("FrameBuffer")
            .field("bytes", &self.buffer.len())
            .field("black_pixels", &black)
            .finish()
    }
}
