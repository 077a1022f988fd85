//! In-memory panel that records refreshes.
//!
//! Keeps its own copy of the "glass" so tests can check what a real panel
//! would show after a sequence of full and windowed refreshes.

use alloc::vec;
use alloc::vec::Vec;

use embedded_graphics::pixelcolor::BinaryColor;

use crate::buffered_display::FrameBuffer;
use crate::eink::Region;
use crate::panel::Panel;
use crate::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    Full,
    Partial(Region),
    PowerOff,
}

/// Injected failure from [`RecordingPanel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelFault;

#[derive(Debug, Clone)]
pub struct RecordingPanel {
    glass: Vec<u8>,
    events: Vec<PanelEvent>,
    failures_pending: usize,
}

impl RecordingPanel {
    pub fn new() -> Self {
        Self {
            glass: vec![0xFF; FrameBuffer::BUFFER_SIZE],
            events: Vec::new(),
            failures_pending: 0,
        }
    }

    /// Make the next `count` refreshes fail without touching the glass.
    pub fn fail_next(&mut self, count: usize) {
        self.failures_pending = count;
    }

    pub fn events(&self) -> &[PanelEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn full_refreshes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PanelEvent::Full))
            .count()
    }

    pub fn partial_refreshes(&self) -> Vec<Region> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PanelEvent::Partial(region) => Some(*region),
                _ => None,
            })
            .collect()
    }

    pub fn glass(&self) -> &[u8] {
        &self.glass
    }

    pub fn pixel(&self, x: u32, y: u32) -> BinaryColor {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return BinaryColor::Off;
        }
        let byte = self.glass[y as usize * FrameBuffer::WIDTH_BYTES + x as usize / 8];
        if byte & (0x80 >> (x % 8)) == 0 {
            BinaryColor::On
        } else {
            BinaryColor::Off
        }
    }

    /// Black pixels inside `region`.
    pub fn black_pixels_in(&self, region: Region) -> usize {
        let mut count = 0;
        for y in region.y..region.y + region.h {
            for x in region.x..region.x + region.w {
                if self.pixel(x.into(), y.into()) == BinaryColor::On {
                    count += 1;
                }
            }
        }
        count
    }

    fn take_failure(&mut self) -> Result<(), PanelFault> {
        if self.failures_pending > 0 {
            self.failures_pending -= 1;
            return Err(PanelFault);
        }
        Ok(())
    }
}

impl Default for RecordingPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for RecordingPanel {
    type Error = PanelFault;

    fn refresh_full(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.take_failure()?;
        self.glass.copy_from_slice(&frame[..FrameBuffer::BUFFER_SIZE]);
        self.events.push(PanelEvent::Full);
        Ok(())
    }

    fn refresh_partial(&mut self, region: Region, window: &[u8]) -> Result<(), Self::Error> {
        self.take_failure()?;
        let row = region.width_bytes();
        for (i, chunk) in window.chunks(row).take(region.h as usize).enumerate() {
            let start = (region.y as usize + i) * FrameBuffer::WIDTH_BYTES + region.x as usize / 8;
            self.glass[start..start + row].copy_from_slice(chunk);
        }
        self.events.push(PanelEvent::Partial(region));
        Ok(())
    }

    fn power_off(&mut self) -> Result<(), Self::Error> {
        self.events.push(PanelEvent::PowerOff);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_refresh_lands_in_window() {
        let mut panel = RecordingPanel::new();
        let region = Region::new(16, 2, 16, 2);
        panel.refresh_partial(region, &[0x00, 0x00, 0x0F, 0xF0]).unwrap();

        assert_eq!(panel.pixel(16, 2), BinaryColor::On);
        assert_eq!(panel.pixel(15, 2), BinaryColor::Off);
        assert_eq!(panel.pixel(16, 3), BinaryColor::On);
        assert_eq!(panel.pixel(20, 3), BinaryColor::Off);
        assert_eq!(panel.black_pixels_in(region), 16 + 8);
        assert_eq!(panel.events(), &[PanelEvent::Partial(region)]);
    }

    #[test]
    fn injected_failures_leave_glass_alone() {
        let mut panel = RecordingPanel::new();
        panel.fail_next(1);
        let black = vec![0u8; FrameBuffer::BUFFER_SIZE];
        assert_eq!(panel.refresh_full(&black), Err(PanelFault));
        assert_eq!(panel.full_refreshes(), 0);
        assert!(panel.glass().iter().all(|b| *b == 0xFF));

        panel.refresh_full(&black).unwrap();
        assert_eq!(panel.full_refreshes(), 1);
        assert_eq!(panel.pixel(399, 299), BinaryColor::On);
    }
}
