//! E-ink display driver wrapper for the Txoko clock
//!
//! Keeps the firmware decoupled from the ssd1683 specifics and adapts the
//! driver to the [`Panel`] seam the renderer draws through.

use embedded_hal::delay::DelayNs;

use crate::panel::Panel;

/// E-ink display handle
pub type EinkDisplay<Interface> = ssd1683::Display<Interface>;

/// E-ink interface handle
pub type EinkInterface<SPI, DC, RST, BUSY> = ssd1683::Interface<SPI, DC, RST, BUSY>;

/// Display refresh modes
pub use ssd1683::RefreshMode;
/// Partial update region helpers
pub use ssd1683::{Region, UpdateRegion};

/// Display configuration builder
pub use ssd1683::Builder;

/// Display dimensions
pub use ssd1683::Dimensions;

/// Display interface trait
pub use ssd1683::DisplayInterface;

/// Re-export ssd1683 errors
pub use ssd1683::Error as EinkError;

/// Re-export the driver crate (only for advanced usage)
pub use ssd1683;

/// [`Panel`] backed by a real SSD1683 controller.
pub struct EinkPanel<I, D>
where
    I: DisplayInterface,
{
    display: EinkDisplay<I>,
    delay: D,
}

impl<I, D> EinkPanel<I, D>
where
    I: DisplayInterface,
    D: DelayNs,
{
    pub fn new(display: EinkDisplay<I>, delay: D) -> Self {
        Self { display, delay }
    }

    /// Hardware reset plus controller init. Call once before the first refresh.
    pub fn reset(&mut self) -> Result<(), EinkError<I>> {
        self.display.reset(&mut self.delay)
    }

    pub fn display(&self) -> &EinkDisplay<I> {
        &self.display
    }
}

impl<I, D> Panel for EinkPanel<I, D>
where
    I: DisplayInterface,
    D: DelayNs,
{
    type Error = EinkError<I>;

    fn refresh_full(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.display.update(frame, RefreshMode::Full, &mut self.delay)
    }

    fn refresh_partial(&mut self, region: Region, window: &[u8]) -> Result<(), Self::Error> {
        self.display.update_region(
            UpdateRegion {
                region,
                buffer: window,
                mode: RefreshMode::Partial,
            },
            &mut self.delay,
        )
    }

    fn power_off(&mut self) -> Result<(), Self::Error> {
        self.display.power_off(&mut self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct NullBus;

    impl DisplayInterface for NullBus {
        type Error = core::convert::Infallible;

        fn send_command(&mut self, _command: u8) -> Result<(), Self::Error> {
            Ok(())
        }

        fn send_data(&mut self, _data: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}

        fn busy_wait<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    struct NoDelay;
    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn panel() -> EinkPanel<NullBus, NoDelay> {
        let config = Builder::new()
            .dimensions(Dimensions::new(300, 400).unwrap())
            .build()
            .unwrap();
        EinkPanel::new(EinkDisplay::new(NullBus, config), NoDelay)
    }

    #[test]
    fn partial_refresh_then_power_off() {
        let mut panel = panel();
        panel.reset().unwrap();
        let region = Region::new(96, 100, 208, 80);
        let window = vec![0xFF; region.buffer_size()];
        panel.refresh_partial(region, &window).unwrap();
        assert!(panel.display().is_powered());
        panel.power_off().unwrap();
        assert!(!panel.display().is_powered());
    }

    #[test]
    fn partial_refresh_rejects_unaligned_window() {
        let mut panel = panel();
        let region = Region::new(4, 0, 16, 4);
        let window = vec![0xFF; 8];
        assert!(matches!(
            panel.refresh_partial(region, &window),
            Err(EinkError::InvalidRamArea { x: 4, .. })
        ));
    }
}
