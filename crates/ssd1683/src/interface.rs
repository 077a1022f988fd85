//! Hardware interface abstraction
//!
//! The SSD1683 needs an SPI bus (MOSI + SCK, write only) plus three GPIOs:
//! - **DC**: Data/Command select (output)
//! - **RST**: Reset (output, active low)
//! - **BUSY**: Busy status (input, active high)

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

/// Default time to wait for BUSY to drop before giving up
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 10_000;

/// Trait for hardware interface to SSD1683 controller
///
/// Lets [`Display`](crate::display::Display) work with any SPI + GPIO
/// implementation, and lets tests record the byte stream instead.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a command byte (DC low)
    fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send data bytes (DC high)
    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Pulse RST low for at least 10ms, then wait for the controller to come up
    fn reset<D: DelayNs>(&mut self, delay: &mut D);

    /// Poll BUSY until the controller is idle
    ///
    /// # Errors
    ///
    /// Returns [`InterfaceError::Timeout`] (or the implementation's
    /// equivalent) when BUSY stays high past the timeout.
    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;
}

/// Errors that can occur at the interface level
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
    /// Timeout waiting for busy pin
    Timeout,
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InterfaceError::Spi(e) => write!(f, "SPI error: {e:?}"),
            InterfaceError::Pin(e) => write!(f, "Pin error: {e:?}"),
            InterfaceError::Timeout => write!(f, "Timeout waiting for display"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// [`DisplayInterface`] over embedded-hal v1.0 SPI and GPIO traits
///
/// ```rust,ignore
/// let interface = Interface::new(spi_device, dc_pin, rst_pin, busy_pin);
/// let display = Display::new(interface, config);
/// ```
pub struct Interface<SPI, DC, RST, BUSY> {
    spi: SPI,
    /// low=command, high=data
    dc: DC,
    rst: RST,
    busy: BUSY,
    busy_timeout_ms: u32,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Override how long [`DisplayInterface::busy_wait`] polls
    pub fn with_busy_timeout(mut self, timeout_ms: u32) -> Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }
}

impl<SPI, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi.write(&[command]).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) {
        let _ = self.rst.set_low();
        delay.delay_ms(10);
        let _ = self.rst.set_high();
        delay.delay_ms(10);
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        let mut waited_ms = 0u32;

        loop {
            match self.busy.is_high() {
                Ok(true) => {
                    delay.delay_ms(1);
                    waited_ms += 1;
                    if waited_ms >= self.busy_timeout_ms {
                        log::warn!("ssd1683: BUSY still high after {waited_ms}ms");
                        return Err(InterfaceError::Timeout);
                    }
                }
                Ok(false) => return Ok(()),
                Err(e) => return Err(InterfaceError::Pin(e)),
            }
        }
    }
}
