//! Collaborators the controller reads from: wall clock and price feed.

use alloc::string::String;
use core::fmt;

/// Local wall-clock time, minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    hour: u8,
    minute: u8,
}

impl WallTime {
    /// Returns `None` unless `hour < 24` and `minute < 60`.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("wall clock not synchronized")]
    NotSynchronized,
    #[error("local time conversion failed")]
    Conversion,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PriceError {
    #[error("HTTP status {0}")]
    Http(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("response too large ({0} bytes)")]
    ResponseTooLarge(usize),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("field {0} missing from response")]
    MissingField(String),
    #[error("invalid price {0}")]
    InvalidPrice(f64),
}

/// Source of local wall-clock time.
pub trait ClockSource {
    fn now(&mut self) -> Result<WallTime, ClockError>;
}

/// One-shot price lookup. No caching or retry.
pub trait PriceSource {
    fn fetch_price(&mut self) -> Result<f64, PriceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn wall_time_formats_zero_padded() {
        assert_eq!(WallTime::new(9, 5).unwrap().to_string(), "09:05");
        assert_eq!(WallTime::new(23, 59).unwrap().to_string(), "23:59");
    }

    #[test]
    fn wall_time_rejects_out_of_range() {
        assert!(WallTime::new(24, 0).is_none());
        assert!(WallTime::new(0, 60).is_none());
    }
}
