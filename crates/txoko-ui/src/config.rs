//! Runtime configuration for the clock.
//!
//! Firmware fills this from build-time environment values; the simulator and
//! tests use the defaults. Everything goes through [`ClockConfigBuilder::build`]
//! so bad values are caught before the control loop starts.

use alloc::string::{String, ToString};
use core::time::Duration;

/// Central European time with EU daylight-saving rules.
pub const DEFAULT_TIMEZONE: &str = "CET-1CEST,M3.5.0/2,M10.5.0/3";
pub const DEFAULT_PRICE_URL: &str = "https://api.coinbase.com/v2/prices/BTC-USD/spot";
/// JSON pointer to the decimal price inside the response body.
pub const DEFAULT_PRICE_POINTER: &str = "/data/amount";
pub const DEFAULT_PRICE_CAPTION: &str = "BTC/USD";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("timezone must not be empty")]
    EmptyTimezone,
    #[error("price url must be http(s): {0}")]
    InvalidPriceUrl(String),
    #[error("price pointer must start with '/': {0}")]
    InvalidPricePointer(String),
}

/// Validated clock configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockConfig {
    /// Time spent in each display mode before flipping.
    pub mode_duration: Duration,
    /// Steady-state delay between controller ticks.
    pub tick_interval: Duration,
    /// Delay after a failed clock read.
    pub clock_retry_backoff: Duration,
    /// Pixels added around old and new text boxes for partial refresh.
    pub partial_margin: u32,
    /// POSIX TZ string.
    pub timezone: String,
    pub price_url: String,
    pub price_pointer: String,
    pub price_caption: String,
    pub clock_caption: Option<String>,
}

impl ClockConfig {
    pub fn builder() -> ClockConfigBuilder {
        ClockConfigBuilder::default()
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            mode_duration: Duration::from_secs(300),
            tick_interval: Duration::from_secs(1),
            clock_retry_backoff: Duration::from_secs(5),
            partial_margin: 8,
            timezone: DEFAULT_TIMEZONE.to_string(),
            price_url: DEFAULT_PRICE_URL.to_string(),
            price_pointer: DEFAULT_PRICE_POINTER.to_string(),
            price_caption: DEFAULT_PRICE_CAPTION.to_string(),
            clock_caption: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClockConfigBuilder {
    config: ClockConfig,
}

impl ClockConfigBuilder {
    pub fn mode_duration(mut self, value: Duration) -> Self {
        self.config.mode_duration = value;
        self
    }

    pub fn tick_interval(mut self, value: Duration) -> Self {
        self.config.tick_interval = value;
        self
    }

    pub fn clock_retry_backoff(mut self, value: Duration) -> Self {
        self.config.clock_retry_backoff = value;
        self
    }

    pub fn partial_margin(mut self, value: u32) -> Self {
        self.config.partial_margin = value;
        self
    }

    pub fn timezone(mut self, value: impl Into<String>) -> Self {
        self.config.timezone = value.into();
        self
    }

    pub fn price_url(mut self, value: impl Into<String>) -> Self {
        self.config.price_url = value.into();
        self
    }

    pub fn price_pointer(mut self, value: impl Into<String>) -> Self {
        self.config.price_pointer = value.into();
        self
    }

    pub fn price_caption(mut self, value: impl Into<String>) -> Self {
        self.config.price_caption = value.into();
        self
    }

    pub fn clock_caption(mut self, value: Option<String>) -> Self {
        self.config.clock_caption = value;
        self
    }

    pub fn build(self) -> Result<ClockConfig, ConfigError> {
        let config = self.config;
        if config.mode_duration.is_zero() {
            return Err(ConfigError::ZeroDuration("mode_duration"));
        }
        if config.tick_interval.is_zero() {
            return Err(ConfigError::ZeroDuration("tick_interval"));
        }
        if config.clock_retry_backoff.is_zero() {
            return Err(ConfigError::ZeroDuration("clock_retry_backoff"));
        }
        if config.timezone.trim().is_empty() {
            return Err(ConfigError::EmptyTimezone);
        }
        if !(config.price_url.starts_with("https://") || config.price_url.starts_with("http://")) {
            return Err(ConfigError::InvalidPriceUrl(config.price_url));
        }
        if !config.price_pointer.starts_with('/') {
            return Err(ConfigError::InvalidPricePointer(config.price_pointer));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build() {
        let config = ClockConfig::builder().build().unwrap();
        assert_eq!(config.mode_duration, Duration::from_secs(300));
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.clock_retry_backoff, Duration::from_secs(5));
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
        assert_eq!(config.price_pointer, "/data/amount");
        assert!(config.clock_caption.is_none());
    }

    #[test]
    fn zero_durations_rejected() {
        let err = ClockConfig::builder()
            .mode_duration(Duration::ZERO)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroDuration("mode_duration"));

        let err = ClockConfig::builder()
            .clock_retry_backoff(Duration::ZERO)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroDuration("clock_retry_backoff"));
    }

    #[test]
    fn blank_timezone_rejected() {
        let err = ClockConfig::builder().timezone("  ").build().unwrap_err();
        assert_eq!(err, ConfigError::EmptyTimezone);
    }

    #[test]
    fn price_endpoint_validated() {
        let err = ClockConfig::builder()
            .price_url("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPriceUrl(_)));

        let err = ClockConfig::builder()
            .price_pointer("data.amount")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPricePointer("data.amount".to_string())
        );
    }
}
