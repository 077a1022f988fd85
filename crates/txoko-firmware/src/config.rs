//! Build-time settings, baked in from `TXOKO_*` environment variables.

use txoko_ui::config::{DEFAULT_PRICE_POINTER, DEFAULT_PRICE_URL, DEFAULT_TIMEZONE};
use txoko_ui::{ClockConfig, ConfigError};

pub const WIFI_SSID: &str = match option_env!("TXOKO_WIFI_SSID") {
    Some(value) => value,
    None => "",
};

pub const WIFI_PASS: &str = match option_env!("TXOKO_WIFI_PASS") {
    Some(value) => value,
    None => "",
};

const TIMEZONE: &str = match option_env!("TXOKO_TZ") {
    Some(value) => value,
    None => DEFAULT_TIMEZONE,
};

const PRICE_URL: &str = match option_env!("TXOKO_PRICE_URL") {
    Some(value) => value,
    None => DEFAULT_PRICE_URL,
};

const PRICE_POINTER: &str = match option_env!("TXOKO_PRICE_POINTER") {
    Some(value) => value,
    None => DEFAULT_PRICE_POINTER,
};

/// Controller config from the baked-in values and default timings.
pub fn clock_config() -> Result<ClockConfig, ConfigError> {
    ClockConfig::builder()
        .timezone(TIMEZONE)
        .price_url(PRICE_URL)
        .price_pointer(PRICE_POINTER)
        .build()
}
