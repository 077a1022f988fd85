//! Shared logic for the Txoko e-paper clock.
//! Works on ESP32 and desktop.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::unreachable,
        clippy::unwrap_used
    )
)]

extern crate alloc;

pub mod buffered_display;
pub mod config;
pub mod controller;
pub mod diff;
pub mod eink;
pub mod layout;
pub mod mode;
pub mod panel;
pub mod price;
pub mod renderer;
pub mod sources;
pub mod test_panel;

pub use buffered_display::FrameBuffer;
pub use config::{ClockConfig, ClockConfigBuilder, ConfigError};
pub use controller::{DisplayModeController, Redraw, Tick};
pub use diff::{copy_region, extract_region, region_differs};
pub use eink::{
    Builder, Dimensions, DisplayInterface, EinkDisplay, EinkError, EinkInterface, EinkPanel,
    RefreshMode, Region, UpdateRegion,
};
pub use layout::{centered_origin, partial_window};
pub use mode::{ControllerState, DisplayMode};
pub use panel::Panel;
pub use price::{format_price, parse_price, PRICE_PLACEHOLDER};
pub use renderer::{EpaperRenderer, FrameContent, Renderer, StagedFrame};
pub use sources::{ClockError, ClockSource, PriceError, PriceSource, WallTime};
pub use test_panel::{PanelEvent, PanelFault, RecordingPanel};

/// Panel dimensions (landscape).
/// The GYE042A87 is 400x300 in its native orientation.
pub const DISPLAY_WIDTH: u32 = 400;
pub const DISPLAY_HEIGHT: u32 = 300;
