//! Display configuration types and builder

pub use crate::error::{BuilderError, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS};

/// Display dimensions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    /// Number of rows (height in pixels, corresponds to gate outputs)
    pub rows: u16,
    /// Number of columns (width in pixels, corresponds to source outputs)
    pub cols: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - rows > MAX_GATE_OUTPUTS
    /// - cols > MAX_SOURCE_OUTPUTS
    /// - cols % 8 != 0 (RAM X addressing is in whole bytes)
    pub fn new(rows: u16, cols: u16) -> Result<Self, BuilderError> {
        if rows == 0 || rows > MAX_GATE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        if cols == 0 || cols > MAX_SOURCE_OUTPUTS || cols % 8 != 0 {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Bytes per row of 1bpp pixel data
    pub fn width_bytes(&self) -> usize {
        self.cols as usize / 8
    }

    /// Calculate required buffer size in bytes
    pub fn buffer_size(&self) -> usize {
        self.width_bytes() * self.rows as usize
    }
}

/// Display configuration
///
/// Only the panel geometry varies; the remaining init bytes are fixed for
/// the GYE042A87 (see `command`).
#[derive(Clone, Debug)]
pub struct Config {
    pub dimensions: Dimensions,
}

/// Builder for [`Config`]
///
/// ```
/// use ssd1683::{Builder, Dimensions};
///
/// let config = Builder::new()
///     .dimensions(Dimensions::new(300, 400).unwrap())
///     .build()
///     .expect("valid configuration");
/// assert_eq!(config.dimensions.buffer_size(), 15_000);
/// ```
#[derive(Default)]
pub struct Builder {
    dimensions: Option<Dimensions>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// # Errors
    ///
    /// `BuilderError::MissingDimensions` if dimensions were not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            dimensions: self.dimensions.ok_or(BuilderError::MissingDimensions)?,
        })
    }
}
