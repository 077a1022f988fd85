//! Seam between the renderer and whatever shows the pixels.

use crate::eink::Region;

/// A 400x300 1bpp panel that can refresh fully or through a window.
///
/// Buffers use [`FrameBuffer`](crate::FrameBuffer) layout: row-major,
/// MSB first, 1 = white. `window` holds only the rows of `region`.
pub trait Panel {
    type Error: core::fmt::Debug;

    fn refresh_full(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// `region.x` and `region.w` are multiples of 8.
    fn refresh_partial(&mut self, region: Region, window: &[u8]) -> Result<(), Self::Error>;

    /// Drop panel power between refreshes. The image stays on the glass.
    fn power_off(&mut self) -> Result<(), Self::Error>;
}
