//! Frame rendering for the clock and price screens.
//!
//! All drawing happens in an offscreen [`FrameBuffer`]. A [`StagedFrame`]
//! borrows the renderer for one drawing session and reaches the panel only
//! through [`StagedFrame::commit`]; dropping it uncommitted puts the buffer
//! back to the last committed image.

use alloc::string::String;
use alloc::vec::Vec;

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{renderer::TextRenderer, Alignment, Baseline, Text, TextStyleBuilder},
};
use profont::{PROFONT_14_POINT, PROFONT_24_POINT};

use crate::buffered_display::FrameBuffer;
use crate::diff::{copy_region, extract_region, region_differs};
use crate::eink::Region;
use crate::layout::{centered_origin, partial_window};
use crate::panel::Panel;

/// Top edge of the caption line.
const CAPTION_TOP: i32 = 14;

/// What a full frame shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContent<'a> {
    /// Large centered text.
    pub headline: &'a str,
    /// Small line near the top edge.
    pub caption: Option<&'a str>,
}

pub trait Renderer {
    type Error: core::fmt::Debug;

    /// Clear, draw border, caption and centered headline, full refresh.
    fn render_full_frame(&mut self, content: &FrameContent<'_>) -> Result<(), Self::Error>;

    /// Replace the headline, refreshing only the window around the old and new text.
    fn render_partial_frame(&mut self, text: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Full,
    Window(Region),
}

/// [`Renderer`] that draws into a frame buffer and pushes it to a [`Panel`].
pub struct EpaperRenderer<P: Panel> {
    panel: P,
    frame: FrameBuffer,
    /// Image last pushed to the panel
    committed: Vec<u8>,
    scratch: Vec<u8>,
    margin: u32,
    headline: String,
    headline_box: Option<Rectangle>,
    caption: Option<String>,
}

impl<P: Panel> EpaperRenderer<P> {
    /// `margin` is added around old and new headline boxes for partial refresh.
    pub fn new(panel: P, margin: u32) -> Self {
        let frame = FrameBuffer::new();
        let committed = frame.buffer().to_vec();
        Self {
            panel,
            frame,
            committed,
            scratch: Vec::new(),
            margin,
            headline: String::new(),
            headline_box: None,
            caption: None,
        }
    }

    /// Start a whole-panel drawing session on a cleared frame.
    pub fn stage_full(&mut self) -> StagedFrame<'_, P> {
        self.frame.clear();
        StagedFrame {
            renderer: self,
            target: Target::Full,
        }
    }

    /// Start a session whose commit refreshes only `region`.
    ///
    /// Pixels drawn outside `region` are discarded on commit.
    pub fn stage_window(&mut self, region: Region) -> StagedFrame<'_, P> {
        StagedFrame {
            renderer: self,
            target: Target::Window(region),
        }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Headline currently on the panel.
    pub fn headline(&self) -> Option<&str> {
        self.headline_box.map(|_| self.headline.as_str())
    }

    pub fn headline_box(&self) -> Option<Rectangle> {
        self.headline_box
    }

    fn remember(&mut self, headline: &str, bbox: Rectangle) {
        self.headline.clear();
        self.headline.push_str(headline);
        self.headline_box = Some(bbox);
    }
}

impl<P: Panel> Renderer for EpaperRenderer<P> {
    type Error = P::Error;

    fn render_full_frame(&mut self, content: &FrameContent<'_>) -> Result<(), Self::Error> {
        let mut staged = self.stage_full();
        let headline_box = match draw_full_frame(&mut staged, content) {
            Ok(bbox) => bbox,
            Err(never) => match never {},
        };
        staged.commit()?;

        self.caption = content.caption.map(String::from);
        self.remember(content.headline, headline_box);
        Ok(())
    }

    fn render_partial_frame(&mut self, text: &str) -> Result<(), Self::Error> {
        let panel = self.frame.size();
        let text_box = headline(text, panel).bounding_box();
        let Some(region) = partial_window(text_box, self.headline_box, self.margin, panel) else {
            log::warn!("Render: no partial window for {text:?}, drawing a full frame");
            let caption = self.caption.clone();
            return self.render_full_frame(&FrameContent {
                headline: text,
                caption: caption.as_deref(),
            });
        };
        let window = Rectangle::new(
            Point::new(region.x.into(), region.y.into()),
            Size::new(region.w.into(), region.h.into()),
        );

        let caption = self.caption.take();
        let mut staged = self.stage_window(region);
        let drawn = draw_window(&mut staged.clipped(&window), window, caption.as_deref(), text);
        if let Err(never) = drawn {
            match never {}
        }
        let committed = staged.commit();
        self.caption = caption;

        if !committed? {
            log::debug!("Render: window unchanged for {text:?}, skipping refresh");
        }
        self.remember(text, text_box);
        Ok(())
    }
}

/// One drawing session on an [`EpaperRenderer`].
pub struct StagedFrame<'a, P: Panel> {
    renderer: &'a mut EpaperRenderer<P>,
    target: Target,
}

impl<P: Panel> StagedFrame<'_, P> {
    /// Push the staged pixels to the panel, then power it down.
    ///
    /// Returns `Ok(false)` when a window commit found nothing changed and
    /// skipped the refresh. On error the committed image is kept.
    pub fn commit(self) -> Result<bool, P::Error> {
        let r = &mut *self.renderer;
        let refreshed = match self.target {
            Target::Full => {
                r.panel.refresh_full(r.frame.buffer())?;
                r.committed.copy_from_slice(r.frame.buffer());
                true
            }
            Target::Window(region) => {
                let width_bytes = FrameBuffer::WIDTH_BYTES;
                if region_differs(r.frame.buffer(), &r.committed, width_bytes, region) {
                    extract_region(r.frame.buffer(), width_bytes, region, &mut r.scratch);
                    r.panel.refresh_partial(region, &r.scratch)?;
                    copy_region(r.frame.buffer(), &mut r.committed, width_bytes, region);
                    true
                } else {
                    false
                }
            }
        };

        if refreshed {
            if let Err(e) = r.panel.power_off() {
                log::warn!("Render: panel power-off failed: {e:?}");
            }
        }
        Ok(refreshed)
    }
}

impl<P: Panel> Drop for StagedFrame<'_, P> {
    fn drop(&mut self) {
        // Outside a session the frame always mirrors the committed image.
        let r = &mut *self.renderer;
        r.frame.buffer_mut().copy_from_slice(&r.committed);
    }
}

impl<P: Panel> DrawTarget for StagedFrame<'_, P> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.renderer.frame.draw_iter(pixels)
    }
}

impl<P: Panel> OriginDimensions for StagedFrame<'_, P> {
    fn size(&self) -> Size {
        self.renderer.frame.size()
    }
}

fn headline(text: &str, panel: Size) -> Text<'_, MonoTextStyle<'static, BinaryColor>> {
    let style = MonoTextStyle::new(&PROFONT_24_POINT, BinaryColor::On);
    let size = style
        .measure_string(text, Point::zero(), Baseline::Bottom)
        .bounding_box
        .size;
    Text::with_baseline(text, centered_origin(panel, size), style, Baseline::Bottom)
}

fn draw_chrome<D>(target: &mut D, panel: Size, caption: Option<&str>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Rectangle::new(Point::zero(), panel)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)?;

    if let Some(caption) = caption {
        let style = MonoTextStyle::new(&PROFONT_14_POINT, BinaryColor::On);
        let layout = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Top)
            .build();
        let anchor = Point::new(panel.width as i32 / 2, CAPTION_TOP);
        Text::with_text_style(caption, anchor, style, layout).draw(target)?;
    }
    Ok(())
}

fn draw_full_frame<D>(target: &mut D, content: &FrameContent<'_>) -> Result<Rectangle, D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let panel = target.bounding_box().size;
    target.clear(BinaryColor::Off)?;
    draw_chrome(target, panel, content.caption)?;
    let text = headline(content.headline, panel);
    text.draw(target)?;
    Ok(text.bounding_box())
}

fn draw_window<D>(
    target: &mut D,
    window: Rectangle,
    caption: Option<&str>,
    text: &str,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let panel = Size::new(crate::DISPLAY_WIDTH, crate::DISPLAY_HEIGHT);
    window
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
        .draw(target)?;
    draw_chrome(target, panel, caption)?;
    headline(text, panel).draw(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_panel::{PanelEvent, PanelFault, RecordingPanel};

    fn renderer() -> EpaperRenderer<RecordingPanel> {
        EpaperRenderer::new(RecordingPanel::new(), 8)
    }

    const CLOCK: FrameContent<'static> = FrameContent {
        headline: "14:59",
        caption: None,
    };

    #[test]
    fn full_frame_draws_border_and_centered_text() {
        let mut r = renderer();
        r.render_full_frame(&CLOCK).unwrap();

        let panel = r.panel();
        assert_eq!(panel.events(), &[PanelEvent::Full, PanelEvent::PowerOff]);
        assert_eq!(panel.pixel(0, 0), BinaryColor::On);
        assert_eq!(panel.pixel(399, 150), BinaryColor::On);
        assert_eq!(panel.pixel(200, 299), BinaryColor::On);
        assert_eq!(panel.pixel(1, 1), BinaryColor::Off);

        let bbox = r.headline_box().unwrap();
        let left_gap = bbox.top_left.x;
        let right_gap = 400 - (bbox.top_left.x + bbox.size.width as i32);
        assert!((right_gap - left_gap).abs() <= 1);
        assert_eq!(r.headline(), Some("14:59"));
        assert_eq!(r.frame().buffer(), r.panel().glass());
    }

    #[test]
    fn caption_is_drawn_near_top() {
        let mut r = renderer();
        r.render_full_frame(&FrameContent {
            headline: "$67,123",
            caption: Some("BTC/USD"),
        })
        .unwrap();
        let band = Region::new(8, 8, 384, 30);
        assert!(r.panel().black_pixels_in(band) > 0);

        let mut plain = renderer();
        plain
            .render_full_frame(&FrameContent {
                headline: "$67,123",
                caption: None,
            })
            .unwrap();
        assert_eq!(plain.panel().black_pixels_in(band), 0);
    }

    #[test]
    fn partial_frame_refreshes_aligned_window() {
        let mut r = renderer();
        r.render_full_frame(&CLOCK).unwrap();
        r.panel_mut().clear_events();

        r.render_partial_frame("15:00").unwrap();
        let windows = r.panel().partial_refreshes();
        assert_eq!(windows.len(), 1);
        let window = windows[0];
        assert_eq!(window.x % 8, 0);
        assert_eq!(window.w % 8, 0);
        assert!(window.w < 400 && window.h < 300);
        assert_eq!(r.panel().full_refreshes(), 0);
        assert_eq!(r.headline(), Some("15:00"));
        // Glass matches a fresh full render of the new text.
        let mut reference = renderer();
        reference
            .render_full_frame(&FrameContent {
                headline: "15:00",
                caption: None,
            })
            .unwrap();
        assert_eq!(r.panel().glass(), reference.panel().glass());
    }

    #[test]
    fn partial_frame_with_same_text_skips_refresh() {
        let mut r = renderer();
        r.render_full_frame(&CLOCK).unwrap();
        r.panel_mut().clear_events();

        r.render_partial_frame("14:59").unwrap();
        assert!(r.panel().events().is_empty());
    }

    #[test]
    fn failed_refresh_keeps_committed_image() {
        let mut r = renderer();
        r.render_full_frame(&CLOCK).unwrap();
        let before = r.panel().glass().to_vec();

        r.panel_mut().fail_next(1);
        assert_eq!(r.render_partial_frame("15:00"), Err(PanelFault));
        assert_eq!(r.panel().glass(), &before[..]);
        assert_eq!(r.frame().buffer(), &before[..]);
        assert_eq!(r.headline(), Some("14:59"));
    }

    #[test]
    fn empty_window_falls_back_to_full_frame() {
        let mut r = EpaperRenderer::new(RecordingPanel::new(), 0);
        r.render_partial_frame("").unwrap();

        assert_eq!(r.panel().full_refreshes(), 1);
        assert!(r.panel().partial_refreshes().is_empty());
        assert_eq!(r.headline(), Some(""));
        assert_eq!(r.panel().pixel(0, 0), BinaryColor::On);
    }

    #[test]
    fn dropped_stage_restores_frame() {
        let mut r = renderer();
        r.render_full_frame(&CLOCK).unwrap();
        let before = r.frame().clone();
        {
            let mut staged = r.stage_full();
            Rectangle::new(Point::new(10, 10), Size::new(50, 50))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(&mut staged)
                .unwrap();
        }
        assert_eq!(r.frame(), &before);
        assert_eq!(r.panel().full_refreshes(), 1);
    }
}
