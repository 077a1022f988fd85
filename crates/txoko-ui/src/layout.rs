//! Text placement and partial-refresh window math.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::eink::Region;

/// Origin that centers a text box of `text` size on a `panel`.
///
/// Meant for [`Baseline::Bottom`](embedded_graphics::text::Baseline::Bottom):
/// `x = (panel_w - text_w) / 2`, `y = (panel_h + text_h) / 2`. Text wider
/// than the panel gets a negative x.
pub fn centered_origin(panel: Size, text: Size) -> Point {
    let x = (panel.width as i32 - text.width as i32) / 2;
    let y = (panel.height as i32 + text.height as i32) / 2;
    Point::new(x, y)
}

fn grow(rect: Rectangle, margin: u32) -> Rectangle {
    let m = margin as i32;
    Rectangle::new(
        rect.top_left - Point::new(m, m),
        rect.size + Size::new(2 * margin, 2 * margin),
    )
}

fn union(a: Rectangle, b: Rectangle) -> Rectangle {
    let left = a.top_left.x.min(b.top_left.x);
    let top = a.top_left.y.min(b.top_left.y);
    let right = (a.top_left.x + a.size.width as i32).max(b.top_left.x + b.size.width as i32);
    let bottom = (a.top_left.y + a.size.height as i32).max(b.top_left.y + b.size.height as i32);
    Rectangle::new(
        Point::new(left, top),
        Size::new((right - left) as u32, (bottom - top) as u32),
    )
}

/// Window to refresh when text moves from `prior` to `new`.
///
/// Both boxes grow by `margin`, get unioned, clipped to the panel and widened
/// to whole bytes on X. `None` when nothing of it lands on the panel.
pub fn partial_window(
    new: Rectangle,
    prior: Option<Rectangle>,
    margin: u32,
    panel: Size,
) -> Option<Region> {
    let mut area = grow(new, margin);
    if let Some(prior) = prior {
        area = union(area, grow(prior, margin));
    }

    let clipped = area.intersection(&Rectangle::new(Point::zero(), panel));
    if clipped.is_zero_sized() {
        return None;
    }

    let left = clipped.top_left.x as u32 / 8 * 8;
    let right = (clipped.top_left.x as u32 + clipped.size.width).div_ceil(8) * 8;
    let right = right.min(panel.width / 8 * 8);

    Some(Region::new(
        left as u16,
        clipped.top_left.y as u16,
        (right - left) as u16,
        clipped.size.height as u16,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PANEL: Size = Size::new(400, 300);

    #[test]
    fn centers_narrow_text() {
        let origin = centered_origin(Size::new(300, 200), Size::new(120, 30));
        assert_eq!(origin, Point::new(90, 115));
    }

    #[test]
    fn wide_text_goes_negative() {
        let origin = centered_origin(Size::new(100, 100), Size::new(130, 10));
        assert_eq!(origin.x, -15);
    }

    #[test]
    fn window_covers_both_boxes() {
        let old = Rectangle::new(Point::new(130, 130), Size::new(80, 30));
        let new = Rectangle::new(Point::new(150, 130), Size::new(90, 30));
        let region = partial_window(new, Some(old), 8, PANEL).unwrap();
        assert_eq!(region, Region::new(120, 122, 128, 46));
    }

    #[test]
    fn window_without_prior_uses_new_box() {
        let new = Rectangle::new(Point::new(101, 10), Size::new(10, 10));
        let region = partial_window(new, None, 0, PANEL).unwrap();
        assert_eq!(region, Region::new(96, 10, 16, 10));
    }

    #[test]
    fn window_clipped_to_panel() {
        let new = Rectangle::new(Point::new(-20, 290), Size::new(60, 40));
        let region = partial_window(new, None, 8, PANEL).unwrap();
        assert_eq!(region, Region::new(0, 282, 48, 18));
    }

    #[test]
    fn window_off_panel_is_none() {
        let new = Rectangle::new(Point::new(500, 10), Size::new(20, 20));
        assert_eq!(partial_window(new, None, 8, PANEL), None);
    }

    proptest! {
        #[test]
        fn centering_matches_formula(pw in 1u32..2000, ph in 1u32..2000, tw in 0u32..2000, th in 0u32..2000) {
            let origin = centered_origin(Size::new(pw, ph), Size::new(tw, th));
            prop_assert_eq!(origin.x, (pw as i32 - tw as i32) / 2);
            prop_assert_eq!(origin.y, (ph as i32 + th as i32) / 2);
        }

        #[test]
        fn centered_text_is_balanced(pw in 1u32..2000, tw in 0u32..2000) {
            prop_assume!(tw <= pw);
            let origin = centered_origin(Size::new(pw, 100), Size::new(tw, 10));
            let left_gap = origin.x;
            let right_gap = pw as i32 - (origin.x + tw as i32);
            prop_assert!((right_gap - left_gap) == 0 || (right_gap - left_gap) == 1);
        }

        #[test]
        fn window_is_aligned_and_covers(
            x in 0i32..390, y in 0i32..290, w in 1u32..120, h in 1u32..60,
            dx in -40i32..40, margin in 0u32..16,
        ) {
            let new = Rectangle::new(Point::new(x, y), Size::new(w, h));
            let old = Rectangle::new(Point::new(x + dx, y), Size::new(w, h));
            let region = partial_window(new, Some(old), margin, PANEL).unwrap();

            prop_assert_eq!(region.x % 8, 0);
            prop_assert_eq!(region.w % 8, 0);
            prop_assert!(region.w > 0 && region.h > 0);
            prop_assert!(u32::from(region.x + region.w) <= PANEL.width);
            prop_assert!(u32::from(region.y + region.h) <= PANEL.height);

            let window = Rectangle::new(
                Point::new(region.x.into(), region.y.into()),
                Size::new(region.w.into(), region.h.into()),
            );
            let panel = Rectangle::new(Point::zero(), PANEL);
            for rect in [new, old] {
                let visible = rect.intersection(&panel);
                if !visible.is_zero_sized() {
                    prop_assert_eq!(visible.intersection(&window), visible);
                }
            }
        }
    }
}
