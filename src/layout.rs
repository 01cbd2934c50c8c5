//! DOM-to-world placement math for tracked image planes.
//!
//! The scene origin sits at the center of the viewport with y growing upward,
//! while DOM boxes hang from the top-left corner with y growing downward.
//! These helpers translate between the two, with bounding boxes held in
//! document space so a stored box stays valid while the page scrolls.

use glam::Vec2;

use crate::math::{Rect, Viewport};

/// World-space translation for a plane mirroring `bounds` at the given scroll
/// offset.
///
/// `x = left - viewportWidth/2 + width/2`
/// `y = scroll - top + viewportHeight/2 - height/2`
pub fn plane_translation(bounds: &Rect, scroll: f32, viewport: Viewport) -> Vec2 {
    Vec2::new(
        bounds.x - viewport.width / 2.0 + bounds.width / 2.0,
        scroll - bounds.y + viewport.height / 2.0 - bounds.height / 2.0,
    )
}

/// World-space scale of a plane: the unit quad stretched to the box size.
#[inline]
pub fn plane_scale(bounds: &Rect) -> Vec2 {
    Vec2::new(bounds.width, bounds.height)
}

/// Convert a viewport-relative box (what `getBoundingClientRect` reports) into
/// document space by folding the current scroll offset into the top edge.
pub fn document_bounds(viewport_bounds: &Rect, scroll: f32) -> Rect {
    Rect::new(
        viewport_bounds.x,
        viewport_bounds.y + scroll,
        viewport_bounds.width,
        viewport_bounds.height,
    )
}

/// UV scale that crops a bitmap to fill the box while keeping the bitmap's
/// aspect ratio, like CSS `object-fit: cover`.
///
/// Applied around the UV midpoint: `uv' = (uv - 0.5) * cover + 0.5`.
pub fn cover_scale(bounds: &Rect, natural_width: f32, natural_height: f32) -> Vec2 {
    if natural_width <= 0.0 || natural_height <= 0.0 || bounds.width <= 0.0 || bounds.height <= 0.0
    {
        return Vec2::ONE;
    }
    let image_aspect = natural_height / natural_width;
    let box_aspect = bounds.height / bounds.width;
    if box_aspect > image_aspect {
        Vec2::new(bounds.width / bounds.height * image_aspect, 1.0)
    } else {
        Vec2::new(1.0, box_aspect / image_aspect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_vec2(v: Vec2, x: f32, y: f32) {
        assert!((v.x - x).abs() < EPS, "x: {} != {}", v.x, x);
        assert!((v.y - y).abs() < EPS, "y: {} != {}", v.y, y);
    }

    #[test]
    fn plane_lands_where_the_element_sits() {
        let bounds = Rect::new(50.0, 100.0, 200.0, 300.0);
        let viewport = Viewport::new(1000.0, 800.0);
        assert_vec2(plane_translation(&bounds, 0.0, viewport), -350.0, 150.0);
    }

    #[test]
    fn scrolling_moves_the_plane_up_the_world() {
        let bounds = Rect::new(50.0, 100.0, 200.0, 300.0);
        let viewport = Viewport::new(1000.0, 800.0);
        let at_rest = plane_translation(&bounds, 0.0, viewport);
        let scrolled = plane_translation(&bounds, 120.0, viewport);
        assert!((scrolled.y - at_rest.y - 120.0).abs() < EPS);
        assert!((scrolled.x - at_rest.x).abs() < EPS);
    }

    #[test]
    fn requery_after_reflow_updates_position_and_scale_together() {
        let viewport = Viewport::new(1000.0, 800.0);
        let first = Rect::new(50.0, 100.0, 200.0, 300.0);
        // the element moved and grew after a layout change
        let reflowed = Rect::new(80.0, 160.0, 400.0, 150.0);

        assert_vec2(plane_translation(&reflowed, 0.0, viewport), -220.0, 165.0);
        assert_vec2(plane_scale(&reflowed), 400.0, 150.0);
        assert_ne!(plane_scale(&first), plane_scale(&reflowed));
    }

    #[test]
    fn viewport_boxes_queried_mid_scroll_convert_to_document_space() {
        // Page scrolled down 500px; the element's top edge reads -400 from
        // the viewport but its document position is 100.
        let queried = Rect::new(50.0, -400.0, 200.0, 300.0);
        let bounds = document_bounds(&queried, 500.0);
        assert!((bounds.y - 100.0).abs() < EPS);

        // Position math with the live scroll offset matches the box queried
        // at scroll zero.
        let viewport = Viewport::new(1000.0, 800.0);
        let reference = Rect::new(50.0, 100.0, 200.0, 300.0);
        let requeried = plane_translation(&bounds, 500.0, viewport);
        let original = plane_translation(&reference, 500.0, viewport);
        assert_vec2(requeried, original.x, original.y);
    }

    #[test]
    fn cover_crops_the_long_axis() {
        // Wide box, square bitmap: full width, cropped height.
        let wide = Rect::new(0.0, 0.0, 1000.0, 500.0);
        assert_vec2(cover_scale(&wide, 800.0, 800.0), 1.0, 0.5);

        // Tall box, square bitmap: full height, cropped width.
        let tall = Rect::new(0.0, 0.0, 500.0, 1000.0);
        assert_vec2(cover_scale(&tall, 800.0, 800.0), 0.5, 1.0);

        // Matching aspect: no crop at all.
        let matched = Rect::new(0.0, 0.0, 400.0, 300.0);
        assert_vec2(cover_scale(&matched, 800.0, 600.0), 1.0, 1.0);
    }

    #[test]
    fn cover_tolerates_unloaded_bitmaps() {
        let bounds = Rect::new(0.0, 0.0, 400.0, 300.0);
        assert_vec2(cover_scale(&bounds, 0.0, 0.0), 1.0, 1.0);
        assert_vec2(cover_scale(&Rect::ZERO, 800.0, 600.0), 1.0, 1.0);
    }
}
