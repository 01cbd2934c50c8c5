//! Axis-aligned bounding box as reported by DOM layout.

use serde::{Deserialize, Serialize};

/// An element's on-page box: `x`/`y` are the left/top edges, in CSS pixels.
///
/// Tracking code stores these in document space (scroll offset folded into
/// `y`), so a box stays put while the page scrolls underneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Zero-sized box at the origin.
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point of the box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Bottom edge (`y` grows downward in page coordinates).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_and_edges() {
        let r = Rect::new(50.0, 100.0, 200.0, 300.0);
        assert_eq!(r.center(), (150.0, 250.0));
        assert!((r.right() - 250.0).abs() < 1e-6);
        assert!((r.bottom() - 400.0).abs() < 1e-6);
    }

    #[test]
    fn survives_json_round_trip() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&r).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
