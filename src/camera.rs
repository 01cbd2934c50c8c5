//! Perspective camera sized so one world unit covers one CSS pixel.
//!
//! The field of view is derived from the viewport height and the fixed camera
//! distance: a plane scaled to an element's pixel size then appears exactly as
//! large as the element itself.

use glam::{Mat4, Vec3};

use crate::config::{CAMERA_FAR, CAMERA_NEAR};
use crate::math::Viewport;

/// Camera looking down -z from `(0, 0, distance)` at the image plane.
#[derive(Clone, Copy, Debug)]
pub struct ScreenCamera {
    distance: f32,
    near: f32,
    far: f32,
    aspect: f32,
    fov_y: f32,
}

impl ScreenCamera {
    pub fn new(viewport: Viewport, distance: f32) -> Self {
        Self {
            distance,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            aspect: viewport.aspect(),
            fov_y: fov_for_height(viewport.height, distance),
        }
    }

    /// Re-derive aspect ratio and field of view after a viewport change.
    pub fn resize(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
        self.fov_y = fov_for_height(viewport.height, self.distance);
    }

    /// Vertical field of view in radians.
    #[inline]
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Combined view-projection matrix for the GL clip space.
    pub fn view_projection(&self) -> Mat4 {
        let proj = Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far);
        let view = Mat4::look_at_rh(
            Vec3::new(0.0, 0.0, self.distance),
            Vec3::ZERO,
            Vec3::Y,
        );
        proj * view
    }
}

/// `2 * atan(h / 2d)`, the fov at which `h` world units fill the viewport
/// height at distance `d`.
fn fov_for_height(height: f32, distance: f32) -> f32 {
    2.0 * (height / (2.0 * distance)).atan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const EPS: f32 = 1e-4;

    #[test]
    fn resize_updates_aspect_and_keeps_fov_tied_to_height() {
        let mut camera = ScreenCamera::new(Viewport::new(1000.0, 800.0), 10.0);
        let fov_at_800 = camera.fov_y();

        camera.resize(Viewport::new(500.0, 800.0));
        assert!((camera.aspect() - 0.625).abs() < EPS);
        // same height, same fov
        assert!((camera.fov_y() - fov_at_800).abs() < EPS);

        camera.resize(Viewport::new(500.0, 400.0));
        assert!((camera.fov_y() - 2.0 * (400.0f32 / 20.0).atan()).abs() < EPS);
        assert!(camera.fov_y() < fov_at_800);
    }

    #[test]
    fn one_world_unit_is_one_pixel() {
        // A point at the viewport's top edge must land on the clip-space
        // boundary, and likewise for the right edge.
        let viewport = Viewport::new(1000.0, 800.0);
        let camera = ScreenCamera::new(viewport, 10.0);
        let vp = camera.view_projection();

        let top = vp * Vec4::new(0.0, viewport.height / 2.0, 0.0, 1.0);
        assert!((top.y / top.w - 1.0).abs() < EPS);

        let right = vp * Vec4::new(viewport.width / 2.0, 0.0, 0.0, 1.0);
        assert!((right.x / right.w - 1.0).abs() < EPS);

        let origin = vp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin.x / origin.w).abs() < EPS);
        assert!((origin.y / origin.w).abs() < EPS);
    }
}
