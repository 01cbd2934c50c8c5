//! Frame state for the full-screen distortion pass.
//!
//! The pass warps the scene texture around the smoothed pointer
//! position, displacing UVs in proportion to pointer velocity. This
//! module owns the per-frame uniform values; the GPU side only
//! uploads what [`PostState::advance`] hands it.

use glam::Vec2;

use crate::config::EffectConfig;
use crate::math::Viewport;
use crate::pointer::{PointerFilter, PointerFrame};

/// Mouse uniform value used until the first pointer event arrives.
///
/// Far outside the [0, 1] UV square, so the distortion circle cannot
/// touch any on-screen fragment before the pointer has actually moved.
pub const OFFSCREEN_MOUSE: Vec2 = Vec2::new(-10.0, -10.0);

/// Uniform values consumed by the distortion fragment shader each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Accumulated animation time, advanced by a fixed step per frame.
    pub time: f32,
    /// Clamped pointer velocity driving displacement strength.
    pub velocity: f32,
    /// Smoothed pointer position in normalized coordinates.
    pub mouse: Vec2,
    /// Aspect correction factor, `(1, height / width)`.
    pub resolution: Vec2,
}

/// Aspect correction for the distortion falloff.
///
/// The shader multiplies UV deltas by this before measuring distance,
/// so the falloff circle stays round on non-square viewports.
pub fn resolution_aspect(viewport: Viewport) -> Vec2 {
    if viewport.width <= 0.0 {
        return Vec2::ONE;
    }
    Vec2::new(1.0, viewport.height / viewport.width)
}

/// Accumulates time and assembles [`FrameUniforms`] once per frame.
#[derive(Debug, Clone)]
pub struct PostState {
    time: f32,
    time_step: f32,
    resolution: Vec2,
}

impl PostState {
    pub fn new(config: &EffectConfig, viewport: Viewport) -> Self {
        Self {
            time: 0.0,
            time_step: config.time_step,
            resolution: resolution_aspect(viewport),
        }
    }

    /// Recompute the aspect correction after a viewport change.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.resolution = resolution_aspect(viewport);
    }

    /// Step the animation clock and pointer filter, yielding this
    /// frame's uniform values.
    pub fn advance(&mut self, pointer: &mut PointerFilter) -> FrameUniforms {
        self.time += self.time_step;
        let PointerFrame { follow, velocity } = pointer.advance();
        FrameUniforms {
            time: self.time,
            velocity,
            mouse: follow,
            resolution: self.resolution,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> (PostState, PointerFilter) {
        let config = EffectConfig::default();
        let viewport = Viewport::new(1000.0, 800.0);
        (
            PostState::new(&config, viewport),
            PointerFilter::new(&config),
        )
    }

    #[test]
    fn time_advances_by_a_fixed_step() {
        let (mut post, mut pointer) = state();
        for frame in 1..=10 {
            let uniforms = post.advance(&mut pointer);
            let expected = 0.05 * frame as f32;
            assert!((uniforms.time - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn resolution_is_height_over_width() {
        let aspect = resolution_aspect(Viewport::new(1000.0, 800.0));
        assert_eq!(aspect, Vec2::new(1.0, 0.8));

        let portrait = resolution_aspect(Viewport::new(800.0, 1000.0));
        assert_eq!(portrait, Vec2::new(1.0, 1.25));

        assert_eq!(resolution_aspect(Viewport::new(0.0, 800.0)), Vec2::ONE);
    }

    #[test]
    fn uniforms_carry_the_filtered_pointer() {
        let (mut post, mut pointer) = state();
        pointer.on_move(Vec2::new(0.5, 0.5));
        let uniforms = post.advance(&mut pointer);

        assert!(uniforms.velocity <= 0.05);
        assert!(uniforms.velocity > 0.0);
        // One easing step from the origin toward (0.5, 0.5).
        assert!((uniforms.mouse - Vec2::new(0.05, 0.05)).length() < 1e-6);
        assert_eq!(uniforms.resolution, Vec2::new(1.0, 0.8));
    }

    #[test]
    fn viewport_change_updates_the_aspect() {
        let (mut post, mut pointer) = state();
        post.set_viewport(Viewport::new(500.0, 1000.0));
        let uniforms = post.advance(&mut pointer);
        assert_eq!(uniforms.resolution, Vec2::new(1.0, 2.0));
    }
}
