//! Pointer smoothing for the distortion pass.
//!
//! Raw `mousemove` positions arrive normalized to [0, 1] with the vertical
//! axis inverted. Each frame the filter derives an instantaneous speed from
//! the distance travelled since the previous frame, eases a target speed
//! toward it, eases a followed position toward the raw one, and decays the
//! target so the distortion relaxes to zero once the pointer stops.

use glam::Vec2;

use crate::config::EffectConfig;
use crate::math::Viewport;

/// The pointer-derived values a single frame hands to the shader pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerFrame {
    /// Smoothed pointer position, normalized.
    pub follow: Vec2,
    /// Clamped velocity magnitude for the `uVelo` uniform.
    pub velocity: f32,
}

pub struct PointerFilter {
    mouse: Vec2,
    prev_mouse: Vec2,
    follow_mouse: Vec2,
    speed: f32,
    target_speed: f32,
    follow_lerp: f32,
    speed_lerp: f32,
    decay: f32,
    max_velocity: f32,
}

impl PointerFilter {
    pub fn new(config: &EffectConfig) -> Self {
        Self {
            mouse: Vec2::ZERO,
            prev_mouse: Vec2::ZERO,
            follow_mouse: Vec2::ZERO,
            speed: 0.0,
            target_speed: 0.0,
            follow_lerp: config.follow_lerp,
            speed_lerp: config.speed_lerp,
            decay: config.velocity_decay,
            max_velocity: config.max_velocity,
        }
    }

    /// Map client-space cursor coordinates into the normalized space the
    /// shader expects: x/width, with y flipped so up is positive.
    pub fn normalize(client_x: f32, client_y: f32, viewport: Viewport) -> Vec2 {
        if viewport.is_empty() {
            return Vec2::ZERO;
        }
        Vec2::new(
            client_x / viewport.width,
            1.0 - client_y / viewport.height,
        )
    }

    /// Record a pointer position; takes effect on the next [`advance`].
    ///
    /// [`advance`]: PointerFilter::advance
    pub fn on_move(&mut self, normalized: Vec2) {
        self.mouse = normalized;
    }

    /// Advance the filters by one frame and return this frame's values.
    ///
    /// Mirrors the update order the shader pass relies on: the velocity is
    /// sampled (clamped) before the decay multiplier lands, so a fast flick
    /// registers for at least one frame.
    pub fn advance(&mut self) -> PointerFrame {
        self.speed = self.mouse.distance(self.prev_mouse);

        self.target_speed -= self.speed_lerp * (self.target_speed - self.speed);
        self.follow_mouse -= (self.follow_mouse - self.mouse) * self.follow_lerp;
        self.prev_mouse = self.mouse;

        let velocity = self.target_speed.min(self.max_velocity);
        self.target_speed *= self.decay;

        PointerFrame {
            follow: self.follow_mouse,
            velocity,
        }
    }

    /// Instantaneous speed computed by the last [`advance`].
    ///
    /// [`advance`]: PointerFilter::advance
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Decayed speed the velocity uniform is clamped from.
    #[inline]
    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    #[inline]
    pub fn follow(&self) -> Vec2 {
        self.follow_mouse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> PointerFilter {
        PointerFilter::new(&EffectConfig::default())
    }

    #[test]
    fn speed_is_zero_without_motion() {
        let mut f = filter();
        f.on_move(Vec2::new(0.4, 0.6));
        f.advance();
        // same position on the following frame
        f.advance();
        assert_eq!(f.speed(), 0.0);
    }

    #[test]
    fn velocity_uniform_never_exceeds_the_clamp() {
        let mut f = filter();
        for i in 0..50 {
            // wild jumps across (and beyond) the whole viewport
            let corner = if i % 2 == 0 { 40.0 } else { -40.0 };
            f.on_move(Vec2::new(corner, -corner));
            let frame = f.advance();
            assert!(frame.velocity <= 0.05, "frame {i}: {}", frame.velocity);
        }
    }

    #[test]
    fn target_speed_decays_strictly_and_stays_non_negative() {
        let mut f = filter();
        f.on_move(Vec2::new(0.8, 0.8));
        f.advance();
        assert!(f.target_speed() > 0.0);

        let mut previous = f.target_speed();
        for _ in 0..500 {
            f.advance();
            let current = f.target_speed();
            assert!(current < previous, "decay must be strict: {current} >= {previous}");
            assert!(current >= 0.0);
            previous = current;
        }
    }

    #[test]
    fn follow_mouse_converges_on_the_raw_position() {
        let mut f = filter();
        let target = Vec2::new(0.25, 0.75);
        f.on_move(target);
        let mut frame = f.advance();
        let first_gap = frame.follow.distance(target);
        for _ in 0..200 {
            frame = f.advance();
        }
        assert!(frame.follow.distance(target) < first_gap);
        assert!(frame.follow.distance(target) < 1e-3);
    }

    #[test]
    fn normalize_inverts_the_vertical_axis() {
        let viewport = Viewport::new(1000.0, 800.0);
        let top_left = PointerFilter::normalize(0.0, 0.0, viewport);
        assert_eq!(top_left, Vec2::new(0.0, 1.0));
        let bottom_right = PointerFilter::normalize(1000.0, 800.0, viewport);
        assert_eq!(bottom_right, Vec2::new(1.0, 0.0));
        let center = PointerFilter::normalize(500.0, 400.0, viewport);
        assert_eq!(center, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn normalize_handles_a_collapsed_viewport() {
        assert_eq!(
            PointerFilter::normalize(10.0, 10.0, Viewport::new(0.0, 0.0)),
            Vec2::ZERO
        );
    }
}
