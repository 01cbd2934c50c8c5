//! Inertial scroll offset.
//!
//! Scroll events record the native offset as a target; the frame loop eases
//! the published offset toward it, giving the planes the lagging, inertial
//! motion a smooth-scroll library would. A factor of 1.0 turns the filter
//! into a pass-through.

pub struct SmoothScroll {
    current: f32,
    target: f32,
    lerp: f32,
}

impl SmoothScroll {
    pub fn new(lerp: f32) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            lerp,
        }
    }

    /// Record the latest native scroll offset.
    pub fn set_target(&mut self, offset: f32) {
        self.target = offset;
    }

    /// Snap both the target and the published offset, skipping the easing.
    pub fn jump_to(&mut self, offset: f32) {
        self.current = offset;
        self.target = offset;
    }

    /// Ease one frame toward the target and return the published offset.
    pub fn advance(&mut self) -> f32 {
        self.current += (self.target - self.current) * self.lerp;
        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eases_toward_the_target_without_overshoot() {
        let mut scroll = SmoothScroll::new(0.15);
        scroll.set_target(1000.0);

        let mut previous = scroll.current();
        for _ in 0..50 {
            let current = scroll.advance();
            assert!(current > previous);
            assert!(current <= 1000.0);
            previous = current;
        }
        for _ in 0..100 {
            scroll.advance();
        }
        assert!((scroll.current() - 1000.0).abs() < 1.0);
    }

    #[test]
    fn factor_one_is_a_pass_through() {
        let mut scroll = SmoothScroll::new(1.0);
        scroll.set_target(640.0);
        assert_eq!(scroll.advance(), 640.0);
    }

    #[test]
    fn jump_skips_the_easing() {
        let mut scroll = SmoothScroll::new(0.15);
        scroll.jump_to(300.0);
        assert_eq!(scroll.current(), 300.0);
        assert_eq!(scroll.target(), 300.0);
        assert_eq!(scroll.advance(), 300.0);
    }

    #[test]
    fn retargeting_mid_flight_changes_direction() {
        let mut scroll = SmoothScroll::new(0.5);
        scroll.set_target(100.0);
        scroll.advance();
        scroll.advance();
        let high_water = scroll.current();

        scroll.set_target(0.0);
        assert!(scroll.advance() < high_water);
    }
}
