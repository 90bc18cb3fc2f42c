//! Rate-limited, eased heading animation

use crate::math::{accelerate, normalize_degrees, shortest_delta};
use crate::types::CompassSettings;

/// Heading animator
///
/// Owns the displayed ("current") heading and moves it toward the target
/// heading once per tick. The per-tick rotation is clamped to
/// `max_rotate_degree` along the shorter arc, then scaled by the accelerate
/// easing curve: a larger weight while far from the target, a gentler one
/// for the final approach.
#[derive(Debug, Clone, Copy)]
pub struct HeadingAnimator {
    current: f32,
    max_rotate_degree: f32,
    far_weight: f32,
    near_weight: f32,
    convergence_epsilon: f32,
}

impl HeadingAnimator {
    /// Create an animator resting at 0°
    pub fn new(settings: &CompassSettings) -> Self {
        Self {
            current: 0.0,
            max_rotate_degree: settings.max_rotate_degree,
            far_weight: accelerate(settings.far_ease_input, settings.easing_factor),
            near_weight: accelerate(settings.near_ease_input, settings.easing_factor),
            convergence_epsilon: settings.convergence_epsilon,
        }
    }

    /// Displayed heading in degrees, `[0, 360)`
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Move the displayed heading without animating
    pub fn set_current(&mut self, degrees: f32) {
        self.current = normalize_degrees(degrees);
    }

    /// Rotation toward `target` for the next tick before easing
    ///
    /// Shortest-path delta, clamped to `±max_rotate_degree`.
    pub fn rotation_step(&self, target: f32) -> f32 {
        let delta = shortest_delta(self.current, normalize_degrees(target));
        delta.clamp(-self.max_rotate_degree, self.max_rotate_degree)
    }

    /// Advance one tick toward `target`
    ///
    /// Returns the new heading when the needle moved and needs a redraw,
    /// `None` once it rests on the target. Within `convergence_epsilon` the
    /// needle snaps onto the target so the animation always terminates.
    ///
    /// # Example
    /// ```
    /// use compass_heading::CompassSettings;
    /// use compass_heading::animator::HeadingAnimator;
    ///
    /// let mut animator = HeadingAnimator::new(&CompassSettings::default());
    /// animator.set_current(350.0);
    ///
    /// // Wraps through north instead of sweeping back 340°
    /// let heading = animator.tick(10.0).unwrap();
    /// assert!(heading > 350.0);
    /// ```
    pub fn tick(&mut self, target: f32) -> Option<f32> {
        let target = normalize_degrees(target);
        if self.current == target {
            return None;
        }

        let delta = shortest_delta(self.current, target);
        if delta.abs() < self.convergence_epsilon {
            self.current = target;
            return Some(self.current);
        }

        let step = delta.clamp(-self.max_rotate_degree, self.max_rotate_degree);
        let weight = if delta.abs() > self.max_rotate_degree {
            self.far_weight
        } else {
            self.near_weight
        };

        self.current = normalize_degrees(self.current + step * weight);
        Some(self.current)
    }

    /// Whether the displayed heading rests on `target`
    pub fn is_converged(&self, target: f32) -> bool {
        self.current == normalize_degrees(target)
    }
}

impl Default for HeadingAnimator {
    fn default() -> Self {
        Self::new(&CompassSettings::default())
    }
}
