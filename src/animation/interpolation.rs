use crate::core::constants::{FULL_TURN_DEGREES, HALF_TURN_DEGREES};
use crate::core::math::Vec3;
use std::ops::{Add, Mul, Sub};

/// Interpolation trait for values that a tween can drive
pub trait Interpolatable: Copy {
    /// Offset from `self` toward `other`, i.e. `other - self`
    fn diff(&self, other: &Self) -> Self;

    /// `self + diff * progress`
    fn lerp_diff(&self, diff: &Self, progress: f32) -> Self;
}

impl<T> Interpolatable for T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    fn diff(&self, other: &Self) -> Self {
        *other - *self
    }

    fn lerp_diff(&self, diff: &Self, progress: f32) -> Self {
        *self + *diff * progress
    }
}

/// Main interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// `value` wrapped into `[0, length)`
    pub fn repeat(value: f32, length: f32) -> f32 {
        (value - (value / length).floor() * length).clamp(0.0, length)
    }

    /// Signed shortest rotation in degrees from `current` to `target`.
    ///
    /// The result is in `(-180, 180]`, so 350 -> 10 is +20 rather than -340.
    pub fn delta_angle(current: f32, target: f32) -> f32 {
        let mut delta = Self::repeat(target - current, FULL_TURN_DEGREES);
        if delta > HALF_TURN_DEGREES {
            delta -= FULL_TURN_DEGREES;
        }
        delta
    }

    /// Per-axis shortest rotation between two sets of euler angles
    pub fn delta_euler(current: &Vec3, target: &Vec3) -> Vec3 {
        Vec3::new(
            Self::delta_angle(current.x, target.x),
            Self::delta_angle(current.y, target.y),
            Self::delta_angle(current.z, target.z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_diff_allows_overshoot() {
        let start = Vec3::ZERO;
        let diff = Vec3::new(10.0, 0.0, -4.0);
        assert_eq!(start.lerp_diff(&diff, 0.5), Vec3::new(5.0, 0.0, -2.0));
        assert_eq!(start.lerp_diff(&diff, 1.1).x, 11.0);
        assert!(start.lerp_diff(&diff, -0.1).x < 0.0);
    }

    #[test]
    fn test_delta_angle_takes_short_way() {
        assert_eq!(Interpolation::delta_angle(350.0, 10.0), 20.0);
        assert_eq!(Interpolation::delta_angle(10.0, 350.0), -20.0);
        assert_eq!(Interpolation::delta_angle(0.0, 180.0), 180.0);
        assert_eq!(Interpolation::delta_angle(0.0, 190.0), -170.0);
        assert_eq!(Interpolation::delta_angle(-720.0, 90.0), 90.0);
    }

    #[test]
    fn test_delta_euler_per_axis() {
        let from = Vec3::new(350.0, 0.0, 90.0);
        let to = Vec3::new(10.0, 270.0, 90.0);
        assert_eq!(
            Interpolation::delta_euler(&from, &to),
            Vec3::new(20.0, -90.0, 0.0)
        );
    }
}
