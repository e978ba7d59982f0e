//! Ready made bodies for [`TweenEngine::custom_action`](crate::animation::engine::TweenEngine::custom_action)
//!
//! The shakes displace a transform channel by `jitter() * intensity`, where
//! `jitter` is supplied by the caller (typically a random point inside the
//! unit sphere). The original value is captured when the action is built and
//! restored once progress reaches 1.

use crate::core::math::Vec3;
use crate::traits::{TargetRef, VectorKind};

/// Shakes `kind` at full `intensity`, decaying linearly to zero
pub fn shake<J>(
    target: &TargetRef,
    kind: VectorKind,
    intensity: f32,
    mut jitter: J,
) -> impl FnMut(Option<&TargetRef>, f32) + 'static
where
    J: FnMut() -> Vec3 + 'static,
{
    let origin = target.vector(kind);

    move |target, progress| {
        let Some(target) = target else {
            return;
        };

        if progress >= 1.0 {
            target.set_vector(kind, origin);
        } else {
            target.set_vector(kind, origin + jitter() * (intensity * (1.0 - progress)));
        }
    }
}

/// Ramps the shake up to `max_intensity` at half progress, then back down
pub fn shake_ramp<J>(
    target: &TargetRef,
    kind: VectorKind,
    max_intensity: f32,
    mut jitter: J,
) -> impl FnMut(Option<&TargetRef>, f32) + 'static
where
    J: FnMut() -> Vec3 + 'static,
{
    let origin = target.vector(kind);

    move |target, progress| {
        let Some(target) = target else {
            return;
        };

        if progress >= 1.0 {
            target.set_vector(kind, origin);
            return;
        }

        let envelope = if progress < 0.5 {
            2.0 * progress
        } else {
            2.0 * (1.0 - progress)
        };
        target.set_vector(kind, origin + jitter() * (max_intensity * envelope));
    }
}

pub fn shake_position<J>(target: &TargetRef, intensity: f32, jitter: J) -> impl FnMut(Option<&TargetRef>, f32) + 'static
where
    J: FnMut() -> Vec3 + 'static,
{
    shake(target, VectorKind::Position, intensity, jitter)
}

pub fn shake_position_ramp<J>(target: &TargetRef, max_intensity: f32, jitter: J) -> impl FnMut(Option<&TargetRef>, f32) + 'static
where
    J: FnMut() -> Vec3 + 'static,
{
    shake_ramp(target, VectorKind::Position, max_intensity, jitter)
}

pub fn shake_scale<J>(target: &TargetRef, intensity: f32, jitter: J) -> impl FnMut(Option<&TargetRef>, f32) + 'static
where
    J: FnMut() -> Vec3 + 'static,
{
    shake(target, VectorKind::Scale, intensity, jitter)
}

pub fn shake_scale_ramp<J>(target: &TargetRef, max_intensity: f32, jitter: J) -> impl FnMut(Option<&TargetRef>, f32) + 'static
where
    J: FnMut() -> Vec3 + 'static,
{
    shake_ramp(target, VectorKind::Scale, max_intensity, jitter)
}
