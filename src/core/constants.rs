//! Engine-wide constants. Keeping them in a single place makes it easier to
//! tweak the magic numbers the engine relies on.

/// Durations at or below zero are clamped to this value (seconds).
pub const MIN_DURATION: f32 = 1.0e-4;

/// Delta fed to a tween when it is forced to completion. Any finite elapsed
/// time plus this clamps straight to the tween's duration.
pub const FORCE_COMPLETE_DELTA: f32 = f32::MAX;

/// Material slot used by color tweens when no slot is named.
pub const DEFAULT_COLOR_SLOT: &str = "_Color";

/// Pool slots reserved up front by the default configuration.
pub const DEFAULT_POOL_CAPACITY: usize = 20;

/// Half of a full turn, in degrees.
pub const HALF_TURN_DEGREES: f32 = 180.0;

/// A full turn, in degrees.
pub const FULL_TURN_DEGREES: f32 = 360.0;
