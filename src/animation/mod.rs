pub mod actions;
pub mod easing;
pub mod engine;
pub mod interpolation;
pub mod property;
pub mod sequencing;
pub mod tweening;

// Re-export commonly used types and functions for convenience
pub use easing::{CurveKey, EaseCurve, EaseFn, Easing};
pub use engine::{FrameTime, TweenEngine, TweenHandle};
pub use interpolation::{Interpolatable, Interpolation};
pub use property::{NamedProperty, PropertyTween, ValueProperty};
pub use sequencing::{TweenFlow, TweenQueue};
pub use tweening::{LoopType, Tween, TweenId, TweenKind, TweenState};
