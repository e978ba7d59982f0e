//! Prelude module for common tweenkit types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use tweenkit::prelude::*;`

pub use crate::animation::{
    actions,
    easing::{CurveKey, EaseCurve, EaseFn, Easing},
    engine::{FrameTime, TweenEngine, TweenHandle},
    interpolation::{Interpolatable, Interpolation},
    property::{NamedProperty, PropertyTween, ValueProperty},
    sequencing::{TweenFactory, TweenFlow, TweenQueue},
    tweening::{LoopType, Tween, TweenId, TweenKind, TweenState},
};

pub use crate::core::{
    config::{EngineConfig, EngineProfile},
    math::{Color, Vec2, Vec3},
};

pub use crate::traits::{PropertyHost, PropertyValue, TargetRef, TweenTarget, VectorKind};

pub use crate::{Result, TweenError};
