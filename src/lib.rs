//! # Tweenkit
//!
//! A small, allocation-conscious tweening engine.
//!
//! Tweens interpolate transform channels, material colors, caller supplied
//! properties or plain callbacks over time, with easing, delays, loops,
//! chaining and queue/flow composition. The host owns a [`TweenEngine`] and
//! drives it once per frame with the elapsed time.

pub mod animation;
pub mod core;
pub mod prelude;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use animation::{
    easing::Easing,
    engine::{FrameTime, TweenEngine, TweenHandle},
    sequencing::{TweenFlow, TweenQueue},
    tweening::{LoopType, TweenId, TweenKind, TweenState},
};

pub use crate::core::{
    config::{EngineConfig, EngineProfile},
    math::{Color, Vec2, Vec3},
};

pub use traits::{PropertyHost, PropertyValue, TargetRef, TweenTarget, VectorKind};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, TweenError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum TweenError {
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid ease curve: {0}")]
    InvalidCurve(String),

    #[error("Unresolved property: {name}")]
    UnresolvedProperty { name: String },
}
