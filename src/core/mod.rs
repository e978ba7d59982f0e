pub mod config;
pub mod constants;
pub mod math;

pub use config::{EngineConfig, EngineProfile};
pub use math::{Color, Vec2, Vec3};
