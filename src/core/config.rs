//! Configuration for the tween engine
//!
//! Engines are configured either through a preset profile or a custom
//! [`EngineConfig`], which can also be loaded from JSON.

use crate::animation::easing::Easing;
use crate::core::constants::{DEFAULT_COLOR_SLOT, DEFAULT_POOL_CAPACITY, MIN_DURATION};
use crate::{Result, TweenError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum EngineProfile {
    /// Small pool with a quartic ease-in default
    Standard,
    /// Pre-allocates enough pool slots for scenes with many concurrent tweens
    LargeScene,
    Custom(EngineConfig),
}

impl EngineProfile {
    pub fn resolve(&self) -> EngineConfig {
        match self {
            Self::Standard => EngineConfig {
                default_easing: Easing::QuarticIn,
                initial_capacity: DEFAULT_POOL_CAPACITY,
                default_color_slot: DEFAULT_COLOR_SLOT.to_string(),
                min_duration: MIN_DURATION,
            },
            Self::LargeScene => EngineConfig {
                default_easing: Easing::QuarticIn,
                initial_capacity: 1500,
                default_color_slot: DEFAULT_COLOR_SLOT.to_string(),
                min_duration: MIN_DURATION,
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for EngineProfile {
    fn default() -> Self {
        Self::Standard
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Easing assigned at prepare time to tweens that never set one
    pub default_easing: Easing,
    /// Pool slots and active-list capacity reserved when the engine is built
    pub initial_capacity: usize,
    /// Material slot targeted by color tweens that do not name one
    pub default_color_slot: String,
    /// Floor applied to non-positive or non-finite durations
    pub min_duration: f32,
}

impl EngineConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_duration.is_finite() && self.min_duration > 0.0) {
            return Err(TweenError::InvalidConfig(format!(
                "min_duration must be positive and finite, got {}",
                self.min_duration
            )));
        }

        if self.default_color_slot.is_empty() {
            return Err(TweenError::InvalidConfig(
                "default_color_slot must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineProfile::default().resolve()
    }
}
