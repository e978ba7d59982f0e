//! Shared trait abstractions for tween targets
//!
//! The engine never owns what it animates. Hosts implement these traits on
//! their scene objects and hand the engine a shared reference; the engine
//! only keeps a weak handle and checks liveness every frame.

use crate::core::math::{Color, Vec2, Vec3};
use std::rc::Rc;

/// Which transform channel a vector tween drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorKind {
    Position,
    LocalPosition,
    /// World euler angles in degrees
    Rotation,
    /// Local euler angles in degrees
    LocalRotation,
    /// Local scale
    Scale,
}

impl VectorKind {
    /// Rotation channels interpolate along the shortest angular path
    pub fn is_rotation(&self) -> bool {
        matches!(self, VectorKind::Rotation | VectorKind::LocalRotation)
    }
}

/// A scene object whose transform and material colors can be tweened.
///
/// Setters take `&self`; implementors use interior mutability.
pub trait TweenTarget {
    /// False once the object has been destroyed but is still referenced
    fn is_alive(&self) -> bool {
        true
    }

    fn vector(&self, kind: VectorKind) -> Vec3;

    fn set_vector(&self, kind: VectorKind, value: Vec3);

    /// Reads a named material color, `None` if the material has no such slot
    fn color(&self, slot: &str) -> Option<Color>;

    fn set_color(&self, slot: &str, color: Color);
}

/// Shared reference the engine hands back to completion handlers
pub type TargetRef = Rc<dyn TweenTarget>;

/// Dynamically typed value for name-addressed properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Color(Color),
}

impl PropertyValue {
    /// Name of the carried type, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Float(_) => "float",
            PropertyValue::Vec2(_) => "vec2",
            PropertyValue::Vec3(_) => "vec3",
            PropertyValue::Color(_) => "color",
        }
    }
}

macro_rules! property_value_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PropertyValue {
                fn from(value: $ty) -> Self {
                    PropertyValue::$variant(value)
                }
            }

            impl TryFrom<PropertyValue> for $ty {
                type Error = PropertyValue;

                fn try_from(value: PropertyValue) -> Result<Self, Self::Error> {
                    match value {
                        PropertyValue::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

property_value_conversions!(f32 => Float, Vec2 => Vec2, Vec3 => Vec3, Color => Color);

/// An object exposing properties addressed by name, for reflection-style
/// property tweens
pub trait PropertyHost {
    fn get_property(&self, name: &str) -> Option<PropertyValue>;

    /// Writes a property. Returns false if the name is unknown or the
    /// value has the wrong type.
    fn set_property(&self, name: &str, value: PropertyValue) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_value_conversions() {
        let value = PropertyValue::from(Vec3::ONE);
        assert_eq!(value.type_name(), "vec3");
        assert_eq!(Vec3::try_from(value), Ok(Vec3::ONE));
        assert_eq!(f32::try_from(value), Err(value));
    }

    #[test]
    fn test_rotation_kinds() {
        assert!(VectorKind::Rotation.is_rotation());
        assert!(VectorKind::LocalRotation.is_rotation());
        assert!(!VectorKind::Scale.is_rotation());
    }
}
