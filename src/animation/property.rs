//! Property tween strategies
//!
//! A property tween lets the engine animate values it knows nothing about.
//! The engine calls [`PropertyTween::prepare`] when the tween starts (and on
//! every restart loop) and [`PropertyTween::tick`] with the eased progress
//! each frame.

use crate::animation::interpolation::Interpolatable;
use crate::traits::{PropertyHost, PropertyValue};
use crate::{Result, TweenError};
use std::rc::Rc;

/// Strategy interface for tweening arbitrary properties
pub trait PropertyTween {
    /// Capture the start value and compute the diff
    fn prepare(&mut self);

    /// Apply `start + diff * progress`
    fn tick(&mut self, progress: f32);
}

/// Tweens a value through an explicit getter/setter pair
pub struct ValueProperty<T: Interpolatable> {
    getter: Box<dyn Fn() -> T>,
    setter: Box<dyn FnMut(T)>,
    end_value: T,
    relative: bool,
    start: T,
    diff: T,
}

impl<T: Interpolatable + 'static> ValueProperty<T> {
    pub fn new(
        getter: impl Fn() -> T + 'static,
        setter: impl FnMut(T) + 'static,
        end_value: T,
    ) -> Self {
        Self {
            getter: Box::new(getter),
            setter: Box::new(setter),
            end_value,
            relative: false,
            start: end_value,
            diff: end_value,
        }
    }

    /// Treat the end value as an offset from whatever the start turns out to be
    pub fn relative(mut self) -> Self {
        self.relative = true;
        self
    }
}

impl<T: Interpolatable> PropertyTween for ValueProperty<T> {
    fn prepare(&mut self) {
        self.start = (self.getter)();
        self.diff = if self.relative {
            self.end_value
        } else {
            self.start.diff(&self.end_value)
        };
    }

    fn tick(&mut self, progress: f32) {
        let value = self.start.lerp_diff(&self.diff, progress);
        (self.setter)(value);
    }
}

/// Tweens a property looked up by name on a [`PropertyHost`].
///
/// If the name does not resolve to a value of type `T` the property goes
/// inert: the failure is logged once and every later tick is a no-op.
pub struct NamedProperty<T> {
    host: Rc<dyn PropertyHost>,
    name: String,
    end_value: T,
    relative: bool,
    start: T,
    diff: T,
    inert: bool,
}

impl<T> NamedProperty<T>
where
    T: Interpolatable + Into<PropertyValue> + TryFrom<PropertyValue>,
{
    /// Resolves the property, returning an error if the host does not
    /// expose `name` as a `T`
    pub fn try_new(host: Rc<dyn PropertyHost>, name: impl Into<String>, end_value: T) -> Result<Self> {
        let name = name.into();
        resolve::<T>(host.as_ref(), &name)?;

        Ok(Self {
            host,
            name,
            end_value,
            relative: false,
            start: end_value,
            diff: end_value,
            inert: false,
        })
    }

    /// Like [`NamedProperty::try_new`] but never fails; an unresolved
    /// property produces an inert tween and a warning
    pub fn new(host: Rc<dyn PropertyHost>, name: impl Into<String>, end_value: T) -> Self {
        let name = name.into();
        let inert = match resolve::<T>(host.as_ref(), &name) {
            Ok(_) => false,
            Err(e) => {
                log::warn!("property tween will not animate: {}", e);
                true
            }
        };

        Self {
            host,
            name,
            end_value,
            relative: false,
            start: end_value,
            diff: end_value,
            inert,
        }
    }

    pub fn relative(mut self) -> Self {
        self.relative = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }
}

fn resolve<T>(host: &dyn PropertyHost, name: &str) -> Result<T>
where
    T: TryFrom<PropertyValue>,
{
    host.get_property(name)
        .and_then(|value| T::try_from(value).ok())
        .ok_or_else(|| TweenError::UnresolvedProperty {
            name: name.to_string(),
        })
}

impl<T> PropertyTween for NamedProperty<T>
where
    T: Interpolatable + Into<PropertyValue> + TryFrom<PropertyValue>,
{
    fn prepare(&mut self) {
        if self.inert {
            return;
        }

        match resolve::<T>(self.host.as_ref(), &self.name) {
            Ok(start) => {
                self.start = start;
                self.diff = if self.relative {
                    self.end_value
                } else {
                    start.diff(&self.end_value)
                };
            }
            Err(e) => {
                log::warn!("property tween went inert: {}", e);
                self.inert = true;
            }
        }
    }

    fn tick(&mut self, progress: f32) {
        if self.inert {
            return;
        }

        let value = self.start.lerp_diff(&self.diff, progress);
        if !self.host.set_property(&self.name, value.into()) {
            log::warn!("property '{}' rejected tweened value", self.name);
            self.inert = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::{Color, Vec3};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    #[derive(Default)]
    struct Sprite {
        values: RefCell<HashMap<String, PropertyValue>>,
    }

    impl Sprite {
        fn with(name: &str, value: PropertyValue) -> Rc<Self> {
            let sprite = Sprite::default();
            sprite.values.borrow_mut().insert(name.to_string(), value);
            Rc::new(sprite)
        }

        fn get(&self, name: &str) -> Option<PropertyValue> {
            self.values.borrow().get(name).copied()
        }
    }

    impl PropertyHost for Sprite {
        fn get_property(&self, name: &str) -> Option<PropertyValue> {
            self.get(name)
        }

        fn set_property(&self, name: &str, value: PropertyValue) -> bool {
            let mut values = self.values.borrow_mut();
            match values.get(name) {
                Some(existing) if existing.type_name() == value.type_name() => {
                    values.insert(name.to_string(), value);
                    true
                }
                _ => false,
            }
        }
    }

    #[test]
    fn test_value_property_absolute() {
        let cell = Rc::new(Cell::new(2.0_f32));
        let (read, write) = (cell.clone(), cell.clone());
        let mut property = ValueProperty::new(move || read.get(), move |v| write.set(v), 6.0);

        property.prepare();
        property.tick(0.5);
        assert_eq!(cell.get(), 4.0);
        property.tick(1.0);
        assert_eq!(cell.get(), 6.0);
    }

    #[test]
    fn test_value_property_relative() {
        let cell = Rc::new(Cell::new(Vec3::ONE));
        let (read, write) = (cell.clone(), cell.clone());
        let mut property =
            ValueProperty::new(move || read.get(), move |v| write.set(v), Vec3::splat(2.0))
                .relative();

        property.prepare();
        property.tick(1.0);
        assert_eq!(cell.get(), Vec3::splat(3.0));
    }

    #[test]
    fn test_named_property_tweens_color() {
        let sprite = Sprite::with("tint", PropertyValue::Color(Color::BLACK));
        let mut property = NamedProperty::try_new(sprite.clone(), "tint", Color::WHITE).unwrap();

        property.prepare();
        property.tick(0.5);
        assert_eq!(
            sprite.get("tint"),
            Some(PropertyValue::Color(Color::rgba(0.5, 0.5, 0.5, 1.0)))
        );
    }

    #[test]
    fn test_named_property_unresolved() {
        let sprite = Sprite::with("alpha", PropertyValue::Float(1.0));

        assert!(matches!(
            NamedProperty::try_new(sprite.clone(), "missing", 0.0_f32),
            Err(TweenError::UnresolvedProperty { .. })
        ));
        // wrong type is as good as missing
        assert!(NamedProperty::try_new(sprite.clone(), "alpha", Vec3::ZERO).is_err());

        let mut inert = NamedProperty::new(sprite.clone(), "missing", 0.0_f32);
        assert!(inert.is_inert());
        inert.prepare();
        inert.tick(1.0);
        assert_eq!(sprite.get("missing"), None);
        assert_eq!(sprite.get("alpha"), Some(PropertyValue::Float(1.0)));
    }
}
