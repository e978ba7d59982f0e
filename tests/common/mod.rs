#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tweenkit::{Color, TargetRef, TweenTarget, Vec3, VectorKind};

/// In-memory scene object used as a tween target
pub struct TestTarget {
    pub position: Cell<Vec3>,
    pub local_position: Cell<Vec3>,
    pub rotation: Cell<Vec3>,
    pub local_rotation: Cell<Vec3>,
    pub scale: Cell<Vec3>,
    pub colors: RefCell<HashMap<String, Color>>,
    pub alive: Cell<bool>,
}

impl TestTarget {
    pub fn new() -> Rc<Self> {
        let mut colors = HashMap::new();
        colors.insert("_Color".to_string(), Color::WHITE);

        Rc::new(Self {
            position: Cell::new(Vec3::ZERO),
            local_position: Cell::new(Vec3::ZERO),
            rotation: Cell::new(Vec3::ZERO),
            local_rotation: Cell::new(Vec3::ZERO),
            scale: Cell::new(Vec3::ONE),
            colors: RefCell::new(colors),
            alive: Cell::new(true),
        })
    }

    pub fn at(position: Vec3) -> Rc<Self> {
        let target = Self::new();
        target.position.set(position);
        target
    }

    pub fn with_color(self: &Rc<Self>, slot: &str, color: Color) -> Rc<Self> {
        self.colors.borrow_mut().insert(slot.to_string(), color);
        self.clone()
    }

    pub fn color_of(&self, slot: &str) -> Option<Color> {
        self.colors.borrow().get(slot).copied()
    }

    fn channel(&self, kind: VectorKind) -> &Cell<Vec3> {
        match kind {
            VectorKind::Position => &self.position,
            VectorKind::LocalPosition => &self.local_position,
            VectorKind::Rotation => &self.rotation,
            VectorKind::LocalRotation => &self.local_rotation,
            VectorKind::Scale => &self.scale,
        }
    }
}

impl TweenTarget for TestTarget {
    fn is_alive(&self) -> bool {
        self.alive.get()
    }

    fn vector(&self, kind: VectorKind) -> Vec3 {
        self.channel(kind).get()
    }

    fn set_vector(&self, kind: VectorKind, value: Vec3) {
        self.channel(kind).set(value);
    }

    fn color(&self, slot: &str) -> Option<Color> {
        self.color_of(slot)
    }

    fn set_color(&self, slot: &str, color: Color) {
        if let Some(entry) = self.colors.borrow_mut().get_mut(slot) {
            *entry = color;
        }
    }
}

/// Upcasts to the handle type the engine takes
pub fn as_target(target: &Rc<TestTarget>) -> TargetRef {
    target.clone()
}

/// Shared counter for asserting how often a callback ran
pub fn counter() -> Rc<Cell<u32>> {
    Rc::new(Cell::new(0))
}

pub fn bump(counter: &Rc<Cell<u32>>) {
    counter.set(counter.get() + 1);
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
