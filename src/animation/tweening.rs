use crate::animation::easing::Easing;
use crate::animation::engine::TweenEngine;
use crate::animation::interpolation::{Interpolatable, Interpolation};
use crate::animation::property::PropertyTween;
use crate::core::math::{Color, Vec3};
use crate::traits::{TargetRef, TweenTarget, VectorKind};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;
use std::rc::{Rc, Weak};

/// Identifier handed out for every tween, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TweenId(pub(crate) u64);

impl TweenId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TweenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tween#{}", self.0)
    }
}

new_key_type! {
    /// Storage key of a live tween inside the engine
    pub(crate) struct TweenKey;
}

/// What a tween animates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    Vector(VectorKind),
    /// A named material color slot
    Color,
    /// A caller supplied callback receiving the eased progress
    Action,
    /// A [`PropertyTween`] strategy
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopType {
    #[default]
    None,
    RestartFromBeginning,
    /// Alternates direction every half-trip without snapping back
    PingPong,
}

/// Observable state of a tween slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenState {
    /// Created as a chained successor, waiting for its predecessor
    Pending,
    /// Active but still inside its delay window
    Delayed,
    Running,
    /// Elapsed time has reached the duration
    Completing,
    /// Back in the pool
    Recycled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Free,
    Pending,
    Active,
}

/// Invoked once when a tween finishes. The target is `None` when it is gone.
pub type CompletionHandler = Box<dyn FnOnce(&mut TweenEngine, Option<&TargetRef>)>;

/// Invoked at the end of every loop iteration
pub type LoopHandler = Box<dyn FnMut(Option<&TargetRef>)>;

/// Body of an action tween: `(target, eased_progress)`
pub type ActionFn = Box<dyn FnMut(Option<&TargetRef>, f32)>;

pub(crate) enum TweenValue {
    None,
    Vector {
        end: Vec3,
        start: Vec3,
        diff: Vec3,
    },
    Color {
        end: Color,
        start: Color,
        diff: Color,
        slot: Rc<str>,
        /// Set when the slot does not exist on the target
        missing: bool,
    },
}

/// A single pooled animation unit.
///
/// Tweens are owned by the [`TweenEngine`]; callers configure them through a
/// [`TweenHandle`](crate::animation::engine::TweenHandle) and refer to them by
/// [`TweenId`] afterwards.
pub struct Tween {
    pub(crate) id: TweenId,
    pub(crate) phase: Phase,
    pub(crate) target: Option<Weak<dyn TweenTarget>>,
    pub(crate) kind: TweenKind,
    pub(crate) duration: f32,
    pub(crate) delay: f32,
    pub(crate) delay_between_loops: f32,
    pub(crate) elapsed: f32,
    pub(crate) easing: Option<Easing>,
    pub(crate) relative: bool,
    pub(crate) reversed: bool,
    pub(crate) paused: bool,
    pub(crate) time_scale_independent: bool,
    pub(crate) loop_type: LoopType,
    pub(crate) loops: u32,
    /// Set once a ping-pong tween enters its final half-trip
    pub(crate) closing_round_trip: bool,
    pub(crate) value: TweenValue,
    pub(crate) action: Option<ActionFn>,
    pub(crate) property: Option<Box<dyn PropertyTween>>,
    pub(crate) on_complete: Option<CompletionHandler>,
    pub(crate) on_loop_complete: Option<LoopHandler>,
    /// Storage key of the chained successor
    pub(crate) next: Option<TweenKey>,
    /// Position in the engine's active list while running
    pub(crate) active_index: usize,
}

impl Tween {
    pub(crate) fn empty() -> Self {
        Self {
            id: TweenId(0),
            phase: Phase::Free,
            target: None,
            kind: TweenKind::Action,
            duration: 0.0,
            delay: 0.0,
            delay_between_loops: 0.0,
            elapsed: 0.0,
            easing: None,
            relative: false,
            reversed: false,
            paused: false,
            time_scale_independent: false,
            loop_type: LoopType::None,
            loops: 0,
            closing_round_trip: false,
            value: TweenValue::None,
            action: None,
            property: None,
            on_complete: None,
            on_loop_complete: None,
            next: None,
            active_index: 0,
        }
    }

    /// Drops every owned reference. The chained successor is unwound by the
    /// engine, which owns the slots.
    pub(crate) fn reset(&mut self) {
        *self = Self::empty();
    }

    pub fn id(&self) -> TweenId {
        self.id
    }

    pub fn kind(&self) -> TweenKind {
        self.kind
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Signed elapsed time, negative while delayed
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    pub fn is_time_scale_independent(&self) -> bool {
        self.time_scale_independent
    }

    pub fn loop_type(&self) -> LoopType {
        self.loop_type
    }

    /// Loop iterations left. Ping-pong counts half-trips.
    pub fn remaining_loops(&self) -> u32 {
        self.loops
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn state(&self) -> TweenState {
        match self.phase {
            Phase::Free => TweenState::Recycled,
            Phase::Pending => TweenState::Pending,
            Phase::Active if self.elapsed <= 0.0 => TweenState::Delayed,
            Phase::Active if self.elapsed < self.duration => TweenState::Running,
            Phase::Active => TweenState::Completing,
        }
    }

    /// Destination value for vector tweens
    pub fn end_vector(&self) -> Option<Vec3> {
        match self.value {
            TweenValue::Vector { end, .. } => Some(end),
            _ => None,
        }
    }

    /// Destination value for color tweens
    pub fn end_color(&self) -> Option<Color> {
        match self.value {
            TweenValue::Color { end, .. } => Some(end),
            _ => None,
        }
    }

    pub(crate) fn live_target(&self) -> Option<TargetRef> {
        self.target
            .as_ref()
            .and_then(Weak::upgrade)
            .filter(|target| target.is_alive())
    }

    /// Tweens without a target (property tweens) never go stale
    pub(crate) fn target_is_live(&self) -> bool {
        match &self.target {
            None => true,
            Some(weak) => weak.upgrade().map_or(false, |target| target.is_alive()),
        }
    }

    /// Snapshots the start value from the live target, computes the diff and
    /// re-homes elapsed time to `-delay`
    pub(crate) fn prepare(&mut self, default_easing: &Easing) {
        if self.easing.is_none() {
            self.easing = Some(default_easing.clone());
        }

        let target = self.live_target();
        let relative = self.relative;

        match (&mut self.value, self.kind) {
            (TweenValue::Vector { end, start, diff }, TweenKind::Vector(kind)) => {
                if let Some(target) = &target {
                    *start = target.vector(kind);
                }
                *diff = if relative {
                    *end
                } else if kind.is_rotation() {
                    Interpolation::delta_euler(start, end)
                } else {
                    start.diff(end)
                };
            }
            (
                TweenValue::Color {
                    end,
                    start,
                    diff,
                    slot,
                    missing,
                },
                TweenKind::Color,
            ) => {
                if let Some(target) = &target {
                    match target.color(slot) {
                        Some(color) => {
                            *start = color;
                            *missing = false;
                        }
                        None => {
                            if !*missing {
                                log::warn!("target has no color slot '{}', tween is inert", slot);
                            }
                            *missing = true;
                        }
                    }
                }
                *diff = if relative { *end } else { start.diff(end) };
            }
            _ => {}
        }

        if let Some(property) = self.property.as_mut() {
            property.prepare();
        }

        self.elapsed = -self.delay;
    }

    /// Advances the tween. Returns true once elapsed time sits exactly on the
    /// duration with no loops left to run.
    pub(crate) fn tick(&mut self, delta: f32) -> bool {
        if self.paused {
            return false;
        }
        self.advance(delta)
    }

    /// Ticks straight to the end of the current segment, ignoring pause
    pub(crate) fn force_complete(&mut self) -> bool {
        self.advance(crate::core::constants::FORCE_COMPLETE_DELTA)
    }

    fn advance(&mut self, delta: f32) -> bool {
        let delta = if delta.is_nan() { 0.0 } else { delta };
        self.elapsed = (self.elapsed + delta).clamp(-self.delay, self.duration);

        if self.elapsed <= 0.0 {
            return false;
        }

        let progress = self.progress();
        self.apply(progress);

        if self.elapsed == self.duration {
            if self.loop_type != LoopType::None {
                self.handle_looping();
            } else if self.closing_round_trip {
                self.closing_round_trip = false;
                self.fire_loop_complete();
            }
        }

        self.elapsed == self.duration
    }

    /// Eased progress for the current elapsed time, honoring direction
    pub fn progress(&self) -> f32 {
        let elapsed = self.elapsed.max(0.0);
        let effective = if self.reversed {
            self.duration - elapsed
        } else {
            elapsed
        };

        match &self.easing {
            Some(easing) => easing.apply(effective, self.duration),
            None => effective / self.duration,
        }
    }

    fn apply(&mut self, progress: f32) {
        match self.kind {
            TweenKind::Action => {
                if let Some(action) = self.action.as_mut() {
                    let target = self
                        .target
                        .as_ref()
                        .and_then(Weak::upgrade);
                    action(target.as_ref(), progress);
                }
            }
            TweenKind::Property => {
                if let Some(property) = self.property.as_mut() {
                    property.tick(progress);
                }
            }
            TweenKind::Vector(_) | TweenKind::Color => self.apply_value(progress),
        }
    }

    fn apply_value(&self, progress: f32) {
        let Some(target) = self.live_target() else {
            return;
        };

        match (&self.value, self.kind) {
            (TweenValue::Vector { start, diff, .. }, TweenKind::Vector(kind)) => {
                target.set_vector(kind, start.lerp_diff(diff, progress));
            }
            (
                TweenValue::Color {
                    start,
                    diff,
                    slot,
                    missing: false,
                    ..
                },
                TweenKind::Color,
            ) => {
                target.set_color(slot, start.lerp_diff(diff, progress));
            }
            _ => {}
        }
    }

    /// Puts the live value back at the segment start
    fn snap_to_start(&mut self) {
        if self.kind == TweenKind::Property {
            let effective = if self.reversed { self.duration } else { 0.0 };
            let progress = match &self.easing {
                Some(easing) => easing.apply(effective, self.duration),
                None => effective / self.duration,
            };
            if let Some(property) = self.property.as_mut() {
                property.tick(progress);
            }
            return;
        }

        let Some(target) = self.live_target() else {
            return;
        };

        match (&self.value, self.kind) {
            (TweenValue::Vector { start, .. }, TweenKind::Vector(kind)) => {
                target.set_vector(kind, *start);
            }
            (
                TweenValue::Color {
                    start,
                    slot,
                    missing: false,
                    ..
                },
                TweenKind::Color,
            ) => {
                target.set_color(slot, *start);
            }
            _ => {}
        }
    }

    fn handle_looping(&mut self) {
        self.loops = self.loops.saturating_sub(1);

        match self.loop_type {
            LoopType::RestartFromBeginning => {
                self.snap_to_start();
                // easing is already assigned, so the default is never consulted
                let easing = self.easing.clone().unwrap_or_default();
                self.prepare(&easing);
            }
            LoopType::PingPong => self.reversed = !self.reversed,
            LoopType::None => {}
        }

        let completes_round_trip = self.loops % 2 == 1;
        if self.loop_type == LoopType::RestartFromBeginning || completes_round_trip {
            self.fire_loop_complete();
        }

        if self.loops == 0 {
            if self.loop_type == LoopType::PingPong {
                self.closing_round_trip = true;
            }
            self.loop_type = LoopType::None;
            self.delay_between_loops = 0.0;
        }

        self.delay = self.delay_between_loops;
        self.elapsed = -self.delay;

        #[cfg(feature = "debug")]
        log::debug!(
            "{} looped, {} iterations left, reversed={}",
            self.id,
            self.loops,
            self.reversed
        );
    }

    fn fire_loop_complete(&mut self) {
        if let Some(handler) = self.on_loop_complete.as_mut() {
            let target = self.target.as_ref().and_then(Weak::upgrade);
            handler(target.as_ref());
        }
    }

    /// Flips direction and re-homes elapsed time so the tween runs back from
    /// where it currently is
    pub(crate) fn reverse_in_place(&mut self) {
        self.reversed = !self.reversed;
        self.elapsed = (self.duration - self.elapsed).clamp(-self.delay, self.duration);
    }

    pub(crate) fn set_delay(&mut self, delay: f32) {
        let delay = if delay.is_finite() && delay >= 0.0 {
            delay
        } else {
            log::warn!("{} ignoring invalid delay {}, using 0", self.id, delay);
            0.0
        };
        self.delay = delay;
        self.elapsed = -delay;
    }

    pub(crate) fn set_loop_type(&mut self, loop_type: LoopType, loops: u32, delay_between_loops: f32) {
        self.loop_type = loop_type;
        self.delay_between_loops = delay_between_loops.max(0.0);
        self.closing_round_trip = false;
        self.loops = match loop_type {
            LoopType::PingPong => loops.saturating_mul(2).saturating_sub(1),
            _ => loops,
        };
        if self.loops == 0 {
            self.loop_type = LoopType::None;
        }
    }
}
