//! Tween engine: pool, scheduling and the public tween API
//!
//! Live tweens sit in a [`SlotMap`] keyed by [`TweenKey`]; the public
//! [`TweenId`] maps onto that key and is never reused, so a stale id simply
//! stops resolving. Completed tweens are reset and parked in a pool that is
//! drained before anything new is allocated.

use crate::animation::easing::Easing;
use crate::animation::property::PropertyTween;
use crate::animation::tweening::{
    CompletionHandler, LoopType, Phase, Tween, TweenId, TweenKey, TweenKind, TweenState,
    TweenValue,
};
use crate::core::config::{EngineConfig, EngineProfile};
use crate::core::math::{Color, Vec3};
use crate::traits::{TargetRef, VectorKind};
use slotmap::SlotMap;
use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::rc::Rc;

/// Time that passed since the previous update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Delta after the host's time scale was applied
    pub delta: f32,
    /// Raw wall clock delta
    pub unscaled_delta: f32,
}

impl FrameTime {
    /// A frame where scaled and unscaled time agree
    pub fn new(delta: f32) -> Self {
        Self {
            delta,
            unscaled_delta: delta,
        }
    }

    pub fn scaled(unscaled_delta: f32, time_scale: f32) -> Self {
        Self {
            delta: unscaled_delta * time_scale,
            unscaled_delta,
        }
    }

    fn delta_for(&self, time_scale_independent: bool) -> f32 {
        if time_scale_independent {
            self.unscaled_delta
        } else {
            self.delta
        }
    }
}

/// Pooled tween scheduler
pub struct TweenEngine {
    /// Every tween that is active or waiting in a chain
    slots: SlotMap<TweenKey, Tween>,
    ids: HashMap<TweenId, TweenKey>,
    active: Vec<TweenKey>,
    /// Reset tweens ready for reuse
    pool: Vec<Tween>,
    /// Scratch list reused by every update pass
    completed: Vec<TweenKey>,
    next_id: u64,
    default_color_slot: Rc<str>,
    config: EngineConfig,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::with_profile(EngineProfile::default())
    }

    pub fn with_profile(profile: EngineProfile) -> Self {
        Self::with_config(profile.resolve())
    }

    /// Builds an engine with `initial_capacity` tweens already pooled
    pub fn with_config(config: EngineConfig) -> Self {
        let capacity = config.initial_capacity;

        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            ids: HashMap::with_capacity(capacity),
            active: Vec::with_capacity(capacity),
            pool: (0..capacity).map(|_| Tween::empty()).collect(),
            completed: Vec::with_capacity(capacity),
            next_id: 1,
            default_color_slot: Rc::from(config.default_color_slot.as_str()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn default_easing(&self) -> &Easing {
        &self.config.default_easing
    }

    /// Changes the easing assigned to tweens created from now on
    pub fn set_default_easing(&mut self, easing: Easing) {
        self.config.default_easing = easing;
    }

    /// Number of tweens currently being ticked
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of recycled tweens waiting for reuse
    pub fn pooled_count(&self) -> usize {
        self.pool.len()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    // ---- creation ----

    pub fn position_to(&mut self, target: &TargetRef, duration: f32, end: Vec3) -> TweenHandle<'_> {
        self.vector_to(target, VectorKind::Position, duration, end)
    }

    pub fn position_from(&mut self, target: &TargetRef, duration: f32, from: Vec3) -> TweenHandle<'_> {
        self.vector_from(target, VectorKind::Position, duration, from)
    }

    pub fn local_position_to(&mut self, target: &TargetRef, duration: f32, end: Vec3) -> TweenHandle<'_> {
        self.vector_to(target, VectorKind::LocalPosition, duration, end)
    }

    pub fn local_position_from(&mut self, target: &TargetRef, duration: f32, from: Vec3) -> TweenHandle<'_> {
        self.vector_from(target, VectorKind::LocalPosition, duration, from)
    }

    pub fn rotation_to(&mut self, target: &TargetRef, duration: f32, end: Vec3) -> TweenHandle<'_> {
        self.vector_to(target, VectorKind::Rotation, duration, end)
    }

    pub fn rotation_from(&mut self, target: &TargetRef, duration: f32, from: Vec3) -> TweenHandle<'_> {
        self.vector_from(target, VectorKind::Rotation, duration, from)
    }

    pub fn local_rotation_to(&mut self, target: &TargetRef, duration: f32, end: Vec3) -> TweenHandle<'_> {
        self.vector_to(target, VectorKind::LocalRotation, duration, end)
    }

    pub fn local_rotation_from(&mut self, target: &TargetRef, duration: f32, from: Vec3) -> TweenHandle<'_> {
        self.vector_from(target, VectorKind::LocalRotation, duration, from)
    }

    pub fn scale_to(&mut self, target: &TargetRef, duration: f32, end: Vec3) -> TweenHandle<'_> {
        self.vector_to(target, VectorKind::Scale, duration, end)
    }

    pub fn scale_from(&mut self, target: &TargetRef, duration: f32, from: Vec3) -> TweenHandle<'_> {
        self.vector_from(target, VectorKind::Scale, duration, from)
    }

    /// Creates and starts a vector tween toward `end`
    pub fn vector_to(
        &mut self,
        target: &TargetRef,
        kind: VectorKind,
        duration: f32,
        end: Vec3,
    ) -> TweenHandle<'_> {
        let key = self.vector_key(target, kind, duration, end);
        self.activate(key);
        TweenHandle { engine: self, key }
    }

    /// Jumps the target to `from` and animates back to where it was
    pub fn vector_from(
        &mut self,
        target: &TargetRef,
        kind: VectorKind,
        duration: f32,
        from: Vec3,
    ) -> TweenHandle<'_> {
        let current = target.vector(kind);
        target.set_vector(kind, from);
        self.vector_to(target, kind, duration, current)
    }

    /// Color tween on the default material slot
    pub fn color_to(&mut self, target: &TargetRef, duration: f32, end: Color) -> TweenHandle<'_> {
        let key = self.color_key(target, duration, end, None);
        self.activate(key);
        TweenHandle { engine: self, key }
    }

    pub fn color_to_slot(
        &mut self,
        target: &TargetRef,
        duration: f32,
        end: Color,
        material_slot: &str,
    ) -> TweenHandle<'_> {
        let key = self.color_key(target, duration, end, Some(material_slot));
        self.activate(key);
        TweenHandle { engine: self, key }
    }

    pub fn color_from(&mut self, target: &TargetRef, duration: f32, from: Color) -> TweenHandle<'_> {
        let material_slot = self.default_color_slot.clone();
        self.color_from_slot(target, duration, from, &material_slot)
    }

    pub fn color_from_slot(
        &mut self,
        target: &TargetRef,
        duration: f32,
        from: Color,
        material_slot: &str,
    ) -> TweenHandle<'_> {
        let end = match target.color(material_slot) {
            Some(current) => {
                target.set_color(material_slot, from);
                current
            }
            None => from,
        };
        self.color_to_slot(target, duration, end, material_slot)
    }

    /// Runs `action` every frame with the eased progress
    pub fn custom_action<F>(
        &mut self,
        target: &TargetRef,
        duration: f32,
        action: F,
        delay: f32,
        easing: Option<Easing>,
    ) -> TweenHandle<'_>
    where
        F: FnMut(Option<&TargetRef>, f32) + 'static,
    {
        let key = self.allocate(Some(target), duration, TweenKind::Action);
        {
            let tween = &mut self.slots[key];
            tween.action = Some(Box::new(action));
            tween.easing = easing;
            tween.set_delay(delay);
        }
        self.activate(key);
        TweenHandle { engine: self, key }
    }

    /// Drives a caller supplied [`PropertyTween`] strategy
    pub fn property_tween<P>(
        &mut self,
        property: P,
        duration: f32,
        delay: f32,
        easing: Option<Easing>,
    ) -> TweenHandle<'_>
    where
        P: PropertyTween + 'static,
    {
        let key = self.allocate(None, duration, TweenKind::Property);
        {
            let tween = &mut self.slots[key];
            tween.property = Some(Box::new(property));
            tween.easing = easing;
            tween.set_delay(delay);
        }
        self.activate(key);
        TweenHandle { engine: self, key }
    }

    // ---- management ----

    /// Stops a tween, optionally ticking it to its final value and firing its
    /// completion handler first. Its chain is dropped, not started.
    pub fn stop_tween(&mut self, id: TweenId, bring_to_completion: bool) -> bool {
        let Some(key) = self.active_key(id) else {
            return false;
        };

        let index = self.slots[key].active_index;
        self.remove_active_at(index);
        self.retire(key, bring_to_completion);
        true
    }

    pub fn stop_all_tweens(&mut self, bring_to_completion: bool) {
        let mut stopping = mem::take(&mut self.active);
        for key in stopping.drain(..).rev() {
            self.retire(key, bring_to_completion);
        }

        // keep the allocation unless a completion handler started new tweens
        if self.active.is_empty() {
            self.active = stopping;
        }
    }

    pub fn set_pause_state(&mut self, id: TweenId, paused: bool) -> bool {
        match self.active_key(id) {
            Some(key) => {
                self.slots[key].paused = paused;
                true
            }
            None => false,
        }
    }

    pub fn set_all_pause_state(&mut self, paused: bool) {
        for &key in &self.active {
            if let Some(tween) = self.slots.get_mut(key) {
                tween.paused = paused;
            }
        }
    }

    pub fn is_tween_active(&self, id: TweenId) -> bool {
        self.active_key(id).is_some()
    }

    /// Looks up an active tween. Do not hold on to the reference across
    /// updates; use the id instead.
    pub fn get_active_tween(&self, id: TweenId) -> Option<&Tween> {
        self.active_key(id).and_then(|key| self.slots.get(key))
    }

    /// State of any tween the engine still knows about, active or chained
    pub fn tween_state(&self, id: TweenId) -> Option<TweenState> {
        self.live_key(id)
            .and_then(|key| self.slots.get(key))
            .map(Tween::state)
    }

    /// Flips an active tween so it runs back from where it currently is
    pub fn reverse_tween(&mut self, id: TweenId) -> bool {
        match self.active_key(id) {
            Some(key) => {
                self.slots[key].reverse_in_place();
                true
            }
            None => false,
        }
    }

    /// Reopens the builder for a tween that is active or waiting in a chain
    pub fn handle(&mut self, id: TweenId) -> Option<TweenHandle<'_>> {
        let key = self.live_key(id)?;
        Some(TweenHandle { engine: self, key })
    }

    // ---- frame update ----

    pub fn update(&mut self, delta: f32) {
        self.update_with(FrameTime::new(delta));
    }

    /// Advances every active tween by one frame.
    ///
    /// Tweens are ticked in reverse order of the active list; completion
    /// handlers run after all ticks, followed by activation of any chained
    /// successor, so a chain never skips a frame between segments.
    pub fn update_with(&mut self, frame: FrameTime) {
        let mut completed = mem::take(&mut self.completed);
        completed.clear();

        for index in (0..self.active.len()).rev() {
            let key = self.active[index];
            let Some(tween) = self.slots.get_mut(key) else {
                continue;
            };
            if tween.paused {
                continue;
            }

            let finished = if tween.target_is_live() {
                tween.tick(frame.delta_for(tween.time_scale_independent))
            } else {
                #[cfg(feature = "debug")]
                log::debug!("{} target is gone, dropping", tween.id);
                true
            };

            if finished {
                self.remove_active_at(index);
                completed.push(key);
            }
        }

        for &key in &completed {
            self.finish(key);
        }

        completed.clear();
        self.completed = completed;
    }

    // ---- internals ----

    fn sanitize_duration(&self, duration: f32) -> f32 {
        if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            log::warn!(
                "invalid tween duration {}, clamping to {}",
                duration,
                self.config.min_duration
            );
            self.config.min_duration
        }
    }

    /// Takes a tween from the pool (or builds one) and stamps a new id
    fn allocate(&mut self, target: Option<&TargetRef>, duration: f32, kind: TweenKind) -> TweenKey {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        let duration = self.sanitize_duration(duration);

        let mut tween = self.pool.pop().unwrap_or_else(Tween::empty);
        tween.id = id;
        tween.phase = Phase::Pending;
        tween.target = target.map(Rc::downgrade);
        tween.kind = kind;
        tween.duration = duration;

        let key = self.slots.insert(tween);
        self.ids.insert(id, key);

        #[cfg(feature = "debug")]
        log::debug!("allocated {} ({:?}), {} left in pool", id, kind, self.pool.len());

        key
    }

    fn vector_key(&mut self, target: &TargetRef, kind: VectorKind, duration: f32, end: Vec3) -> TweenKey {
        let key = self.allocate(Some(target), duration, TweenKind::Vector(kind));
        self.slots[key].value = TweenValue::Vector {
            end,
            start: end,
            diff: Vec3::ZERO,
        };
        key
    }

    fn color_key(
        &mut self,
        target: &TargetRef,
        duration: f32,
        end: Color,
        material_slot: Option<&str>,
    ) -> TweenKey {
        let material_slot = match material_slot {
            Some(name) if name != &*self.default_color_slot => Rc::from(name),
            _ => self.default_color_slot.clone(),
        };

        let key = self.allocate(Some(target), duration, TweenKind::Color);
        self.slots[key].value = TweenValue::Color {
            end,
            start: end,
            diff: Color::CLEAR,
            slot: material_slot,
            missing: false,
        };
        key
    }

    fn activate(&mut self, key: TweenKey) {
        let index = self.active.len();
        let Some(tween) = self.slots.get_mut(key) else {
            return;
        };
        tween.prepare(&self.config.default_easing);
        tween.phase = Phase::Active;
        tween.active_index = index;
        self.active.push(key);
    }

    /// Swap-removes an entry from the active list and re-points the tween
    /// that moved into its place
    fn remove_active_at(&mut self, index: usize) {
        self.active.swap_remove(index);
        if let Some(&moved) = self.active.get(index) {
            if let Some(tween) = self.slots.get_mut(moved) {
                tween.active_index = index;
            }
        }
    }

    /// Completion for a tween already removed from the active list
    fn finish(&mut self, key: TweenKey) {
        let Some(tween) = self.slots.get_mut(key) else {
            return;
        };
        let handler = tween.on_complete.take();
        let next = tween.next.take();
        let target = tween.live_target();

        #[cfg(feature = "debug")]
        log::debug!("{} complete", tween.id);

        if let Some(handler) = handler {
            handler(self, target.as_ref());
        }

        if let Some(next) = next {
            self.activate(next);
        }

        self.recycle(key);
    }

    fn retire(&mut self, key: TweenKey, bring_to_completion: bool) {
        if bring_to_completion {
            if let Some(tween) = self.slots.get_mut(key) {
                if tween.target_is_live() {
                    tween.force_complete();
                }
                let handler = tween.on_complete.take();
                let target = tween.live_target();
                if let Some(handler) = handler {
                    handler(self, target.as_ref());
                }
            }
        }

        self.recycle(key);
    }

    /// Returns a tween and its whole chain of successors to the pool
    fn recycle(&mut self, key: TweenKey) {
        let mut cursor = Some(key);
        while let Some(key) = cursor {
            let Some(mut tween) = self.slots.remove(key) else {
                break;
            };
            cursor = tween.next.take();
            self.ids.remove(&tween.id);

            #[cfg(feature = "debug")]
            log::debug!("recycling {}", tween.id);

            tween.reset();
            self.pool.push(tween);
        }
    }

    /// Key of a tween that is currently in the active list
    fn active_key(&self, id: TweenId) -> Option<TweenKey> {
        let key = self.live_key(id)?;
        let tween = self.slots.get(key)?;
        let listed = self.active.get(tween.active_index) == Some(&key);
        (tween.phase == Phase::Active && listed).then_some(key)
    }

    fn live_key(&self, id: TweenId) -> Option<TweenKey> {
        self.ids.get(&id).copied()
    }

    /// Replaces the successor of `key`, recycling any chain it had
    fn attach_next(&mut self, key: TweenKey, next: TweenKey) {
        let old = self
            .slots
            .get_mut(key)
            .and_then(|tween| tween.next.replace(next));
        if let Some(old) = old {
            self.recycle(old);
        }
    }
}

impl Default for TweenEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TweenEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenEngine")
            .field("active", &self.active.len())
            .field("pooled", &self.pool.len())
            .field("live", &self.slots.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

/// Builder returned by every tween creation call.
///
/// The handle borrows the engine, so configure the tween right away and keep
/// its [`TweenId`] if you need to refer to it later.
pub struct TweenHandle<'a> {
    engine: &'a mut TweenEngine,
    key: TweenKey,
}

impl<'a> TweenHandle<'a> {
    pub fn id(&self) -> TweenId {
        self.tween().id
    }

    pub fn tween(&self) -> &Tween {
        &self.engine.slots[self.key]
    }

    fn tween_mut(&mut self) -> &mut Tween {
        &mut self.engine.slots[self.key]
    }

    pub fn set_easing(mut self, easing: impl Into<Easing>) -> Self {
        self.tween_mut().easing = Some(easing.into());
        self
    }

    /// Sets the delay and re-homes elapsed time to `-delay`
    pub fn set_delay(mut self, delay: f32) -> Self {
        self.tween_mut().set_delay(delay);
        self
    }

    /// `loops` counts full iterations; a ping-pong loop is start, end, start
    pub fn set_loop_type(mut self, loop_type: LoopType, loops: u32, delay_between_loops: f32) -> Self {
        self.tween_mut()
            .set_loop_type(loop_type, loops, delay_between_loops);
        self
    }

    /// Makes the destination an offset from the start value
    pub fn set_relative(mut self, relative: bool) -> Self {
        let engine = &mut *self.engine;
        let tween = &mut engine.slots[self.key];
        if tween.relative != relative {
            tween.relative = relative;
            if tween.phase == Phase::Active {
                tween.prepare(&engine.config.default_easing);
            }
        }
        self
    }

    /// Ticks this tween off the unscaled clock
    pub fn set_time_scale_independent(mut self) -> Self {
        self.tween_mut().time_scale_independent = true;
        self
    }

    pub fn set_paused(mut self, paused: bool) -> Self {
        self.tween_mut().paused = paused;
        self
    }

    pub fn set_completion_handler<F>(mut self, handler: F) -> Self
    where
        F: FnOnce(&mut TweenEngine, Option<&TargetRef>) + 'static,
    {
        self.tween_mut().on_complete = Some(Box::new(handler));
        self
    }

    /// Removes the completion handler so a caller can wrap it
    pub(crate) fn take_completion_handler(&mut self) -> Option<CompletionHandler> {
        self.tween_mut().on_complete.take()
    }

    pub fn set_loop_completion_handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(Option<&TargetRef>) + 'static,
    {
        self.tween_mut().on_loop_complete = Some(Box::new(handler));
        self
    }

    fn target(&self) -> Option<TargetRef> {
        self.tween().target.as_ref().and_then(|weak| weak.upgrade())
    }

    fn chain(self, next: TweenKey) -> TweenHandle<'a> {
        let TweenHandle { engine, key } = self;
        engine.attach_next(key, next);
        TweenHandle { engine, key: next }
    }

    /// Chains a tween of the same target and channel toward `end`.
    /// Returns the successor's handle.
    pub fn next(self, duration: f32, end: Vec3) -> TweenHandle<'a> {
        let kind = match self.tween().kind {
            TweenKind::Vector(kind) => kind,
            other => {
                log::warn!("{:?} tween has no vector channel to continue, using position", other);
                VectorKind::Position
            }
        };
        self.next_kind(kind, duration, end)
    }

    /// Chains a vector tween on the same target but another channel
    pub fn next_kind(mut self, kind: VectorKind, duration: f32, end: Vec3) -> TweenHandle<'a> {
        match self.target() {
            Some(target) => self.next_with_target(&target, kind, duration, end),
            None => {
                let orphaned = self.tween().target.clone();
                let next = self.engine.allocate(None, duration, TweenKind::Vector(kind));
                let tween = &mut self.engine.slots[next];
                tween.value = TweenValue::Vector {
                    end,
                    start: end,
                    diff: Vec3::ZERO,
                };
                // a dead target is dropped on its first tick
                tween.target = orphaned;
                self.chain(next)
            }
        }
    }

    pub fn next_with_target(
        mut self,
        target: &TargetRef,
        kind: VectorKind,
        duration: f32,
        end: Vec3,
    ) -> TweenHandle<'a> {
        let next = self.engine.vector_key(target, kind, duration, end);
        self.chain(next)
    }

    /// Chains a color tween on the default slot, keeping this tween's easing
    pub fn next_color(self, duration: f32, end: Color) -> TweenHandle<'a> {
        let material_slot = self.engine.default_color_slot.clone();
        self.next_color_slot(duration, end, &material_slot)
    }

    pub fn next_color_slot(mut self, duration: f32, end: Color, material_slot: &str) -> TweenHandle<'a> {
        let easing = self.tween().easing.clone();
        let orphaned = self.tween().target.clone();
        let next = match self.target() {
            Some(target) => self
                .engine
                .color_key(&target, duration, end, Some(material_slot)),
            None => {
                let next = self.engine.allocate(None, duration, TweenKind::Color);
                self.engine.slots[next].target = orphaned;
                next
            }
        };
        self.engine.slots[next].easing = easing;
        self.chain(next)
    }

    /// Chains an action tween on the same target, keeping this tween's easing
    pub fn next_action<F>(mut self, duration: f32, action: F) -> TweenHandle<'a>
    where
        F: FnMut(Option<&TargetRef>, f32) + 'static,
    {
        let easing = self.tween().easing.clone();
        let target = self.tween().target.clone();
        let next = self.engine.allocate(None, duration, TweenKind::Action);
        {
            let tween = &mut self.engine.slots[next];
            tween.target = target;
            tween.action = Some(Box::new(action));
            tween.easing = easing;
        }
        self.chain(next)
    }

    /// Chains a property tween, keeping this tween's easing
    pub fn next_property<P>(mut self, duration: f32, property: P) -> TweenHandle<'a>
    where
        P: PropertyTween + 'static,
    {
        let easing = self.tween().easing.clone();
        let next = self.engine.allocate(None, duration, TweenKind::Property);
        {
            let tween = &mut self.engine.slots[next];
            tween.property = Some(Box::new(property));
            tween.easing = easing;
        }
        self.chain(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TweenTarget;
    use std::cell::Cell;

    #[derive(Default)]
    struct Marker {
        position: Cell<Vec3>,
        scale: Cell<Vec3>,
        alive: Cell<bool>,
    }

    impl TweenTarget for Marker {
        fn is_alive(&self) -> bool {
            self.alive.get()
        }

        fn vector(&self, kind: VectorKind) -> Vec3 {
            match kind {
                VectorKind::Scale => self.scale.get(),
                _ => self.position.get(),
            }
        }

        fn set_vector(&self, kind: VectorKind, value: Vec3) {
            match kind {
                VectorKind::Scale => self.scale.set(value),
                _ => self.position.set(value),
            }
        }

        fn color(&self, _slot: &str) -> Option<Color> {
            None
        }

        fn set_color(&self, _slot: &str, _color: Color) {}
    }

    fn marker() -> (Rc<Marker>, TargetRef) {
        let marker = Rc::new(Marker {
            alive: Cell::new(true),
            ..Default::default()
        });
        let target: TargetRef = marker.clone();
        (marker, target)
    }

    #[test]
    fn test_with_config_prefills_pool() {
        let engine = TweenEngine::with_config(EngineConfig {
            initial_capacity: 8,
            ..EngineConfig::default()
        });
        assert_eq!(engine.pooled_count(), 8);
        assert_eq!(engine.active_count(), 0);
        assert!(engine.is_idle());
    }

    #[test]
    fn test_pool_reuses_tweens_before_growing() {
        let (_marker, target) = marker();
        let mut engine = TweenEngine::with_config(EngineConfig {
            initial_capacity: 2,
            ..EngineConfig::default()
        });

        let a = engine.position_to(&target, 1.0, Vec3::ONE).id();
        let b = engine.position_to(&target, 1.0, Vec3::ONE).id();
        assert_eq!(engine.pooled_count(), 0);
        assert_eq!(engine.slots.len(), 2);

        engine.stop_tween(a, false);
        engine.stop_tween(b, false);
        assert_eq!(engine.pooled_count(), 2);
        assert!(engine.slots.is_empty());

        engine.position_to(&target, 1.0, Vec3::ONE);
        assert_eq!(engine.slots.len(), 1);
        assert_eq!(engine.pooled_count(), 1);
    }

    #[test]
    fn test_recycled_id_does_not_resolve_to_reused_storage() {
        let (_marker, target) = marker();
        let mut engine = TweenEngine::new();

        let old = engine.position_to(&target, 1.0, Vec3::ONE).id();
        engine.stop_tween(old, false);
        let fresh = engine.position_to(&target, 1.0, Vec3::ONE).id();

        assert_ne!(old, fresh);
        assert!(!engine.is_tween_active(old));
        assert!(engine.tween_state(old).is_none());
        assert!(engine.handle(old).is_none());
        assert!(!engine.stop_tween(old, false));
        assert!(engine.is_tween_active(fresh));
    }

    #[test]
    fn test_stop_keeps_moved_tween_addressable() {
        let (_marker, target) = marker();
        let mut engine = TweenEngine::new();

        let ids: Vec<_> = (0..4)
            .map(|_| engine.position_to(&target, 1.0, Vec3::ONE).id())
            .collect();

        // the last tween is swapped into the first one's place
        assert!(engine.stop_tween(ids[0], false));
        assert!(engine.set_pause_state(ids[3], true));
        assert!(engine.get_active_tween(ids[3]).map_or(false, |t| t.is_paused()));
        assert!(engine.stop_tween(ids[3], false));
        assert!(engine.stop_tween(ids[1], false));
        assert_eq!(engine.active_count(), 1);
        assert!(engine.is_tween_active(ids[2]));
        for &key in &engine.active {
            assert_eq!(engine.active[engine.slots[key].active_index], key);
        }
    }

    #[test]
    fn test_invalid_duration_is_clamped() {
        let (_marker, target) = marker();
        let mut engine = TweenEngine::new();
        let min = engine.config().min_duration;

        let id = engine.position_to(&target, 0.0, Vec3::ONE).id();
        assert_eq!(engine.get_active_tween(id).map(|t| t.duration()), Some(min));
        let id = engine.position_to(&target, f32::NAN, Vec3::ONE).id();
        assert_eq!(engine.get_active_tween(id).map(|t| t.duration()), Some(min));
    }

    #[test]
    fn test_default_easing_assigned_on_prepare() {
        let (_marker, target) = marker();
        let mut engine = TweenEngine::new();
        engine.set_default_easing(Easing::Linear);

        let id = engine.position_to(&target, 1.0, Vec3::ONE).id();
        engine.update(0.5);
        let tween = engine.get_active_tween(id).unwrap();
        assert_eq!(tween.progress(), 0.5);
    }

    #[test]
    fn test_time_scale_independent_tween_uses_unscaled_clock() {
        let (marker, target) = marker();
        let mut engine = TweenEngine::new();
        engine.set_default_easing(Easing::Linear);

        engine
            .scale_to(&target, 1.0, Vec3::splat(2.0))
            .set_time_scale_independent();
        engine.position_to(&target, 1.0, Vec3::splat(2.0));

        // game time frozen, wall clock moves
        engine.update_with(FrameTime::scaled(0.5, 0.0));
        assert_eq!(marker.position.get(), Vec3::ZERO);
        assert_eq!(marker.scale.get(), Vec3::ONE);
    }

    #[test]
    fn test_pause_and_resume() {
        let (marker, target) = marker();
        let mut engine = TweenEngine::new();
        engine.set_default_easing(Easing::Linear);
        let id = engine.position_to(&target, 1.0, Vec3::splat(4.0)).id();

        assert!(engine.set_pause_state(id, true));
        engine.update(0.5);
        assert_eq!(marker.position.get(), Vec3::ZERO);

        engine.set_all_pause_state(false);
        engine.update(0.5);
        assert_eq!(marker.position.get(), Vec3::splat(2.0));
        assert!(!engine.set_pause_state(TweenId(999), true));
    }

    #[test]
    fn test_reverse_tween() {
        let (marker, target) = marker();
        let mut engine = TweenEngine::new();
        engine.set_default_easing(Easing::Linear);
        let id = engine.position_to(&target, 1.0, Vec3::splat(4.0)).id();

        engine.update(0.5);
        assert!(engine.reverse_tween(id));
        engine.update(0.5);
        assert_eq!(marker.position.get(), Vec3::ZERO);
        assert!(!engine.is_tween_active(id));
        assert!(!engine.reverse_tween(id));
    }

    #[test]
    fn test_replacing_successor_recycles_old_chain() {
        let (_marker, target) = marker();
        let mut engine = TweenEngine::with_config(EngineConfig {
            initial_capacity: 0,
            ..EngineConfig::default()
        });

        let first = engine.position_to(&target, 1.0, Vec3::ONE).id();
        let second = engine
            .handle(first)
            .unwrap()
            .next(1.0, Vec3::splat(2.0))
            .id();
        assert_eq!(engine.tween_state(second), Some(TweenState::Pending));

        let third = engine
            .handle(first)
            .unwrap()
            .next(1.0, Vec3::splat(3.0))
            .id();
        assert_eq!(engine.tween_state(second), None);
        assert_eq!(engine.tween_state(third), Some(TweenState::Pending));
        assert_eq!(engine.pooled_count(), 1);
    }

    #[test]
    fn test_set_relative_after_creation() {
        let (marker, target) = marker();
        marker.position.set(Vec3::ONE);
        let mut engine = TweenEngine::new();

        engine
            .position_to(&target, 1.0, Vec3::splat(2.0))
            .set_relative(true)
            .set_delay(0.25);
        engine.update(2.0);
        assert_eq!(marker.position.get(), Vec3::splat(3.0));
    }

    #[test]
    fn test_stop_all_without_completion_skips_handlers() {
        let (_marker, target) = marker();
        let mut engine = TweenEngine::new();
        let fired = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let fired = fired.clone();
            engine
                .position_to(&target, 1.0, Vec3::ONE)
                .set_completion_handler(move |_, _| fired.set(fired.get() + 1));
        }

        engine.stop_all_tweens(false);
        assert_eq!(fired.get(), 0);
        assert_eq!(engine.active_count(), 0);
        assert!(engine.slots.is_empty());
        assert!(engine.ids.is_empty());
        assert!(engine.pooled_count() >= 3);
    }
}
