//! Queue and flow composition over the engine's tween API
//!
//! Both are cheap clone handles around shared state, since the engine's
//! completion handlers need to reach back into them. Items are factories that
//! create a tween and return its id; a factory runs only when its turn comes.

use crate::animation::engine::TweenEngine;
use crate::animation::tweening::TweenId;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::rc::Rc;

/// Creates and starts a tween, returning the id whose completion counts
pub type TweenFactory = Box<dyn FnOnce(&mut TweenEngine) -> TweenId>;

/// Fired once when a queue or flow is done
pub type SequenceHandler = Box<dyn FnOnce(&mut TweenEngine)>;

/// Hooks `on_done` into the completion of `id`, keeping any handler the
/// factory already set. Returns false if the tween is not live.
fn observe_completion<F>(engine: &mut TweenEngine, id: TweenId, on_done: F) -> bool
where
    F: FnOnce(&mut TweenEngine) + 'static,
{
    let Some(mut handle) = engine.handle(id) else {
        return false;
    };

    let previous = handle.take_completion_handler();
    handle.set_completion_handler(move |engine, target| {
        if let Some(previous) = previous {
            previous(engine, target);
        }
        on_done(engine);
    });
    true
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<TweenFactory>,
    on_complete: Option<SequenceHandler>,
    running: Option<TweenId>,
    started: bool,
    finished: bool,
}

/// Runs tweens strictly one after another
#[derive(Clone, Default)]
pub struct TweenQueue {
    state: Rc<RefCell<QueueState>>,
}

impl TweenQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&self, factory: F) -> &Self
    where
        F: FnOnce(&mut TweenEngine) -> TweenId + 'static,
    {
        self.state.borrow_mut().pending.push_back(Box::new(factory));
        self
    }

    pub fn set_completion_handler<F>(&self, handler: F) -> &Self
    where
        F: FnOnce(&mut TweenEngine) + 'static,
    {
        self.state.borrow_mut().on_complete = Some(Box::new(handler));
        self
    }

    /// Starts the first tween. Calling this again is a no-op.
    pub fn start(&self, engine: &mut TweenEngine) {
        {
            let mut state = self.state.borrow_mut();
            if state.started {
                return;
            }
            state.started = true;
        }

        Self::run_next(&self.state, engine);
    }

    /// Drops the remaining items and stops the running tween. The overall
    /// completion handler still fires exactly once.
    pub fn stop(&self, engine: &mut TweenEngine, bring_to_completion: bool) {
        let running = {
            let mut state = self.state.borrow_mut();
            state.pending.clear();
            state.running.take()
        };

        if let Some(id) = running {
            engine.stop_tween(id, bring_to_completion);
        }

        Self::run_next(&self.state, engine);
    }

    /// Id of the tween currently playing
    pub fn running(&self) -> Option<TweenId> {
        self.state.borrow().running
    }

    pub fn remaining(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn is_finished(&self) -> bool {
        self.state.borrow().finished
    }

    fn run_next(state: &Rc<RefCell<QueueState>>, engine: &mut TweenEngine) {
        loop {
            let factory = {
                let mut inner = state.borrow_mut();
                if inner.finished {
                    return;
                }
                inner.running = None;
                inner.pending.pop_front()
            };

            let Some(factory) = factory else {
                let handler = {
                    let mut inner = state.borrow_mut();
                    inner.finished = true;
                    inner.on_complete.take()
                };

                #[cfg(feature = "debug")]
                log::debug!("tween queue finished");

                if let Some(handler) = handler {
                    handler(engine);
                }
                return;
            };

            let id = factory(engine);
            let next_state = state.clone();
            if observe_completion(engine, id, move |engine| Self::run_next(&next_state, engine)) {
                state.borrow_mut().running = Some(id);
                return;
            }

            log::warn!("queued factory returned {} which is not live, skipping", id);
        }
    }
}

struct FlowItem {
    start_time: f32,
    factory: TweenFactory,
}

#[derive(Default)]
struct FlowState {
    /// Sorted by descending start time, so due items sit at the back
    items: Vec<FlowItem>,
    on_complete: Option<SequenceHandler>,
    running: Option<TweenId>,
    outstanding: usize,
    elapsed: f32,
    started: bool,
    finished: bool,
}

impl FlowState {
    /// Takes the completion handler if everything has run and finished
    fn try_finish(&mut self) -> Option<SequenceHandler> {
        if self.finished || !self.started || self.outstanding > 0 || !self.items.is_empty() {
            return None;
        }

        self.finished = true;
        self.running = None;
        // a flow without a handler still counts as finished
        self.on_complete.take()
    }
}

/// Starts tweens at time offsets from the flow's start, letting them overlap
#[derive(Clone, Default)]
pub struct TweenFlow {
    state: Rc<RefCell<FlowState>>,
}

impl TweenFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `factory` to run `start_time` seconds after the flow starts
    pub fn add<F>(&self, start_time: f32, factory: F) -> &Self
    where
        F: FnOnce(&mut TweenEngine) -> TweenId + 'static,
    {
        self.state.borrow_mut().items.push(FlowItem {
            start_time,
            factory: Box::new(factory),
        });
        self
    }

    pub fn set_completion_handler<F>(&self, handler: F) -> &Self
    where
        F: FnOnce(&mut TweenEngine) + 'static,
    {
        self.state.borrow_mut().on_complete = Some(Box::new(handler));
        self
    }

    /// Arms the flow; items fire from the following [`TweenFlow::tick`] calls
    pub fn start(&self) {
        let mut state = self.state.borrow_mut();
        if state.started {
            return;
        }

        state
            .items
            .sort_by(|a, b| b.start_time.partial_cmp(&a.start_time).unwrap_or(Ordering::Equal));
        state.elapsed = 0.0;
        state.started = true;
    }

    /// Advances the flow clock and starts every item that is due. Returns
    /// true while the flow is still running.
    pub fn tick(&self, engine: &mut TweenEngine, delta: f32) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if !state.started || state.finished {
                return false;
            }
            state.elapsed += delta;
        }

        loop {
            let factory = {
                let mut state = self.state.borrow_mut();
                let due = matches!(state.items.last(), Some(item) if state.elapsed >= item.start_time);
                if !due {
                    break;
                }
                state.items.pop().map(|item| item.factory)
            };

            let Some(factory) = factory else {
                break;
            };

            let id = factory(engine);
            let flow_state = self.state.clone();
            let observed = observe_completion(engine, id, move |engine| {
                Self::on_tween_complete(&flow_state, engine);
            });

            let mut state = self.state.borrow_mut();
            if observed {
                state.running = Some(id);
                state.outstanding += 1;
            } else {
                log::warn!("flow factory returned {} which is not live, skipping", id);
            }
        }

        let handler = self.state.borrow_mut().try_finish();
        if let Some(handler) = handler {
            handler(engine);
        }

        self.is_running()
    }

    /// Drops every pending item and stops the most recently started tween.
    /// Other tweens the flow started keep playing.
    pub fn stop(&self, engine: &mut TweenEngine, bring_to_completion: bool) {
        let running = {
            let mut state = self.state.borrow_mut();
            state.items.clear();
            state.running.take()
        };

        let Some(id) = running else {
            return;
        };

        // a completed tween reports in through its own handler
        if engine.stop_tween(id, bring_to_completion) && !bring_to_completion {
            let handler = {
                let mut state = self.state.borrow_mut();
                state.outstanding = state.outstanding.saturating_sub(1);
                state.try_finish()
            };
            if let Some(handler) = handler {
                handler(engine);
            }
        }
    }

    /// The most recently started tween that is still being tracked
    pub fn running(&self) -> Option<TweenId> {
        self.state.borrow().running
    }

    pub fn elapsed(&self) -> f32 {
        self.state.borrow().elapsed
    }

    /// Items not started yet
    pub fn pending(&self) -> usize {
        self.state.borrow().items.len()
    }

    /// Started tweens whose completion has not fired yet
    pub fn outstanding(&self) -> usize {
        self.state.borrow().outstanding
    }

    pub fn is_running(&self) -> bool {
        let state = self.state.borrow();
        state.started && !state.finished
    }

    pub fn is_finished(&self) -> bool {
        self.state.borrow().finished
    }

    fn on_tween_complete(state: &Rc<RefCell<FlowState>>, engine: &mut TweenEngine) {
        let handler = {
            let mut inner = state.borrow_mut();
            inner.outstanding = inner.outstanding.saturating_sub(1);
            inner.try_finish()
        };

        if let Some(handler) = handler {
            #[cfg(feature = "debug")]
            log::debug!("tween flow finished");
            handler(engine);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::{Color, Vec3};
    use crate::traits::{TargetRef, TweenTarget, VectorKind};
    use std::cell::Cell;

    struct Dot {
        position: Cell<Vec3>,
    }

    impl TweenTarget for Dot {
        fn vector(&self, _kind: VectorKind) -> Vec3 {
            self.position.get()
        }

        fn set_vector(&self, _kind: VectorKind, value: Vec3) {
            self.position.set(value);
        }

        fn color(&self, _slot: &str) -> Option<Color> {
            None
        }

        fn set_color(&self, _slot: &str, _color: Color) {}
    }

    fn dot() -> TargetRef {
        Rc::new(Dot {
            position: Cell::new(Vec3::ZERO),
        })
    }

    #[test]
    fn test_queue_start_is_idempotent() {
        let target = dot();
        let mut engine = TweenEngine::new();
        let queue = TweenQueue::new();

        let t = target.clone();
        queue.add(move |engine| engine.position_to(&t, 1.0, Vec3::ONE).id());
        queue.start(&mut engine);
        queue.start(&mut engine);

        assert_eq!(engine.active_count(), 1);
        assert!(queue.running().is_some());
    }

    #[test]
    fn test_empty_queue_completes_on_start() {
        let mut engine = TweenEngine::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();

        let queue = TweenQueue::new();
        queue.set_completion_handler(move |_| flag.set(true));
        queue.start(&mut engine);

        assert!(fired.get());
        assert!(queue.is_finished());
    }

    #[test]
    fn test_queue_skips_factories_returning_dead_ids() {
        let target = dot();
        let mut engine = TweenEngine::new();
        let queue = TweenQueue::new();

        let t = target.clone();
        queue
            .add(|engine| {
                let id = engine.position_to(&dot(), 1.0, Vec3::ONE).id();
                engine.stop_tween(id, false);
                id
            })
            .add(move |engine| engine.position_to(&t, 1.0, Vec3::ONE).id());
        queue.start(&mut engine);

        assert_eq!(queue.remaining(), 0);
        assert_eq!(engine.active_count(), 1);
    }

    #[test]
    fn test_empty_flow_completes_on_first_tick() {
        let mut engine = TweenEngine::new();
        let fired = Rc::new(Cell::new(0));
        let count = fired.clone();

        let flow = TweenFlow::new();
        flow.set_completion_handler(move |_| count.set(count.get() + 1));
        assert!(!flow.tick(&mut engine, 0.1));
        flow.start();
        assert!(!flow.tick(&mut engine, 0.1));
        assert!(!flow.tick(&mut engine, 0.1));

        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_flow_orders_items_by_offset() {
        let target = dot();
        let mut engine = TweenEngine::new();
        let flow = TweenFlow::new();

        let (a, b) = (target.clone(), target.clone());
        flow.add(0.5, move |engine| engine.scale_to(&a, 1.0, Vec3::ONE).id())
            .add(0.0, move |engine| engine.position_to(&b, 1.0, Vec3::ONE).id());
        flow.start();

        flow.tick(&mut engine, 0.0);
        assert_eq!(flow.pending(), 1);
        assert_eq!(flow.outstanding(), 1);
        flow.tick(&mut engine, 0.5);
        assert_eq!(flow.pending(), 0);
        assert_eq!(flow.outstanding(), 2);
    }
}
