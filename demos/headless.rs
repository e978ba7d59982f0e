use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tweenkit::prelude::*;

/// A bare scene object with a transform and a couple of material colors
struct Sprite {
    name: &'static str,
    transform: RefCell<HashMap<VectorKind, Vec3>>,
    colors: RefCell<HashMap<String, Color>>,
    alive: Cell<bool>,
}

impl Sprite {
    fn new(name: &'static str) -> Rc<Self> {
        let mut colors = HashMap::new();
        colors.insert("_Color".to_string(), Color::WHITE);
        Rc::new(Self {
            name,
            transform: RefCell::new(HashMap::new()),
            colors: RefCell::new(colors),
            alive: Cell::new(true),
        })
    }
}

impl TweenTarget for Sprite {
    fn is_alive(&self) -> bool {
        self.alive.get()
    }

    fn vector(&self, kind: VectorKind) -> Vec3 {
        let default = if kind == VectorKind::Scale {
            Vec3::ONE
        } else {
            Vec3::ZERO
        };
        self.transform.borrow().get(&kind).copied().unwrap_or(default)
    }

    fn set_vector(&self, kind: VectorKind, value: Vec3) {
        self.transform.borrow_mut().insert(kind, value);
    }

    fn color(&self, slot: &str) -> Option<Color> {
        self.colors.borrow().get(slot).copied()
    }

    fn set_color(&self, slot: &str, color: Color) {
        if let Some(entry) = self.colors.borrow_mut().get_mut(slot) {
            *entry = color;
        }
    }
}

/// Runs a handful of tweens, a queue and a flow without any renderer
fn main() -> tweenkit::Result<()> {
    env_logger::init();

    println!("Tweenkit Headless Example");
    println!("=========================");

    let config = EngineConfig::from_json_str(r#"{ "default_easing": "QuadraticInOut" }"#)?;
    let mut engine = TweenEngine::with_config(config);
    println!("Engine created: {:?}", engine);

    let hero = Sprite::new("hero");
    let coin = Sprite::new("coin");
    let hero_target: TargetRef = hero.clone();
    let coin_target: TargetRef = coin.clone();

    // Move, then scale up, then fade out, each segment starting where the last ended
    engine
        .position_to(&hero_target, 1.0, Vec3::new(10.0, 0.0, 0.0))
        .set_easing(Easing::CubicOut)
        .next_kind(VectorKind::Scale, 0.5, Vec3::splat(2.0))
        .next_color(0.5, Color::rgba(1.0, 1.0, 1.0, 0.0))
        .set_completion_handler(|_, target| {
            println!("   hero chain finished (target live: {})", target.is_some());
        });

    // Bob the coin three times with a ping-pong loop
    engine
        .local_position_to(&coin_target, 0.5, Vec3::new(0.0, 1.0, 0.0))
        .set_easing(Easing::SinusoidalInOut)
        .set_loop_type(LoopType::PingPong, 3, 0.0)
        .set_loop_completion_handler(|_| println!("   coin finished a bob"));

    let spin = engine
        .rotation_to(&coin_target, 2.0, Vec3::new(0.0, 350.0, 0.0))
        .set_relative(true)
        .id();

    let queue = TweenQueue::new();
    {
        let target = coin_target.clone();
        queue.add(move |engine| engine.scale_to(&target, 0.25, Vec3::splat(1.5)).id());
    }
    {
        let target = coin_target.clone();
        queue.add(move |engine| {
            engine
                .scale_to(&target, 0.25, Vec3::ONE)
                .set_easing(Easing::BounceOut)
                .id()
        });
    }
    queue.set_completion_handler(|_| println!("   coin pop queue finished"));
    queue.start(&mut engine);

    let flow = TweenFlow::new();
    for (i, offset) in [0.0_f32, 0.2, 0.4].into_iter().enumerate() {
        let target = hero_target.clone();
        flow.add(offset, move |engine| {
            let shake = actions::shake_position_ramp(&target, 0.1, move || {
                Vec3::new(if i % 2 == 0 { 1.0 } else { -1.0 }, 0.5, 0.0)
            });
            engine.custom_action(&target, 0.2, shake, 0.0, Some(Easing::Linear))
                .id()
        });
    }
    flow.set_completion_handler(|_| println!("   hero shake flow finished"));
    flow.start();

    println!("\nRunning frames:");
    let frame = 1.0 / 60.0;
    let mut frames = 0;
    while !engine.is_idle() || flow.is_running() {
        flow.tick(&mut engine, frame);
        engine.update(frame);
        frames += 1;

        if frames == 30 {
            println!("   half a second in, {} tweens active", engine.active_count());
            if let Some(tween) = engine.get_active_tween(spin) {
                println!("   spin state {:?}, progress {:.2}", tween.state(), tween.progress());
            }
        }

        if frames == 60 {
            // stop the spin early but land it on its end value
            engine.stop_tween(spin, true);
        }

        if frames > 600 {
            println!("   giving up after {} frames", frames);
            break;
        }
    }

    println!("\nDone after {} frames ({} tweens pooled)", frames, engine.pooled_count());
    for sprite in [&hero, &coin] {
        println!(
            "   {}: position {:?}, scale {:?}, rotation {:?}, color {:?}",
            sprite.name,
            sprite.vector(VectorKind::Position),
            sprite.vector(VectorKind::Scale),
            sprite.vector(VectorKind::Rotation),
            sprite.color("_Color"),
        );
    }

    Ok(())
}
