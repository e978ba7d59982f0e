//! Easing functions
//!
//! Every function takes the elapsed time `t` and the total duration `d` and
//! returns a progress value. Progress is usually in `[0, 1]` but the back,
//! elastic and punch families deliberately overshoot, so callers must accept
//! interpolated values slightly outside the start/target range.

use crate::{Result, TweenError};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Raw easing function signature: `(elapsed, duration) -> progress`
pub type EaseFn = fn(f32, f32) -> f32;

pub mod linear {
    pub fn ease_none(t: f32, d: f32) -> f32 {
        t / d
    }
}

pub mod quadratic {
    pub fn ease_in(t: f32, d: f32) -> f32 {
        let t = t / d;
        t * t
    }

    pub fn ease_out(t: f32, d: f32) -> f32 {
        let t = t / d;
        -t * (t - 2.0)
    }

    pub fn ease_in_out(t: f32, d: f32) -> f32 {
        let t = t / (d / 2.0);
        if t < 1.0 {
            return 0.5 * t * t;
        }

        let t = t - 1.0;
        -0.5 * (t * (t - 2.0) - 1.0)
    }
}

pub mod cubic {
    pub fn ease_in(t: f32, d: f32) -> f32 {
        let t = t / d;
        t * t * t
    }

    pub fn ease_out(t: f32, d: f32) -> f32 {
        let t = t / d - 1.0;
        t * t * t + 1.0
    }

    pub fn ease_in_out(t: f32, d: f32) -> f32 {
        let t = t / (d / 2.0);
        if t < 1.0 {
            return 0.5 * t * t * t;
        }

        let t = t - 2.0;
        0.5 * (t * t * t + 2.0)
    }
}

pub mod quartic {
    pub fn ease_in(t: f32, d: f32) -> f32 {
        let t = t / d;
        t * t * t * t
    }

    pub fn ease_out(t: f32, d: f32) -> f32 {
        let t = t / d - 1.0;
        -(t * t * t * t - 1.0)
    }

    pub fn ease_in_out(t: f32, d: f32) -> f32 {
        let t = t / (d / 2.0);
        if t < 1.0 {
            return 0.5 * t * t * t * t;
        }

        let t = t - 2.0;
        -0.5 * (t * t * t * t - 2.0)
    }
}

pub mod quintic {
    pub fn ease_in(t: f32, d: f32) -> f32 {
        let t = t / d;
        t * t * t * t * t
    }

    pub fn ease_out(t: f32, d: f32) -> f32 {
        let t = t / d - 1.0;
        t * t * t * t * t + 1.0
    }

    pub fn ease_in_out(t: f32, d: f32) -> f32 {
        let t = t / (d / 2.0);
        if t < 1.0 {
            return 0.5 * t * t * t * t * t;
        }

        let t = t - 2.0;
        0.5 * (t * t * t * t * t + 2.0)
    }
}

pub mod sinusoidal {
    use std::f32::consts::PI;

    pub fn ease_in(t: f32, d: f32) -> f32 {
        -(t / d * (PI / 2.0)).cos() + 1.0
    }

    pub fn ease_out(t: f32, d: f32) -> f32 {
        (t / d * (PI / 2.0)).sin()
    }

    pub fn ease_in_out(t: f32, d: f32) -> f32 {
        -0.5 * ((PI * t / d).cos() - 1.0)
    }
}

pub mod exponential {
    pub fn ease_in(t: f32, d: f32) -> f32 {
        if t == 0.0 {
            0.0
        } else {
            2.0_f32.powf(10.0 * (t / d - 1.0))
        }
    }

    pub fn ease_out(t: f32, d: f32) -> f32 {
        if t == d {
            1.0
        } else {
            -(2.0_f32.powf(-10.0 * t / d)) + 1.0
        }
    }

    pub fn ease_in_out(t: f32, d: f32) -> f32 {
        if t == 0.0 {
            return 0.0;
        }
        if t == d {
            return 1.0;
        }

        let t = t / (d / 2.0);
        if t < 1.0 {
            return 0.5 * 2.0_f32.powf(10.0 * (t - 1.0));
        }

        let t = t - 1.0;
        0.5 * (-(2.0_f32.powf(-10.0 * t)) + 2.0)
    }
}

pub mod circular {
    pub fn ease_in(t: f32, d: f32) -> f32 {
        let t = t / d;
        -((1.0 - t * t).sqrt() - 1.0)
    }

    pub fn ease_out(t: f32, d: f32) -> f32 {
        let t = t / d - 1.0;
        (1.0 - t * t).sqrt()
    }

    pub fn ease_in_out(t: f32, d: f32) -> f32 {
        let t = t / (d / 2.0);
        if t < 1.0 {
            return -0.5 * ((1.0 - t * t).sqrt() - 1.0);
        }

        let t = t - 2.0;
        0.5 * ((1.0 - t * t).sqrt() + 1.0)
    }
}

pub mod back {
    const OVERSHOOT: f32 = 1.70158;
    const IN_OUT_SCALE: f32 = 1.525;

    pub fn ease_in(t: f32, d: f32) -> f32 {
        let t = t / d;
        t * t * ((OVERSHOOT + 1.0) * t - OVERSHOOT)
    }

    pub fn ease_out(t: f32, d: f32) -> f32 {
        let t = t / d - 1.0;
        t * t * ((OVERSHOOT + 1.0) * t + OVERSHOOT) + 1.0
    }

    pub fn ease_in_out(t: f32, d: f32) -> f32 {
        let s = OVERSHOOT * IN_OUT_SCALE;
        let t = t / (d / 2.0);
        if t < 1.0 {
            return 0.5 * (t * t * ((s + 1.0) * t - s));
        }

        let t = t - 2.0;
        0.5 * (t * t * ((s + 1.0) * t + s) + 2.0)
    }
}

pub mod bounce {
    pub fn ease_out(t: f32, d: f32) -> f32 {
        let t = t / d;
        if t < 1.0 / 2.75 {
            7.5625 * t * t
        } else if t < 2.0 / 2.75 {
            let t = t - 1.5 / 2.75;
            7.5625 * t * t + 0.75
        } else if t < 2.5 / 2.75 {
            let t = t - 2.25 / 2.75;
            7.5625 * t * t + 0.9375
        } else {
            let t = t - 2.625 / 2.75;
            7.5625 * t * t + 0.984375
        }
    }

    pub fn ease_in(t: f32, d: f32) -> f32 {
        1.0 - ease_out(d - t, d)
    }

    pub fn ease_in_out(t: f32, d: f32) -> f32 {
        if t < d / 2.0 {
            ease_in(t * 2.0, d) * 0.5
        } else {
            ease_out(t * 2.0 - d, d) * 0.5 + 0.5
        }
    }
}

pub mod elastic {
    use std::f32::consts::PI;

    pub fn ease_in(t: f32, d: f32) -> f32 {
        if t == 0.0 {
            return 0.0;
        }

        let t = t / d;
        if t == 1.0 {
            return 1.0;
        }

        let p = d * 0.3;
        let s = p / 4.0;
        let t = t - 1.0;
        -(2.0_f32.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin())
    }

    pub fn ease_out(t: f32, d: f32) -> f32 {
        if t == 0.0 {
            return 0.0;
        }

        let t = t / d;
        if t == 1.0 {
            return 1.0;
        }

        let p = d * 0.3;
        let s = p / 4.0;
        2.0_f32.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + 1.0
    }

    pub fn ease_in_out(t: f32, d: f32) -> f32 {
        if t == 0.0 {
            return 0.0;
        }

        let t = t / (d / 2.0);
        if t == 2.0 {
            return 1.0;
        }

        let p = d * (0.3 * 1.5);
        let s = p / 4.0;

        if t < 1.0 {
            let t = t - 1.0;
            return -0.5 * (2.0_f32.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin());
        }

        let t = t - 1.0;
        2.0_f32.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() * 0.5 + 1.0
    }

    /// Shoots past the target and settles back at the start value
    pub fn punch(t: f32, d: f32) -> f32 {
        if t == 0.0 {
            return 0.0;
        }

        let t = t / d;
        if t == 1.0 {
            return 0.0;
        }

        const PERIOD: f32 = 0.3;
        2.0_f32.powf(-10.0 * t) * (t * (2.0 * PI) / PERIOD).sin()
    }
}

/// A single key of an [`EaseCurve`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// An authored control curve used as an easing.
///
/// The curve starts at time 0 and may end at any positive time; it is scaled
/// so its end time lines up with the duration of whichever tween samples it.
/// Values between keys are linearly interpolated and clamp outside the keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EaseCurve {
    keys: Vec<CurveKey>,
}

impl EaseCurve {
    pub fn new(keys: Vec<CurveKey>) -> Result<Self> {
        let Some(last) = keys.last() else {
            return Err(TweenError::InvalidCurve("curve has no keys".to_string()));
        };

        if !(last.time.is_finite() && last.time > 0.0) {
            return Err(TweenError::InvalidCurve(format!(
                "curve end time must be positive, got {}",
                last.time
            )));
        }

        if keys.windows(2).any(|pair| pair[1].time < pair[0].time) {
            return Err(TweenError::InvalidCurve(
                "curve keys must be sorted by time".to_string(),
            ));
        }

        Ok(Self { keys })
    }

    /// Builds a curve from `(time, value)` pairs
    pub fn from_points(points: &[(f32, f32)]) -> Result<Self> {
        Self::new(
            points
                .iter()
                .map(|&(time, value)| CurveKey::new(time, value))
                .collect(),
        )
    }

    /// Time of the last key, the curve's authored duration
    pub fn duration(&self) -> f32 {
        self.keys.last().map(|key| key.time).unwrap_or(0.0)
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Samples the curve at `time` (in the curve's own time space)
    pub fn evaluate(&self, time: f32) -> f32 {
        let Some(&first) = self.keys.first() else {
            return 0.0;
        };
        if time <= first.time {
            return first.value;
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if time <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return b.value;
                }
                let local = (time - a.time) / span;
                return a.value + (b.value - a.value) * local;
            }
        }

        self.keys.last().map(|key| key.value).unwrap_or(first.value)
    }

    /// Samples the curve scaled onto a tween of duration `d`
    pub fn ease(&self, t: f32, d: f32) -> f32 {
        let time_scaler = self.duration() / d;
        self.evaluate(time_scaler * t)
    }
}

/// Easing selection for a tween
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    #[default]
    QuarticIn,
    QuarticOut,
    QuarticInOut,
    QuinticIn,
    QuinticOut,
    QuinticInOut,
    SinusoidalIn,
    SinusoidalOut,
    SinusoidalInOut,
    ExponentialIn,
    ExponentialOut,
    ExponentialInOut,
    CircularIn,
    CircularOut,
    CircularInOut,
    BackIn,
    BackOut,
    BackInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    Punch,
    /// Samples an authored curve, scaled to the tween duration
    #[serde(skip)]
    Curve(Rc<EaseCurve>),
    /// Any caller supplied `(elapsed, duration) -> progress` function
    #[serde(skip)]
    Custom(EaseFn),
}

impl Easing {
    /// Wraps a curve as an easing
    pub fn curve(curve: EaseCurve) -> Self {
        Easing::Curve(Rc::new(curve))
    }

    /// Evaluates the easing for elapsed time `t` of a tween lasting `d`
    pub fn apply(&self, t: f32, d: f32) -> f32 {
        match self {
            Easing::Linear => linear::ease_none(t, d),
            Easing::QuadraticIn => quadratic::ease_in(t, d),
            Easing::QuadraticOut => quadratic::ease_out(t, d),
            Easing::QuadraticInOut => quadratic::ease_in_out(t, d),
            Easing::CubicIn => cubic::ease_in(t, d),
            Easing::CubicOut => cubic::ease_out(t, d),
            Easing::CubicInOut => cubic::ease_in_out(t, d),
            Easing::QuarticIn => quartic::ease_in(t, d),
            Easing::QuarticOut => quartic::ease_out(t, d),
            Easing::QuarticInOut => quartic::ease_in_out(t, d),
            Easing::QuinticIn => quintic::ease_in(t, d),
            Easing::QuinticOut => quintic::ease_out(t, d),
            Easing::QuinticInOut => quintic::ease_in_out(t, d),
            Easing::SinusoidalIn => sinusoidal::ease_in(t, d),
            Easing::SinusoidalOut => sinusoidal::ease_out(t, d),
            Easing::SinusoidalInOut => sinusoidal::ease_in_out(t, d),
            Easing::ExponentialIn => exponential::ease_in(t, d),
            Easing::ExponentialOut => exponential::ease_out(t, d),
            Easing::ExponentialInOut => exponential::ease_in_out(t, d),
            Easing::CircularIn => circular::ease_in(t, d),
            Easing::CircularOut => circular::ease_out(t, d),
            Easing::CircularInOut => circular::ease_in_out(t, d),
            Easing::BackIn => back::ease_in(t, d),
            Easing::BackOut => back::ease_out(t, d),
            Easing::BackInOut => back::ease_in_out(t, d),
            Easing::BounceIn => bounce::ease_in(t, d),
            Easing::BounceOut => bounce::ease_out(t, d),
            Easing::BounceInOut => bounce::ease_in_out(t, d),
            Easing::ElasticIn => elastic::ease_in(t, d),
            Easing::ElasticOut => elastic::ease_out(t, d),
            Easing::ElasticInOut => elastic::ease_in_out(t, d),
            Easing::Punch => elastic::punch(t, d),
            Easing::Curve(curve) => curve.ease(t, d),
            Easing::Custom(func) => func(t, d),
        }
    }

    /// Progress at a normalized time in `[0, 1]`
    pub fn sample(&self, fraction: f32) -> f32 {
        self.apply(fraction, 1.0)
    }

    /// True for the families whose output leaves `[0, 1]`
    pub fn overshoots(&self) -> bool {
        matches!(
            self,
            Easing::BackIn
                | Easing::BackOut
                | Easing::BackInOut
                | Easing::ElasticIn
                | Easing::ElasticOut
                | Easing::ElasticInOut
                | Easing::Punch
        )
    }
}

impl From<EaseFn> for Easing {
    fn from(func: EaseFn) -> Self {
        Easing::Custom(func)
    }
}

impl From<EaseCurve> for Easing {
    fn from(curve: EaseCurve) -> Self {
        Easing::curve(curve)
    }
}
