use std::cell::RefCell;
use std::rc::Rc;

use web_time::{Duration, Instant};

use crate::{Color, Vec2};

pub(crate) fn now() -> Instant {
    CLOCK.with(|c| c.borrow().as_ref().map(|c| c.now()).unwrap_or_else(Instant::now))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseOut,
    EaseInOut,
    /// CSS-style cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1).
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Curve used by scroll settles and fling friction.
    pub const FRICTION: Easing = Easing::CubicBezier(0.2, 0.0, 0.2, 1.0);
    /// Standard sharp curve used by the scroll bar hover transitions.
    pub const SHARP: Easing = Easing::CubicBezier(0.33, 0.0, 0.67, 1.0);

    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(*x1, *y1, *x2, *y2, t),
        }
    }
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    let bez = |a: f32, b: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
    };
    // Solve bez_x(s) = x by bisection; the curve is monotone in x for x1, x2 in [0, 1].
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    let mut s = x;
    for _ in 0..24 {
        let bx = bez(x1, x2, s);
        if (bx - x).abs() < 1e-5 {
            break;
        }
        if bx < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    bez(y1, y2, s)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::EaseInOut,
            delay: Duration::ZERO,
        }
    }
}

impl AnimationSpec {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Vec2 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Vec2::new(
            self.x.interpolate(&other.x, t),
            self.y.interpolate(&other.y, t),
        )
    }
}

impl Interpolate for Color {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color(
            ch(self.0, other.0),
            ch(self.1, other.1),
            ch(self.2, other.2),
            ch(self.3, other.3),
        )
    }
}

pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

thread_local! {
    static CLOCK: RefCell<Option<Box<dyn Clock>>> = const { RefCell::new(None) };
}

/// Installs the animation clock for the current thread, replacing any
/// previous one. Hosts normally leave the system clock in place; tests
/// install a [`ManualClock`].
pub fn set_clock(clock: Box<dyn Clock>) {
    CLOCK.with(|c| *c.borrow_mut() = Some(clock));
}

/// Back to wall time.
pub fn reset_clock() {
    CLOCK.with(|c| *c.borrow_mut() = None);
}

/// A clock driven by hand. Clones share the same time source, so a test can
/// keep one handle and install another.
#[derive(Clone)]
pub struct ManualClock {
    t: Rc<RefCell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            t: Rc::new(RefCell::new(Instant::now())),
        }
    }

    /// Creates a clock and installs a shared handle as the thread clock.
    pub fn install() -> Self {
        let clock = Self::new();
        set_clock(Box::new(clock.clone()));
        clock
    }

    pub fn advance(&self, by: Duration) {
        let mut t = self.t.borrow_mut();
        *t += by;
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.t.borrow()
    }
}

/// Animated value that transitions smoothly
#[derive(Clone, Debug)]
pub struct AnimatedValue<T: Interpolate + Clone> {
    current: T,
    target: T,
    start: T,
    spec: AnimationSpec,
    start_time: Option<Instant>,
}

impl<T: Interpolate + Clone> AnimatedValue<T> {
    pub fn new(initial: T, spec: AnimationSpec) -> Self {
        Self {
            current: initial.clone(),
            target: initial.clone(),
            start: initial,
            spec,
            start_time: None,
        }
    }

    /// Retargets from wherever the value currently is.
    pub fn set_target(&mut self, target: T) {
        self.start = self.current.clone();
        self.target = target;
        self.start_time = Some(now());
    }

    pub fn set_target_with(&mut self, target: T, spec: AnimationSpec) {
        self.spec = spec;
        self.set_target(target);
    }

    /// Jumps straight to `value` and cancels any running transition.
    pub fn snap_to(&mut self, value: T) {
        self.current = value.clone();
        self.start = value.clone();
        self.target = value;
        self.start_time = None;
    }

    /// Freezes the value where it currently is.
    pub fn stop(&mut self) {
        self.update();
        self.start = self.current.clone();
        self.target = self.current.clone();
        self.start_time = None;
    }

    pub fn update(&mut self) -> bool {
        if let Some(start) = self.start_time {
            let elapsed = now().saturating_duration_since(start);

            if elapsed < self.spec.delay {
                return true;
            }

            let animation_time = elapsed - self.spec.delay;

            if animation_time >= self.spec.duration {
                self.current = self.target.clone();
                self.start_time = None;
                return false;
            }

            let t = animation_time.as_secs_f32() / self.spec.duration.as_secs_f32();
            let eased_t = self.spec.easing.interpolate(t);
            self.current = self.start.interpolate(&self.target, eased_t);

            true
        } else {
            false
        }
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn is_animating(&self) -> bool {
        self.start_time.is_some()
    }
}

impl<T: Interpolate + Clone + PartialEq> AnimatedValue<T> {
    /// Keeps a running transition and its spec, moving only its end point.
    /// An idle value jumps.
    pub fn retarget(&mut self, target: T) {
        if !self.is_animating() {
            self.snap_to(target);
        } else if self.target != target {
            self.set_target(target);
        }
    }
}
