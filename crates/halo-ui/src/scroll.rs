//! # Scroll model
//!
//! `ScrollableState` owns the list's scroll offset and the motion that moves
//! it: direct drags, fling prediction and the eased settle that follows a
//! release. It does not know about items; the owning list feeds it bounds
//! after every layout pass and asks the layout algorithm where a fling
//! should come to rest.
//!
//! The offset is the content coordinate of the viewport's top edge. Positive
//! deltas move the content up.
//!
//! ```rust
//! use halo_core::*;
//! use halo_ui::scroll::*;
//!
//! let state = ScrollableState::new(ArcListTheme::default(), EdgeEffect::None);
//! state.set_viewport(400.0);
//! state.set_bounds(-170.0, 830.0);
//! assert_eq!(state.scroll_immediate(1200.0), 200.0);
//! assert_eq!(state.offset(), 830.0);
//! ```

use std::cell::RefCell;

use halo_core::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationState {
    #[default]
    Idle,
    /// Following a finger or a scroll bar drag.
    Scroll,
    Friction,
    /// Returning from overscroll.
    Spring,
    /// Settling onto a snap target.
    Snap,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeEffect {
    #[default]
    Spring,
    Fade,
    None,
}

pub struct ScrollableState {
    offset: Signal<f32>,
    state: Signal<AnimationState>,
    min_offset: RefCell<f32>,
    max_offset: RefCell<f32>,
    viewport: RefCell<f32>,
    edge_effect: EdgeEffect,
    settle: RefCell<Option<AnimatedValue<f32>>>,
    theme: ArcListTheme,
}

impl ScrollableState {
    pub fn new(theme: ArcListTheme, edge_effect: EdgeEffect) -> Self {
        Self {
            offset: signal(0.0),
            state: signal(AnimationState::Idle),
            min_offset: RefCell::new(0.0),
            max_offset: RefCell::new(0.0),
            viewport: RefCell::new(0.0),
            edge_effect,
            settle: RefCell::new(None),
            theme,
        }
    }

    /// Observable offset, for hosts that redraw on change.
    pub fn offset_signal(&self) -> Signal<f32> {
        self.offset.clone()
    }

    pub fn state_signal(&self) -> Signal<AnimationState> {
        self.state.clone()
    }

    pub fn offset(&self) -> f32 {
        self.offset.get()
    }

    pub fn animation_state(&self) -> AnimationState {
        self.state.get()
    }

    pub fn edge_effect(&self) -> EdgeEffect {
        self.edge_effect
    }

    pub fn is_spring_effect(&self) -> bool {
        self.edge_effect == EdgeEffect::Spring
    }

    pub fn set_viewport(&self, main: f32) {
        *self.viewport.borrow_mut() = main.max(0.0);
    }

    pub fn set_bounds(&self, min: f32, max: f32) {
        *self.min_offset.borrow_mut() = min;
        *self.max_offset.borrow_mut() = max.max(min);
    }

    pub fn bounds(&self) -> (f32, f32) {
        (*self.min_offset.borrow(), *self.max_offset.borrow())
    }

    /// Writes back the offset a layout pass settled on.
    pub fn sync_offset(&self, offset: f32) {
        self.offset.set_if_changed(offset);
    }

    fn max_overscroll(&self) -> f32 {
        *self.viewport.borrow() * self.theme.overscroll_fraction
    }

    /// Distance past the nearest bound; zero inside.
    pub fn overscroll(&self) -> f32 {
        let (min, max) = self.bounds();
        let off = self.offset();
        if off < min {
            off - min
        } else if off > max {
            off - max
        } else {
            0.0
        }
    }

    /// Consume `delta`, return the part that could not be applied.
    ///
    /// With a spring edge the content follows past the bounds at half speed,
    /// up to a fraction of the viewport.
    pub fn scroll_immediate(&self, delta: f32) -> f32 {
        let (min, max) = self.bounds();
        let before = self.offset();
        let after = if self.is_spring_effect() {
            let slack = self.max_overscroll();
            let raw = before + delta;
            let inside = (before.max(raw).min(max) - before.min(raw).max(min)).max(0.0);
            let damped = before + delta.signum() * (inside + (delta.abs() - inside) * 0.5);
            damped.clamp(min - slack, max + slack)
        } else {
            (before + delta).clamp(min, max)
        };
        self.offset.set(after);
        delta - (after - before)
    }

    /// Finger-space fling distance for a release velocity (px/s).
    pub fn predict_fling(&self, velocity: f32) -> f32 {
        let decel = self.theme.fling_deceleration.max(1.0);
        velocity * velocity.abs() / (2.0 * decel)
    }

    pub fn begin_scroll(&self) {
        self.settle.borrow_mut().take();
        self.state.set_if_changed(AnimationState::Scroll);
    }

    /// Animates the offset to `target`, reporting `state` until done.
    pub fn start_settle(&self, target: f32, state: AnimationState) {
        let from = self.offset();
        if near_equal(from, target) {
            self.offset.set(target);
            self.finish();
            return;
        }
        let easing = match state {
            AnimationState::Spring => Easing::EaseOut,
            _ => Easing::FRICTION,
        };
        let mut value = AnimatedValue::new(from, AnimationSpec::default());
        value.set_target_with(
            target,
            AnimationSpec::tween(self.theme.settle_duration(), easing),
        );
        *self.settle.borrow_mut() = Some(value);
        self.state.set_if_changed(state);
        log::debug!("settle {from:.1} -> {target:.1} ({state:?})");
    }

    /// Moves a running settle to a new target without restarting the state.
    pub fn retarget_settle(&self, target: f32) {
        if let Some(value) = self.settle.borrow_mut().as_mut()
            && !near_equal(*value.target(), target)
        {
            value.set_target(target);
        }
    }

    pub fn settle_target(&self) -> Option<f32> {
        self.settle.borrow().as_ref().map(|v| *v.target())
    }

    pub fn stop(&self) {
        self.settle.borrow_mut().take();
        self.finish();
    }

    fn finish(&self) {
        self.state.set_if_changed(AnimationState::Idle);
    }

    /// Advances a running settle; returns the new offset while moving.
    pub fn tick(&self) -> Option<f32> {
        let (offset, running) = {
            let mut settle = self.settle.borrow_mut();
            let value = settle.as_mut()?;
            let running = value.update();
            (*value.get(), running)
        };
        self.offset.set(offset);
        if !running {
            self.settle.borrow_mut().take();
            self.finish();
        }
        Some(offset)
    }

    pub fn is_settling(&self) -> bool {
        self.settle.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn state(edge: EdgeEffect) -> ScrollableState {
        let s = ScrollableState::new(ArcListTheme::default(), edge);
        s.set_viewport(400.0);
        s.set_bounds(0.0, 1000.0);
        s
    }

    #[test]
    fn clamps_without_edge_effect() {
        let s = state(EdgeEffect::None);
        assert_eq!(s.scroll_immediate(-50.0), -50.0);
        assert_eq!(s.offset(), 0.0);
        assert_eq!(s.scroll_immediate(300.0), 0.0);
        assert_eq!(s.offset(), 300.0);
    }

    #[test]
    fn spring_edge_rubber_bands() {
        let s = state(EdgeEffect::Spring);
        s.scroll_immediate(-40.0);
        assert_eq!(s.offset(), -20.0);
        assert_eq!(s.overscroll(), -20.0);
        s.scroll_immediate(-1000.0);
        assert_eq!(s.offset(), -100.0);
        s.scroll_immediate(120.0);
        assert_eq!(s.offset(), -30.0);
        s.scroll_immediate(200.0);
        assert_eq!(s.offset(), 155.0);
    }

    #[test]
    fn fling_prediction_keeps_sign() {
        let s = state(EdgeEffect::None);
        assert_eq!(s.predict_fling(2000.0), 1000.0);
        assert_eq!(s.predict_fling(-2000.0), -1000.0);
    }

    #[test]
    fn settle_reaches_target_and_goes_idle() {
        let clock = ManualClock::install();
        let s = state(EdgeEffect::None);
        s.scroll_immediate(100.0);
        s.start_settle(160.0, AnimationState::Snap);
        assert_eq!(s.animation_state(), AnimationState::Snap);
        clock.advance_ms(100);
        let mid = s.tick().unwrap_or_default();
        assert!(mid > 100.0 && mid < 160.0);
        clock.advance_ms(400);
        assert_eq!(s.tick(), Some(160.0));
        assert_eq!(s.animation_state(), AnimationState::Idle);
        assert_eq!(s.tick(), None);
        reset_clock();
    }

    #[test]
    fn spring_return_settles_without_overshoot() {
        let clock = ManualClock::install();
        let s = state(EdgeEffect::Spring);
        s.scroll_immediate(-1000.0);
        assert_eq!(s.offset(), -100.0);

        let offsets = Rc::new(RefCell::new(Vec::new()));
        let states = Rc::new(RefCell::new(Vec::new()));
        let seen = offsets.clone();
        s.offset_signal().subscribe(move |v| seen.borrow_mut().push(*v));
        let seen = states.clone();
        s.state_signal().subscribe(move |v| seen.borrow_mut().push(*v));

        s.start_settle(0.0, AnimationState::Spring);
        while s.is_settling() {
            clock.advance_ms(16);
            s.tick();
        }

        let offsets = offsets.borrow();
        assert!(offsets.len() > 2);
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]), "{offsets:?}");
        assert!(offsets.iter().all(|v| (-100.0..=0.0).contains(v)));
        assert_eq!(offsets.last(), Some(&0.0));
        assert_eq!(*states.borrow(), [AnimationState::Spring, AnimationState::Idle]);
        reset_clock();
    }

    #[test]
    fn new_drag_interrupts_settle() {
        let _clock = ManualClock::install();
        let s = state(EdgeEffect::None);
        s.start_settle(300.0, AnimationState::Snap);
        s.begin_scroll();
        assert!(!s.is_settling());
        assert_eq!(s.animation_state(), AnimationState::Scroll);
        reset_clock();
    }
}
