//! Animated paint state for the arc scroll bar.
//!
//! The modifier holds one animatable property per visual attribute of the
//! thumb (foreground) and track (background) arcs. Layout hands it target
//! arcs through `apply_state`; every frame `tick` advances the running
//! transitions and `draw` paints whatever the properties currently read.

use halo_core::*;
use web_time::Duration;

use crate::scroll_bar::{DisplayMode, HoverAnimationType, OpacityAnimationType};

/// Individually resettable properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcProperty {
    ForegroundStartAngle,
    ForegroundSweepAngle,
    ForegroundWidth,
    BackgroundStartAngle,
    BackgroundSweepAngle,
    BackgroundWidth,
    StrokeRadius,
    ForegroundColor,
    BackgroundColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transition {
    Grow,
    Shrink,
    Adapt,
}

pub struct ArcScrollBarOverlayModifier {
    fg_start_angle: Option<AnimatedValue<f32>>,
    fg_sweep_angle: Option<AnimatedValue<f32>>,
    fg_width: Option<AnimatedValue<f32>>,
    bg_start_angle: Option<AnimatedValue<f32>>,
    bg_sweep_angle: Option<AnimatedValue<f32>>,
    bg_width: Option<AnimatedValue<f32>>,
    stroke_radius: Option<AnimatedValue<f32>>,
    fg_color: Option<AnimatedValue<Color>>,
    bg_color: Option<AnimatedValue<Color>>,
    center: AnimatedValue<Vec2>,
    /// 0..=255
    opacity: AnimatedValue<f32>,

    running: Option<Transition>,
    running_opacity: OpacityAnimationType,
    theme: ArcScrollBarTheme,
}

fn animated<T: Interpolate + Clone>(v: T) -> Option<AnimatedValue<T>> {
    Some(AnimatedValue::new(v, AnimationSpec::default()))
}

impl ArcScrollBarOverlayModifier {
    pub fn new(theme: ArcScrollBarTheme, display_mode: DisplayMode) -> Self {
        let opacity = match display_mode {
            DisplayMode::On => 255.0,
            DisplayMode::Auto | DisplayMode::Off => 0.0,
        };
        Self {
            fg_start_angle: animated(0.0),
            fg_sweep_angle: animated(0.0),
            fg_width: animated(theme.normal_width),
            bg_start_angle: animated(0.0),
            bg_sweep_angle: animated(0.0),
            bg_width: animated(theme.normal_background_width),
            stroke_radius: animated(0.0),
            fg_color: animated(theme.foreground_color),
            bg_color: animated(theme.background_color),
            center: AnimatedValue::new(Vec2::ZERO, AnimationSpec::default()),
            opacity: AnimatedValue::new(opacity, AnimationSpec::default()),
            running: None,
            running_opacity: OpacityAnimationType::None,
            theme,
        }
    }

    /// Drops one property; `draw` is skipped until it is restored.
    pub fn reset_property(&mut self, property: ArcProperty) {
        match property {
            ArcProperty::ForegroundStartAngle => self.fg_start_angle = None,
            ArcProperty::ForegroundSweepAngle => self.fg_sweep_angle = None,
            ArcProperty::ForegroundWidth => self.fg_width = None,
            ArcProperty::BackgroundStartAngle => self.bg_start_angle = None,
            ArcProperty::BackgroundSweepAngle => self.bg_sweep_angle = None,
            ArcProperty::BackgroundWidth => self.bg_width = None,
            ArcProperty::StrokeRadius => self.stroke_radius = None,
            ArcProperty::ForegroundColor => self.fg_color = None,
            ArcProperty::BackgroundColor => self.bg_color = None,
        }
    }

    /// Recreates a dropped property at the given value.
    pub fn restore_property(&mut self, property: ArcProperty, thumb: &ArcRound, track: &ArcRound) {
        match property {
            ArcProperty::ForegroundStartAngle => {
                self.fg_start_angle = animated(thumb.start_angle())
            }
            ArcProperty::ForegroundSweepAngle => {
                self.fg_sweep_angle = animated(thumb.sweep_angle())
            }
            ArcProperty::ForegroundWidth => self.fg_width = animated(thumb.width()),
            ArcProperty::BackgroundStartAngle => {
                self.bg_start_angle = animated(track.start_angle())
            }
            ArcProperty::BackgroundSweepAngle => {
                self.bg_sweep_angle = animated(track.sweep_angle())
            }
            ArcProperty::BackgroundWidth => self.bg_width = animated(track.width()),
            ArcProperty::StrokeRadius => self.stroke_radius = animated(track.radius()),
            ArcProperty::ForegroundColor => self.fg_color = animated(thumb.color()),
            ArcProperty::BackgroundColor => self.bg_color = animated(track.color()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.fg_start_angle.is_some()
            && self.fg_sweep_angle.is_some()
            && self.fg_width.is_some()
            && self.bg_start_angle.is_some()
            && self.bg_sweep_angle.is_some()
            && self.bg_width.is_some()
            && self.stroke_radius.is_some()
            && self.fg_color.is_some()
            && self.bg_color.is_some()
    }

    fn floats_mut(&mut self) -> [Option<&mut AnimatedValue<f32>>; 7] {
        [
            self.fg_start_angle.as_mut(),
            self.fg_sweep_angle.as_mut(),
            self.fg_width.as_mut(),
            self.bg_start_angle.as_mut(),
            self.bg_sweep_angle.as_mut(),
            self.bg_width.as_mut(),
            self.stroke_radius.as_mut(),
        ]
    }

    fn stop_geometry(&mut self) {
        for v in self.floats_mut().into_iter().flatten() {
            v.stop();
        }
        for c in [self.fg_color.as_mut(), self.bg_color.as_mut()]
            .into_iter()
            .flatten()
        {
            c.stop();
        }
        self.center.stop();
    }

    /// Moves the properties toward `thumb` and `track`.
    ///
    /// Without a hover change or an adapt request the values jump, unless a
    /// transition is still running: its end points follow the new arcs and
    /// it keeps its timing. Otherwise they animate with the duration of the
    /// requested transition; a running transition of another kind is frozen
    /// first. Opacity fades run on their
    /// own timeline and only while the bar is scrollable.
    pub fn apply_state(
        &mut self,
        hover: HoverAnimationType,
        opacity: OpacityAnimationType,
        needs_adapt: bool,
        thumb: &ArcRound,
        track: &ArcRound,
        scrollable: bool,
    ) {
        let transition = match hover {
            HoverAnimationType::Grow => Some(Transition::Grow),
            HoverAnimationType::Shrink => Some(Transition::Shrink),
            HoverAnimationType::None if needs_adapt => Some(Transition::Adapt),
            HoverAnimationType::None => None,
        };

        let floats = [
            thumb.start_angle(),
            thumb.sweep_angle(),
            thumb.width(),
            track.start_angle(),
            track.sweep_angle(),
            track.width(),
            track.radius(),
        ];

        match transition {
            None if self.running.is_some() && self.is_animating_geometry() => {
                for (v, target) in self.floats_mut().into_iter().zip(floats) {
                    if let Some(v) = v {
                        v.retarget(target);
                    }
                }
                if let Some(c) = self.fg_color.as_mut() {
                    c.retarget(thumb.color());
                }
                if let Some(c) = self.bg_color.as_mut() {
                    c.retarget(track.color());
                }
                self.center.retarget(track.center());
            }
            None => {
                for (v, target) in self.floats_mut().into_iter().zip(floats) {
                    if let Some(v) = v {
                        v.snap_to(target);
                    }
                }
                if let Some(c) = self.fg_color.as_mut() {
                    c.snap_to(thumb.color());
                }
                if let Some(c) = self.bg_color.as_mut() {
                    c.snap_to(track.color());
                }
                self.center.snap_to(track.center());
                self.running = None;
            }
            Some(t) => {
                if self.running.is_some_and(|r| r != t) && self.is_animating_geometry() {
                    log::trace!("overlay: {:?} interrupts {:?}", t, self.running);
                    self.stop_geometry();
                }
                let spec = match t {
                    Transition::Grow => {
                        AnimationSpec::tween(self.theme.grow_duration(), Easing::SHARP)
                    }
                    Transition::Shrink => {
                        AnimationSpec::tween(self.theme.shrink_duration(), Easing::SHARP)
                    }
                    Transition::Adapt => {
                        AnimationSpec::tween(self.theme.adapt_duration(), Easing::FRICTION)
                    }
                };
                for (v, target) in self.floats_mut().into_iter().zip(floats) {
                    if let Some(v) = v {
                        v.set_target_with(target, spec);
                    }
                }
                if let Some(c) = self.fg_color.as_mut() {
                    c.set_target_with(thumb.color(), spec);
                }
                if let Some(c) = self.bg_color.as_mut() {
                    c.set_target_with(track.color(), spec);
                }
                self.center.set_target_with(track.center(), spec);
                self.running = Some(t);
            }
        }

        if opacity != OpacityAnimationType::None && scrollable {
            self.start_opacity(opacity);
        }
    }

    fn start_opacity(&mut self, kind: OpacityAnimationType) {
        if self.running_opacity == kind && self.opacity.is_animating() {
            return;
        }
        if self.opacity.is_animating() {
            self.opacity.stop();
        }
        let (target, spec) = match kind {
            OpacityAnimationType::Appear => (
                255.0,
                AnimationSpec::tween(self.theme.appear_duration(), Easing::Linear),
            ),
            OpacityAnimationType::Disappear => (
                0.0,
                AnimationSpec::tween(self.theme.disappear_duration(), Easing::Linear)
                    .with_delay(Duration::from_millis(self.theme.disappear_delay_ms)),
            ),
            OpacityAnimationType::None => return,
        };
        self.opacity.set_target_with(target, spec);
        self.running_opacity = kind;
    }

    fn is_animating_geometry(&self) -> bool {
        [
            &self.fg_start_angle,
            &self.fg_sweep_angle,
            &self.fg_width,
            &self.bg_start_angle,
            &self.bg_sweep_angle,
            &self.bg_width,
            &self.stroke_radius,
        ]
        .into_iter()
        .flatten()
        .any(|v| v.is_animating())
            || self.center.is_animating()
    }

    /// Advances every running transition; true while anything still moves.
    pub fn tick(&mut self) -> bool {
        let mut active = false;
        for v in self.floats_mut().into_iter().flatten() {
            active |= v.update();
        }
        for c in [self.fg_color.as_mut(), self.bg_color.as_mut()]
            .into_iter()
            .flatten()
        {
            active |= c.update();
        }
        active |= self.center.update();
        active |= self.opacity.update();
        if !active {
            self.running = None;
            self.running_opacity = OpacityAnimationType::None;
        }
        active
    }

    pub fn opacity(&self) -> f32 {
        *self.opacity.get()
    }

    pub fn foreground_start_angle(&self) -> Option<f32> {
        self.fg_start_angle.as_ref().map(|v| *v.get())
    }

    pub fn foreground_sweep_angle(&self) -> Option<f32> {
        self.fg_sweep_angle.as_ref().map(|v| *v.get())
    }

    pub fn foreground_width(&self) -> Option<f32> {
        self.fg_width.as_ref().map(|v| *v.get())
    }

    pub fn stroke_radius(&self) -> Option<f32> {
        self.stroke_radius.as_ref().map(|v| *v.get())
    }

    /// Track arc first, thumb on top. Returns false when nothing was drawn
    /// because a property is missing.
    pub fn draw(&self, canvas: &mut impl ArcCanvas) -> bool {
        let (
            Some(fg_start),
            Some(fg_sweep),
            Some(fg_width),
            Some(bg_start),
            Some(bg_sweep),
            Some(bg_width),
            Some(radius),
            Some(fg_color),
            Some(bg_color),
        ) = (
            &self.fg_start_angle,
            &self.fg_sweep_angle,
            &self.fg_width,
            &self.bg_start_angle,
            &self.bg_sweep_angle,
            &self.bg_width,
            &self.stroke_radius,
            &self.fg_color,
            &self.bg_color,
        )
        else {
            log::debug!("arc scroll bar draw skipped: property missing");
            return false;
        };

        let bar_opacity = *self.opacity.get() / 255.0;
        let bounds = Rect::around(*self.center.get(), *radius.get());

        if !near_zero(*bg_sweep.get()) {
            let mut pen = ArcPen::new(bg_color.get().blend_opacity(bar_opacity), *bg_width.get());
            pen.cap = StrokeCap::Round;
            pen.blend = BlendMode::SrcOver;
            canvas.draw_arc(bounds, *bg_start.get(), *bg_sweep.get(), &pen);
        }
        if !near_zero(*fg_sweep.get()) {
            let mut pen = ArcPen::new(fg_color.get().blend_opacity(bar_opacity), *fg_width.get());
            pen.cap = StrokeCap::Round;
            pen.blend = BlendMode::SrcOver;
            canvas.draw_arc(bounds, *fg_start.get(), *fg_sweep.get(), &pen);
        }
        true
    }
}
