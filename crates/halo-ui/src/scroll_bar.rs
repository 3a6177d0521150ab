//! # Scroll bars
//!
//! A `ScrollBar` is one shared state block plus a shape-specific geometry
//! variant. Callers never downcast: they ask for `capabilities()` and call
//! through the same methods for both shapes.
//!
//! ```rust
//! use halo_core::*;
//! use halo_ui::scroll_bar::*;
//!
//! let mut bar = ScrollBar::arc(ArcScrollBarTheme::default());
//! let viewport = Size::new(466.0, 466.0);
//! bar.update_scroll_bar_region(Vec2::ZERO, viewport, 0.0, 2000.0);
//! assert!(bar.capabilities().contains(ScrollBarCapabilities::ANGULAR_THUMB));
//! assert!(bar.is_scrollable());
//! ```
//!
//! Thumb drags are linear deltas along the main axis. `handle_drag_update`
//! moves the thumb (clamped to its track) and returns the matching content
//! delta; the owner applies it as `total_offset -= delta`.

use bitflags::bitflags;
use halo_core::*;

use crate::arc_scroll_bar::ArcBar;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ScrollBarCapabilities: u8 {
        const RECT_HIT_TEST = 1 << 0;
        const ARC_HIT_TEST = 1 << 1;
        const ANGULAR_THUMB = 1 << 2;
        /// Geometry changes animate instead of snapping.
        const ADAPT_ANIMATION = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    Off,
    /// Shown while scrolling, faded out when idle.
    #[default]
    Auto,
    On,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoverAnimationType {
    #[default]
    None,
    Grow,
    Shrink,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpacityAnimationType {
    #[default]
    None,
    Appear,
    Disappear,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    /// Released; the owning scrollable is settling.
    Settling,
}

/// State shared by every bar shape: scroll inputs, derived thumb metrics,
/// interaction flags and pending visual transitions.
#[derive(Clone, Debug)]
pub struct ScrollBarState {
    pub theme: ArcScrollBarTheme,
    pub display_mode: DisplayMode,
    pub position_mode: PositionMode,
    pub reverse: bool,
    pub foreground_color: Color,
    pub background_color: Color,

    pub viewport_size: Size,
    pub estimated_height: f32,
    pub last_offset: f32,
    /// Track length along the main axis.
    pub bar_region_size: f32,
    /// Thumb length along the main axis.
    pub active_bar_size: f32,
    /// Thumb offset from the start of the track.
    pub active_main_offset: f32,
    pub offset_scale: f32,
    pub out_boundary: f32,

    pub is_hover: bool,
    pub is_pressed: bool,
    pub drag_phase: DragPhase,

    pub hover_animation_type: HoverAnimationType,
    pub opacity_animation_type: OpacityAnimationType,
    pub needs_adapt_animation: bool,
}

impl ScrollBarState {
    pub fn new(theme: ArcScrollBarTheme) -> Self {
        Self {
            theme,
            display_mode: DisplayMode::default(),
            position_mode: PositionMode::default(),
            reverse: false,
            foreground_color: theme.foreground_color,
            background_color: theme.background_color,
            viewport_size: Size::default(),
            estimated_height: 0.0,
            last_offset: 0.0,
            bar_region_size: 0.0,
            active_bar_size: 0.0,
            active_main_offset: 0.0,
            offset_scale: 0.0,
            out_boundary: 0.0,
            is_hover: false,
            is_pressed: false,
            drag_phase: DragPhase::Idle,
            hover_animation_type: HoverAnimationType::None,
            opacity_animation_type: OpacityAnimationType::None,
            needs_adapt_animation: false,
        }
    }

    /// Hovered or pressed: the thumb is drawn at its active width.
    pub fn is_active(&self) -> bool {
        self.is_hover || self.is_pressed
    }

    pub fn is_driving(&self) -> bool {
        self.drag_phase == DragPhase::Dragging
    }

    /// Thumb length and offset from the viewport main size, the content
    /// offset from the top and the estimated content height.
    pub fn update_thumb_metrics(
        &mut self,
        main_size: f32,
        last_offset: f32,
        estimated_height: f32,
    ) -> Result<()> {
        if !great_not_equal(estimated_height, 0.0) {
            return Err(HaloError::InvalidRange {
                what: "estimated content height",
                value: estimated_height,
            });
        }
        let theme = &self.theme;
        let bar_region =
            (main_size - theme.end_reserved_height - theme.start_reserved_height).max(0.0);

        let mut active = bar_region * main_size / estimated_height - self.out_boundary * 0.5;
        let min_size = theme.min_angle * bar_region / theme.max_offset_angle;
        active = active.max(min_size);
        if min_size > bar_region {
            active = theme.normal_width.min(bar_region);
        }
        active = active.min(bar_region);

        let offset_scale = if near_equal(main_size, estimated_height) {
            0.0
        } else {
            (bar_region - active) / (estimated_height - main_size)
        };

        let travel = bar_region - active;
        let mut main_offset = (offset_scale * last_offset.max(0.0)).min(travel);
        if self.reverse {
            main_offset = travel - main_offset;
        }

        self.estimated_height = estimated_height;
        self.last_offset = last_offset;
        self.bar_region_size = bar_region;
        self.active_bar_size = active;
        self.offset_scale = offset_scale;
        self.active_main_offset = main_offset;
        Ok(())
    }
}

/// Rectangular bar along the right, left or bottom edge.
#[derive(Clone, Debug, Default)]
pub struct LinearBar {
    bar_rect: Rect,
    active_rect: Rect,
    touch_rect: Rect,
}

impl LinearBar {
    pub fn bar_rect(&self) -> Rect {
        self.bar_rect
    }
    pub fn active_rect(&self) -> Rect {
        self.active_rect
    }
    pub fn touch_rect(&self) -> Rect {
        self.touch_rect
    }

    fn set_bar_region(&mut self, state: &ScrollBarState, offset: Vec2, viewport: Size) {
        let theme = &state.theme;
        let width = if state.is_active() {
            theme.active_background_width
        } else {
            theme.normal_background_width
        };
        let start = theme.start_reserved_height;
        self.bar_rect = match state.position_mode {
            PositionMode::Right => Rect::new(
                offset.x + viewport.width - width,
                offset.y + start,
                width,
                state.bar_region_size,
            ),
            PositionMode::Left => {
                Rect::new(offset.x, offset.y + start, width, state.bar_region_size)
            }
            PositionMode::Bottom => Rect::new(
                offset.x + start,
                offset.y + viewport.height - width,
                state.bar_region_size,
                width,
            ),
        };
    }

    fn set_thumb_region(&mut self, state: &ScrollBarState) {
        let theme = &state.theme;
        let width = if state.is_active() {
            theme.active_width
        } else {
            theme.normal_width
        };
        let bar = self.bar_rect;
        let slack = (theme.hot_zone_width - width).max(0.0) / 2.0;
        self.active_rect = match state.position_mode {
            PositionMode::Bottom => Rect::new(
                bar.x + state.active_main_offset,
                bar.y + bar.h - width,
                state.active_bar_size,
                width,
            ),
            _ => Rect::new(
                bar.x + (bar.w - width) / 2.0,
                bar.y + state.active_main_offset,
                width,
                state.active_bar_size,
            ),
        };
        self.touch_rect = match state.position_mode {
            PositionMode::Bottom => self.active_rect.inflate(0.0, slack),
            _ => self.active_rect.inflate(slack, 0.0),
        };
    }
}

#[derive(Clone, Debug)]
pub enum ScrollBarKind {
    Linear(LinearBar),
    Arc(ArcBar),
}

#[derive(Clone, Debug)]
pub struct ScrollBar {
    state: ScrollBarState,
    kind: ScrollBarKind,
}

impl ScrollBar {
    pub fn arc(theme: ArcScrollBarTheme) -> Self {
        Self {
            state: ScrollBarState::new(theme),
            kind: ScrollBarKind::Arc(ArcBar::new()),
        }
    }

    pub fn linear(theme: ArcScrollBarTheme) -> Self {
        Self {
            state: ScrollBarState::new(theme),
            kind: ScrollBarKind::Linear(LinearBar::default()),
        }
    }

    pub fn state(&self) -> &ScrollBarState {
        &self.state
    }

    pub fn kind(&self) -> &ScrollBarKind {
        &self.kind
    }

    pub fn as_arc(&self) -> Option<&ArcBar> {
        match &self.kind {
            ScrollBarKind::Arc(a) => Some(a),
            ScrollBarKind::Linear(_) => None,
        }
    }

    pub fn capabilities(&self) -> ScrollBarCapabilities {
        match self.kind {
            ScrollBarKind::Linear(_) => ScrollBarCapabilities::RECT_HIT_TEST,
            ScrollBarKind::Arc(_) => {
                ScrollBarCapabilities::ARC_HIT_TEST
                    | ScrollBarCapabilities::ANGULAR_THUMB
                    | ScrollBarCapabilities::ADAPT_ANIMATION
            }
        }
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.state.display_mode = mode;
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.state.display_mode
    }

    pub fn set_position_mode(&mut self, mode: PositionMode) {
        self.state.position_mode = mode;
    }

    pub fn position_mode(&self) -> PositionMode {
        self.state.position_mode
    }

    pub fn set_reverse(&mut self, reverse: bool) {
        self.state.reverse = reverse;
    }

    pub fn set_foreground_color(&mut self, color: Color) {
        self.state.foreground_color = color;
        self.sync_colors();
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.state.background_color = color;
        self.sync_colors();
    }

    fn sync_colors(&mut self) {
        if let ScrollBarKind::Arc(arc) = &mut self.kind {
            arc.set_colors(self.state.foreground_color, self.state.background_color);
        }
    }

    /// Overscroll amount; shrinks the thumb while the list bounces.
    pub fn set_out_boundary(&mut self, extent: f32) {
        self.state.out_boundary = extent.abs();
    }

    /// Content is longer than the viewport and the bar is not switched off.
    pub fn is_scrollable(&self) -> bool {
        self.state.display_mode != DisplayMode::Off
            && great_not_equal(self.state.estimated_height, self.state.viewport_size.height)
    }

    /// Recomputes track and thumb from the current scroll position.
    ///
    /// `last_offset` is the content offset from the top (0 at rest) and
    /// `estimated_height` the full content height including edge padding.
    pub fn update_scroll_bar_region(
        &mut self,
        offset: Vec2,
        viewport: Size,
        last_offset: f32,
        estimated_height: f32,
    ) {
        self.state.viewport_size = viewport;
        match &mut self.kind {
            ScrollBarKind::Arc(arc) => {
                arc.set_bar_region(&self.state, offset, viewport);
                arc.set_round_trick_region(
                    &mut self.state,
                    offset,
                    viewport,
                    last_offset,
                    estimated_height,
                );
            }
            ScrollBarKind::Linear(linear) => {
                let main = match self.state.position_mode {
                    PositionMode::Bottom => viewport.width,
                    _ => viewport.height,
                };
                if let Err(e) = self
                    .state
                    .update_thumb_metrics(main, last_offset, estimated_height)
                {
                    log::error!("linear scroll bar: {e}");
                    return;
                }
                linear.set_bar_region(&self.state, offset, viewport);
                linear.set_thumb_region(&self.state);
            }
        }
    }

    fn refresh_thumb(&mut self) {
        match &mut self.kind {
            ScrollBarKind::Arc(arc) => arc.set_thumb_region(&self.state),
            ScrollBarKind::Linear(linear) => linear.set_thumb_region(&self.state),
        }
    }

    /// Point on the track.
    pub fn in_bar_region(&self, p: Vec2) -> bool {
        if self.state.display_mode == DisplayMode::Off {
            return false;
        }
        match &self.kind {
            ScrollBarKind::Arc(arc) => arc.track().contains_point(p, self.state.position_mode),
            ScrollBarKind::Linear(linear) => linear.bar_rect().contains(p),
        }
    }

    /// Point inside the touch-tolerant zone around the thumb.
    pub fn in_bar_touch_region(&self, p: Vec2) -> bool {
        if !self.is_scrollable() {
            return false;
        }
        match &self.kind {
            ScrollBarKind::Arc(arc) => {
                arc.hot_zone().is_valid()
                    && arc.hot_zone().contains_point(p, self.state.position_mode)
            }
            ScrollBarKind::Linear(linear) => linear.touch_rect().contains(p),
        }
    }

    pub fn in_bar_hover_region(&self, p: Vec2) -> bool {
        if !self.is_scrollable() {
            return false;
        }
        match &self.kind {
            ScrollBarKind::Arc(arc) => {
                arc.hover_region().is_valid()
                    && arc.hover_region().contains_point(p, self.state.position_mode)
            }
            ScrollBarKind::Linear(linear) => linear.active_rect().contains(p),
        }
    }

    pub fn set_hover(&mut self, hover: bool) {
        if self.state.is_hover == hover {
            return;
        }
        let was_active = self.state.is_active();
        self.state.is_hover = hover;
        self.on_active_changed(was_active);
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        if self.state.is_pressed == pressed {
            return;
        }
        let was_active = self.state.is_active();
        self.state.is_pressed = pressed;
        self.on_active_changed(was_active);
    }

    fn on_active_changed(&mut self, was_active: bool) {
        let active = self.state.is_active();
        if active == was_active {
            return;
        }
        self.state.hover_animation_type = if active {
            HoverAnimationType::Grow
        } else {
            HoverAnimationType::Shrink
        };
        log::trace!(
            "scroll bar {}",
            if active { "grows" } else { "shrinks" }
        );
    }

    /// Scrolling started or continued.
    pub fn on_scroll_activity(&mut self) {
        if self.state.display_mode == DisplayMode::Auto {
            self.state.opacity_animation_type = OpacityAnimationType::Appear;
        }
    }

    /// The owner went idle.
    pub fn on_scroll_end(&mut self) {
        if self.state.display_mode == DisplayMode::Auto && !self.state.is_driving() {
            self.state.opacity_animation_type = OpacityAnimationType::Disappear;
        }
        if self.state.drag_phase == DragPhase::Settling {
            self.state.drag_phase = DragPhase::Idle;
        }
    }

    pub fn take_hover_animation_type(&mut self) -> HoverAnimationType {
        std::mem::take(&mut self.state.hover_animation_type)
    }

    pub fn take_opacity_animation_type(&mut self) -> OpacityAnimationType {
        std::mem::take(&mut self.state.opacity_animation_type)
    }

    pub fn take_adapt_animation(&mut self) -> bool {
        std::mem::take(&mut self.state.needs_adapt_animation)
    }

    pub fn take_repaint_request(&mut self) -> bool {
        match &mut self.kind {
            ScrollBarKind::Arc(arc) => arc.take_repaint_request(),
            ScrollBarKind::Linear(_) => false,
        }
    }

    /// Converts a thumb delta into a content delta.
    ///
    /// Outside a drag, or when the thumb cannot travel, the delta passes
    /// through unchanged.
    pub fn calc_pattern_offset(&self, delta: f32) -> f32 {
        let s = &self.state;
        let travel = s.bar_region_size - s.active_bar_size;
        if !s.is_driving() || near_zero(travel) {
            return delta;
        }
        let height = s.estimated_height - s.viewport_size.height;
        let offset = -delta * height / travel;
        if s.reverse { -offset } else { offset }
    }

    pub fn handle_drag_start(&mut self) {
        self.state.drag_phase = DragPhase::Dragging;
        if let ScrollBarKind::Arc(arc) = &mut self.kind {
            arc.begin_drag();
        }
        log::debug!(
            "scroll bar drag start at main offset {:.1}",
            self.state.active_main_offset
        );
    }

    /// Moves the thumb by `delta` (clamped to the track) and returns the
    /// content delta for the part of the move that was applied.
    pub fn handle_drag_update(&mut self, delta: f32) -> f32 {
        if !self.state.is_driving() {
            return 0.0;
        }
        let travel = (self.state.bar_region_size - self.state.active_bar_size).max(0.0);
        let before = self.state.active_main_offset;
        let after = (before + delta).clamp(0.0, travel);
        self.state.active_main_offset = after;
        self.refresh_thumb();
        self.calc_pattern_offset(after - before)
    }

    pub fn handle_drag_end(&mut self) {
        if !self.state.is_driving() {
            return;
        }
        self.state.drag_phase = DragPhase::Settling;
        if let ScrollBarKind::Arc(arc) = &mut self.kind {
            arc.end_drag();
        }
        log::debug!("scroll bar drag end");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc_bar(viewport: Size, estimated: f32) -> ScrollBar {
        let mut bar = ScrollBar::arc(ArcScrollBarTheme::default());
        bar.update_scroll_bar_region(Vec2::ZERO, viewport, 0.0, estimated);
        bar
    }

    #[test]
    fn thumb_metrics_follow_visible_fraction() {
        let bar = arc_bar(Size::new(500.0, 500.0), 2000.0);
        let s = bar.state();
        assert_eq!(s.bar_region_size, 500.0);
        assert!((s.active_bar_size - 125.0).abs() < 1e-3);
        assert!((s.offset_scale - 375.0 / 1500.0).abs() < 1e-6);
        assert_eq!(s.active_main_offset, 0.0);
    }

    #[test]
    fn tiny_thumb_uses_min_angle() {
        let bar = arc_bar(Size::new(500.0, 500.0), 1_000_000.0);
        let min = 6.0 * 500.0 / 60.0;
        assert!((bar.state().active_bar_size - min).abs() < 1e-3);
    }

    #[test]
    fn out_boundary_shrinks_thumb() {
        let mut bar = arc_bar(Size::new(500.0, 500.0), 2000.0);
        bar.set_out_boundary(-40.0);
        bar.update_scroll_bar_region(Vec2::ZERO, Size::new(500.0, 500.0), 0.0, 2000.0);
        assert!((bar.state().active_bar_size - 105.0).abs() < 1e-3);
    }

    #[test]
    fn short_content_is_not_scrollable() {
        let bar = arc_bar(Size::new(500.0, 500.0), 400.0);
        assert!(!bar.is_scrollable());
        assert_eq!(bar.state().active_bar_size, 500.0);
        assert_eq!(bar.state().offset_scale, 0.0);
        assert!(!bar.in_bar_touch_region(Vec2::new(498.0, 250.0)));
    }

    #[test]
    fn pattern_offset_passes_through_when_not_dragging() {
        let bar = arc_bar(Size::new(500.0, 500.0), 2000.0);
        assert_eq!(bar.calc_pattern_offset(12.0), 12.0);
    }

    #[test]
    fn drag_round_trip_restores_offset() {
        let mut bar = arc_bar(Size::new(500.0, 500.0), 2000.0);
        bar.handle_drag_start();
        let start_angle = bar.as_arc().and_then(|a| a.drag_start_angle());
        assert_eq!(start_angle, Some(-30.0));

        let mut total = 0.0f32;
        total -= bar.handle_drag_update(40.0);
        assert!(total > 0.0);
        total -= bar.handle_drag_update(-40.0);
        bar.handle_drag_end();
        assert!(total.abs() < 1e-3);
        assert_eq!(bar.state().drag_phase, DragPhase::Settling);
        assert!(bar.as_arc().and_then(|a| a.drag_start_angle()).is_none());
    }

    #[test]
    fn full_track_drag_saturates_at_content_end() {
        let mut bar = arc_bar(Size::new(500.0, 500.0), 2000.0);
        bar.handle_drag_start();
        let mut total = 0.0f32;
        total -= bar.handle_drag_update(500.0);
        total -= bar.handle_drag_update(100.0);
        assert!((total - 1500.0).abs() < 1e-2);

        let thumb = bar.as_arc().map(|a| *a.thumb()).unwrap_or_default();
        assert!((thumb.end_angle() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn hover_and_press_request_grow_then_shrink() {
        let mut bar = arc_bar(Size::new(500.0, 500.0), 2000.0);
        bar.set_hover(true);
        assert_eq!(bar.take_hover_animation_type(), HoverAnimationType::Grow);
        bar.set_pressed(true);
        assert_eq!(bar.take_hover_animation_type(), HoverAnimationType::None);
        bar.set_hover(false);
        assert_eq!(bar.take_hover_animation_type(), HoverAnimationType::None);
        bar.set_pressed(false);
        assert_eq!(bar.take_hover_animation_type(), HoverAnimationType::Shrink);
    }

    #[test]
    fn active_bar_uses_active_width() {
        let mut bar = arc_bar(Size::new(500.0, 500.0), 2000.0);
        bar.set_pressed(true);
        bar.update_scroll_bar_region(Vec2::ZERO, Size::new(500.0, 500.0), 0.0, 2000.0);
        let arc = bar.as_arc().map(|a| (a.width(), a.thumb().width()));
        assert_eq!(arc, Some((8.0, 8.0)));
    }

    #[test]
    fn auto_mode_appears_and_disappears() {
        let mut bar = arc_bar(Size::new(500.0, 500.0), 2000.0);
        bar.on_scroll_activity();
        assert_eq!(bar.take_opacity_animation_type(), OpacityAnimationType::Appear);
        bar.on_scroll_end();
        assert_eq!(bar.take_opacity_animation_type(), OpacityAnimationType::Disappear);

        bar.set_display_mode(DisplayMode::On);
        bar.on_scroll_activity();
        assert_eq!(bar.take_opacity_animation_type(), OpacityAnimationType::None);
    }

    #[test]
    fn arc_touch_region_follows_thumb() {
        let bar = arc_bar(Size::new(500.0, 500.0), 2000.0);
        let arc = bar.as_arc().map(|a| *a.thumb()).unwrap_or_default();
        let mid = (arc.start_angle() + arc.sweep_angle() / 2.0).to_radians();
        let p = arc.center() + Vec2::new(mid.cos(), mid.sin()) * arc.radius();
        assert!(bar.in_bar_touch_region(p));
        assert!(bar.in_bar_region(p));
        assert!(!bar.in_bar_touch_region(Vec2::new(250.0, 250.0)));
    }

    #[test]
    fn capabilities_are_per_kind() {
        let linear = ScrollBar::linear(ArcScrollBarTheme::default());
        assert_eq!(linear.capabilities(), ScrollBarCapabilities::RECT_HIT_TEST);
        let arc = ScrollBar::arc(ArcScrollBarTheme::default());
        assert!(arc.capabilities().contains(ScrollBarCapabilities::ARC_HIT_TEST));
        assert!(!arc.capabilities().contains(ScrollBarCapabilities::RECT_HIT_TEST));
    }

    #[test]
    fn linear_thumb_sits_on_right_edge() {
        let mut bar = ScrollBar::linear(ArcScrollBarTheme::default());
        bar.update_scroll_bar_region(Vec2::ZERO, Size::new(300.0, 500.0), 750.0, 2000.0);
        let ScrollBarKind::Linear(linear) = bar.kind() else {
            panic!("expected linear bar");
        };
        assert_eq!(linear.bar_rect().x, 296.0);
        assert!((linear.active_rect().y - 187.5).abs() < 1e-3);
        assert!(bar.in_bar_touch_region(Vec2::new(290.0, 200.0)));
    }
}
