//! # Arc list
//!
//! `ArcListState` owns everything a round list needs between frames: the
//! layout algorithm and its position map, the scroll model, the arc scroll
//! bar and its animated overlay, and the drag recognizer routing pointer
//! input to either the content or the bar.
//!
//! The host drives it with three calls per frame:
//!
//! - `handle_pointer` for every input event,
//! - `tick` to advance settle and overlay animations (re-laying out while the
//!   offset moves),
//! - `paint` to draw the scroll bar.
//!
//! Items are read from a `NodeArena`: the list node's children carry their
//! index in `NodeRole::Item` and their measured size in `Node::measured`.
//!
//! ```rust
//! use halo_core::*;
//! use halo_ui::arc_list::ArcListState;
//!
//! let mut arena = NodeArena::new();
//! let list = arena.insert(NodeRole::List, None);
//! for index in 0..20 {
//!     let item = arena.insert(
//!         NodeRole::Item { index, is_group: false },
//!         Some(Size::new(300.0, 60.0)),
//!     );
//!     arena.append_child(list, item)?;
//! }
//!
//! let mut state = ArcListState::new(list, Size::new(466.0, 466.0));
//! state.layout(&arena)?;
//! assert_eq!(state.algorithm().start_index(), Some(0));
//! # Ok::<(), halo_core::HaloError>(())
//! ```

use halo_core::*;

use crate::arc_list_layout::{ArcListLayoutAlgorithm, ItemPosition, ScrollSnapAlign};
use crate::gestures::{DragEvent, DragRecognizer};
use crate::overlay::ArcScrollBarOverlayModifier;
use crate::position_map::ArcListPositionMap;
use crate::scroll::{AnimationState, EdgeEffect, ScrollableState};
use crate::scroll_bar::{DisplayMode, ScrollBar, ScrollBarKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum DragTarget {
    #[default]
    None,
    Content,
    Bar,
}

pub struct ArcListState {
    list: NodeKey,
    viewport: Size,
    algorithm: ArcListLayoutAlgorithm,
    positions: ArcListPositionMap,
    scrollable: ScrollableState,
    scroll_bar: ScrollBar,
    overlay: ArcScrollBarOverlayModifier,
    drag: DragRecognizer,
    drag_target: DragTarget,
    needs_repaint: bool,
}

/// Theme lengths are in dp; the engine works in px.
fn list_theme_px() -> ArcListTheme {
    let theme = arc_list_theme();
    ArcListTheme {
        default_item_size: dp_to_px(theme.default_item_size),
        space_width: dp_to_px(theme.space_width),
        ..theme
    }
}

fn bar_theme_px() -> ArcScrollBarTheme {
    let theme = arc_scroll_bar_theme();
    ArcScrollBarTheme {
        normal_width: dp_to_px(theme.normal_width),
        active_width: dp_to_px(theme.active_width),
        normal_background_width: dp_to_px(theme.normal_background_width),
        active_background_width: dp_to_px(theme.active_background_width),
        hot_zone_width: dp_to_px(theme.hot_zone_width),
        start_reserved_height: dp_to_px(theme.start_reserved_height),
        end_reserved_height: dp_to_px(theme.end_reserved_height),
        ..theme
    }
}

impl ArcListState {
    /// Snapshots the current themes, density and text direction.
    pub fn new(list: NodeKey, viewport: Size) -> Self {
        Self::with_edge_effect(list, viewport, EdgeEffect::Spring)
    }

    pub fn with_edge_effect(list: NodeKey, viewport: Size, edge: EdgeEffect) -> Self {
        let list_theme = list_theme_px();
        let bar_theme = bar_theme_px();

        let mut algorithm = ArcListLayoutAlgorithm::new(list_theme);
        algorithm.set_content_main_size(viewport.height);
        algorithm.set_spring_effect(edge == EdgeEffect::Spring);

        let scrollable = ScrollableState::new(list_theme, edge);
        scrollable.set_viewport(viewport.height);

        let mut scroll_bar = ScrollBar::arc(bar_theme);
        if text_direction() == TextDirection::Rtl {
            scroll_bar.set_position_mode(PositionMode::Left);
        }
        let overlay = ArcScrollBarOverlayModifier::new(bar_theme, scroll_bar.display_mode());

        Self {
            list,
            viewport,
            algorithm,
            positions: ArcListPositionMap::new(&list_theme),
            scrollable,
            scroll_bar,
            overlay,
            drag: DragRecognizer::default(),
            drag_target: DragTarget::None,
            needs_repaint: true,
        }
    }

    pub fn list(&self) -> NodeKey {
        self.list
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn algorithm(&self) -> &ArcListLayoutAlgorithm {
        &self.algorithm
    }

    pub fn algorithm_mut(&mut self) -> &mut ArcListLayoutAlgorithm {
        &mut self.algorithm
    }

    pub fn positions(&self) -> &ArcListPositionMap {
        &self.positions
    }

    pub fn scrollable(&self) -> &ScrollableState {
        &self.scrollable
    }

    pub fn scroll_bar(&self) -> &ScrollBar {
        &self.scroll_bar
    }

    pub fn overlay(&self) -> &ArcScrollBarOverlayModifier {
        &self.overlay
    }

    pub fn visible_items(&self) -> impl Iterator<Item = (i32, ItemPosition)> + '_ {
        self.algorithm.item_positions().iter().map(|(i, p)| (*i, *p))
    }

    pub fn header_position(&self) -> Option<f32> {
        self.algorithm.header_position()
    }

    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_repaint)
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.algorithm.set_content_main_size(viewport.height);
        self.scrollable.set_viewport(viewport.height);
    }

    pub fn set_space_width(&mut self, space: f32) {
        self.algorithm.set_space_width(space);
        self.positions.set_space_width(space);
    }

    pub fn set_scroll_snap_align(&mut self, align: ScrollSnapAlign) {
        self.algorithm.set_scroll_snap_align(align);
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.scroll_bar.set_display_mode(mode);
        self.overlay = ArcScrollBarOverlayModifier::new(self.scroll_bar.state().theme, mode);
        self.needs_repaint = true;
    }

    /// Swaps the bar shape, e.g. for a linear bar on a rectangular screen.
    pub fn set_scroll_bar(&mut self, bar: ScrollBar) {
        self.overlay = ArcScrollBarOverlayModifier::new(bar.state().theme, bar.display_mode());
        self.scroll_bar = bar;
        self.needs_repaint = true;
    }

    /// Items from `index` on were inserted, removed or resized.
    pub fn on_items_changed(&mut self, index: i32) {
        self.positions.mark_dirty_from(index);
        self.needs_repaint = true;
    }

    /// Lays out the window for the current scroll offset and refreshes the
    /// scroll bar.
    pub fn layout(&mut self, arena: &NodeArena) -> Result<()> {
        let children = ListChildren::new(arena, self.list)?;

        self.algorithm
            .set_current_offset(self.scrollable.offset() - self.algorithm.total_offset());
        self.algorithm
            .set_animation_state(self.scrollable.animation_state());
        let pending_end = self
            .algorithm
            .has_predict_snap_end_position()
            .then(|| self.algorithm.predict_snap_end_position());

        self.algorithm.measure(&children);

        let main = self.viewport.height;
        self.positions
            .update_total_count(self.algorithm.total_item_count());
        self.positions.record_window(self.algorithm.item_positions());
        self.scrollable.sync_offset(self.algorithm.total_offset());
        self.scrollable.set_bounds(
            self.positions.min_offset(main),
            self.positions.max_offset(main),
        );

        if self.scrollable.is_settling() && self.algorithm.has_predict_snap_end_position() {
            let end = self.algorithm.predict_snap_end_position();
            if pending_end.is_none_or(|p| !near_equal(p, end)) {
                log::debug!("settle retargeted to {end:.1}");
                self.scrollable.retarget_settle(end);
            }
        }

        self.refresh_scroll_bar();
        self.needs_repaint = true;
        Ok(())
    }

    fn refresh_scroll_bar(&mut self) {
        let main = self.viewport.height;
        let estimated = self.positions.estimated_content_height(main);
        if great_not_equal(estimated, 0.0) {
            let current = self
                .positions
                .current_offset(self.algorithm.total_offset(), main);
            self.scroll_bar.set_out_boundary(self.scrollable.overscroll());
            self.scroll_bar
                .update_scroll_bar_region(Vec2::ZERO, self.viewport, current, estimated);
        }
        self.sync_overlay();
    }

    fn sync_overlay(&mut self) {
        let hover = self.scroll_bar.take_hover_animation_type();
        let opacity = self.scroll_bar.take_opacity_animation_type();
        let adapt = self.scroll_bar.take_adapt_animation();
        let scrollable = self.scroll_bar.is_scrollable();
        if let Some(arc) = self.scroll_bar.as_arc() {
            self.overlay
                .apply_state(hover, opacity, adapt, arc.thumb(), arc.track(), scrollable);
        }
        if self.scroll_bar.take_repaint_request() {
            self.needs_repaint = true;
        }
    }

    /// Moves the content by `delta` (positive scrolls toward the end) and
    /// returns the part that could not be applied.
    pub fn scroll_by(&mut self, arena: &NodeArena, delta: f32) -> Result<f32> {
        self.scrollable.begin_scroll();
        let leftover = self.scrollable.scroll_immediate(delta);
        self.scroll_bar.on_scroll_activity();
        self.layout(arena)?;
        Ok(leftover)
    }

    /// Finger released with `velocity` (px/s, positive downward): predict
    /// the landing point, let the layout snap it, then settle there.
    pub fn on_drag_end(&mut self, arena: &NodeArena, velocity: f32) -> Result<()> {
        let predict = self.scrollable.predict_fling(velocity);
        self.algorithm.set_scroll_snap_velocity(velocity);
        self.algorithm.set_predict_snap_offset(Some(predict));
        self.layout(arena)?;

        let corrected = self.algorithm.predict_snap_offset();
        self.algorithm.set_predict_snap_offset(None);
        let target = self.algorithm.total_offset() - corrected.unwrap_or(predict);

        let (min, max) = self.scrollable.bounds();
        let state = if target < min || target > max {
            AnimationState::Spring
        } else if corrected.is_some() {
            AnimationState::Snap
        } else {
            AnimationState::Friction
        };
        self.scrollable.start_settle(target.clamp(min, max), state);
        if !self.scrollable.is_settling() {
            self.finish_scroll(arena)?;
        }
        Ok(())
    }

    fn finish_scroll(&mut self, arena: &NodeArena) -> Result<()> {
        self.algorithm.set_predict_snap_end_position(None);
        self.scroll_bar.on_scroll_end();
        self.layout(arena)
    }

    /// Advances animations; true while anything still moves.
    pub fn tick(&mut self, arena: &NodeArena) -> Result<bool> {
        let mut active = false;
        if self.scrollable.tick().is_some() {
            active = true;
            self.layout(arena)?;
            if !self.scrollable.is_settling() {
                log::debug!("settled at {:.1}", self.scrollable.offset());
                self.finish_scroll(arena)?;
            }
        }
        if self.overlay.tick() {
            active = true;
            self.needs_repaint = true;
        }
        Ok(active)
    }

    /// Brings the item at `index` to the viewport center.
    pub fn scroll_to_index(&mut self, arena: &NodeArena, index: i32) -> Result<()> {
        if index < 0 || index >= self.positions.total_count() {
            return Err(HaloError::InvalidRange {
                what: "item index",
                value: index as f32,
            });
        }
        self.scrollable.stop();
        let main = self.viewport.height;
        // The first pass jumps on estimated sizes; the second corrects
        // against the item's laid-out position.
        for _ in 0..2 {
            let target = match self.algorithm.item_positions().get(&index) {
                Some(pos) => self.algorithm.total_offset() + pos.center() - main / 2.0,
                None => match self.positions.content_center_of(index) {
                    Some(center) => center - main / 2.0,
                    None => break,
                },
            };
            let (min, max) = self.scrollable.bounds();
            let target = target.clamp(min, max);
            if near_equal(target, self.scrollable.offset()) {
                break;
            }
            self.scrollable.sync_offset(target);
            self.layout(arena)?;
        }
        Ok(())
    }

    pub fn handle_pointer(&mut self, arena: &NodeArena, event: &PointerEvent) -> Result<()> {
        match event.event {
            PointerEventKind::Down => {
                if self.scrollable.is_settling() {
                    self.scrollable.stop();
                }
                self.drag_target = if self.scroll_bar.in_bar_touch_region(event.position) {
                    self.scroll_bar.set_pressed(true);
                    self.refresh_scroll_bar();
                    DragTarget::Bar
                } else {
                    DragTarget::Content
                };
            }
            PointerEventKind::Move | PointerEventKind::Enter
                if event.kind == PointerKind::Mouse && !self.drag.is_pressed() =>
            {
                let hover = self.scroll_bar.in_bar_hover_region(event.position);
                self.scroll_bar.set_hover(hover);
                self.refresh_scroll_bar();
            }
            PointerEventKind::Leave => {
                self.scroll_bar.set_hover(false);
                self.refresh_scroll_bar();
            }
            _ => {}
        }

        match self.drag.handle_pointer(event) {
            Some(DragEvent::Start { .. }) => {
                if self.drag_target == DragTarget::Bar {
                    self.scroll_bar.handle_drag_start();
                }
                self.scrollable.begin_scroll();
                self.scroll_bar.on_scroll_activity();
                self.sync_overlay();
            }
            Some(DragEvent::Update { delta, .. }) => match self.drag_target {
                DragTarget::Bar => {
                    let content = self.scroll_bar.handle_drag_update(delta);
                    self.scroll_by(arena, -content)?;
                }
                DragTarget::Content => {
                    self.scroll_by(arena, -delta)?;
                }
                DragTarget::None => {}
            },
            Some(DragEvent::End { velocity }) => {
                let target = std::mem::take(&mut self.drag_target);
                if target == DragTarget::Bar {
                    self.release_bar();
                    self.on_drag_end(arena, 0.0)?;
                } else {
                    self.on_drag_end(arena, velocity)?;
                }
            }
            Some(DragEvent::Cancel) => {
                if std::mem::take(&mut self.drag_target) == DragTarget::Bar {
                    self.release_bar();
                }
                self.on_drag_end(arena, 0.0)?;
            }
            None => {
                if matches!(event.event, PointerEventKind::Up | PointerEventKind::Cancel)
                    && std::mem::take(&mut self.drag_target) == DragTarget::Bar
                {
                    self.release_bar();
                }
            }
        }
        Ok(())
    }

    fn release_bar(&mut self) {
        self.scroll_bar.handle_drag_end();
        self.scroll_bar.set_pressed(false);
        self.refresh_scroll_bar();
    }

    /// Draws the scroll bar; false when nothing was drawn.
    pub fn paint(&self, canvas: &mut impl ArcCanvas) -> bool {
        if self.scroll_bar.display_mode() == DisplayMode::Off {
            return false;
        }
        match self.scroll_bar.kind() {
            ScrollBarKind::Arc(_) => self.overlay.draw(canvas),
            ScrollBarKind::Linear(linear) => {
                let state = self.scroll_bar.state();
                let track = linear.bar_rect();
                let thumb = linear.active_rect();
                canvas.draw_rect(track, state.background_color, track.w.min(track.h) / 2.0);
                canvas.draw_rect(thumb, state.foreground_color, thumb.w.min(thumb.h) / 2.0);
                true
            }
        }
    }
}
