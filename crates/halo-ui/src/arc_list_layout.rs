//! # Arc list layout
//!
//! Lays out a virtualized window of items along the main axis of a round
//! viewport. Only items that intersect the viewport (plus one default item
//! size of lookahead on each side) are kept in `item_positions`, keyed by
//! index. Positions are relative to the viewport's top edge; `total_offset`
//! is the content coordinate of that edge, with content 0 at the top of
//! item 0.
//!
//! Each pass starts from the first item of the previous window, shifts it by
//! `current_offset` and walks outward. Items that have not been measured yet
//! take the theme's default size.
//!
//! After a fling the owner hands in `predict_snap_offset` (how far the
//! content would travel) and reads it back corrected, so the fling comes to
//! rest with an item aligned to the snap line.

use std::collections::{BTreeMap, BTreeSet};

use halo_core::*;

use crate::scroll::AnimationState;

/// Read back from `predict_snap_end_position` when no end position is set.
pub const UNSET_SNAP_END_POS: f32 = -0.001;

/// Scale falloff of items with their angular distance from the visual
/// center of the round viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcScaleCurve {
    radius: f32,
    item_main_size: f32,
    min_scale: f32,
    max_scale: f32,
    exponent: f32,
    spread: f32,
}

impl ArcScaleCurve {
    pub fn new(radius: f32, item_main_size: f32, theme: &ArcListTheme) -> Self {
        Self {
            radius,
            item_main_size,
            min_scale: theme.min_scale,
            max_scale: theme.max_scale.max(theme.min_scale),
            exponent: theme.scale_exponent,
            spread: theme.scale_spread,
        }
    }

    /// Falloff width in degrees.
    fn sigma(&self) -> f32 {
        (self.item_main_size * self.spread / self.radius).to_degrees()
    }

    /// Angle, in degrees, subtended by a main-axis distance from the center.
    pub fn angle_of(&self, offset_from_center: f32) -> f32 {
        if near_zero(self.radius) {
            return 0.0;
        }
        (offset_from_center / self.radius).to_degrees()
    }

    /// Non-increasing in `|angle|`, always within `[min_scale, max_scale]`.
    pub fn near_scale(&self, angle: f32) -> f32 {
        let sigma = self.sigma();
        if near_zero(self.radius) || !sigma.is_finite() || near_zero(sigma) {
            return self.max_scale;
        }
        let falloff = (-(angle.abs() / sigma).powf(self.exponent)).exp();
        (self.min_scale + (self.max_scale - self.min_scale) * falloff)
            .clamp(self.min_scale, self.max_scale)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ItemPosition {
    pub start_pos: f32,
    pub end_pos: f32,
    pub is_group: bool,
    pub scale: f32,
}

impl ItemPosition {
    pub fn new(start_pos: f32, end_pos: f32) -> Self {
        Self {
            start_pos,
            end_pos,
            is_group: false,
            scale: 1.0,
        }
    }

    pub fn size(&self) -> f32 {
        self.end_pos - self.start_pos
    }

    pub fn center(&self) -> f32 {
        (self.start_pos + self.end_pos) / 2.0
    }
}

/// Where a snapped item comes to rest in the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollSnapAlign {
    None,
    Start,
    #[default]
    Center,
    End,
}

/// Header placement carried between passes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeaderLayoutState {
    /// Header start relative to the viewport, `None` while off screen.
    pub start_header_pos: Option<f32>,
    /// Header start relative to the center of item 0.
    pub header_offset: f32,
    pub header_main_size: f32,
    pub old_first_item_size: f32,
    pub old_header_size: f32,
    /// Item 0 left the window; the header follows the first visible item.
    pub header_stay_near: bool,
}

#[derive(Default)]
struct Walk {
    window: BTreeMap<i32, ItemPosition>,
    head_center: Option<f32>,
    tail_center: Option<f32>,
}

pub struct ArcListLayoutAlgorithm {
    item_positions: BTreeMap<i32, ItemPosition>,
    total_item_count: i32,
    content_main_size: f32,
    space_width: f32,
    default_item_size: f32,
    total_offset: f32,
    current_offset: f32,
    is_spring_effect: bool,

    predict_snap_offset: Option<f32>,
    predict_snap_end_pos: Option<f32>,
    scroll_snap_velocity: f32,
    snap_velocity_threshold: f32,
    scroll_snap_align: ScrollSnapAlign,

    header: HeaderLayoutState,
    animation_state: AnimationState,
    curve: ArcScaleCurve,
    theme: ArcListTheme,
}

impl ArcListLayoutAlgorithm {
    pub fn new(theme: ArcListTheme) -> Self {
        Self {
            item_positions: BTreeMap::new(),
            total_item_count: 0,
            content_main_size: 0.0,
            space_width: theme.space_width,
            default_item_size: theme.default_item_size,
            total_offset: 0.0,
            current_offset: 0.0,
            is_spring_effect: true,
            predict_snap_offset: None,
            predict_snap_end_pos: None,
            scroll_snap_velocity: 0.0,
            snap_velocity_threshold: theme.snap_velocity_threshold,
            scroll_snap_align: ScrollSnapAlign::Center,
            header: HeaderLayoutState::default(),
            animation_state: AnimationState::Idle,
            curve: ArcScaleCurve::new(0.0, theme.default_item_size, &theme),
            theme,
        }
    }

    pub fn item_positions(&self) -> &BTreeMap<i32, ItemPosition> {
        &self.item_positions
    }

    pub fn set_item_positions(&mut self, positions: BTreeMap<i32, ItemPosition>) {
        self.item_positions = positions;
    }

    pub fn start_index(&self) -> Option<i32> {
        self.item_positions.keys().next().copied()
    }

    pub fn end_index(&self) -> Option<i32> {
        self.item_positions.keys().next_back().copied()
    }

    pub fn total_item_count(&self) -> i32 {
        self.total_item_count
    }

    pub fn set_total_item_count(&mut self, count: i32) {
        self.total_item_count = count;
    }

    pub fn content_main_size(&self) -> f32 {
        self.content_main_size
    }

    /// Also rebuilds the scale curve, whose radius is half the viewport.
    pub fn set_content_main_size(&mut self, main: f32) {
        self.content_main_size = main;
        self.curve = ArcScaleCurve::new(main / 2.0, self.default_item_size, &self.theme);
    }

    pub fn space_width(&self) -> f32 {
        self.space_width
    }

    pub fn set_space_width(&mut self, space: f32) {
        self.space_width = space.max(0.0);
    }

    pub fn total_offset(&self) -> f32 {
        self.total_offset
    }

    pub fn set_total_offset(&mut self, offset: f32) {
        self.total_offset = offset;
    }

    pub fn current_offset(&self) -> f32 {
        self.current_offset
    }

    /// Scroll delta to apply in the next pass; positive moves content up.
    pub fn set_current_offset(&mut self, delta: f32) {
        self.current_offset = delta;
    }

    pub fn is_spring_effect(&self) -> bool {
        self.is_spring_effect
    }

    pub fn set_spring_effect(&mut self, spring: bool) {
        self.is_spring_effect = spring;
    }

    pub fn set_animation_state(&mut self, state: AnimationState) {
        self.animation_state = state;
    }

    pub fn scroll_snap_align(&self) -> ScrollSnapAlign {
        self.scroll_snap_align
    }

    pub fn set_scroll_snap_align(&mut self, align: ScrollSnapAlign) {
        self.scroll_snap_align = align;
    }

    /// Release velocity of the fling being snapped, px/s.
    pub fn set_scroll_snap_velocity(&mut self, velocity: f32) {
        self.scroll_snap_velocity = velocity;
    }

    pub fn predict_snap_offset(&self) -> Option<f32> {
        self.predict_snap_offset
    }

    pub fn set_predict_snap_offset(&mut self, offset: Option<f32>) {
        self.predict_snap_offset = offset;
    }

    pub fn predict_snap_end_position(&self) -> f32 {
        self.predict_snap_end_pos.unwrap_or(UNSET_SNAP_END_POS)
    }

    pub fn has_predict_snap_end_position(&self) -> bool {
        self.predict_snap_end_pos.is_some()
    }

    pub fn set_predict_snap_end_position(&mut self, pos: Option<f32>) {
        self.predict_snap_end_pos = pos;
    }

    pub fn header(&self) -> &HeaderLayoutState {
        &self.header
    }

    pub fn header_position(&self) -> Option<f32> {
        self.header.start_header_pos
    }

    pub fn set_header_offset(&mut self, offset: f32) {
        self.header.header_offset = offset;
    }

    pub fn get_near_scale(&self, angle: f32) -> f32 {
        self.curve.near_scale(angle)
    }

    pub fn scale_curve(&self) -> &ArcScaleCurve {
        &self.curve
    }

    /// Forgets the window; the next pass centers item 0.
    pub fn reset(&mut self) {
        self.item_positions.clear();
        self.header = HeaderLayoutState::default();
        self.predict_snap_offset = None;
        self.predict_snap_end_pos = None;
    }

    fn item_size(&self, source: &impl LayoutSource, index: i32) -> f32 {
        source
            .item_main_size(index)
            .map(|s| s.max(0.0))
            .unwrap_or(self.default_item_size)
    }

    /// One layout pass over `source`.
    pub fn measure(&mut self, source: &impl LayoutSource) {
        let count = source.item_count();
        self.total_item_count = count;
        if count <= 0 {
            self.item_positions.clear();
            self.header.start_header_pos = None;
            self.current_offset = 0.0;
            return;
        }
        let main = self.content_main_size;
        if near_zero(main) {
            log::debug!("arc list: zero main size, layout skipped");
            return;
        }

        let (anchor_index, anchor_pos) = match self.item_positions.iter().next() {
            Some((index, pos)) => ((*index).min(count - 1), pos.start_pos),
            None => {
                let first = self.item_size(source, 0);
                self.total_offset = first / 2.0 - main / 2.0;
                (0, main / 2.0 - first / 2.0)
            }
        };
        let previous: BTreeSet<i32> = self.item_positions.keys().copied().collect();

        let mut walk = self.walk(source, anchor_index, anchor_pos - self.current_offset);
        if (walk.window.is_empty() || !self.is_spring_effect)
            && let Some(shift) = self.edge_correction(&walk)
        {
            log::trace!("arc list: edge correction {shift:.2}");
            self.current_offset -= shift;
            walk = self.walk(source, anchor_index, anchor_pos - self.current_offset);
        }
        if walk.window.is_empty() {
            log::warn!("arc list: no item intersects the viewport");
            return;
        }

        self.total_offset += self.current_offset;
        self.item_positions = walk.window;
        for pos in self.item_positions.values_mut() {
            let angle = self.curve.angle_of(pos.center() - main / 2.0);
            pos.scale = self.curve.near_scale(angle);
        }
        self.layout_header(source);

        let added: Vec<i32> = self
            .item_positions
            .keys()
            .filter(|i| !previous.contains(i))
            .copied()
            .collect();
        for index in added {
            self.on_item_position_add_or_update(index);
        }
        if self.predict_snap_offset.is_some() {
            self.fix_predict_snap_offset();
        }
    }

    fn walk(&self, source: &impl LayoutSource, anchor_index: i32, anchor_pos: f32) -> Walk {
        let main = self.content_main_size;
        let lookahead = self.default_item_size;
        let mut walk = Walk::default();

        let mut index = anchor_index;
        let mut pos = anchor_pos;
        while index < self.total_item_count && pos < main + lookahead {
            let size = self.item_size(source, index);
            self.place(&mut walk, source, index, pos, size);
            pos += size + self.space_width;
            index += 1;
        }

        let mut index = anchor_index - 1;
        let mut end = anchor_pos - self.space_width;
        while index >= 0 && end > -lookahead {
            let size = self.item_size(source, index);
            let start = end - size;
            self.place(&mut walk, source, index, start, size);
            end = start - self.space_width;
            index -= 1;
        }
        walk
    }

    fn place(
        &self,
        walk: &mut Walk,
        source: &impl LayoutSource,
        index: i32,
        start: f32,
        size: f32,
    ) {
        let end = start + size;
        let lookahead = self.default_item_size;
        if index == 0 {
            walk.head_center = Some(start + size / 2.0);
        }
        if index == self.total_item_count - 1 {
            walk.tail_center = Some(start + size / 2.0);
        }
        if end > -lookahead && start < self.content_main_size + lookahead {
            let mut pos = ItemPosition::new(start, end);
            pos.is_group = source.is_group(index);
            walk.window.insert(index, pos);
        }
    }

    /// Shift that brings item 0 (or the last item) back to the viewport
    /// center when it was pulled past it.
    fn edge_correction(&self, walk: &Walk) -> Option<f32> {
        let mid = self.content_main_size / 2.0;
        let shift = match (walk.head_center, walk.tail_center) {
            (Some(head), _) if great_not_equal(head, mid) => mid - head,
            (_, Some(tail)) if less_not_equal(tail, mid) => mid - tail,
            _ => return None,
        };
        Some(shift)
    }

    fn layout_header(&mut self, source: &impl LayoutSource) {
        let Some(header_size) = source.header_main_size() else {
            self.header.start_header_pos = None;
            return;
        };
        let first_size = self.item_size(source, 0);
        if self.check_need_update_header_offset(first_size, header_size) {
            self.header.header_offset = -(first_size / 2.0 + self.space_width + header_size);
        }
        self.header.header_main_size = header_size;

        self.header.start_header_pos = if let Some(first) = self.item_positions.get(&0) {
            self.header.header_stay_near = false;
            Some(first.center() + self.header.header_offset)
        } else if self.header.header_stay_near
            && let Some(first) = self.item_positions.values().next()
        {
            Some(first.start_pos - self.space_width - header_size)
        } else {
            None
        };
    }

    /// Whether the header offset has to be recomputed this pass.
    ///
    /// Never while springing back from overscroll. Otherwise on a size
    /// change of item 0 or the header, or once item 0 has left the window
    /// with the header above it, which also turns on stay-near.
    pub fn check_need_update_header_offset(
        &mut self,
        first_item_size: f32,
        header_size: f32,
    ) -> bool {
        if self.animation_state == AnimationState::Spring {
            return false;
        }
        let first_changed = !near_equal(first_item_size, self.header.old_first_item_size);
        let header_changed = !near_equal(header_size, self.header.old_header_size);
        if first_changed || header_changed {
            self.header.old_first_item_size = first_item_size;
            self.header.old_header_size = header_size;
            return true;
        }
        if self.start_index().is_some_and(|i| i != 0)
            && less_not_equal(self.header.header_offset, 0.0)
        {
            self.header.header_stay_near = true;
            return true;
        }
        false
    }

    fn stop_on_screen(&self, align: ScrollSnapAlign) -> f32 {
        match align {
            ScrollSnapAlign::Center => self.content_main_size / 2.0,
            ScrollSnapAlign::End => self.content_main_size,
            ScrollSnapAlign::Start | ScrollSnapAlign::None => 0.0,
        }
    }

    /// Bands searched for the landing item, in scan order. Start and End
    /// round to the nearest item edge: a band spans half an item on each
    /// side of that edge.
    fn search_bands(&self, align: ScrollSnapAlign) -> Vec<(i32, f32, f32)> {
        let space = self.space_width;
        let window = &self.item_positions;
        match align {
            ScrollSnapAlign::Start => {
                let first = window.values().next().map_or(0.0, ItemPosition::size);
                window
                    .iter()
                    .map(|(i, p)| {
                        let lower = p.start_pos - first / 2.0 - space;
                        (*i, lower, p.start_pos + p.size() / 2.0)
                    })
                    .collect()
            }
            ScrollSnapAlign::Center => window
                .iter()
                .map(|(i, p)| (*i, p.start_pos - space / 2.0, p.end_pos + space / 2.0))
                .collect(),
            ScrollSnapAlign::End => {
                // Upper edge uses the following item's size.
                let mut next = window.values().next_back().map_or(0.0, ItemPosition::size);
                window
                    .iter()
                    .rev()
                    .map(|(i, p)| {
                        let upper = p.end_pos + next / 2.0 + space;
                        next = p.size();
                        (*i, p.end_pos - next / 2.0, upper)
                    })
                    .collect()
            }
            ScrollSnapAlign::None => Vec::new(),
        }
    }

    /// Band in which a pending end position is taken over by `pos`.
    fn refine_band(&self, pos: &ItemPosition, align: ScrollSnapAlign) -> Option<(f32, f32)> {
        let space = self.space_width;
        match align {
            ScrollSnapAlign::Start => Some((pos.start_pos - space, pos.end_pos)),
            ScrollSnapAlign::Center => {
                Some((pos.start_pos - space / 2.0, pos.end_pos + space / 2.0))
            }
            ScrollSnapAlign::End => Some((pos.start_pos, pos.end_pos + space)),
            ScrollSnapAlign::None => None,
        }
    }

    /// Corrects `predict_snap_offset` so the fling ends aligned to an item.
    pub fn fix_predict_snap_offset(&mut self) {
        let Some(offset) = self.predict_snap_offset else {
            return;
        };
        if self.item_positions.is_empty() {
            return;
        }
        let align = self.scroll_snap_align;
        if align == ScrollSnapAlign::None {
            self.predict_snap_offset = None;
            self.predict_snap_end_pos = None;
            return;
        }

        let predict_end = self.total_offset - offset;
        let end_index = self.find_predict_snap_end_index(predict_end, align);
        if let Some(index) = end_index
            && let Some(end) = self.calculate_predict_snap_end_position_by_index(index, align)
        {
            self.predict_snap_offset = Some(self.total_offset - end);
            self.predict_snap_end_pos = None;
            log::debug!("snap to item {index} at {end:.1}");
        } else if self.is_uniform_height_probably() {
            match align {
                ScrollSnapAlign::Start => self.fix_predict_snap_offset_align_start(),
                ScrollSnapAlign::Center => self.fix_predict_snap_offset_align_center(),
                ScrollSnapAlign::End => self.fix_predict_snap_offset_align_end(),
                ScrollSnapAlign::None => {}
            }
        } else {
            self.predict_snap_end_pos = Some(predict_end);
        }
    }

    /// Window index whose snap band holds the predicted end position. A fast
    /// fling that would land on the item already at the snap line moves on
    /// to its neighbour.
    pub fn find_predict_snap_end_index(
        &self,
        predict_end: f32,
        align: ScrollSnapAlign,
    ) -> Option<i32> {
        let stop = self.stop_on_screen(align);
        let total = self.total_offset;
        let mut end_index = None;
        let mut curr_index = None;
        for (index, start, end) in self.search_bands(align) {
            if great_or_equal(predict_end + stop, total + start)
                && less_not_equal(predict_end + stop, total + end)
            {
                end_index = Some(index);
            }
            if great_or_equal(stop, start) && less_not_equal(stop, end) {
                curr_index = Some(index);
            }
            if end_index.is_some() && curr_index.is_some() {
                break;
            }
        }

        let (Some(first), Some(last)) = (self.start_index(), self.end_index()) else {
            return end_index;
        };
        if let Some(index) = end_index
            && end_index == curr_index
        {
            let threshold = self.snap_velocity_threshold;
            if self.scroll_snap_velocity < -threshold {
                return Some((index + 1).min(last));
            }
            if self.scroll_snap_velocity > threshold {
                return Some((index - 1).max(first));
            }
        }
        end_index
    }

    /// Content offset at which the item at `index` is aligned.
    pub fn calculate_predict_snap_end_position_by_index(
        &self,
        index: i32,
        align: ScrollSnapAlign,
    ) -> Option<f32> {
        let pos = self.item_positions.get(&index)?;
        let total = self.total_offset;
        let main = self.content_main_size;
        Some(match align {
            ScrollSnapAlign::Center => total + pos.start_pos + pos.size() / 2.0 - main / 2.0,
            ScrollSnapAlign::End => {
                let end = total + pos.end_pos - main;
                // Never pull item 0 below the top edge.
                match self.item_positions.first_key_value() {
                    Some((0, first)) if less_not_equal(end, total + first.start_pos) => {
                        total + first.start_pos
                    }
                    _ => end,
                }
            }
            ScrollSnapAlign::Start | ScrollSnapAlign::None => {
                let end = total + pos.start_pos;
                // Never push the last item above the bottom edge.
                match self.item_positions.last_key_value() {
                    Some((last_index, last))
                        if *last_index == self.total_item_count - 1
                            && great_not_equal(end + main, total + last.end_pos) =>
                    {
                        total + last.end_pos - main
                    }
                    _ => end,
                }
            }
        })
    }

    fn is_uniform_height_probably(&self) -> bool {
        let mut sizes = self.item_positions.values().map(ItemPosition::size);
        let Some(first) = sizes.next() else {
            return false;
        };
        sizes.all(|s| near_equal(s, first))
    }

    /// Item pitch from the first window item, or `None` when degenerate.
    fn uniform_pitch(&self) -> Option<f32> {
        if self.total_item_count <= 0 || near_zero(self.content_main_size) {
            return None;
        }
        let first = self.item_positions.values().next()?;
        let pitch = first.size() + self.space_width;
        (!near_zero(pitch)).then_some(pitch)
    }

    fn max_list_item_index(&self) -> i32 {
        (self.total_item_count - 1).max(0)
    }

    pub fn fix_predict_snap_offset_align_start(&mut self) {
        let Some(offset) = self.predict_snap_offset else {
            return;
        };
        let Some(pitch) = self.uniform_pitch() else {
            log::debug!("snap align start skipped: degenerate pitch");
            return;
        };
        let start_pos = 0.0;
        let end_pos = self.content_main_size;
        let max_pos = pitch * self.total_item_count as f32 - self.space_width - end_pos;
        let mut end = self.total_offset - offset;

        if less_not_equal(end, -start_pos) {
            if self.is_spring_effect {
                return;
            }
            end = -start_pos;
        } else if great_not_equal(end, max_pos) {
            if self.is_spring_effect {
                return;
            }
            end = max_pos;
        } else if let Some(i) = (0..=self.max_list_item_index())
            .find(|i| (end + start_pos - *i as f32 * pitch).abs() < pitch / 2.0)
        {
            end = i as f32 * pitch - start_pos;
        }
        self.predict_snap_offset = Some(self.total_offset - end);
        self.predict_snap_end_pos = Some(end);
    }

    pub fn fix_predict_snap_offset_align_center(&mut self) {
        let Some(offset) = self.predict_snap_offset else {
            return;
        };
        let Some(pitch) = self.uniform_pitch() else {
            log::debug!("snap align center skipped: degenerate pitch");
            return;
        };
        let half_main = self.content_main_size / 2.0;
        let half_space = self.space_width / 2.0;
        let count = self.total_item_count as f32;
        let lower = pitch / 2.0 - half_main - half_space;
        let upper = pitch * count - pitch / 2.0 - half_main - half_space;
        let mut end = self.total_offset - offset;

        if less_not_equal(end, lower) {
            if self.is_spring_effect {
                return;
            }
            end = lower;
        } else if great_not_equal(end + half_main, pitch * count - pitch / 2.0) {
            if self.is_spring_effect {
                return;
            }
            end = upper;
        } else {
            if let Some(i) = (0..=self.max_list_item_index())
                .find(|i| (end + half_main - *i as f32 * pitch - pitch / 2.0).abs() < pitch / 2.0)
            {
                end = i as f32 * pitch + pitch / 2.0 - half_main - half_space;
            }
            end = end.clamp(lower, upper.max(lower));
        }
        self.predict_snap_offset = Some(self.total_offset - end);
        self.predict_snap_end_pos = Some(end);
    }

    pub fn fix_predict_snap_offset_align_end(&mut self) {
        let Some(offset) = self.predict_snap_offset else {
            return;
        };
        let Some(pitch) = self.uniform_pitch() else {
            log::debug!("snap align end skipped: degenerate pitch");
            return;
        };
        let start_pos = 0.0;
        let end_pos = self.content_main_size;
        let max_pos = pitch * self.total_item_count as f32 - self.space_width - end_pos;
        let mut end = self.total_offset - offset;

        if less_not_equal(end, -start_pos) {
            if self.is_spring_effect {
                return;
            }
            end = -start_pos;
        } else if great_not_equal(end, max_pos) {
            if self.is_spring_effect {
                return;
            }
            end = max_pos;
        } else if let Some(i) = (0..=self.max_list_item_index())
            .find(|i| (end + end_pos - *i as f32 * pitch).abs() < pitch / 2.0)
        {
            end = i as f32 * pitch - end_pos - self.space_width;
        }
        self.predict_snap_offset = Some(self.total_offset - end);
        self.predict_snap_end_pos = Some(end);
    }

    /// Refines a pending end position once the item it falls on is laid out.
    pub fn on_item_position_add_or_update(&mut self, index: i32) {
        let Some(predict_end) = self.predict_snap_end_pos else {
            return;
        };
        let align = self.scroll_snap_align;
        let Some(pos) = self.item_positions.get(&index) else {
            return;
        };
        let Some((start, end)) = self.refine_band(pos, align) else {
            return;
        };
        let total = self.total_offset;
        let stop = predict_end + self.stop_on_screen(align);
        if great_or_equal(stop, total + start)
            && less_not_equal(stop, total + end)
            && let Some(refined) = self.calculate_predict_snap_end_position_by_index(index, align)
        {
            log::trace!("snap end {predict_end:.1} refined to {refined:.1} by item {index}");
            self.predict_snap_end_pos = Some(refined);
        }
    }
}
