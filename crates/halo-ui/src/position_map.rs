//! Content-wide item geometry for the arc list.
//!
//! The layout algorithm only sees a window of items; the scroll bar and the
//! scroll bounds need the whole content. The map remembers every size the
//! layout has reported and estimates the rest from the running average.
//! Content coordinates start at the top of item 0.

use std::collections::BTreeMap;

use halo_core::*;

use crate::arc_list_layout::ItemPosition;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionInfo {
    pub main_pos: f32,
    pub main_size: f32,
    pub is_group: bool,
}

#[derive(Clone, Copy, Debug)]
struct Measured {
    size: f32,
    is_group: bool,
}

#[derive(Clone, Debug)]
pub struct ArcListPositionMap {
    measured: BTreeMap<i32, Measured>,
    total_count: i32,
    default_item_size: f32,
    space_width: f32,
}

impl ArcListPositionMap {
    pub fn new(theme: &ArcListTheme) -> Self {
        Self {
            measured: BTreeMap::new(),
            total_count: 0,
            default_item_size: theme.default_item_size,
            space_width: theme.space_width,
        }
    }

    pub fn set_space_width(&mut self, space: f32) {
        self.space_width = space.max(0.0);
    }

    pub fn total_count(&self) -> i32 {
        self.total_count
    }

    pub fn update_total_count(&mut self, count: i32) {
        let count = count.max(0);
        if count < self.total_count {
            self.mark_dirty_from(count);
        }
        self.total_count = count;
    }

    /// Stores the sizes of a freshly laid-out window.
    pub fn record_window(&mut self, window: &BTreeMap<i32, ItemPosition>) {
        for (index, pos) in window {
            if *index >= self.total_count {
                continue;
            }
            self.measured.insert(
                *index,
                Measured {
                    size: pos.size(),
                    is_group: pos.is_group,
                },
            );
        }
    }

    /// Forgets sizes from `index` on, after an insertion or removal there.
    pub fn mark_dirty_from(&mut self, index: i32) {
        self.measured.split_off(&index.max(0));
    }

    pub fn measured_count(&self) -> usize {
        self.measured.len()
    }

    pub fn average_size(&self) -> f32 {
        if self.measured.is_empty() {
            return self.default_item_size;
        }
        self.measured.values().map(|m| m.size).sum::<f32>() / self.measured.len() as f32
    }

    fn size_of(&self, index: i32) -> f32 {
        self.measured
            .get(&index)
            .map(|m| m.size)
            .unwrap_or_else(|| self.average_size())
    }

    pub fn position_of(&self, index: i32) -> Option<PositionInfo> {
        if index < 0 || index >= self.total_count {
            return None;
        }
        let below = self.measured.range(..index);
        let (known, sum) = below.fold((0, 0.0), |(n, s), (_, m)| (n + 1, s + m.size));
        let estimated = (index - known) as f32 * self.average_size();
        Some(PositionInfo {
            main_pos: sum + estimated + index as f32 * self.space_width,
            main_size: self.size_of(index),
            is_group: self.measured.get(&index).is_some_and(|m| m.is_group),
        })
    }

    pub fn content_center_of(&self, index: i32) -> Option<f32> {
        self.position_of(index).map(|p| p.main_pos + p.main_size / 2.0)
    }

    /// Sum of item sizes and the gaps between them.
    pub fn total_height(&self) -> f32 {
        if self.total_count <= 0 {
            return 0.0;
        }
        let unknown = self.total_count - self.measured.len() as i32;
        let sum: f32 = self.measured.values().map(|m| m.size).sum();
        sum + unknown as f32 * self.average_size()
            + (self.total_count - 1) as f32 * self.space_width
    }

    fn edge_sizes(&self) -> (f32, f32) {
        (self.size_of(0), self.size_of(self.total_count - 1))
    }

    /// Scrollable height: the first and last items can both reach the
    /// viewport center.
    pub fn estimated_content_height(&self, main: f32) -> f32 {
        if self.total_count <= 0 {
            return 0.0;
        }
        let (first, last) = self.edge_sizes();
        self.total_height() + (main - first) / 2.0 + (main - last) / 2.0
    }

    /// Offset with item 0 centered.
    pub fn min_offset(&self, main: f32) -> f32 {
        self.size_of(0) / 2.0 - main / 2.0
    }

    /// Offset with the last item centered.
    pub fn max_offset(&self, main: f32) -> f32 {
        let max = self.min_offset(main) + self.estimated_content_height(main) - main;
        max.max(self.min_offset(main))
    }

    /// Distance scrolled from the rest position, as the scroll bar reads it.
    pub fn current_offset(&self, total_offset: f32, main: f32) -> f32 {
        total_offset - self.min_offset(main)
    }
}
