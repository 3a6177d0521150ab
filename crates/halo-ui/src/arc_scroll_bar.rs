//! Arc-shaped scroll bar geometry for round screens.
//!
//! The track is a fixed sector of `max_offset_angle` degrees centred on the
//! right (or mirrored to the left) edge of a round viewport. The thumb is a
//! sub-sector whose sweep is proportional to the visible fraction of the
//! content and whose start angle follows the scroll position.

use halo_core::*;

use crate::scroll_bar::ScrollBarState;

/// Inputs of the last thumb computation, compared with tolerance so a
/// repeated layout with the same scroll state skips the trig.
#[derive(Clone, Copy, Debug)]
struct RegionKey {
    estimated_height: f32,
    viewport: Size,
    offset: Vec2,
    last_offset: f32,
    out_boundary: f32,
    active: bool,
    mode: PositionMode,
}

impl RegionKey {
    fn near_equal(&self, other: &RegionKey) -> bool {
        near_equal(self.estimated_height, other.estimated_height)
            && self.viewport.near_equal(other.viewport)
            && self.offset.near_equal(other.offset)
            && near_equal(self.last_offset, other.last_offset)
            && near_equal(self.out_boundary, other.out_boundary)
            && self.active == other.active
            && self.mode == other.mode
    }
}

#[derive(Clone, Debug, Default)]
pub struct ArcBar {
    track: ArcRound,
    thumb: ArcRound,
    hot_zone: ArcRound,
    hover: ArcRound,
    center_deviation: f32,
    width: f32,
    last_key: Option<RegionKey>,
    drag_start_angle: Option<f32>,
    repaint_requested: bool,
}

impl ArcBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self) -> &ArcRound {
        &self.track
    }
    pub fn thumb(&self) -> &ArcRound {
        &self.thumb
    }
    pub fn hot_zone(&self) -> &ArcRound {
        &self.hot_zone
    }
    pub fn hover_region(&self) -> &ArcRound {
        &self.hover
    }
    pub fn center_deviation(&self) -> f32 {
        self.center_deviation
    }
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Thumb start angle captured when the current drag began.
    pub fn drag_start_angle(&self) -> Option<f32> {
        self.drag_start_angle
    }

    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }

    /// Builds the track sector for the current hover/press state.
    pub fn set_bar_region(&mut self, state: &ScrollBarState, offset: Vec2, viewport: Size) {
        let theme = &state.theme;
        let active = state.is_active();
        self.width = if active {
            theme.active_width
        } else {
            theme.normal_width
        };
        let background_width = if active {
            theme.active_background_width
        } else {
            theme.normal_background_width
        };
        self.center_deviation = background_width / 2.0;

        let center = Vec2::new(
            offset.x + viewport.width / 2.0,
            offset.y + viewport.height / 2.0,
        );
        let radius = viewport.width / 2.0 - self.center_deviation;
        let (start, sweep) = track_angles(theme.max_offset_angle, state.position_mode);

        self.track = ArcRound::new(center, radius, start, sweep, background_width)
            .with_color(state.background_color);
    }

    /// Derives the thumb length and offset from the scroll position, then
    /// rebuilds the thumb sectors.
    pub fn set_round_trick_region(
        &mut self,
        state: &mut ScrollBarState,
        offset: Vec2,
        viewport: Size,
        last_offset: f32,
        estimated_height: f32,
    ) {
        let key = RegionKey {
            estimated_height,
            viewport,
            offset,
            last_offset,
            out_boundary: state.out_boundary,
            active: state.is_active(),
            mode: state.position_mode,
        };
        if let Some(prev) = self.last_key {
            if prev.near_equal(&key) {
                return;
            }
            if !near_equal(prev.estimated_height, estimated_height)
                || !prev.viewport.near_equal(viewport)
            {
                state.needs_adapt_animation = true;
            }
        }
        self.last_key = Some(key);

        if let Err(e) = state.update_thumb_metrics(viewport.height, last_offset, estimated_height) {
            log::error!("arc scroll bar: {e}");
            return;
        }
        self.set_thumb_region(state);
    }

    /// Recomputes thumb, hot-zone and hover sectors from `state`. On a
    /// degenerate track the previous sectors are kept.
    pub fn set_thumb_region(&mut self, state: &ScrollBarState) {
        match thumb_angles(state) {
            Ok((start, sweep)) => {
                let theme = &state.theme;
                let center = self.track.center();
                let radius = self.track.radius();
                self.thumb = ArcRound::new(center, radius, start, sweep, self.width)
                    .with_color(state.foreground_color);
                self.hot_zone = ArcRound::new(center, radius, start, sweep, theme.hot_zone_width);
                self.hover = ArcRound::new(
                    center,
                    radius,
                    start,
                    sweep,
                    theme.active_background_width,
                );
                self.repaint_requested = true;
            }
            Err(e) => log::error!("arc scroll bar thumb skipped: {e}"),
        }
    }

    pub(crate) fn begin_drag(&mut self) {
        self.drag_start_angle = Some(self.thumb.start_angle());
    }

    pub(crate) fn end_drag(&mut self) {
        self.drag_start_angle = None;
    }

    pub(crate) fn set_colors(&mut self, foreground: Color, background: Color) {
        self.thumb.set_color(foreground);
        self.track.set_color(background);
        self.repaint_requested = true;
    }
}

/// Start and signed sweep of the track, degrees.
pub fn track_angles(max_offset_angle: f32, mode: PositionMode) -> (f32, f32) {
    match mode {
        PositionMode::Left => (-STRAIGHT_ANGLE + max_offset_angle / 2.0, -max_offset_angle),
        PositionMode::Right | PositionMode::Bottom => (-max_offset_angle / 2.0, max_offset_angle),
    }
}

fn thumb_angles(state: &ScrollBarState) -> Result<(f32, f32)> {
    let track = state.bar_region_size;
    let active = state.active_bar_size;
    if near_zero(track) || near_equal(track, active) {
        return Err(HaloError::DegenerateGeometry(
            "track length is zero or equal to thumb length",
        ));
    }
    let max = state.theme.max_offset_angle;
    let mut sweep = active * max / track;
    let raw = ((max - sweep) * state.active_main_offset / (track - active)).clamp(0.0, max);
    let mut start = raw - max / 2.0;
    if state.position_mode == PositionMode::Left {
        start = -STRAIGHT_ANGLE - start;
        sweep = -sweep;
    }
    Ok((start, sweep))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(mode: PositionMode) -> ScrollBarState {
        let mut s = ScrollBarState::new(ArcScrollBarTheme::default());
        s.position_mode = mode;
        s
    }

    const VIEW: Size = Size {
        width: 466.0,
        height: 466.0,
    };

    #[test]
    fn track_radius_backs_off_by_half_background() {
        let s = state(PositionMode::Right);
        let mut bar = ArcBar::new();
        bar.set_bar_region(&s, Vec2::ZERO, VIEW);
        assert_eq!(bar.center_deviation(), 2.0);
        assert_eq!(bar.track().radius(), 231.0);
        assert_eq!(bar.track().start_angle(), -30.0);
        assert_eq!(bar.track().sweep_angle(), 60.0);
        assert_eq!(bar.track().center(), Vec2::new(233.0, 233.0));
    }

    #[test]
    fn thumb_rests_at_track_start() {
        for (mode, expected) in [(PositionMode::Right, -30.0), (PositionMode::Left, -150.0)] {
            let mut s = state(mode);
            let mut bar = ArcBar::new();
            bar.set_bar_region(&s, Vec2::ZERO, VIEW);
            bar.set_round_trick_region(&mut s, Vec2::ZERO, VIEW, 0.0, 2000.0);
            assert!((bar.thumb().start_angle() - expected).abs() < 1e-4, "{mode:?}");
            assert!(bar.take_repaint_request());
        }
    }

    #[test]
    fn mirrored_thumb_sweeps_negative() {
        let mut s = state(PositionMode::Left);
        let mut bar = ArcBar::new();
        bar.set_bar_region(&s, Vec2::ZERO, VIEW);
        bar.set_round_trick_region(&mut s, Vec2::ZERO, VIEW, 300.0, 2000.0);
        assert!(bar.thumb().sweep_angle() < 0.0);
        assert!(bar.thumb().start_angle() < -150.0);
        assert_eq!(bar.track().start_angle(), -150.0);
        assert_eq!(bar.track().sweep_angle(), -60.0);
    }

    #[test]
    fn thumb_reaches_track_end_at_bottom() {
        let mut s = state(PositionMode::Right);
        let mut bar = ArcBar::new();
        bar.set_bar_region(&s, Vec2::ZERO, VIEW);
        bar.set_round_trick_region(&mut s, Vec2::ZERO, VIEW, 2000.0 - 466.0, 2000.0);
        let end = bar.thumb().start_angle() + bar.thumb().sweep_angle();
        assert!((end - 30.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_track_leaves_thumb_unchanged() {
        let mut s = state(PositionMode::Right);
        let mut bar = ArcBar::new();
        bar.set_bar_region(&s, Vec2::ZERO, VIEW);
        bar.set_round_trick_region(&mut s, Vec2::ZERO, VIEW, 100.0, 2000.0);
        let before = *bar.thumb();
        bar.take_repaint_request();

        s.active_bar_size = s.bar_region_size;
        bar.set_thumb_region(&s);
        assert_eq!(*bar.thumb(), before);
        assert!(!bar.take_repaint_request());

        s.bar_region_size = 0.0;
        bar.set_thumb_region(&s);
        assert_eq!(*bar.thumb(), before);
        assert!(!bar.thumb().start_angle().is_nan());
    }

    #[test]
    fn unchanged_inputs_are_memoized() {
        let mut s = state(PositionMode::Right);
        let mut bar = ArcBar::new();
        bar.set_bar_region(&s, Vec2::ZERO, VIEW);
        bar.set_round_trick_region(&mut s, Vec2::ZERO, VIEW, 100.0, 2000.0);
        assert!(bar.take_repaint_request());
        bar.set_round_trick_region(&mut s, Vec2::ZERO, VIEW, 100.0, 2000.0);
        assert!(!bar.take_repaint_request());
        assert!(!s.needs_adapt_animation);

        bar.set_round_trick_region(&mut s, Vec2::ZERO, VIEW, 100.0, 2400.0);
        assert!(bar.take_repaint_request());
        assert!(s.needs_adapt_animation);
    }

    #[test]
    fn hot_zone_is_wider_than_thumb() {
        let mut s = state(PositionMode::Right);
        let mut bar = ArcBar::new();
        bar.set_bar_region(&s, Vec2::ZERO, VIEW);
        bar.set_round_trick_region(&mut s, Vec2::ZERO, VIEW, 0.0, 2000.0);
        assert_eq!(bar.thumb().width(), 4.0);
        assert_eq!(bar.hot_zone().width(), 24.0);
        assert_eq!(bar.hot_zone().start_angle(), bar.thumb().start_angle());
    }
}
