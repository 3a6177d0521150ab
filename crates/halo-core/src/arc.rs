//! # Arc geometry
//!
//! Round displays draw their scroll bars as ring segments rather than
//! rectangles. `ArcRound` describes one such segment: a circle `center`, a
//! stroke `radius` measured to the middle of the stroke, a `start_angle` and a
//! signed `sweep_angle` in degrees, and a stroke `width`.
//!
//! Angles follow screen conventions: 0° points right, positive angles turn
//! clockwise (y grows downward). A right-hand track straddles 0°
//! (`-30° .. 30°`), a left-hand track is its mirror image around the vertical
//! axis and is swept with a negative angle (`-150° .. -210°`).
//!
//! ```rust
//! use halo_core::*;
//!
//! let track = ArcRound::new(Vec2::new(100.0, 100.0), 90.0, -30.0, 60.0, 8.0);
//! assert!(track.contains_point(Vec2::new(194.0, 100.0), PositionMode::Right));
//! assert!(!track.contains_point(Vec2::new(100.0, 100.0), PositionMode::Right));
//! ```

use crate::error::{HaloError, Result};
use crate::{Color, Rect, Vec2, near_zero};

pub const STRAIGHT_ANGLE: f32 = 180.0;
pub const FULL_ANGLE: f32 = 360.0;

/// Which screen edge a scroll bar hugs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionMode {
    #[default]
    Right,
    /// Mirrored track: sweep direction flips.
    Left,
    /// Only meaningful for linear bars; arcs treat it as `Right`.
    Bottom,
}

/// Folds a negative angle (degrees) into `[0, 360)`.
pub fn normalize_angle(angle: f32) -> f32 {
    if angle < 0.0 { angle + FULL_ANGLE } else { angle }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArcRound {
    center: Vec2,
    radius: f32,
    start_angle: f32,
    sweep_angle: f32,
    width: f32,
    outer_radius: f32,
    color: Color,
}

impl ArcRound {
    pub fn new(center: Vec2, radius: f32, start_angle: f32, sweep_angle: f32, width: f32) -> Self {
        Self {
            center,
            radius,
            start_angle,
            sweep_angle,
            width,
            outer_radius: radius + width / 2.0,
            color: Color::TRANSPARENT,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }
    pub fn radius(&self) -> f32 {
        self.radius
    }
    pub fn start_angle(&self) -> f32 {
        self.start_angle
    }
    pub fn sweep_angle(&self) -> f32 {
        self.sweep_angle
    }
    pub fn end_angle(&self) -> f32 {
        self.start_angle + self.sweep_angle
    }
    pub fn width(&self) -> f32 {
        self.width
    }
    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }
    pub fn color(&self) -> Color {
        self.color
    }

    /// A near-zero sweep describes an empty sector.
    pub fn is_valid(&self) -> bool {
        !near_zero(self.sweep_angle)
    }

    /// Valid and carrying a non-transparent color.
    pub fn is_visible(&self) -> bool {
        self.is_valid() && !self.color.is_transparent()
    }

    /// Bounding square of the stroke centerline, as drawing backends expect.
    pub fn bounds(&self) -> Rect {
        Rect::around(self.center, self.radius)
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn set_start_angle(&mut self, angle: f32) {
        self.start_angle = angle;
    }

    pub fn set_sweep_angle(&mut self, angle: f32) {
        self.sweep_angle = angle;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn try_set_radius(&mut self, radius: f32) -> Result<()> {
        let outer = radius + self.width / 2.0;
        if radius < 0.0 || outer < 0.0 {
            return Err(HaloError::InvalidRange {
                what: "arc radius",
                value: radius,
            });
        }
        self.radius = radius;
        self.outer_radius = outer;
        Ok(())
    }

    pub fn try_set_width(&mut self, width: f32) -> Result<()> {
        if width < 0.0 {
            return Err(HaloError::InvalidRange {
                what: "arc width",
                value: width,
            });
        }
        self.width = width;
        self.outer_radius = self.radius + width / 2.0;
        Ok(())
    }

    /// Rejected values are logged and the previous radius is kept.
    pub fn set_radius(&mut self, radius: f32) {
        if let Err(e) = self.try_set_radius(radius) {
            log::warn!("ArcRound::set_radius ignored: {e}");
        }
    }

    /// Rejected values are logged and the previous width is kept.
    pub fn set_width(&mut self, width: f32) {
        if let Err(e) = self.try_set_width(width) {
            log::warn!("ArcRound::set_width ignored: {e}");
        }
    }

    /// Ring-segment hit test, inclusive on every boundary.
    ///
    /// For `PositionMode::Left` the end angle is wrapped past -180°, all three
    /// angles are folded into `[0, 360)` and the comparison runs from the end
    /// bound up to the start bound, because the mirrored track sweeps
    /// counter-clockwise.
    pub fn contains_point(&self, point: Vec2, mode: PositionMode) -> bool {
        let d = point - self.center;
        let distance = d.length();
        if distance > self.outer_radius || distance < self.outer_radius - self.width {
            return false;
        }

        let angle = d.y.atan2(d.x).to_degrees();
        let start = self.start_angle;
        let mut end = self.start_angle + self.sweep_angle;

        match mode {
            PositionMode::Left => {
                if end < -STRAIGHT_ANGLE {
                    end += FULL_ANGLE;
                }
                let start = normalize_angle(start);
                let end = normalize_angle(end);
                let angle = normalize_angle(angle);
                !(angle < end || angle > start)
            }
            PositionMode::Right | PositionMode::Bottom => !(angle < start || angle > end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polar(center: Vec2, r: f32, deg: f32) -> Vec2 {
        let rad = deg.to_radians();
        Vec2::new(center.x + r * rad.cos(), center.y + r * rad.sin())
    }

    #[test]
    fn outer_radius_is_derived() {
        let arc = ArcRound::new(Vec2::ZERO, 100.0, -30.0, 60.0, 10.0);
        assert_eq!(arc.outer_radius(), 105.0);
    }

    #[test]
    fn radial_bounds_are_inclusive() {
        let c = Vec2::new(0.0, 0.0);
        let arc = ArcRound::new(c, 100.0, -30.0, 60.0, 10.0);
        assert!(arc.contains_point(Vec2::new(105.0, 0.0), PositionMode::Right));
        assert!(arc.contains_point(Vec2::new(95.0, 0.0), PositionMode::Right));
        assert!(!arc.contains_point(Vec2::new(105.1, 0.0), PositionMode::Right));
        assert!(!arc.contains_point(Vec2::new(94.9, 0.0), PositionMode::Right));
    }

    #[test]
    fn right_track_angular_bounds() {
        let c = Vec2::new(50.0, 50.0);
        let arc = ArcRound::new(c, 100.0, -30.0, 60.0, 10.0);
        assert!(arc.contains_point(polar(c, 100.0, -29.9), PositionMode::Right));
        assert!(arc.contains_point(polar(c, 100.0, 29.9), PositionMode::Right));
        assert!(!arc.contains_point(polar(c, 100.0, -30.2), PositionMode::Right));
        assert!(!arc.contains_point(polar(c, 100.0, 30.2), PositionMode::Right));
        assert!(!arc.contains_point(polar(c, 100.0, 180.0), PositionMode::Right));
    }

    #[test]
    fn mirrored_track_uses_swapped_comparison() {
        let c = Vec2::new(0.0, 0.0);
        // -150° sweeping -60° ends at -210°, which wraps to 150°.
        let arc = ArcRound::new(c, 100.0, -150.0, -60.0, 10.0);
        assert!(arc.contains_point(polar(c, 100.0, 180.0), PositionMode::Left));
        assert!(arc.contains_point(polar(c, 100.0, 150.1), PositionMode::Left));
        assert!(arc.contains_point(polar(c, 100.0, -150.1), PositionMode::Left));
        assert!(!arc.contains_point(polar(c, 100.0, 149.8), PositionMode::Left));
        assert!(!arc.contains_point(polar(c, 100.0, -149.8), PositionMode::Left));
        assert!(!arc.contains_point(polar(c, 100.0, 0.0), PositionMode::Left));
    }

    #[test]
    fn angular_bounds_are_inclusive_in_both_modes() {
        let c = Vec2::ZERO;
        let up = Vec2::new(0.0, -100.0);
        let down = Vec2::new(0.0, 100.0);
        let left = Vec2::new(-100.0, 0.0);

        let right = ArcRound::new(c, 100.0, -90.0, 180.0, 10.0);
        assert!(right.contains_point(up, PositionMode::Right));
        assert!(right.contains_point(down, PositionMode::Right));
        assert!(!right.contains_point(left, PositionMode::Right));

        // Folds to [180, 270].
        let mirrored = ArcRound::new(c, 100.0, -90.0, -90.0, 10.0);
        assert!(mirrored.contains_point(up, PositionMode::Left));
        assert!(mirrored.contains_point(left, PositionMode::Left));
        assert!(!mirrored.contains_point(down, PositionMode::Left));
        assert!(!mirrored.contains_point(Vec2::new(100.0, 0.0), PositionMode::Left));
    }

    #[test]
    fn mirrored_thumb_across_straight_angle() {
        let c = Vec2::new(0.0, 0.0);
        // Ends at -184°, wrapped to 176°: the thumb covers [176, 190] folded.
        let thumb = ArcRound::new(c, 100.0, -170.0, -14.0, 10.0);
        assert!(thumb.contains_point(polar(c, 100.0, 180.0), PositionMode::Left));
        assert!(thumb.contains_point(polar(c, 100.0, 178.0), PositionMode::Left));
        assert!(thumb.contains_point(polar(c, 100.0, -175.0), PositionMode::Left));
        assert!(!thumb.contains_point(polar(c, 100.0, 175.5), PositionMode::Left));
        assert!(!thumb.contains_point(polar(c, 100.0, -168.5), PositionMode::Left));
        assert!(!thumb.contains_point(polar(c, 100.0, -90.0), PositionMode::Left));
    }

    #[test]
    fn zero_sweep_is_invalid() {
        let arc = ArcRound::new(Vec2::ZERO, 10.0, 0.0, 0.0005, 2.0);
        assert!(!arc.is_valid());
        assert!(ArcRound::new(Vec2::ZERO, 10.0, 0.0, 1.0, 2.0).is_valid());
    }

    #[test]
    fn transparent_arc_is_hidden_but_still_hit() {
        let arc = ArcRound::new(Vec2::ZERO, 100.0, -30.0, 60.0, 10.0);
        assert!(!arc.is_visible());
        assert!(arc.contains_point(Vec2::new(100.0, 0.0), PositionMode::Right));
        assert!(arc.with_color(Color::WHITE).is_visible());
    }

    #[test]
    fn negative_width_keeps_previous_value() {
        let mut arc = ArcRound::new(Vec2::ZERO, 100.0, -30.0, 60.0, 10.0);
        arc.set_width(-4.0);
        assert_eq!(arc.width(), 10.0);
        assert_eq!(arc.outer_radius(), 105.0);
        assert!(arc.try_set_radius(-1.0).is_err());
        arc.set_width(20.0);
        assert_eq!(arc.outer_radius(), 110.0);
    }

    #[test]
    fn normalize_only_touches_negatives() {
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(45.0), 45.0);
        assert_eq!(normalize_angle(0.0), 0.0);
    }
}
