use crate::{Color, Rect};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrokeCap {
    Butt,
    #[default]
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Source over destination.
    #[default]
    SrcOver,
    Src,
}

/// Stroke configuration for one draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcPen {
    pub color: Color,
    pub width: f32,
    pub cap: StrokeCap,
    pub blend: BlendMode,
}

impl ArcPen {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            cap: StrokeCap::Round,
            blend: BlendMode::SrcOver,
        }
    }
}

/// What a drawing backend must offer to paint scroll bars.
///
/// `bounds` is the square around the stroke centerline; angles are degrees,
/// clockwise from 3 o'clock.
pub trait ArcCanvas {
    fn draw_arc(&mut self, bounds: Rect, start_angle: f32, sweep_angle: f32, pen: &ArcPen);

    fn draw_rect(&mut self, rect: Rect, color: Color, radius: f32);
}
