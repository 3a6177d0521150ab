use halo_core::*;

/// Records draw calls so a host renderer can replay them, and so tests can
/// inspect what a widget painted.
#[derive(Default)]
pub struct DrawScope {
    pub commands: Vec<DrawCommand>,
    pub size: Size,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Arc {
        bounds: Rect,
        start_angle: f32,
        sweep_angle: f32,
        pen: ArcPen,
    },
    Rect {
        rect: Rect,
        color: Color,
        radius: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
}

impl DrawScope {
    pub fn new(size: Size) -> Self {
        Self {
            commands: Vec::new(),
            size,
        }
    }

    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn arcs(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Arc { .. }))
    }
}

impl ArcCanvas for DrawScope {
    fn draw_arc(&mut self, bounds: Rect, start_angle: f32, sweep_angle: f32, pen: &ArcPen) {
        self.commands.push(DrawCommand::Arc {
            bounds,
            start_angle,
            sweep_angle,
            pen: *pen,
        });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color, radius: f32) {
        self.commands.push(DrawCommand::Rect {
            rect,
            color,
            radius,
        });
    }
}
