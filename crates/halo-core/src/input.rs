use web_time::Instant;

use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Up,
    Move,
    Cancel,
    /// Mouse entered the widget without a press.
    Enter,
    Leave,
}

#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerKind,
    pub event: PointerEventKind,
    pub position: Vec2,
    pub timestamp: Instant,
}

impl PointerEvent {
    /// Touch event stamped with the animation clock.
    pub fn touch(event: PointerEventKind, position: Vec2) -> Self {
        Self {
            id: PointerId(0),
            kind: PointerKind::Touch,
            event,
            position,
            timestamp: crate::animation::now(),
        }
    }

    pub fn mouse(event: PointerEventKind, position: Vec2) -> Self {
        Self {
            kind: PointerKind::Mouse,
            ..Self::touch(event, position)
        }
    }
}
