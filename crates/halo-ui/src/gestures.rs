use halo_core::*;
use web_time::{Duration, Instant};

/// Vertical drag with release velocity, fed raw pointer events.
pub struct DragRecognizer {
    touch_slop: f32,

    // Internal state
    down: Option<Vec2>,
    dragging: bool,
    last: Option<(Instant, Vec2)>,
    velocity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    Start { position: Vec2 },
    /// `delta` is the main-axis movement since the previous event.
    Update { position: Vec2, delta: f32 },
    /// px/s along the main axis, positive downward.
    End { velocity: f32 },
    Cancel,
}

const VELOCITY_SMOOTHING: f32 = 0.8;
const STALE_MOVE: Duration = Duration::from_millis(100);

impl Default for DragRecognizer {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl DragRecognizer {
    pub fn new(touch_slop: f32) -> Self {
        Self {
            touch_slop,
            down: None,
            dragging: false,
            last: None,
            velocity: 0.0,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_pressed(&self) -> bool {
        self.down.is_some()
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<DragEvent> {
        match event.event {
            PointerEventKind::Down => {
                self.down = Some(event.position);
                self.dragging = false;
                self.last = Some((event.timestamp, event.position));
                self.velocity = 0.0;
                None
            }
            PointerEventKind::Move => {
                let start = self.down?;
                let (last_t, last_p) = self.last?;
                if !self.dragging {
                    if (event.position.y - start.y).abs() < self.touch_slop {
                        return None;
                    }
                    self.dragging = true;
                    self.last = Some((event.timestamp, event.position));
                    log::trace!("drag start at {:?}", event.position);
                    return Some(DragEvent::Start {
                        position: event.position,
                    });
                }
                let delta = event.position.y - last_p.y;
                let dt = event.timestamp.saturating_duration_since(last_t).as_secs_f32();
                if dt > 0.0 {
                    let sample = delta / dt;
                    self.velocity =
                        (1.0 - VELOCITY_SMOOTHING) * self.velocity + VELOCITY_SMOOTHING * sample;
                }
                self.last = Some((event.timestamp, event.position));
                Some(DragEvent::Update {
                    position: event.position,
                    delta,
                })
            }
            PointerEventKind::Up => {
                let was_dragging = std::mem::take(&mut self.dragging);
                self.down = None;
                let last = self.last.take();
                if !was_dragging {
                    return None;
                }
                let stale = last.is_some_and(|(t, _)| {
                    event.timestamp.saturating_duration_since(t) > STALE_MOVE
                });
                let velocity = if stale { 0.0 } else { self.velocity };
                log::trace!("drag end, velocity {velocity:.0}");
                Some(DragEvent::End { velocity })
            }
            PointerEventKind::Cancel => {
                let was_dragging = std::mem::take(&mut self.dragging);
                self.down = None;
                self.last = None;
                was_dragging.then_some(DragEvent::Cancel)
            }
            PointerEventKind::Enter | PointerEventKind::Leave => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(clock: &ManualClock, ms: u64, kind: PointerEventKind, y: f32) -> PointerEvent {
        clock.advance_ms(ms);
        PointerEvent::touch(kind, Vec2::new(200.0, y))
    }

    #[test]
    fn slop_gates_the_drag() {
        let clock = ManualClock::install();
        let mut d = DragRecognizer::default();
        assert_eq!(d.handle_pointer(&at(&clock, 0, PointerEventKind::Down, 300.0)), None);
        assert_eq!(d.handle_pointer(&at(&clock, 16, PointerEventKind::Move, 295.0)), None);
        assert!(matches!(
            d.handle_pointer(&at(&clock, 16, PointerEventKind::Move, 290.0)),
            Some(DragEvent::Start { .. })
        ));
        assert_eq!(
            d.handle_pointer(&at(&clock, 16, PointerEventKind::Move, 270.0)),
            Some(DragEvent::Update {
                position: Vec2::new(200.0, 270.0),
                delta: -20.0
            })
        );
        reset_clock();
    }

    #[test]
    fn release_reports_velocity() {
        let clock = ManualClock::install();
        let mut d = DragRecognizer::default();
        d.handle_pointer(&at(&clock, 0, PointerEventKind::Down, 300.0));
        d.handle_pointer(&at(&clock, 10, PointerEventKind::Move, 280.0));
        for step in 1..=4 {
            d.handle_pointer(&at(&clock, 10, PointerEventKind::Move, 280.0 - 20.0 * step as f32));
        }
        let Some(DragEvent::End { velocity }) =
            d.handle_pointer(&at(&clock, 5, PointerEventKind::Up, 200.0))
        else {
            panic!("expected drag end");
        };
        assert!((velocity + 2000.0).abs() < 5.0, "{velocity}");
        reset_clock();
    }

    #[test]
    fn pause_before_release_drops_velocity() {
        let clock = ManualClock::install();
        let mut d = DragRecognizer::default();
        d.handle_pointer(&at(&clock, 0, PointerEventKind::Down, 300.0));
        d.handle_pointer(&at(&clock, 10, PointerEventKind::Move, 280.0));
        d.handle_pointer(&at(&clock, 10, PointerEventKind::Move, 260.0));
        assert_eq!(
            d.handle_pointer(&at(&clock, 300, PointerEventKind::Up, 260.0)),
            Some(DragEvent::End { velocity: 0.0 })
        );
        reset_clock();
    }

    #[test]
    fn tap_is_not_a_drag() {
        let clock = ManualClock::install();
        let mut d = DragRecognizer::default();
        d.handle_pointer(&at(&clock, 0, PointerEventKind::Down, 300.0));
        assert_eq!(d.handle_pointer(&at(&clock, 50, PointerEventKind::Up, 302.0)), None);
        assert_eq!(d.handle_pointer(&at(&clock, 50, PointerEventKind::Cancel, 302.0)), None);
        reset_clock();
    }
}
