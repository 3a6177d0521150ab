#[cfg(test)]
mod tests {
    use halo_core::*;

    use crate::arc_list::ArcListState;
    use crate::arc_list_layout::UNSET_SNAP_END_POS;
    use crate::canvas::{DrawCommand, DrawScope};
    use crate::scroll::AnimationState;
    use crate::scroll_bar::{DisplayMode, DragPhase, ScrollBar};

    const VIEW: Size = Size {
        width: 466.0,
        height: 466.0,
    };

    fn build(count: i32, size: Option<f32>, header: Option<f32>) -> (NodeArena, NodeKey) {
        let mut arena = NodeArena::new();
        let list = arena.insert(NodeRole::List, None);
        if let Some(h) = header {
            let node = arena.insert(NodeRole::Header, Some(Size::new(300.0, h)));
            arena.append_child(list, node).unwrap();
        }
        for index in 0..count {
            let node = arena.insert(
                NodeRole::Item {
                    index,
                    is_group: false,
                },
                size.map(|s| Size::new(300.0, s)),
            );
            arena.append_child(list, node).unwrap();
        }
        (arena, list)
    }

    fn touch(clock: &ManualClock, ms: u64, kind: PointerEventKind, p: Vec2) -> PointerEvent {
        clock.advance_ms(ms);
        PointerEvent::touch(kind, p)
    }

    fn centered_item(state: &ArcListState) -> Option<i32> {
        state
            .visible_items()
            .find(|(_, p)| (p.center() - VIEW.height / 2.0).abs() < 1e-2)
            .map(|(i, _)| i)
    }

    fn thumb_point(state: &ArcListState) -> Vec2 {
        let thumb = state
            .scroll_bar()
            .as_arc()
            .map(|a| *a.thumb())
            .unwrap_or_default();
        let mid = (thumb.start_angle() + thumb.sweep_angle() / 2.0).to_radians();
        thumb.center() + Vec2::new(mid.cos(), mid.sin()) * thumb.radius()
    }

    fn settle(state: &mut ArcListState, arena: &NodeArena, clock: &ManualClock) {
        for _ in 0..40 {
            clock.advance_ms(16);
            state.tick(arena).unwrap();
        }
    }

    #[test]
    fn first_layout_rests_on_item_zero() {
        let _clock = ManualClock::install();
        let (arena, list) = build(30, Some(60.0), None);
        let mut state = ArcListState::new(list, VIEW);
        state.layout(&arena).unwrap();

        assert_eq!(centered_item(&state), Some(0));
        assert_eq!(state.scrollable().offset(), -203.0);
        assert_eq!(state.scrollable().bounds(), (-203.0, 1537.0));
        let thumb = state.scroll_bar().as_arc().map(|a| a.thumb().start_angle());
        assert!(thumb.is_some_and(|a| (a + 30.0).abs() < 1e-4));
        assert!(state.take_repaint_request());
        reset_clock();
    }

    #[test]
    fn rtl_mirrors_the_bar() {
        let _clock = ManualClock::install();
        let (arena, list) = build(30, Some(60.0), None);
        let mut state =
            with_text_direction(TextDirection::Rtl, || ArcListState::new(list, VIEW));
        state.layout(&arena).unwrap();
        assert_eq!(state.scroll_bar().position_mode(), PositionMode::Left);
        let thumb = state.scroll_bar().as_arc().map(|a| a.thumb().start_angle());
        assert!(thumb.is_some_and(|a| (a + 150.0).abs() < 1e-4));
        reset_clock();
    }

    #[test]
    fn density_scales_the_default_item_size() {
        let _clock = ManualClock::install();
        let (arena, list) = build(10, None, None);
        let mut state = with_density(Density { scale: 2.0 }, || ArcListState::new(list, VIEW));
        state.layout(&arena).unwrap();
        let first = state.algorithm().item_positions().get(&0).map(|p| p.size());
        assert_eq!(first, Some(120.0));
        reset_clock();
    }

    #[test]
    fn content_drag_follows_the_finger() {
        let clock = ManualClock::install();
        let (arena, list) = build(30, Some(60.0), None);
        let mut state = ArcListState::new(list, VIEW);
        state.layout(&arena).unwrap();

        let at = |y| Vec2::new(233.0, y);
        state
            .handle_pointer(&arena, &touch(&clock, 0, PointerEventKind::Down, at(300.0)))
            .unwrap();
        state
            .handle_pointer(&arena, &touch(&clock, 16, PointerEventKind::Move, at(290.0)))
            .unwrap();
        state
            .handle_pointer(&arena, &touch(&clock, 16, PointerEventKind::Move, at(190.0)))
            .unwrap();
        assert_eq!(state.scrollable().offset(), -103.0);
        assert_eq!(state.scrollable().animation_state(), AnimationState::Scroll);
        reset_clock();
    }

    #[test]
    fn fling_settles_with_an_item_centered() {
        let clock = ManualClock::install();
        let (arena, list) = build(30, Some(60.0), None);
        let mut state = ArcListState::new(list, VIEW);
        state.layout(&arena).unwrap();

        let at = |y| Vec2::new(233.0, y);
        state
            .handle_pointer(&arena, &touch(&clock, 0, PointerEventKind::Down, at(300.0)))
            .unwrap();
        state
            .handle_pointer(&arena, &touch(&clock, 10, PointerEventKind::Move, at(280.0)))
            .unwrap();
        for step in 1..=4 {
            let y = 280.0 - 20.0 * step as f32;
            state
                .handle_pointer(&arena, &touch(&clock, 10, PointerEventKind::Move, at(y)))
                .unwrap();
        }
        state
            .handle_pointer(&arena, &touch(&clock, 5, PointerEventKind::Up, at(200.0)))
            .unwrap();
        assert_eq!(state.scrollable().animation_state(), AnimationState::Snap);
        assert_eq!(state.scrollable().settle_target(), Some(877.0));

        settle(&mut state, &arena, &clock);
        assert_eq!(state.scrollable().animation_state(), AnimationState::Idle);
        assert!((state.scrollable().offset() - 877.0).abs() < 1e-2);
        assert_eq!(centered_item(&state), Some(18));
        assert_eq!(
            state.algorithm().predict_snap_end_position(),
            UNSET_SNAP_END_POS
        );
        reset_clock();
    }

    #[test]
    fn overscroll_springs_back_to_the_first_item() {
        let clock = ManualClock::install();
        let (arena, list) = build(30, Some(60.0), Some(30.0));
        let mut state = ArcListState::new(list, VIEW);
        state.layout(&arena).unwrap();
        let header = state.header_position();
        assert_eq!(header, Some(173.0));

        let at = |y| Vec2::new(233.0, y);
        state
            .handle_pointer(&arena, &touch(&clock, 0, PointerEventKind::Down, at(300.0)))
            .unwrap();
        state
            .handle_pointer(&arena, &touch(&clock, 16, PointerEventKind::Move, at(310.0)))
            .unwrap();
        state
            .handle_pointer(&arena, &touch(&clock, 16, PointerEventKind::Move, at(410.0)))
            .unwrap();
        assert_eq!(state.scrollable().offset(), -253.0);
        assert!(state.scroll_bar().state().out_boundary > 0.0);
        assert_eq!(state.header_position(), Some(223.0));

        state
            .handle_pointer(&arena, &touch(&clock, 300, PointerEventKind::Up, at(410.0)))
            .unwrap();
        assert_eq!(state.scrollable().animation_state(), AnimationState::Spring);

        settle(&mut state, &arena, &clock);
        assert_eq!(state.scrollable().offset(), -203.0);
        assert_eq!(centered_item(&state), Some(0));
        assert_eq!(state.header_position(), header);
        reset_clock();
    }

    #[test]
    fn layout_without_fling_reads_unset_end_position() {
        let _clock = ManualClock::install();
        let (arena, list) = build(30, Some(60.0), None);
        let mut state = ArcListState::new(list, VIEW);
        state.layout(&arena).unwrap();
        state.scroll_by(&arena, 45.0).unwrap();
        assert_eq!(
            state.algorithm().predict_snap_end_position(),
            UNSET_SNAP_END_POS
        );
        reset_clock();
    }

    #[test]
    fn full_thumb_drag_reaches_content_end() {
        let clock = ManualClock::install();
        let (arena, list) = build(30, Some(60.0), None);
        let mut state = ArcListState::new(list, VIEW);
        state.layout(&arena).unwrap();

        let p = thumb_point(&state);
        assert!(state.scroll_bar().in_bar_touch_region(p));
        state
            .handle_pointer(&arena, &touch(&clock, 0, PointerEventKind::Down, p))
            .unwrap();
        assert!(state.scroll_bar().state().is_pressed);
        state
            .handle_pointer(
                &arena,
                &touch(&clock, 16, PointerEventKind::Move, p + Vec2::new(0.0, 10.0)),
            )
            .unwrap();
        assert_eq!(state.scroll_bar().state().drag_phase, DragPhase::Dragging);
        state
            .handle_pointer(
                &arena,
                &touch(&clock, 16, PointerEventKind::Move, p + Vec2::new(0.0, 1010.0)),
            )
            .unwrap();
        assert!((state.scrollable().offset() - 1537.0).abs() < 1e-2);

        state
            .handle_pointer(
                &arena,
                &touch(&clock, 16, PointerEventKind::Up, p + Vec2::new(0.0, 1010.0)),
            )
            .unwrap();
        assert_eq!(state.scroll_bar().state().drag_phase, DragPhase::Idle);
        assert!(!state.scroll_bar().state().is_pressed);
        assert!((state.scrollable().offset() - 1537.0).abs() < 1e-2);
        assert_eq!(centered_item(&state), Some(29));
        let end = state
            .scroll_bar()
            .as_arc()
            .map(|a| a.thumb().end_angle())
            .unwrap_or_default();
        assert!((end - 30.0).abs() < 1e-2);
        reset_clock();
    }

    #[test]
    fn mouse_hover_grows_the_thumb() {
        let clock = ManualClock::install();
        let (arena, list) = build(30, Some(60.0), None);
        let mut state = ArcListState::new(list, VIEW);
        state.set_display_mode(DisplayMode::On);
        state.layout(&arena).unwrap();
        assert_eq!(state.overlay().foreground_width(), Some(4.0));

        let p = thumb_point(&state);
        state
            .handle_pointer(&arena, &PointerEvent::mouse(PointerEventKind::Move, p))
            .unwrap();
        assert!(state.scroll_bar().state().is_hover);
        clock.advance_ms(16);
        state.tick(&arena).unwrap();
        let early = state.overlay().foreground_width().unwrap_or_default();
        assert!(early > 4.0 && early < 8.0, "{early}");

        // Further motion over the thumb leaves the grow running.
        clock.advance_ms(1);
        state
            .handle_pointer(&arena, &PointerEvent::mouse(PointerEventKind::Move, p))
            .unwrap();
        assert_eq!(state.overlay().foreground_width(), Some(early));
        clock.advance_ms(200);
        state.tick(&arena).unwrap();
        assert_eq!(state.overlay().foreground_width(), Some(8.0));

        state
            .handle_pointer(&arena, &PointerEvent::mouse(PointerEventKind::Leave, p))
            .unwrap();
        clock.advance_ms(300);
        state.tick(&arena).unwrap();
        assert_eq!(state.overlay().foreground_width(), Some(4.0));
        reset_clock();
    }

    #[test]
    fn scroll_to_index_centers_the_item() {
        let _clock = ManualClock::install();
        let (arena, list) = build(30, Some(60.0), None);
        let mut state = ArcListState::new(list, VIEW);
        state.layout(&arena).unwrap();
        state.scroll_to_index(&arena, 12).unwrap();
        assert_eq!(centered_item(&state), Some(12));
        assert!(state.scroll_to_index(&arena, 30).is_err());
        reset_clock();
    }

    #[test]
    fn paint_draws_track_then_thumb() {
        let _clock = ManualClock::install();
        let (arena, list) = build(30, Some(60.0), None);
        let mut state = ArcListState::new(list, VIEW);
        state.set_display_mode(DisplayMode::On);
        state.layout(&arena).unwrap();

        let mut scope = DrawScope::new(VIEW);
        assert!(state.paint(&mut scope));
        let sweeps: Vec<f32> = scope
            .arcs()
            .filter_map(|c| match c {
                DrawCommand::Arc { sweep_angle, .. } => Some(*sweep_angle),
                _ => None,
            })
            .collect();
        assert_eq!(sweeps.len(), 2);
        assert_eq!(sweeps[0], 60.0);
        assert!(sweeps[1] > 0.0 && sweeps[1] < 60.0);

        state.set_display_mode(DisplayMode::Off);
        scope.clear();
        assert!(!state.paint(&mut scope));
        assert!(scope.commands.is_empty());
        reset_clock();
    }

    #[test]
    fn linear_bar_paints_rounded_rects() {
        let _clock = ManualClock::install();
        let (arena, list) = build(30, Some(60.0), None);
        let mut state = ArcListState::new(list, VIEW);
        state.set_scroll_bar(ScrollBar::linear(ArcScrollBarTheme::default()));
        state.layout(&arena).unwrap();

        let mut scope = DrawScope::new(VIEW);
        assert!(state.paint(&mut scope));
        let radii: Vec<f32> = scope
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![2.0, 2.0]);
        reset_clock();
    }

    #[test]
    fn removed_list_reports_missing_node() {
        let _clock = ManualClock::install();
        let (mut arena, list) = build(3, Some(60.0), None);
        let mut state = ArcListState::new(list, VIEW);
        arena.remove(list);
        assert_eq!(
            state.layout(&arena),
            Err(HaloError::MissingNode("list"))
        );
        reset_clock();
    }
}
