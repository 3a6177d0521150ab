//! Drives an arc list without a window: a drag, a fling that snaps to an
//! item, then a jump back to the top. Run with
//! `RUST_LOG=info cargo run -p arc_list_demo`.

use anyhow::Context;
use halo_core::*;
use halo_ui::{ArcListState, DrawCommand, DrawScope};

const VIEWPORT: Size = Size {
    width: 466.0,
    height: 466.0,
};
const FRAME_MS: u64 = 16;

fn build_list(items: i32) -> anyhow::Result<(NodeArena, NodeKey)> {
    let mut arena = NodeArena::new();
    let list = arena.insert(NodeRole::List, None);
    let header = arena.insert(NodeRole::Header, Some(Size::new(300.0, 40.0)));
    arena.append_child(list, header)?;
    for index in 0..items {
        // Every fifth row is a taller group title.
        let is_group = index % 5 == 0;
        let height = if is_group { 80.0 } else { 60.0 };
        let node = arena.insert(
            NodeRole::Item { index, is_group },
            Some(Size::new(300.0, height)),
        );
        arena.append_child(list, node)?;
    }
    Ok((arena, list))
}

fn report(state: &ArcListState, label: &str) {
    let centered = state
        .visible_items()
        .min_by(|(_, a), (_, b)| {
            let da = (a.center() - VIEWPORT.height / 2.0).abs();
            let db = (b.center() - VIEWPORT.height / 2.0).abs();
            da.total_cmp(&db)
        })
        .map(|(index, _)| index);
    log::info!(
        "{label}: offset {:.1}, centered item {:?}, header {:?}",
        state.scrollable().offset(),
        centered,
        state.header_position(),
    );
}

fn send(
    state: &mut ArcListState,
    arena: &NodeArena,
    clock: &ManualClock,
    kind: PointerEventKind,
    position: Vec2,
) -> anyhow::Result<()> {
    clock.advance_ms(FRAME_MS);
    state.handle_pointer(arena, &PointerEvent::touch(kind, position))?;
    Ok(())
}

fn run_frames(
    state: &mut ArcListState,
    arena: &NodeArena,
    clock: &ManualClock,
) -> anyhow::Result<usize> {
    let mut frames = 0;
    while frames < 600 {
        clock.advance_ms(FRAME_MS);
        frames += 1;
        if !state.tick(arena)? {
            break;
        }
    }
    Ok(frames)
}

fn paint(state: &ArcListState) {
    let mut scope = DrawScope::new(VIEWPORT);
    if !state.paint(&mut scope) {
        log::info!("scroll bar hidden");
        return;
    }
    for command in &scope.commands {
        match command {
            DrawCommand::Arc {
                start_angle,
                sweep_angle,
                pen,
                ..
            } => log::info!(
                "arc start {start_angle:.1} sweep {sweep_angle:.1} width {:.1}",
                pen.width
            ),
            other => log::info!("{other:?}"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let clock = ManualClock::install();

    let (arena, list) = build_list(40).context("building list nodes")?;
    let mut state = ArcListState::new(list, VIEWPORT);
    state
        .scrollable()
        .state_signal()
        .subscribe(|s| log::debug!("scroll state -> {s:?}"));
    state.layout(&arena)?;
    report(&state, "initial");
    paint(&state);

    // Slow drag up by 120px.
    let x = VIEWPORT.width / 2.0;
    send(&mut state, &arena, &clock, PointerEventKind::Down, Vec2::new(x, 300.0))?;
    for step in 1..=6 {
        let y = 300.0 - 20.0 * step as f32;
        send(&mut state, &arena, &clock, PointerEventKind::Move, Vec2::new(x, y))?;
    }
    send(&mut state, &arena, &clock, PointerEventKind::Up, Vec2::new(x, 180.0))?;
    let frames = run_frames(&mut state, &arena, &clock)?;
    report(&state, &format!("after drag ({frames} frames)"));

    // Quick flick.
    send(&mut state, &arena, &clock, PointerEventKind::Down, Vec2::new(x, 320.0))?;
    for step in 1..=5 {
        let y = 320.0 - 40.0 * step as f32;
        send(&mut state, &arena, &clock, PointerEventKind::Move, Vec2::new(x, y))?;
    }
    send(&mut state, &arena, &clock, PointerEventKind::Up, Vec2::new(x, 120.0))?;
    let frames = run_frames(&mut state, &arena, &clock)?;
    report(&state, &format!("after fling ({frames} frames)"));
    paint(&state);

    state.scroll_to_index(&arena, 0)?;
    report(&state, "back to top");

    reset_clock();
    Ok(())
}
