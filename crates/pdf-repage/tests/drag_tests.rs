use pdf_repage::*;
use std::collections::BTreeSet;

fn grid(item_count: usize) -> ThumbnailGrid {
    ThumbnailGrid {
        columns: 4,
        cell_width: 100.0,
        cell_height: 150.0,
        viewport_width: 400.0,
        viewport_height: 450.0,
        scroll_offset: 0.0,
        item_count,
    }
}

/// Centre of the cell showing `position`
fn cell(position: usize) -> Point {
    Point::new(
        (position % 4) as f32 * 100.0 + 50.0,
        (position / 4) as f32 * 150.0 + 75.0,
    )
}

fn setup(len: usize, selected: &[usize]) -> (PageSequence, SelectionModel) {
    let sequence = PageSequence::from_refs((0..len).map(PageRef)).unwrap();
    let mut selection = SelectionModel::new(len);
    for &position in selected {
        selection.toggle(position).unwrap();
    }
    (sequence, selection)
}

#[test]
fn test_drag_selected_block_onto_later_position() {
    let (mut seq, mut sel) = setup(10, &[2, 3]);
    let mut engine = DragReorderEngine::new();
    let g = grid(10);

    engine
        .on_press(2, cell(2), Modifiers::NONE, &mut sel)
        .unwrap();
    assert!(matches!(engine.state(), DragState::Armed { pressed: 2, .. }));

    let feedback = engine.on_move(cell(7), &g);
    assert!(feedback.started);
    assert_eq!(feedback.target, Some(7));
    assert!(feedback.target_changed);

    let again = engine.on_move(Point::new(cell(7).x + 3.0, cell(7).y), &g);
    assert!(!again.target_changed);

    let outcome = engine.on_release(cell(7), &g, &mut seq, &mut sel).unwrap();
    assert_eq!(outcome, DragOutcome::Moved { range: 5..7 });
    assert_eq!(seq.get(5), Some(PageRef(2)));
    assert_eq!(seq.get(6), Some(PageRef(3)));
    assert_eq!(sel.positions(), &[5, 6].into_iter().collect::<BTreeSet<_>>());
    assert_eq!(sel.anchor(), Some(5));
    assert_eq!(engine.state(), DragState::Idle);
}

#[test]
fn test_click_on_selected_collapses_selection() {
    let (mut seq, mut sel) = setup(6, &[1, 2, 4]);
    let mut engine = DragReorderEngine::new();

    engine
        .on_press(2, cell(2), Modifiers::NONE, &mut sel)
        .unwrap();
    assert_eq!(sel.count(), 3);

    let outcome = engine
        .on_release(cell(2), &grid(6), &mut seq, &mut sel)
        .unwrap();
    assert_eq!(outcome, DragOutcome::Collapsed { position: 2 });
    assert_eq!(sel.positions(), &[2].into_iter().collect::<BTreeSet<_>>());
    assert_eq!(seq.refs(), (0..6).map(PageRef).collect::<Vec<_>>().as_slice());
}

#[test]
fn test_release_outside_viewport_cancels() {
    let (mut seq, mut sel) = setup(8, &[0]);
    let mut engine = DragReorderEngine::new();
    let g = grid(8);

    engine.on_press(0, cell(0), Modifiers::NONE, &mut sel).unwrap();
    engine.on_move(cell(5), &g);
    let outcome = engine
        .on_release(Point::new(500.0, 100.0), &g, &mut seq, &mut sel)
        .unwrap();

    assert_eq!(outcome, DragOutcome::Cancelled);
    assert_eq!(seq.refs(), (0..8).map(PageRef).collect::<Vec<_>>().as_slice());
    assert!(sel.contains(0));
    assert!(!engine.is_dragging());
}

#[test]
fn test_release_after_sequence_emptied_cancels() {
    let (seq, mut sel) = setup(4, &[1]);
    let mut engine = DragReorderEngine::new();

    engine.on_press(1, cell(1), Modifiers::NONE, &mut sel).unwrap();
    engine.on_move(cell(3), &grid(4));

    let mut empty = PageSequence::new();
    let outcome = engine
        .on_release(cell(3), &grid(4), &mut empty, &mut sel)
        .unwrap();
    assert_eq!(outcome, DragOutcome::Cancelled);
    assert_eq!(seq.len(), 4);
}

#[test]
fn test_modifier_press_never_arms() {
    let (_, mut sel) = setup(6, &[1]);
    let mut engine = DragReorderEngine::new();

    let toggle = Modifiers {
        toggle: true,
        range: false,
    };
    engine.on_press(1, cell(1), toggle, &mut sel).unwrap();
    assert_eq!(engine.state(), DragState::Idle);
    assert!(sel.is_empty());

    engine.on_press(3, cell(3), Modifiers::NONE, &mut sel).unwrap();
    let range = Modifiers {
        toggle: false,
        range: true,
    };
    engine.on_press(5, cell(5), range, &mut sel).unwrap();
    assert_eq!(sel.positions(), &[3, 4, 5].into_iter().collect::<BTreeSet<_>>());
    assert_eq!(engine.state(), DragState::Idle);
}

#[test]
fn test_autoscroll_engages_and_disengages() {
    let (_, mut sel) = setup(20, &[4]);
    let mut engine = DragReorderEngine::new();
    let g = grid(20);

    engine.on_press(4, cell(4), Modifiers::NONE, &mut sel).unwrap();
    let feedback = engine.on_move(Point::new(50.0, 440.0), &g);
    assert_eq!(feedback.autoscroll, Some(ScrollDirection::Down));
    assert!(feedback.autoscroll_changed);
    assert!(engine.autoscroll_step() > 0.0);

    let feedback = engine.on_move(Point::new(50.0, 200.0), &g);
    assert_eq!(feedback.autoscroll, None);
    assert!(feedback.autoscroll_changed);
    assert_eq!(engine.autoscroll_step(), 0.0);
}

#[test]
fn test_drop_on_empty_space_moves_pages_to_end() {
    let (mut seq, mut sel) = setup(6, &[0]);
    let mut engine = DragReorderEngine::new();
    let g = grid(6);

    engine.on_press(0, cell(0), Modifiers::NONE, &mut sel).unwrap();
    let feedback = engine.on_move(Point::new(350.0, 200.0), &g);
    assert_eq!(feedback.target, Some(6));

    let outcome = engine
        .on_release(Point::new(350.0, 200.0), &g, &mut seq, &mut sel)
        .unwrap();

    assert_eq!(outcome, DragOutcome::Moved { range: 5..6 });
    assert_eq!(
        seq.refs(),
        [1, 2, 3, 4, 5, 0].map(PageRef).as_slice()
    );
    assert_eq!(sel.positions(), &[5].into_iter().collect::<BTreeSet<_>>());
}

#[test]
fn test_drop_on_last_page_lands_before_it() {
    let (mut seq, mut sel) = setup(6, &[0]);
    let mut engine = DragReorderEngine::new();
    let g = grid(6);

    engine.on_press(0, cell(0), Modifiers::NONE, &mut sel).unwrap();
    engine.on_move(cell(5), &g);
    let outcome = engine.on_release(cell(5), &g, &mut seq, &mut sel).unwrap();

    assert_eq!(outcome, DragOutcome::Moved { range: 4..5 });
    assert_eq!(seq.get(4), Some(PageRef(0)));
    assert_eq!(seq.get(5), Some(PageRef(5)));
}
