use pdf_repage::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn sequence(len: usize) -> PageSequence {
    PageSequence::from_refs((0..len).map(PageRef)).unwrap()
}

fn ids(sequence: &PageSequence) -> Vec<usize> {
    sequence.refs().iter().map(|p| p.0).collect()
}

/// A sequence length with a subset of its positions
fn sequence_and_positions() -> impl Strategy<Value = (usize, BTreeSet<usize>)> {
    (1usize..40).prop_flat_map(|len| (Just(len), prop::collection::btree_set(0..len, 0..=len / 2 + 1)))
}

#[test]
fn test_drag_drop_scenario_moves_block_after_gap() {
    let mut seq = sequence(10);
    let selected: BTreeSet<usize> = [2, 3].into_iter().collect();

    let range = seq.move_batch(&selected, 7).unwrap();

    assert_eq!(range, 5..7);
    assert_eq!(seq.get(5), Some(PageRef(2)));
    assert_eq!(seq.get(6), Some(PageRef(3)));
}

#[test]
fn test_invalid_positions_report_length() {
    let mut seq = sequence(3);
    let err = seq
        .move_batch(&[1].into_iter().collect(), 4)
        .unwrap_err();
    assert!(matches!(err, RepageError::InvalidPosition { position: 4, len: 3 }));
}

#[test]
fn test_rotation_from_degrees() {
    assert_eq!(Rotation::from_degrees(450), Some(Rotation::Clockwise90));
    assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Clockwise270));
    assert_eq!(Rotation::from_degrees(45), None);
    assert_eq!(Rotation::Clockwise90.inverse(), Rotation::Clockwise270);
}

proptest! {
    #[test]
    fn remove_keeps_order_of_survivors((len, positions) in sequence_and_positions()) {
        let mut seq = sequence(len);
        let remaining = seq.remove_at(&positions).unwrap();

        prop_assert_eq!(remaining, len - positions.len());
        let expected: Vec<usize> = (0..len).filter(|p| !positions.contains(p)).collect();
        prop_assert_eq!(ids(&seq), expected);
    }

    #[test]
    fn move_is_order_preserving_permutation(
        (len, positions) in sequence_and_positions(),
        target_seed in 0usize..1000,
    ) {
        let target = target_seed % (len + 1);
        let mut seq = sequence(len);
        let range = seq.move_batch(&positions, target).unwrap();

        let after = ids(&seq);
        let mut sorted = after.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..len).collect::<Vec<_>>());

        let moved: Vec<usize> = positions.iter().copied().collect();
        prop_assert_eq!(&after[range.clone()], moved.as_slice());

        let untouched: Vec<usize> = after
            .iter()
            .copied()
            .filter(|p| !positions.contains(p))
            .collect();
        let expected: Vec<usize> = (0..len).filter(|p| !positions.contains(p)).collect();
        prop_assert_eq!(untouched, expected);
    }

    #[test]
    fn contiguous_move_round_trips(
        len in 1usize..30,
        start_seed in 0usize..1000,
        count_seed in 0usize..1000,
        target_seed in 0usize..1000,
    ) {
        let first = start_seed % len;
        let count = 1 + count_seed % (len - first);
        let positions: BTreeSet<usize> = (first..first + count).collect();
        let target = first + target_seed % (len + 1 - first);

        let mut seq = sequence(len);
        let range = seq.move_batch(&positions, target).unwrap();
        let moved: BTreeSet<usize> = range.collect();
        seq.move_batch(&moved, first).unwrap();

        prop_assert_eq!(ids(&seq), (0..len).collect::<Vec<_>>());
    }

    #[test]
    fn rotation_inverse_restores(turns in 0i32..4, delta_turns in -8i32..8) {
        let start = Rotation::from_degrees(turns * 90).unwrap();
        let delta = Rotation::from_degrees(delta_turns * 90).unwrap();

        let mut seq = sequence(1);
        seq.set_rotation(&[PageRef(0)], start).unwrap();
        seq.set_rotation(&[PageRef(0)], delta).unwrap();
        seq.set_rotation(&[PageRef(0)], delta.inverse()).unwrap();

        prop_assert_eq!(seq.rotation(PageRef(0)), Some(start));
    }

    #[test]
    fn extend_range_is_symmetric(len in 1usize..50, a_seed in 0usize..1000, b_seed in 0usize..1000) {
        let (a, b) = (a_seed % len, b_seed % len);

        let mut forward = SelectionModel::new(len);
        forward.select_single(a).unwrap();
        forward.extend_range(b, false).unwrap();

        let mut backward = SelectionModel::new(len);
        backward.select_single(b).unwrap();
        backward.extend_range(a, false).unwrap();

        prop_assert_eq!(forward.positions(), backward.positions());
        prop_assert_eq!(forward.count(), a.abs_diff(b) + 1);
    }

    #[test]
    fn reconcile_never_leaves_stale_positions(
        (len, positions) in sequence_and_positions(),
        selected_seed in prop::collection::vec(0usize..1000, 0..10),
    ) {
        let mut seq = sequence(len);
        let mut selection = SelectionModel::new(len);
        for seed in selected_seed {
            selection.toggle(seed % len).unwrap();
        }

        let before = seq.refs().to_vec();
        seq.remove_at(&positions).unwrap();
        selection.reconcile(&PositionMap::between(&before, seq.refs()));

        prop_assert_eq!(selection.len(), seq.len());
        prop_assert!(selection.positions().iter().all(|&p| p < seq.len()));
        if selection.is_empty() {
            prop_assert_eq!(selection.anchor(), None);
        }
    }
}
