//! Multi-selection over sequence positions
//!
//! Mirrors the usual file-manager conventions: a plain click selects one
//! item, a toggle click adds or removes one, and a range click selects
//! everything between the anchor and the clicked item. The anchor is the
//! position of the last plain or toggle click and is left alone by range
//! clicks, so repeated range clicks pivot around the same item.

use crate::sequence::PositionMap;
use crate::types::*;
use std::collections::BTreeSet;
use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    positions: BTreeSet<usize>,
    anchor: Option<usize>,
    len: usize,
}

impl SelectionModel {
    /// Empty selection over a sequence of `len` pages
    pub fn new(len: usize) -> Self {
        Self {
            positions: BTreeSet::new(),
            anchor: None,
            len,
        }
    }

    /// Length of the sequence this selection indexes into
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn positions(&self) -> &BTreeSet<usize> {
        &self.positions
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn count(&self) -> usize {
        self.positions.len()
    }

    fn check(&self, position: usize) -> Result<()> {
        if position >= self.len {
            return Err(RepageError::InvalidPosition {
                position,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Replace the selection with one item, which becomes the anchor
    pub fn select_single(&mut self, position: usize) -> Result<()> {
        self.check(position)?;
        self.positions.clear();
        self.positions.insert(position);
        self.anchor = Some(position);
        Ok(())
    }

    /// Flip membership of one item. Returns whether it is now selected.
    pub fn toggle(&mut self, position: usize) -> Result<bool> {
        self.check(position)?;
        if self.positions.remove(&position) {
            if self.positions.is_empty() {
                self.anchor = None;
            }
            return Ok(false);
        }
        self.positions.insert(position);
        self.anchor = Some(position);
        Ok(true)
    }

    /// Select the inclusive span between the anchor and `position`.
    ///
    /// With `additive` the span is added to the current selection, otherwise
    /// it replaces it. Without an anchor this behaves like a plain click.
    pub fn extend_range(&mut self, position: usize, additive: bool) -> Result<()> {
        self.check(position)?;
        let Some(anchor) = self.anchor else {
            return self.select_single(position);
        };

        let (low, high) = (anchor.min(position), anchor.max(position));
        if !additive {
            self.positions.clear();
        }
        self.positions.extend(low..=high);
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.positions = (0..self.len).collect();
        if self.anchor.is_none() && self.len > 0 {
            self.anchor = Some(0);
        }
    }

    /// Replace the selection with a contiguous range, anchored at its start
    pub fn select_range(&mut self, range: Range<usize>) -> Result<()> {
        if range.end > self.len {
            return Err(RepageError::InvalidPosition {
                position: range.end,
                len: self.len,
            });
        }
        self.positions = range.clone().collect();
        self.anchor = if range.is_empty() {
            None
        } else {
            Some(range.start)
        };
        Ok(())
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.anchor = None;
    }

    /// Carry the selection across a structural change of the sequence.
    ///
    /// Selected pages keep their selection at their new positions, removed
    /// pages drop out, and the anchor follows its page (or is cleared).
    pub fn reconcile(&mut self, map: &PositionMap) {
        self.positions = self
            .positions
            .iter()
            .filter_map(|&old| map.get(old))
            .collect();
        self.anchor = self.anchor.and_then(|old| map.get(old));
        if self.positions.is_empty() {
            self.anchor = None;
        }
        self.len = map.new_len();
    }

    /// Forget everything and index into a sequence of `len` pages
    pub fn reset(&mut self, len: usize) {
        *self = Self::new(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::PageSequence;

    fn set(items: &[usize]) -> BTreeSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_single_then_range() {
        let mut sel = SelectionModel::new(10);
        sel.select_single(2).unwrap();
        sel.extend_range(5, false).unwrap();
        assert_eq!(sel.positions(), &set(&[2, 3, 4, 5]));
        assert_eq!(sel.anchor(), Some(2));

        sel.toggle(4).unwrap();
        assert_eq!(sel.positions(), &set(&[2, 3, 5]));
        assert_eq!(sel.anchor(), Some(2));

        sel.toggle(8).unwrap();
        assert_eq!(sel.anchor(), Some(8));
    }

    #[test]
    fn test_range_pivots_around_anchor() {
        let mut sel = SelectionModel::new(10);
        sel.select_single(5).unwrap();
        sel.extend_range(8, false).unwrap();
        sel.extend_range(3, false).unwrap();
        assert_eq!(sel.positions(), &set(&[3, 4, 5]));
        assert_eq!(sel.anchor(), Some(5));
    }

    #[test]
    fn test_additive_range_keeps_existing() {
        let mut sel = SelectionModel::new(10);
        sel.select_single(0).unwrap();
        sel.toggle(6).unwrap();
        sel.extend_range(8, true).unwrap();
        assert_eq!(sel.positions(), &set(&[0, 6, 7, 8]));
    }

    #[test]
    fn test_range_without_anchor_selects_single() {
        let mut sel = SelectionModel::new(4);
        sel.extend_range(3, false).unwrap();
        assert_eq!(sel.positions(), &set(&[3]));
        assert_eq!(sel.anchor(), Some(3));
    }

    #[test]
    fn test_toggle_last_item_clears_anchor() {
        let mut sel = SelectionModel::new(4);
        sel.toggle(1).unwrap();
        assert_eq!(sel.anchor(), Some(1));
        assert!(!sel.toggle(1).unwrap());
        assert!(sel.is_empty());
        assert_eq!(sel.anchor(), None);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut sel = SelectionModel::new(3);
        assert!(matches!(
            sel.select_single(3),
            Err(RepageError::InvalidPosition { position: 3, len: 3 })
        ));
        assert!(sel.toggle(7).is_err());
        assert!(sel.select_range(1..4).is_err());
        assert!(sel.is_empty());
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut sel = SelectionModel::new(3);
        sel.select_all();
        assert_eq!(sel.count(), 3);
        sel.clear();
        assert!(sel.is_empty());
        assert_eq!(sel.anchor(), None);
    }

    #[test]
    fn test_reconcile_after_delete() {
        let mut seq = PageSequence::from_refs((0..6).map(PageRef)).unwrap();
        let mut sel = SelectionModel::new(6);
        sel.select_single(4).unwrap();
        sel.toggle(5).unwrap();

        let before = seq.refs().to_vec();
        seq.remove_at(&set(&[1, 5])).unwrap();
        sel.reconcile(&PositionMap::between(&before, seq.refs()));

        assert_eq!(sel.positions(), &set(&[3]));
        assert_eq!(sel.anchor(), None);
        assert_eq!(sel.len(), 4);
    }

    #[test]
    fn test_reconcile_follows_moved_pages() {
        let mut seq = PageSequence::from_refs((0..5).map(PageRef)).unwrap();
        let mut sel = SelectionModel::new(5);
        sel.select_single(0).unwrap();
        sel.toggle(1).unwrap();

        let before = seq.refs().to_vec();
        seq.move_batch(&set(&[0, 1]), 5).unwrap();
        sel.reconcile(&PositionMap::between(&before, seq.refs()));

        assert_eq!(sel.positions(), &set(&[3, 4]));
        assert_eq!(sel.anchor(), Some(4));
    }
}
