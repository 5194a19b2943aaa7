//! The ordered list of pages being edited
//!
//! A [`PageSequence`] owns the working order of page handles and the user
//! rotation of each one. Positions are zero-based indices into the current
//! order. Every operation validates its positions before touching anything,
//! so a failed call leaves the sequence unchanged.

use crate::types::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::ops::Range;

/// One entry of a frozen sequence: the page and its user rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotPage {
    pub page: PageRef,
    pub rotation: Rotation,
}

/// Direction for a one-step move of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Nudge {
    /// Towards position 0
    Up,
    /// Towards the end
    Down,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSequence {
    order: Vec<PageRef>,
    rotations: HashMap<PageRef, Rotation>,
}

impl PageSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from handles in order, all unrotated
    pub fn from_refs(refs: impl IntoIterator<Item = PageRef>) -> Result<Self> {
        let mut sequence = Self::new();
        sequence.append(refs)?;
        Ok(sequence)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles in their current order
    pub fn refs(&self) -> &[PageRef] {
        &self.order
    }

    pub fn get(&self, position: usize) -> Option<PageRef> {
        self.order.get(position).copied()
    }

    pub fn contains(&self, page: PageRef) -> bool {
        self.rotations.contains_key(&page)
    }

    pub fn position_of(&self, page: PageRef) -> Option<usize> {
        self.order.iter().position(|&p| p == page)
    }

    pub fn rotation(&self, page: PageRef) -> Option<Rotation> {
        self.rotations.get(&page).copied()
    }

    /// Frozen copy of the order and rotations, detached from later edits
    pub fn snapshot(&self) -> Vec<SnapshotPage> {
        self.order
            .iter()
            .map(|&page| SnapshotPage {
                page,
                rotation: self.rotations.get(&page).copied().unwrap_or_default(),
            })
            .collect()
    }

    /// Insert pages before position `at` (`at == len` appends).
    ///
    /// Returns the positions the new pages now occupy.
    pub fn insert_at(
        &mut self,
        at: usize,
        refs: impl IntoIterator<Item = PageRef>,
    ) -> Result<Range<usize>> {
        if at > self.order.len() {
            return Err(RepageError::InvalidPosition {
                position: at,
                len: self.order.len(),
            });
        }

        let refs: Vec<PageRef> = refs.into_iter().collect();
        let mut seen = HashSet::with_capacity(refs.len());
        for &page in &refs {
            if self.rotations.contains_key(&page) || !seen.insert(page) {
                return Err(RepageError::DuplicatePage(page));
            }
        }

        for &page in &refs {
            self.rotations.insert(page, Rotation::None);
        }
        let count = refs.len();
        self.order.splice(at..at, refs);
        Ok(at..at + count)
    }

    pub fn append(&mut self, refs: impl IntoIterator<Item = PageRef>) -> Result<Range<usize>> {
        self.insert_at(self.order.len(), refs)
    }

    /// Remove the pages at `positions`, returning the new length.
    pub fn remove_at(&mut self, positions: &BTreeSet<usize>) -> Result<usize> {
        self.check_positions(positions)?;

        let rotations = &mut self.rotations;
        let mut index = 0;
        self.order.retain(|page| {
            let keep = !positions.contains(&index);
            index += 1;
            if !keep {
                rotations.remove(page);
            }
            keep
        });

        Ok(self.order.len())
    }

    /// Move the pages at `positions` as one block so it starts where the gap
    /// `target` was, keeping their relative order.
    ///
    /// `target` is a gap index in the order before the move (`0..=len`). The
    /// block is inserted at `target` minus the number of moved pages that sat
    /// before it. Returns the block's new positions.
    pub fn move_batch(&mut self, positions: &BTreeSet<usize>, target: usize) -> Result<Range<usize>> {
        self.check_positions(positions)?;
        if target > self.order.len() {
            return Err(RepageError::InvalidPosition {
                position: target,
                len: self.order.len(),
            });
        }

        let insert_at = target - positions.range(..target).count();
        let mut moved = Vec::with_capacity(positions.len());
        let mut remaining = Vec::with_capacity(self.order.len() - positions.len());
        for (index, page) in self.order.drain(..).enumerate() {
            if positions.contains(&index) {
                moved.push(page);
            } else {
                remaining.push(page);
            }
        }

        let end = insert_at + moved.len();
        remaining.splice(insert_at..insert_at, moved);
        self.order = remaining;

        log::debug!("Moved {} page(s) to {}..{}", end - insert_at, insert_at, end);
        Ok(insert_at..end)
    }

    /// Compose `delta` onto the rotation of each listed page.
    ///
    /// A page listed more than once is rotated once.
    pub fn set_rotation(&mut self, pages: &[PageRef], delta: Rotation) -> Result<()> {
        if let Some(&missing) = pages.iter().find(|page| !self.rotations.contains_key(page)) {
            return Err(RepageError::UnknownPage(missing));
        }

        let unique: HashSet<PageRef> = pages.iter().copied().collect();
        for page in unique {
            if let Some(rotation) = self.rotations.get_mut(&page) {
                *rotation = rotation.rotated_by(delta);
            }
        }
        Ok(())
    }

    /// Handles at the given positions, in position order
    pub fn refs_at(&self, positions: &BTreeSet<usize>) -> Result<Vec<PageRef>> {
        self.check_positions(positions)?;
        Ok(positions.iter().map(|&p| self.order[p]).collect())
    }

    /// Shift every selected page one step, swapping with its neighbour.
    ///
    /// A contiguous block moves as a unit. Returns the new positions, or
    /// `None` (with no change) when the move would cross either end.
    pub fn nudge(
        &mut self,
        positions: &BTreeSet<usize>,
        direction: Nudge,
    ) -> Result<Option<BTreeSet<usize>>> {
        self.check_positions(positions)?;
        let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
            return Ok(None);
        };

        match direction {
            Nudge::Up => {
                if first == 0 {
                    return Ok(None);
                }
                for &p in positions {
                    self.order.swap(p - 1, p);
                }
                Ok(Some(positions.iter().map(|p| p - 1).collect()))
            }
            Nudge::Down => {
                if last + 1 >= self.order.len() {
                    return Ok(None);
                }
                for &p in positions.iter().rev() {
                    self.order.swap(p, p + 1);
                }
                Ok(Some(positions.iter().map(|p| p + 1).collect()))
            }
        }
    }

    fn check_positions(&self, positions: &BTreeSet<usize>) -> Result<()> {
        match positions.last() {
            Some(&position) if position >= self.order.len() => Err(RepageError::InvalidPosition {
                position,
                len: self.order.len(),
            }),
            _ => Ok(()),
        }
    }
}

/// Where each position of an old ordering ended up in a new one.
///
/// Derived by page identity, so it describes any structural change
/// (insert, remove, move, nudge) without knowing which one happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMap {
    targets: Vec<Option<usize>>,
    new_len: usize,
}

impl PositionMap {
    pub fn between(before: &[PageRef], after: &[PageRef]) -> Self {
        let index: HashMap<PageRef, usize> =
            after.iter().enumerate().map(|(i, &page)| (page, i)).collect();
        Self {
            targets: before.iter().map(|page| index.get(page).copied()).collect(),
            new_len: after.len(),
        }
    }

    pub fn identity(len: usize) -> Self {
        Self {
            targets: (0..len).map(Some).collect(),
            new_len: len,
        }
    }

    /// New position of an old one, `None` if the page is gone
    pub fn get(&self, old: usize) -> Option<usize> {
        self.targets.get(old).copied().flatten()
    }

    pub fn old_len(&self) -> usize {
        self.targets.len()
    }

    pub fn new_len(&self) -> usize {
        self.new_len
    }
}
