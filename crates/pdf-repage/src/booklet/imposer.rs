use super::types::*;
use crate::constants::PAGES_PER_SHEET;
use crate::options::BookletOptions;
use crate::sequence::SnapshotPage;
use crate::types::*;
use std::collections::VecDeque;

/// Round a page count up to whole sheets
pub fn padded_len(page_count: usize) -> usize {
    page_count.div_ceil(PAGES_PER_SHEET) * PAGES_PER_SHEET
}

/// Pages per chunk for a split mode; `Single` keeps everything together
pub(crate) fn chunk_len(page_count: usize, split: SplitMode) -> usize {
    match split {
        SplitMode::Single => padded_len(page_count).max(PAGES_PER_SHEET),
        SplitMode::BySheets(sheets) => sheets * PAGES_PER_SHEET,
    }
}

pub struct BookletImposer;

impl BookletImposer {
    /// Lay out a frozen page sequence as booklet signatures.
    ///
    /// The sequence is cut into chunks of `sheets × 4` pages (or one chunk
    /// when not splitting). Each chunk is padded with blanks to whole sheets,
    /// then sheets are filled from both ends inwards so the innermost sheet
    /// carries the middle pages.
    pub fn impose(pages: &[SnapshotPage], options: &BookletOptions) -> Result<BookletPlan> {
        options.validate()?;
        if pages.is_empty() {
            return Err(RepageError::EmptySequence);
        }

        let split = matches!(options.split, SplitMode::BySheets(_));
        let signatures: Vec<Signature> = pages
            .chunks(chunk_len(pages.len(), options.split))
            .enumerate()
            .map(|(index, chunk)| {
                let ordinal = index + 1;
                Signature {
                    ordinal,
                    suffix: split.then(|| format!("part_{}", ordinal)),
                    sheets: impose_chunk(chunk, options.direction),
                }
            })
            .collect();

        log::debug!(
            "Imposed {} pages into {} signature(s)",
            pages.len(),
            signatures.len()
        );

        Ok(BookletPlan {
            paper: options.paper,
            direction: options.direction,
            signatures,
        })
    }
}

fn impose_chunk(chunk: &[SnapshotPage], direction: ReadingDirection) -> Vec<Sheet> {
    let mut queue: VecDeque<Slot> = chunk.iter().map(Slot::from).collect();
    queue.resize(padded_len(chunk.len()), Slot::Blank);

    let mut sheets = Vec::with_capacity(queue.len() / PAGES_PER_SHEET);
    while let Some(first) = queue.pop_front() {
        let last = queue.pop_back().unwrap_or(Slot::Blank);
        let (right, left) = direction.order(first, last);
        let front = SheetFace { left, right };

        if queue.is_empty() {
            sheets.push(Sheet { front, back: None });
            break;
        }

        let second = queue.pop_front().unwrap_or(Slot::Blank);
        let third = queue.pop_back().unwrap_or(Slot::Blank);
        let (left, right) = direction.order(second, third);
        sheets.push(Sheet {
            front,
            back: Some(SheetFace { left, right }),
        });
    }
    sheets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize) -> Slot {
        Slot::Page {
            page: PageRef(n),
            rotation: Rotation::None,
        }
    }

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(1), 4);
        assert_eq!(padded_len(4), 4);
        assert_eq!(padded_len(5), 8);
        assert_eq!(padded_len(0), 0);
    }

    #[test]
    fn test_single_sheet_chunk() {
        let pages: Vec<SnapshotPage> = (1..=4)
            .map(|n| SnapshotPage {
                page: PageRef(n),
                rotation: Rotation::None,
            })
            .collect();
        let sheets = impose_chunk(&pages, ReadingDirection::Ltr);
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].front, SheetFace { left: page(4), right: page(1) });
        assert_eq!(
            sheets[0].back,
            Some(SheetFace { left: page(2), right: page(3) })
        );
    }
}
