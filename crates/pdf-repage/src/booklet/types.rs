use crate::constants::SPLIT_WARNING_SHEETS;
use crate::sequence::SnapshotPage;
use crate::types::{PageRef, PaperFormat, ReadingDirection, Rotation};

/// One half of a sheet face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Page { page: PageRef, rotation: Rotation },
    Blank,
}

impl Slot {
    pub fn is_blank(&self) -> bool {
        matches!(self, Slot::Blank)
    }

    pub fn page(&self) -> Option<PageRef> {
        match self {
            Slot::Page { page, .. } => Some(*page),
            Slot::Blank => None,
        }
    }
}

impl From<&SnapshotPage> for Slot {
    fn from(entry: &SnapshotPage) -> Self {
        Slot::Page {
            page: entry.page,
            rotation: entry.rotation,
        }
    }
}

/// One printed side of a sheet: two slots side by side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetFace {
    pub left: Slot,
    pub right: Slot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub front: SheetFace,
    pub back: Option<SheetFace>,
}

impl Sheet {
    /// Faces in print order, front first
    pub fn faces(&self) -> impl Iterator<Item = &SheetFace> {
        std::iter::once(&self.front).chain(self.back.as_ref())
    }
}

/// An independently folded group of nested sheets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// 1-based position among the signatures
    pub ordinal: usize,
    /// File name suffix (`part_N`) when the booklet is split
    pub suffix: Option<String>,
    pub sheets: Vec<Sheet>,
}

impl Signature {
    pub fn face_count(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.faces().count()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookletPlan {
    pub paper: PaperFormat,
    pub direction: ReadingDirection,
    pub signatures: Vec<Signature>,
}

impl BookletPlan {
    pub fn sheet_count(&self) -> usize {
        self.signatures.iter().map(|s| s.sheets.len()).sum()
    }

    pub fn face_count(&self) -> usize {
        self.signatures.iter().map(Signature::face_count).sum()
    }

    /// Blank slots added to fill out the last sheet of each signature
    pub fn blank_count(&self) -> usize {
        self.signatures
            .iter()
            .flat_map(|s| &s.sheets)
            .flat_map(Sheet::faces)
            .flat_map(|face| [face.left, face.right])
            .filter(Slot::is_blank)
            .count()
    }

    /// Whether any signature is too thick to fold comfortably
    pub fn split_recommended(&self) -> bool {
        self.signatures
            .iter()
            .any(|s| s.sheets.len() > SPLIT_WARNING_SHEETS)
    }

    pub fn is_split(&self) -> bool {
        self.signatures.iter().any(|s| s.suffix.is_some())
    }
}
