use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepageError {
    #[error("Position {position} is out of range for {len} pages")]
    InvalidPosition { position: usize, len: usize },
    #[error("Page {0} is not part of the sequence")]
    UnknownPage(PageRef),
    #[error("Page {0} is already part of the sequence")]
    DuplicatePage(PageRef),
    #[error("No pages in the sequence")]
    EmptySequence,
    #[error("Document backend failed while {context}: {source}")]
    Backend {
        context: String,
        #[source]
        source: Box<RepageError>,
    },
    #[error("Import of {} failed, nothing was added: {source}", .path.display())]
    PartialImport {
        path: PathBuf,
        #[source]
        source: Box<RepageError>,
    },
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl RepageError {
    /// Wrap a lower-level failure with what the backend was doing at the time.
    pub fn backend(context: impl Into<String>, source: impl Into<RepageError>) -> Self {
        RepageError::Backend {
            context: context.into(),
            source: Box::new(source.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RepageError>;

/// Opaque handle to one page owned by a document backend.
///
/// Handles are issued by the backend on import and stay stable while the
/// page is moved, rotated or selected. Two handles are equal only if they
/// name the same imported page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRef(pub usize);

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Clockwise rotation applied to a page when it is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Parse a multiple of 90 degrees, negative values count counter-clockwise.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        Some(Self::from_quarter_turns(degrees / 90))
    }

    fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => Rotation::None,
            1 => Rotation::Clockwise90,
            2 => Rotation::Clockwise180,
            _ => Rotation::Clockwise270,
        }
    }

    fn quarter_turns(self) -> i32 {
        self.degrees() / 90
    }

    /// Compose two rotations, mod 360.
    pub fn rotated_by(self, delta: Rotation) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + delta.quarter_turns())
    }

    pub fn inverse(self) -> Self {
        Self::from_quarter_turns(-self.quarter_turns())
    }

    /// Whether width and height trade places under this rotation
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }
}

/// Output sheet format for booklet imposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperFormat {
    #[default]
    A4,
    Letter,
}

impl PaperFormat {
    /// Landscape sheet size (width, height) in points
    pub fn sheet_size_pt(self) -> (f32, f32) {
        match self {
            PaperFormat::A4 => crate::constants::A4_LANDSCAPE_PT,
            PaperFormat::Letter => crate::constants::LETTER_LANDSCAPE_PT,
        }
    }
}

/// Reading direction of the finished booklet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadingDirection {
    /// Left-to-right: spine on the left of the folded booklet
    #[default]
    Ltr,
    /// Right-to-left: mirror image of [`ReadingDirection::Ltr`]
    Rtl,
}

impl ReadingDirection {
    /// Order a (reading-first, reading-second) pair for this direction.
    pub(crate) fn order<T>(self, first: T, second: T) -> (T, T) {
        match self {
            ReadingDirection::Ltr => (first, second),
            ReadingDirection::Rtl => (second, first),
        }
    }
}

/// How a booklet is divided into independently folded signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplitMode {
    /// One signature holding every page
    #[default]
    Single,
    /// Signatures of at most this many sheets each
    BySheets(usize),
}
