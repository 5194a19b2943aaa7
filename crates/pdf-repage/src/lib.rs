//! Page reordering, rotation, deletion and booklet imposition for PDF documents.
//!
//! The crate is split into a document-independent core (sequence, selection,
//! drag reordering, booklet planning) and a [`DocumentBackend`] that turns
//! plans into PDF bytes. [`Session`] ties the two together.

pub mod backend;
pub mod booklet;
pub mod constants;
pub mod drag;
mod export;
pub mod geometry;
mod options;
mod progress;
pub mod selection;
pub mod sequence;
mod session;
mod stats;
mod types;

pub use backend::{DocumentBackend, LopdfBackend, LopdfOutput, LopdfSource, PageInfo, SheetHandle};
pub use booklet::{BookletImposer, BookletPlan, Sheet, SheetFace, Signature, Slot};
pub use drag::{
    DragFeedback, DragOutcome, DragReorderEngine, DragState, Modifiers, Point, ScrollDirection,
    ThumbnailGrid,
};
pub use export::part_path;
pub use geometry::Rect;
pub use options::*;
pub use progress::{CancelToken, Progress};
pub use selection::SelectionModel;
pub use sequence::{Nudge, PageSequence, PositionMap, SnapshotPage};
pub use session::{BookletReport, Session};
pub use stats::{BookletStatistics, calculate_statistics};
pub use types::*;
