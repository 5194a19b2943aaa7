use std::path::PathBuf;

mod worker;

pub use worker::worker_task;

// Re-export types from library crates
pub use pdf_repage::{
    BookletOptions, BookletStatistics, CancelToken, Nudge, Rotation, SaveOptions, SnapshotPage,
};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum RepageCommand {
    /// Replace the working document with these files
    Open {
        paths: Vec<PathBuf>,
        cancel: CancelToken,
    },
    /// Append these files to the working document
    Add {
        paths: Vec<PathBuf>,
        cancel: CancelToken,
    },
    SelectSingle {
        position: usize,
    },
    Toggle {
        position: usize,
    },
    ExtendRange {
        position: usize,
        additive: bool,
    },
    SelectAll,
    ClearSelection,
    DeleteSelected,
    RotateSelected {
        delta: Rotation,
    },
    NudgeSelected {
        direction: Nudge,
    },
    MoveSelected {
        target: usize,
    },
    CreateBooklet {
        options: BookletOptions,
        /// Base path for part files of a split booklet
        parts_path: Option<PathBuf>,
        /// How part files are written
        save: SaveOptions,
        cancel: CancelToken,
    },
    Export {
        path: PathBuf,
        options: SaveOptions,
        cancel: CancelToken,
    },
    CalculateStats {
        options: BookletOptions,
    },
    LoadConfig {
        path: PathBuf,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum RepageUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    Loaded {
        page_count: usize,
        added: usize,
    },
    SequenceChanged {
        pages: Vec<SnapshotPage>,
    },
    SelectionChanged {
        positions: Vec<usize>,
        anchor: Option<usize>,
    },
    BookletCreated {
        stats: BookletStatistics,
        parts: Vec<PathBuf>,
    },
    Exported {
        path: PathBuf,
        page_count: usize,
    },
    StatsCalculated {
        stats: BookletStatistics,
    },
    ConfigLoaded {
        options: BookletOptions,
    },
    /// A cancellable command stopped early; the working document is unchanged
    Cancelled,
    Error {
        message: String,
    },
}
