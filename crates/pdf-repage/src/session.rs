//! An editing session over one working document
//!
//! [`Session`] owns the backend, the page sequence, the selection and the
//! drag engine, and keeps them consistent: every structural change to the
//! sequence is followed by a selection reconcile.

use crate::backend::DocumentBackend;
use crate::booklet::{BookletImposer, BookletPlan};
use crate::drag::{DragFeedback, DragOutcome, DragReorderEngine, Modifiers, Point, ThumbnailGrid};
use crate::export::{part_path, render_signature};
use crate::options::{BookletOptions, SaveOptions};
use crate::progress::{CancelToken, Progress};
use crate::selection::SelectionModel;
use crate::sequence::{Nudge, PageSequence, PositionMap};
use crate::stats::{BookletStatistics, calculate_statistics};
use crate::types::*;
use std::path::{Path, PathBuf};

/// Result of a booklet run
#[derive(Debug, Clone)]
pub struct BookletReport {
    pub plan: BookletPlan,
    /// Part files written for a split booklet, in signature order
    pub parts: Vec<PathBuf>,
    pub statistics: BookletStatistics,
}

pub struct Session<B: DocumentBackend> {
    backend: B,
    sequence: PageSequence,
    selection: SelectionModel,
    drag: DragReorderEngine,
}

impl<B: DocumentBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sequence: PageSequence::new(),
            selection: SelectionModel::new(0),
            drag: DragReorderEngine::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn sequence(&self) -> &PageSequence {
        &self.sequence
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionModel {
        &mut self.selection
    }

    pub fn drag(&self) -> &DragReorderEngine {
        &self.drag
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    // =========================================================================
    // Import
    // =========================================================================

    /// Replace the working document with the given files, in order
    pub fn open(
        &mut self,
        paths: &[PathBuf],
        progress: &mut dyn FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<usize> {
        let sources = self.load_sources(paths, progress, cancel)?;

        self.drag.cancel();
        self.backend.reset();
        let refs = self.insert_sources(sources)?;
        self.sequence = PageSequence::from_refs(refs)?;
        self.selection.reset(self.sequence.len());

        log::info!("Opened {} page(s) from {} file(s)", self.sequence.len(), paths.len());
        Ok(self.sequence.len())
    }

    /// Append the pages of the given files to the end of the sequence.
    ///
    /// Returns the number of pages added.
    pub fn add(
        &mut self,
        paths: &[PathBuf],
        progress: &mut dyn FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<usize> {
        let sources = self.load_sources(paths, progress, cancel)?;
        let refs = self.insert_sources(sources)?;
        let added = refs.len();
        self.mutate(|sequence| sequence.append(refs))?;

        log::info!("Added {} page(s) from {} file(s)", added, paths.len());
        Ok(added)
    }

    /// Parse every file before anything is imported, so one bad file leaves
    /// the session untouched
    fn load_sources(
        &self,
        paths: &[PathBuf],
        progress: &mut dyn FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<Vec<B::Source>> {
        if paths.is_empty() {
            return Err(RepageError::Config("No input files specified".to_string()));
        }

        let mut sources = Vec::with_capacity(paths.len());
        for (index, path) in paths.iter().enumerate() {
            cancel.check()?;
            let source = self
                .backend
                .open_source(path)
                .map_err(|e| RepageError::PartialImport {
                    path: path.clone(),
                    source: Box::new(e),
                })?;
            sources.push(source);
            progress(Progress::new("Loading files", index + 1, paths.len()));
        }
        cancel.check()?;
        Ok(sources)
    }

    fn insert_sources(&mut self, sources: Vec<B::Source>) -> Result<Vec<PageRef>> {
        let mut refs = Vec::new();
        for source in sources {
            let count = self.backend.source_page_count(&source);
            refs.extend(self.backend.insert_pages(source, 0..count)?);
        }
        Ok(refs)
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Run a structural change and carry the selection across it
    fn mutate<T>(&mut self, change: impl FnOnce(&mut PageSequence) -> Result<T>) -> Result<T> {
        let before = self.sequence.refs().to_vec();
        let result = change(&mut self.sequence)?;
        let map = PositionMap::between(&before, self.sequence.refs());
        self.selection.reconcile(&map);
        Ok(result)
    }

    /// Remove the selected pages. Returns how many were removed.
    pub fn delete_selected(&mut self) -> Result<usize> {
        let positions = self.selection.positions().clone();
        if positions.is_empty() {
            return Ok(0);
        }
        self.mutate(|sequence| sequence.remove_at(&positions))?;
        Ok(positions.len())
    }

    pub fn rotate_selected(&mut self, delta: Rotation) -> Result<()> {
        let pages = self.sequence.refs_at(self.selection.positions())?;
        self.sequence.set_rotation(&pages, delta)
    }

    /// Move the selection one step. Returns whether anything moved.
    pub fn nudge_selected(&mut self, direction: Nudge) -> Result<bool> {
        let positions = self.selection.positions().clone();
        let moved = self.mutate(|sequence| sequence.nudge(&positions, direction))?;
        Ok(moved.is_some())
    }

    /// Move the selection as a block before the gap `target`
    pub fn move_selected_to(&mut self, target: usize) -> Result<std::ops::Range<usize>> {
        let positions = self.selection.positions().clone();
        let range = self.mutate(|sequence| sequence.move_batch(&positions, target))?;
        if !range.is_empty() {
            self.selection.select_range(range.clone())?;
        }
        Ok(range)
    }

    // =========================================================================
    // Pointer Interaction
    // =========================================================================

    pub fn on_press(&mut self, position: usize, point: Point, modifiers: Modifiers) -> Result<()> {
        self.drag
            .on_press(position, point, modifiers, &mut self.selection)
    }

    pub fn on_move(&mut self, point: Point, grid: &ThumbnailGrid) -> DragFeedback {
        self.drag.on_move(point, grid)
    }

    pub fn on_release(&mut self, point: Point, grid: &ThumbnailGrid) -> Result<DragOutcome> {
        self.drag
            .on_release(point, grid, &mut self.sequence, &mut self.selection)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    // =========================================================================
    // Output
    // =========================================================================

    pub fn statistics(&self, options: &BookletOptions) -> Result<BookletStatistics> {
        calculate_statistics(self.sequence.len(), options)
    }

    /// Impose the current sequence as a booklet and make it the working
    /// document.
    ///
    /// When the booklet is split and `parts_path` is given, each signature is
    /// also written on its own next to it (`<stem>_part_N.<ext>`), saved with
    /// `save_options`. Nothing is written and the session is unchanged unless
    /// every signature renders.
    pub fn create_booklet(
        &mut self,
        options: &BookletOptions,
        parts_path: Option<&Path>,
        save_options: &SaveOptions,
        progress: &mut dyn FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<BookletReport> {
        save_options.validate()?;
        let snapshot = self.sequence.snapshot();
        let plan = BookletImposer::impose(&snapshot, options)?;
        let statistics = BookletStatistics::from_plan(snapshot.len(), &plan);
        if plan.split_recommended() {
            log::warn!(
                "Booklet has a signature of more than {} sheets; consider splitting",
                crate::constants::SPLIT_WARNING_SHEETS
            );
        }

        let mut combined = self.backend.new_output();
        let mut parts = Vec::new();
        let total = plan.signatures.len();
        for (index, signature) in plan.signatures.iter().enumerate() {
            cancel.check()?;
            render_signature(&self.backend, &mut combined, signature, plan.paper)?;

            if let (Some(base), Some(suffix)) = (parts_path, signature.suffix.as_deref()) {
                let mut part = self.backend.new_output();
                render_signature(&self.backend, &mut part, signature, plan.paper)?;
                parts.push((part_path(base, suffix), part));
            }
            progress(Progress::new("Imposing signatures", index + 1, total));
        }
        cancel.check()?;

        let mut written = Vec::with_capacity(parts.len());
        for (path, part) in parts {
            self.backend.save(part, &path, save_options)?;
            written.push(path);
        }

        self.drag.cancel();
        let refs = self.backend.replace_with_output(combined)?;
        self.sequence = PageSequence::from_refs(refs)?;
        self.selection.reset(self.sequence.len());

        log::info!(
            "Created booklet: {} signature(s), {} sheet(s)",
            statistics.signatures,
            statistics.output_sheets
        );
        Ok(BookletReport {
            plan,
            parts: written,
            statistics,
        })
    }

    /// Write the sequence as it stands, one output page per page.
    ///
    /// Returns the number of pages written.
    pub fn export_flat(
        &self,
        path: &Path,
        options: &SaveOptions,
        progress: &mut dyn FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<usize> {
        if self.sequence.is_empty() {
            return Err(RepageError::EmptySequence);
        }
        options.validate()?;

        let snapshot = self.sequence.snapshot();
        let mut output = self.backend.new_output();
        for (index, entry) in snapshot.iter().enumerate() {
            cancel.check()?;
            self.backend
                .copy_page(&mut output, entry.page, entry.rotation)?;
            progress(Progress::new("Exporting pages", index + 1, snapshot.len()));
        }
        cancel.check()?;

        self.backend.save(output, path, options)?;
        Ok(snapshot.len())
    }
}
