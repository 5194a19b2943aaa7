//! [`DocumentBackend`] on top of lopdf
//!
//! Imported documents are kept whole; the page table maps each handle to
//! its source document and page object. Output pages reference source
//! pages as Form XObjects, so rotation and scaling never rewrite content
//! streams.

mod compress;
mod import;
mod output;
mod xobject;

pub use output::LopdfOutput;

use super::{DocumentBackend, PageInfo, SheetHandle};
use crate::geometry::{Rect, placement_matrix};
use crate::options::SaveOptions;
use crate::types::*;
use lopdf::{Document, ObjectId};
use std::ops::Range;
use std::path::Path;

/// A parsed input file, not yet part of the working document
#[derive(Debug)]
pub struct LopdfSource {
    doc: Document,
    pages: Vec<ObjectId>,
}

impl LopdfSource {
    fn new(doc: Document) -> Self {
        let pages = doc.get_pages().into_values().collect();
        Self { doc, pages }
    }
}

#[derive(Debug, Clone, Copy)]
struct PageEntry {
    source: usize,
    id: ObjectId,
}

#[derive(Debug, Default)]
pub struct LopdfBackend {
    sources: Vec<Document>,
    pages: Vec<PageEntry>,
}

impl LopdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages ever imported since the last reset
    pub fn page_table_len(&self) -> usize {
        self.pages.len()
    }

    fn entry(&self, page: PageRef) -> Result<PageEntry> {
        self.pages
            .get(page.0)
            .copied()
            .ok_or(RepageError::UnknownPage(page))
    }

    fn import(&mut self, source: LopdfSource, pages: Range<usize>) -> Vec<PageRef> {
        let source_index = self.sources.len();
        let first = self.pages.len();
        self.pages.extend(source.pages[pages].iter().map(|&id| PageEntry {
            source: source_index,
            id,
        }));
        self.sources.push(source.doc);
        (first..self.pages.len()).map(PageRef).collect()
    }
}

impl DocumentBackend for LopdfBackend {
    type Source = LopdfSource;
    type Output = LopdfOutput;

    fn reset(&mut self) {
        self.sources.clear();
        self.pages.clear();
    }

    fn open_source(&self, path: &Path) -> Result<LopdfSource> {
        let doc = import::load_document(path)?;
        let source = LopdfSource::new(doc);
        log::debug!("Opened {} ({} pages)", path.display(), source.pages.len());
        Ok(source)
    }

    fn source_page_count(&self, source: &LopdfSource) -> usize {
        source.pages.len()
    }

    fn insert_pages(&mut self, source: LopdfSource, pages: Range<usize>) -> Result<Vec<PageRef>> {
        if pages.start > pages.end || pages.end > source.pages.len() {
            return Err(RepageError::InvalidPosition {
                position: pages.end,
                len: source.pages.len(),
            });
        }
        Ok(self.import(source, pages))
    }

    fn page_info(&self, page: PageRef) -> Result<PageInfo> {
        let entry = self.entry(page)?;
        let doc = &self.sources[entry.source];
        Ok(PageInfo {
            media_box: xobject::page_box(doc, entry.id),
            intrinsic_rotation: xobject::page_rotation(doc, entry.id),
        })
    }

    fn new_output(&self) -> LopdfOutput {
        LopdfOutput::new()
    }

    fn output_page_count(&self, output: &LopdfOutput) -> usize {
        output.page_count()
    }

    fn compose_page(&self, output: &mut LopdfOutput, size: (f32, f32)) -> SheetHandle {
        SheetHandle(output.push_page(size.0, size.1))
    }

    fn draw_page_into(
        &self,
        output: &mut LopdfOutput,
        sheet: SheetHandle,
        rect: Rect,
        page: PageRef,
        rotation: Rotation,
    ) -> Result<()> {
        let entry = self.entry(page)?;
        let info = self.page_info(page)?;
        let form = output
            .form_for(page, entry.source, &self.sources[entry.source], entry.id)
            .map_err(|e| RepageError::backend(format!("copying page {}", page), e))?;

        let effective = info.intrinsic_rotation.rotated_by(rotation);
        let matrix = placement_matrix(info.media_box, effective, rect);
        output.place(sheet.0, form, &matrix)
    }

    fn save(&self, output: LopdfOutput, path: &Path, options: &SaveOptions) -> Result<()> {
        options.validate()?;
        let pages = output.page_count();
        let mut doc = output.finalize();

        if let Some(settings) = &options.compression {
            compress::recompress_images(&mut doc, settings)
                .map_err(|e| RepageError::backend(format!("compressing {}", path.display()), e))?;
        }
        doc.compress();

        let mut writer = Vec::new();
        doc.save_to(&mut writer)
            .map_err(|e| RepageError::backend(format!("writing {}", path.display()), e))?;
        std::fs::write(path, writer)
            .map_err(|e| RepageError::backend(format!("writing {}", path.display()), e))?;

        log::info!("Saved {} page(s) to {}", pages, path.display());
        Ok(())
    }

    fn replace_with_output(&mut self, output: LopdfOutput) -> Result<Vec<PageRef>> {
        let source = LopdfSource::new(output.finalize());
        let count = source.pages.len();
        self.reset();
        Ok(self.import(source, 0..count))
    }
}
