//! Document backends
//!
//! Everything that touches PDF bytes sits behind [`DocumentBackend`]. The
//! editing core only ever sees [`PageRef`] handles.

mod pdf;

pub use self::pdf::{LopdfBackend, LopdfOutput, LopdfSource};

use crate::geometry::Rect;
use crate::options::SaveOptions;
use crate::types::*;
use std::ops::Range;
use std::path::Path;

/// Geometry of one source page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageInfo {
    /// Page box in default user space
    pub media_box: Rect,
    /// Rotation stored in the document itself (`/Rotate`)
    pub intrinsic_rotation: Rotation,
}

impl PageInfo {
    /// Displayed size once intrinsic and user rotation are applied
    pub fn display_size(&self, rotation: Rotation) -> (f32, f32) {
        self.media_box
            .rotated_size(self.intrinsic_rotation.rotated_by(rotation))
    }
}

/// Index of a page composed into an output document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetHandle(pub usize);

pub trait DocumentBackend {
    /// A loaded file whose pages have not been imported yet
    type Source;
    /// A document under construction
    type Output;

    /// Drop every imported page
    fn reset(&mut self);

    fn open_source(&self, path: &Path) -> Result<Self::Source>;

    fn source_page_count(&self, source: &Self::Source) -> usize;

    /// Import a range of a source's pages, returning fresh handles in order
    fn insert_pages(&mut self, source: Self::Source, pages: Range<usize>) -> Result<Vec<PageRef>>;

    fn page_info(&self, page: PageRef) -> Result<PageInfo>;

    fn new_output(&self) -> Self::Output;

    fn output_page_count(&self, output: &Self::Output) -> usize;

    /// Append an empty page of `size` (width, height in points)
    fn compose_page(&self, output: &mut Self::Output, size: (f32, f32)) -> SheetHandle;

    /// Draw a page into `rect` of a composed page, scaled to fit, centred,
    /// rotated clockwise by `rotation` on top of its intrinsic rotation
    fn draw_page_into(
        &self,
        output: &mut Self::Output,
        sheet: SheetHandle,
        rect: Rect,
        page: PageRef,
        rotation: Rotation,
    ) -> Result<()>;

    /// Append a page at its own size with `rotation` applied
    fn copy_page(&self, output: &mut Self::Output, page: PageRef, rotation: Rotation) -> Result<()> {
        let info = self.page_info(page)?;
        let size = info.display_size(rotation);
        let sheet = self.compose_page(output, size);
        self.draw_page_into(output, sheet, Rect::new(0.0, 0.0, size.0, size.1), page, rotation)
    }

    fn save(&self, output: Self::Output, path: &Path, options: &SaveOptions) -> Result<()>;

    /// Make `output` the working document, returning handles for its pages
    fn replace_with_output(&mut self, output: Self::Output) -> Result<Vec<PageRef>>;
}
