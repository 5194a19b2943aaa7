//! Rendering plans and sequences into backend output documents

use crate::backend::DocumentBackend;
use crate::booklet::{Signature, Slot};
use crate::geometry::Rect;
use crate::types::*;
use std::path::{Path, PathBuf};

/// Draw every face of a signature as one landscape output page each
pub(crate) fn render_signature<B: DocumentBackend>(
    backend: &B,
    output: &mut B::Output,
    signature: &Signature,
    paper: PaperFormat,
) -> Result<()> {
    let (width, height) = paper.sheet_size_pt();
    let half = width / 2.0;
    let left = Rect::new(0.0, 0.0, half, height);
    let right = Rect::new(half, 0.0, half, height);

    for sheet in &signature.sheets {
        for face in sheet.faces() {
            let handle = backend.compose_page(output, (width, height));
            for (slot, rect) in [(face.left, left), (face.right, right)] {
                if let Slot::Page { page, rotation } = slot {
                    backend.draw_page_into(output, handle, rect, page, rotation)?;
                }
            }
        }
    }
    Ok(())
}

/// File path for one part of a split booklet: `<stem>_<suffix>.<ext>`
pub fn part_path(base: &Path, suffix: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    base.with_file_name(name)
}
