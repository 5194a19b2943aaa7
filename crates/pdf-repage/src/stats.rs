use crate::booklet::{BookletPlan, chunk_len, padded_len};
use crate::constants::{PAGES_PER_SHEET, SPLIT_WARNING_SHEETS};
use crate::options::BookletOptions;
use crate::types::*;

/// Statistics about a booklet imposition
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BookletStatistics {
    /// Total number of source pages
    pub source_pages: usize,
    /// Number of signatures (1 unless split)
    pub signatures: usize,
    /// Sheet count of each signature, in order
    pub sheets_per_signature: Vec<usize>,
    /// Total number of physical sheets
    pub output_sheets: usize,
    /// Printed faces (two per sheet)
    pub output_faces: usize,
    /// Number of blank pages added for padding
    pub blank_pages_added: usize,
    /// Some signature exceeds the comfortable fold thickness
    pub split_recommended: bool,
}

/// Calculate statistics without building the plan
pub fn calculate_statistics(
    page_count: usize,
    options: &BookletOptions,
) -> Result<BookletStatistics> {
    options.validate()?;
    if page_count == 0 {
        return Err(RepageError::EmptySequence);
    }

    let chunk = chunk_len(page_count, options.split);
    let mut sheets_per_signature = Vec::new();
    let mut blank_pages_added = 0;
    let mut remaining = page_count;
    while remaining > 0 {
        let pages = remaining.min(chunk);
        let padded = padded_len(pages);
        sheets_per_signature.push(padded / PAGES_PER_SHEET);
        blank_pages_added += padded - pages;
        remaining -= pages;
    }

    let output_sheets = sheets_per_signature.iter().sum();
    Ok(BookletStatistics {
        source_pages: page_count,
        signatures: sheets_per_signature.len(),
        split_recommended: sheets_per_signature
            .iter()
            .any(|&sheets| sheets > SPLIT_WARNING_SHEETS),
        sheets_per_signature,
        output_sheets,
        output_faces: output_sheets * 2,
        blank_pages_added,
    })
}

impl BookletStatistics {
    /// Statistics of an already built plan
    pub fn from_plan(source_pages: usize, plan: &BookletPlan) -> Self {
        let sheets_per_signature: Vec<usize> =
            plan.signatures.iter().map(|s| s.sheets.len()).collect();
        Self {
            source_pages,
            signatures: plan.signatures.len(),
            sheets_per_signature,
            output_sheets: plan.sheet_count(),
            output_faces: plan.face_count(),
            blank_pages_added: plan.blank_count(),
            split_recommended: plan.split_recommended(),
        }
    }
}
